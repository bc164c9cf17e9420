//! Reference designator filter.
//!
//! Shell-style patterns (`*`, `?`, `[seq]`, `[!seq]`) are translated into
//! anchored regular expressions once and matched case-sensitively.

use crate::error::{CamToolError, CamToolResult};
use regex::Regex;

/// Translate a shell-style glob into an anchored regex pattern.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut re = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '[' => {
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    re.push_str("\\[");
                    continue;
                }
                let class = &chars[i..j];
                i = j + 1;
                re.push('[');
                let body = match class.first() {
                    Some('!') => {
                        re.push('^');
                        &class[1..]
                    }
                    _ => class,
                };
                for (k, &ch) in body.iter().enumerate() {
                    match ch {
                        '\\' | '[' | '&' | '~' => {
                            re.push('\\');
                            re.push(ch);
                        }
                        '^' if k == 0 => re.push_str("\\^"),
                        _ => re.push(ch),
                    }
                }
                re.push(']');
            }
            _ => re.push_str(&regex::escape(&c.to_string())),
        }
    }

    re.push('$');
    re
}

/// Compiled set of reference patterns.
///
/// An empty filter accepts every footprint, including ones without a
/// reference; a non-empty filter only accepts references matching at least
/// one pattern.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFilter {
    patterns: Vec<Regex>,
}

impl ReferenceFilter {
    /// Compile the given glob patterns
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> CamToolResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&glob_to_regex(p)).map_err(|e| CamToolError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<CamToolResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Decide whether a footprint with this reference is included
    pub fn accepts(&self, reference: Option<&str>) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        match reference {
            Some(reference) => self.patterns.iter().any(|re| re.is_match(reference)),
            None => false,
        }
    }
}
