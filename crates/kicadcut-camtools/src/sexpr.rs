//! S-expression reader for KiCad board files.
//!
//! Handles:
//! - Nested lists `( ... )`
//! - Bare atoms (`smd`, `12.5`, `F.Cu`)
//! - Quoted strings with `\"`, `\\` and `\n` escapes
//!
//! The parser is iterative so deeply nested boards cannot overflow the stack.

use kicadcut_core::BoardError;
use std::iter::Peekable;
use std::str::Chars;

/// A parsed s-expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    /// Unquoted token.
    Atom(String),
    /// Quoted string (contents without quotes).
    Str(String),
    /// Parenthesized list.
    List(Vec<SExpr>),
}

impl SExpr {
    /// List items, if this is a list.
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text of an atom or string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SExpr::Atom(s) | SExpr::Str(s) => Some(s),
            SExpr::List(_) => None,
        }
    }

    /// Numeric value of an atom.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SExpr::Atom(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Name of a list node, i.e. its leading atom.
    pub fn head(&self) -> Option<&str> {
        match self.as_list()?.first()? {
            SExpr::Atom(s) => Some(s),
            _ => None,
        }
    }

    /// Items after the head.
    pub fn args(&self) -> &[SExpr] {
        match self.as_list() {
            Some([_, rest @ ..]) => rest,
            _ => &[],
        }
    }

    /// Child lists whose head is `name`.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SExpr> + 'a {
        self.args()
            .iter()
            .filter(move |child| child.head() == Some(name))
    }

    /// First child list whose head is `name`.
    pub fn child(&self, name: &str) -> Option<&SExpr> {
        self.args().iter().find(|child| child.head() == Some(name))
    }

    /// Numeric arguments of this node, stopping at the first non-number.
    pub fn numbers(&self) -> Vec<f64> {
        self.args().iter().map_while(SExpr::as_f64).collect()
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> BoardError {
    BoardError::Parse {
        line,
        reason: reason.into(),
    }
}

fn read_string(chars: &mut Peekable<Chars<'_>>, line: &mut usize) -> Result<String, BoardError> {
    let start_line = *line;
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(parse_error(start_line, "unterminated string")),
            Some('"') => return Ok(text),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(c) => text.push(c),
                None => return Err(parse_error(start_line, "unterminated string")),
            },
            Some(c) => {
                if c == '\n' {
                    *line += 1;
                }
                text.push(c);
            }
        }
    }
}

fn read_atom(first: char, chars: &mut Peekable<Chars<'_>>) -> String {
    let mut atom = String::from(first);
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
            break;
        }
        atom.push(c);
        chars.next();
    }
    atom
}

/// Parse a document containing exactly one top-level list.
pub fn parse(input: &str) -> Result<SExpr, BoardError> {
    let mut stack: Vec<Vec<SExpr>> = Vec::new();
    let mut root: Option<SExpr> = None;
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(ch) = chars.next() {
        let node = match ch {
            '\n' => {
                line += 1;
                continue;
            }
            c if c.is_whitespace() => continue,
            '(' => {
                if root.is_some() {
                    return Err(parse_error(line, "content after top-level list"));
                }
                stack.push(Vec::new());
                continue;
            }
            ')' => {
                let items = stack
                    .pop()
                    .ok_or_else(|| parse_error(line, "unbalanced ')'"))?;
                SExpr::List(items)
            }
            '"' => SExpr::Str(read_string(&mut chars, &mut line)?),
            c => SExpr::Atom(read_atom(c, &mut chars)),
        };

        match stack.last_mut() {
            Some(parent) => parent.push(node),
            None => match node {
                SExpr::List(_) => root = Some(node),
                _ => return Err(parse_error(line, "token outside of a list")),
            },
        }
    }

    if !stack.is_empty() {
        return Err(parse_error(line, "unterminated list"));
    }
    root.ok_or_else(|| parse_error(line, "empty document"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let expr = parse(r#"(pad "1" smd rect (at 1.5 -2 90) (size 1 0.5))"#).unwrap();
        assert_eq!(expr.head(), Some("pad"));
        assert_eq!(expr.args()[0], SExpr::Str("1".to_string()));
        assert_eq!(expr.child("at").unwrap().numbers(), vec![1.5, -2.0, 90.0]);
        assert_eq!(expr.child("size").unwrap().numbers(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_string_escapes() {
        let expr = parse(r#"(title "a \"quoted\" word")"#).unwrap();
        assert_eq!(expr.args()[0].as_text(), Some(r#"a "quoted" word"#));
    }

    #[test]
    fn test_children_filter() {
        let expr = parse("(m (pad 1) (line 2) (pad 3))").unwrap();
        let pads: Vec<_> = expr.children("pad").collect();
        assert_eq!(pads.len(), 2);
        assert_eq!(pads[1].numbers(), vec![3.0]);
    }

    #[test]
    fn test_child_outlives_lookup_name() {
        let expr = parse("(pad 1 smd (at 0 1))").unwrap();
        let at = {
            let name = String::from("at");
            expr.child(&name)
        };
        assert_eq!(at.map(SExpr::numbers), Some(vec![0.0, 1.0]));
        assert!(expr.child("size").is_none());
    }

    #[test]
    fn test_errors_report_line() {
        match parse("(a\n(b\n") {
            Err(BoardError::Parse { line, reason }) => {
                assert_eq!(line, 3);
                assert_eq!(reason, "unterminated list");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(parse("(a))").is_err());
        assert!(parse("atom").is_err());
        assert!(parse("").is_err());
        assert!(parse("(a \"open)").is_err());
    }
}
