//! Unit conversion utilities
//!
//! Handles conversion between millimetres and plotter device units.

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Graphtec device units per millimetre
pub const DEVICE_UNITS_PER_MM: f64 = 20.0;

/// Default media edge (12 inch mat) in millimetres
pub const DEFAULT_MEDIA_MM: f64 = 12.0 * MM_PER_INCH;

/// Convert a length to whole device units, truncating toward zero
///
/// Used for the cutting area bounds, which the device expects as integers.
pub fn mm_to_device_units(mm: f64, scale: f64) -> i64 {
    (mm * scale).trunc() as i64
}

/// Normalize a media size so the short edge comes first
pub fn normalize_media(width: f64, height: f64) -> (f64, f64) {
    (width.min(height), width.max(height))
}
