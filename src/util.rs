// Parsing and formatting helpers.
//
// Spreadsheet cells arrive as strings (whole numbers already rendered without
// a fractional part), so everything here works on `Option<&str>` and returns
// `None` for values that cannot be used.
use calamine::Data;
use num_format::{Locale, ToFormattedString};

/// Borrow the cell at `col` of a row, trimmed. `None` when the column is
/// absent or the row is short.
pub fn cell(row: &[String], col: Option<usize>) -> Option<&str> {
    col.and_then(|c| row.get(c)).map(|s| s.trim())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>()
        .ok()
        .or_else(|| whole_float(s).and_then(|f| i32::try_from(f).ok()))
}

/// Administrative division codes are numeric; leading zeros ("05") and
/// float renderings ("5.0") both normalize to the same value.
pub fn parse_code(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>()
        .ok()
        .or_else(|| whole_float(s).and_then(|f| u32::try_from(f).ok()))
}

fn whole_float(s: &str) -> Option<i64> {
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Render a spreadsheet cell the way it reads on screen: whole floats drop
/// the `.0`, empty cells become empty strings.
pub fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::es)
}
