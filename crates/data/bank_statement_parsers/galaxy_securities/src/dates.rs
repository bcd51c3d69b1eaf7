use chrono::{Duration, NaiveDate, NaiveDateTime};
use utils::CellValue;

const OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Normalizes a statement date to `YYYY-MM-DD`.
///
/// Accepts `20240105`, `2024-01-05`, `2024/01/05`, `2024-01-05 09:30:00`, numeric
/// `20240105` cells and Excel serial dates. Anything else is returned unchanged.
pub fn normalize_date(cell: &CellValue) -> CellValue {
    let parsed = match cell {
        CellValue::Null => return CellValue::Null,
        CellValue::Text(s) => parse_date_string(s),
        CellValue::Int(i) => parse_numeric_date(*i as f64),
        CellValue::Float(f) => parse_numeric_date(*f),
    };
    match parsed {
        Some(d) => CellValue::text(d.format(OUTPUT_FORMAT).to_string()),
        None => cell.clone(),
    }
}

pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        let y: i32 = s[0..4].parse().ok()?;
        let m: u32 = s[4..6].parse().ok()?;
        let d: u32 = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_numeric_date(v: f64) -> Option<NaiveDate> {
    if !v.is_finite() || v <= 0.0 {
        return None;
    }
    // 8-digit numbers are yyyymmdd written as a number, smaller ones are Excel serials
    if (19_000_101.0..=29_991_231.0).contains(&v) && v.fract() == 0.0 {
        return parse_date_string(&format!("{}", v as i64));
    }
    excel_serial_to_date(v)
}

/// Excel serial date conversion using 1899-12-30 base (common convention).
fn excel_serial_to_date(v: f64) -> Option<NaiveDate> {
    if v >= 2_958_466.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(v.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_normalize_text_dates() {
        assert_eq!(normalize_date(&text("20240105")), text("2024-01-05"));
        assert_eq!(normalize_date(&text("2024/01/05")), text("2024-01-05"));
        assert_eq!(normalize_date(&text("2024-01-05 09:30:00")), text("2024-01-05"));
        assert_eq!(normalize_date(&text("2024-01-05")), text("2024-01-05"));
    }

    #[test]
    fn test_normalize_numeric_dates() {
        assert_eq!(normalize_date(&CellValue::Int(20240105)), text("2024-01-05"));
        assert_eq!(normalize_date(&CellValue::Float(45296.0)), text("2024-01-05"));
    }

    #[test]
    fn test_unrecognized_dates_pass_through() {
        assert_eq!(normalize_date(&text("上周五")), text("上周五"));
        assert_eq!(normalize_date(&text("20241341")), text("20241341"));
        assert_eq!(normalize_date(&CellValue::Null), CellValue::Null);
    }
}
