//! Column type inference from sample cell values.
//!
//! Priority when a column mixes kinds: date > number > boolean > email >
//! url > string. A column with no non-empty sample is `empty`.

use reqscan_core::types::ColumnType;
use serde_json::Value;

pub fn infer_column_type(samples: &[Value]) -> ColumnType {
    let mut non_empty = 0usize;
    let (mut date, mut number, mut boolean, mut email, mut url) = (false, false, false, false, false);

    for value in samples {
        match value {
            Value::Null => continue,
            Value::Bool(_) => boolean = true,
            Value::Number(_) => number = true,
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    continue;
                }
                if looks_like_date(s) {
                    date = true;
                } else if s.parse::<f64>().is_ok_and(f64::is_finite) {
                    number = true;
                } else if matches!(s.to_lowercase().as_str(), "true" | "false" | "ja" | "nei") {
                    boolean = true;
                } else if looks_like_email(s) {
                    email = true;
                } else if looks_like_url(s) {
                    url = true;
                }
            }
            Value::Array(_) | Value::Object(_) => {}
        }
        non_empty += 1;
    }

    if non_empty == 0 {
        ColumnType::Empty
    } else if date {
        ColumnType::Date
    } else if number {
        ColumnType::Number
    } else if boolean {
        ColumnType::Boolean
    } else if email {
        ColumnType::Email
    } else if url {
        ColumnType::Url
    } else {
        ColumnType::String
    }
}

/// `YYYY-MM-DD` (optionally followed by a time) or `DD.MM.YYYY`.
fn looks_like_date(s: &str) -> bool {
    let b = s.as_bytes();
    let digits = |mut range: std::ops::Range<usize>| range.all(|i| b.get(i).is_some_and(u8::is_ascii_digit));
    let iso = b.len() >= 10
        && digits(0..4)
        && b[4] == b'-'
        && digits(5..7)
        && b[7] == b'-'
        && digits(8..10)
        && (b.len() == 10 || b[10] == b'T' || b[10] == b' ');
    let dotted = b.len() == 10 && digits(0..2) && b[2] == b'.' && digits(3..5) && b[5] == b'.' && digits(6..10);
    iso || dotted
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.chars().count() >= 2,
        None => false,
    }
}

fn looks_like_url(s: &str) -> bool {
    let low = s.to_ascii_lowercase();
    low.starts_with("http://") || low.starts_with("https://") || low.starts_with("www.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(values: Value) -> ColumnType {
        match values {
            Value::Array(v) => infer_column_type(&v),
            other => infer_column_type(&[other]),
        }
    }

    #[test]
    fn single_kinds() {
        assert_eq!(infer(json!(["2024-05-01", "01.02.2023"])), ColumnType::Date);
        assert_eq!(infer(json!([1, "2.5", " 3 "])), ColumnType::Number);
        assert_eq!(infer(json!([true, "Nei"])), ColumnType::Boolean);
        assert_eq!(infer(json!(["ola@example.no"])), ColumnType::Email);
        assert_eq!(infer(json!(["https://example.no", "www.x.no"])), ColumnType::Url);
        assert_eq!(infer(json!(["Oslo"])), ColumnType::String);
    }

    #[test]
    fn mixed_columns_follow_priority() {
        assert_eq!(infer(json!(["2024-05-01", 4])), ColumnType::Date);
        assert_eq!(infer(json!([4, true, "a@b.no"])), ColumnType::Number);
        assert_eq!(infer(json!(["ja", "a@b.no"])), ColumnType::Boolean);
    }

    #[test]
    fn blanks_are_ignored() {
        assert_eq!(infer(json!([null, "", "  "])), ColumnType::Empty);
        assert_eq!(infer(json!([])), ColumnType::Empty);
        assert_eq!(infer(json!([null, "NaN"])), ColumnType::String);
    }

    #[test]
    fn email_requires_domain_suffix() {
        assert!(looks_like_email("a@b.no"));
        assert!(!looks_like_email("a@b.n"));
        assert!(!looks_like_email("a b@c.no"));
        assert!(!looks_like_email("@c.no"));
    }
}
