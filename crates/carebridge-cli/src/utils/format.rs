/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or blank
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a timestamp as a readable date
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format a timestamp as a readable date and time (UTC)
pub fn format_datetime(date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
        Err(_) => format_date(date),
    }
}

/// Format a measurement, e.g. `101.5 cm`
pub fn format_measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1} {}", v, unit),
        None => "-".to_string(),
    }
}

/// Pluralize a count, e.g. `1 like`, `3 likes`
pub fn pluralize(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01T10:00:00.000Z"), "Mar 01, 2024");
        assert_eq!(format_date("2024-03-01"), "2024-03-01");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_datetime("2024-05-01T15:30:00Z"), "May 01, 2024 15:30");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&Some("Male".to_string()), "-"), "Male");
        assert_eq!(format_optional(&Some("  ".to_string()), "-"), "-");
        assert_eq!(format_optional(&None, "-"), "-");
    }

    #[test]
    fn test_measure_and_plural() {
        assert_eq!(format_measure(Some(101.5), "cm"), "101.5 cm");
        assert_eq!(format_measure(None, "kg"), "-");
        assert_eq!(pluralize(1, "like"), "1 like");
        assert_eq!(pluralize(0, "comment"), "0 comments");
    }
}
