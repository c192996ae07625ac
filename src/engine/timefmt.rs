use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::error::EngineError;

/// Display timezone is pinned to UTC+8 so rendered timestamps never depend on
/// the host locale or timezone database.
const DISPLAY_OFFSET_HOURS: i64 = 8;

/// Lenient parse used for ordering intervals by start date. The portal mostly
/// sends RFC 3339 instants but date-only fields show up in older documents.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(d.and_hms_opt(0, 0, 0)?, Utc))
}

/// Renders a provider UTC timestamp as `YYYY-MM-DD HH:MM:SS` in the fixed
/// display offset, by shifting the instant and reading UTC calendar fields.
/// Empty input yields empty output; anything unparseable is an error rather
/// than an "Invalid Date" sentinel leaking into display fields.
pub fn to_display_time(s: &str) -> Result<String, EngineError> {
    if s.is_empty() {
        return Ok(String::new());
    }
    let t = parse_instant(s).ok_or_else(|| EngineError::Timestamp(s.to_string()))?;
    let shifted = t + Duration::hours(DISPLAY_OFFSET_HOURS);
    Ok(shifted.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_crosses_midnight() {
        assert_eq!(
            to_display_time("2024-01-01T16:00:00Z").unwrap(),
            "2024-01-02 00:00:00"
        );
    }

    #[test]
    fn offset_input_is_normalized_through_utc() {
        assert_eq!(
            to_display_time("2024-01-01T18:00:00+02:00").unwrap(),
            "2024-01-02 00:00:00"
        );
    }

    #[test]
    fn date_only_input_is_accepted() {
        assert_eq!(to_display_time("2024-03-05").unwrap(), "2024-03-05 08:00:00");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(to_display_time("").unwrap(), "");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            to_display_time("not-a-date"),
            Err(EngineError::Timestamp(_))
        ));
    }
}
