use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a `YYYY-MM-DD` due date into a UTC timestamp at midnight.
pub fn parse_due_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid due date '{raw}': expected YYYY-MM-DD ({error})"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use libris_core::enums::{AuditAction, BorrowStatus};

    use super::{parse_due_date, parse_enum};

    #[test]
    fn parses_snake_case_enum() {
        let status: BorrowStatus = parse_enum("completed", "status").expect("status should parse");
        assert_eq!(status, BorrowStatus::Completed);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: BorrowStatus =
            parse_enum("return-requested", "status").expect("status should parse");
        assert_eq!(status, BorrowStatus::ReturnRequested);

        let action: AuditAction =
            parse_enum("status-changed", "action").expect("action should parse");
        assert_eq!(action, AuditAction::StatusChanged);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<BorrowStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }

    #[test]
    fn parses_iso_due_date() {
        let due = parse_due_date("2026-09-01").expect("date should parse");
        assert_eq!(due.to_rfc3339(), "2026-09-01T00:00:00+00:00");
    }

    #[test]
    fn errors_on_malformed_due_date() {
        let err = parse_due_date("01/09/2026").expect_err("should fail");
        assert!(err.to_string().contains("invalid due date"));
    }
}
