//! Field-level validation rules for incoming DTOs
//!
//! Each rule returns a `DomainError::Validation` naming the offending field,
//! so handlers surface them as 400 responses.

use chrono::NaiveDate;

use super::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount accepted for any monetary field
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

pub fn required(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field}: is required")));
    }
    Ok(())
}

/// Length in characters, not bytes
pub fn length(field: &str, value: &str, min: usize, max: usize) -> Result<(), DomainError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{field}: length must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub fn max_length(field: &str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::validation(format!(
            "{field}: must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

pub fn positive_amount(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!("{field}: must be greater than 0")));
    }
    if value > MAX_AMOUNT {
        return Err(DomainError::validation(format!(
            "{field}: must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

pub fn non_negative_amount(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!("{field}: must not be negative")));
    }
    if value > MAX_AMOUNT {
        return Err(DomainError::validation(format!(
            "{field}: must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

pub fn range_i32(field: &str, value: i32, min: i32, max: i32) -> Result<(), DomainError> {
    if value < min || value > max {
        return Err(DomainError::validation(format!(
            "{field}: must be between {min} and {max}"
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<(), DomainError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!("{field}: is not a valid email address")));
    }
    Ok(())
}

pub fn date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::validation(format!("{field}: must be a date formatted as YYYY-MM-DD"))
    })
}

pub fn date_order(start: NaiveDate, end: NaiveDate, end_field: &str) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::validation(format!(
            "{end_field}: must not be before the start date"
        )));
    }
    Ok(())
}

/// Trims and drops empty optional text
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rounds to cents for reported figures
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(required("name", "  ").is_err());
        assert!(required("name", "Groceries").is_ok());
    }

    #[test]
    fn length_counts_characters() {
        assert!(length("name", "été", 3, 3).is_ok());
        assert!(length("name", "ab", 3, 50).is_err());
        assert!(length("name", &"x".repeat(51), 3, 50).is_err());
    }

    #[test]
    fn amounts_must_be_positive_and_bounded() {
        assert!(positive_amount("amount", 0.0).is_err());
        assert!(positive_amount("amount", -5.0).is_err());
        assert!(positive_amount("amount", f64::NAN).is_err());
        assert!(positive_amount("amount", 2_000_000_000.0).is_err());
        assert!(positive_amount("amount", 0.01).is_ok());
        assert!(non_negative_amount("current_amount", 0.0).is_ok());
        assert!(non_negative_amount("current_amount", -0.01).is_err());
    }

    #[test]
    fn email_needs_local_part_and_domain() {
        assert!(email("email", "anna@example.com").is_ok());
        assert!(email("email", "anna@localhost").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "anna.example.com").is_err());
    }

    #[test]
    fn dates_parse_iso_only() {
        assert_eq!(
            date("date", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(date("date", "2023-02-29").is_err());
        assert!(date("date", "29/02/2024").is_err());
    }

    #[test]
    fn end_date_cannot_precede_start() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(date_order(start, end, "end_date").is_err());
        assert!(date_order(start, start, "end_date").is_ok());
    }

    #[test]
    fn rounding_to_cents() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
    }

    #[test]
    fn blank_optionals_become_none() {
        assert_eq!(clean_optional(Some("   ".into())), None);
        assert_eq!(clean_optional(Some(" rent ".into())), Some("rent".into()));
    }
}
