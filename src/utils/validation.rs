use chrono::NaiveTime;
use validator::ValidationError;

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let len = value.len();
    if (10..=15).contains(&len) && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Please enter a valid phone number (10-15 digits)".into());
        Err(err)
    }
}

/// Empty means "no time given"; otherwise `HH:MM` or `HH:MM:SS`, 24-hour.
pub fn validate_interview_time(value: &str) -> Result<(), ValidationError> {
    if value.is_empty()
        || NaiveTime::parse_from_str(value, "%H:%M").is_ok()
        || NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("interview_time");
        err.message = Some("Please enter a valid time in HH:MM or HH:MM:SS format".into());
        Err(err)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Field cannot be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_must_be_ten_to_fifteen_digits() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("123456789012345").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("+919876543210").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn interview_time_accepts_minutes_and_seconds() {
        assert!(validate_interview_time("").is_ok());
        assert!(validate_interview_time("09:30").is_ok());
        assert!(validate_interview_time("23:59:59").is_ok());
        assert!(validate_interview_time("24:00").is_err());
        assert!(validate_interview_time("9.30am").is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" Priya ").is_ok());
    }
}
