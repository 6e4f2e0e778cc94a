//! Field validators shared by the request forms.
//!
//! Plugged into `#[validate(custom = "...")]` attributes on the request types.

use validator::ValidationError;

/// Length of a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

/// Validate a VIN: 17 upper-case alphanumerics, excluding I, O and Q.
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    let well_formed = value.chars().count() == VIN_LENGTH
        && value.chars().all(|c| c.is_ascii_digit() || is_vin_letter(c));

    if !well_formed {
        let mut error = ValidationError::new("vin_format");
        error.message = Some("VIN must be 17 characters (A-Z, 0-9, no I, O or Q)".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

fn is_vin_letter(c: char) -> bool {
    c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q')
}

/// Validate a phone number: 10 to 15 digits once separators are removed.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '+' | '(' | ')'));
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();

    if !allowed || !(10..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.message = Some("Phone number must contain 10 to 15 digits".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin() {
        assert!(validate_vin("VF1AB000123456789").is_ok());
        assert!(validate_vin("1HGCM82633A004352").is_ok());
        // too short
        assert!(validate_vin("VF1AB00012345678").is_err());
        // forbidden letters
        assert!(validate_vin("VF1AB00012345678O").is_err());
        assert!(validate_vin("VF1AB00012345678I").is_err());
        // lower case
        assert!(validate_vin("vf1ab000123456789").is_err());
        assert!(validate_vin("N/A").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("0901234567").is_ok());
        assert!(validate_phone("+84 (90) 123-4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("090123456a").is_err());
    }
}
