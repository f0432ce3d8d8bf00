//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Country code, two check digits, then 11-30 alphanumeric BBAN characters.
    static ref IBAN_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z]{2}\d{2}[A-Z0-9]{11,30}$").unwrap();

    /// ISO 9362: bank code, country code, location code, optional branch code.
    static ref BIC_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z]{6}[A-Z0-9]{2}([A-Z0-9]{3})?$").unwrap();
}

/// Strips spaces and uppercases an IBAN/BIC for comparison and storage.
pub fn normalize_bank_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Validates an IBAN (format only, no checksum arithmetic).
pub fn validate_iban(iban: &str) -> Result<(), ValidationError> {
    if IBAN_REGEX.is_match(&normalize_bank_code(iban)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("iban_format");
        err.message = Some("Invalid IBAN format".into());
        Err(err)
    }
}

/// Validates a BIC/SWIFT code.
pub fn validate_bic(bic: &str) -> Result<(), ValidationError> {
    if BIC_REGEX.is_match(&normalize_bank_code(bic)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("bic_format");
        err.message = Some("Invalid BIC format".into());
        Err(err)
    }
}

/// Validates that a monetary amount is a finite, non-negative number.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be a non-negative number".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_iban_accepts_valid() {
        assert!(validate_iban("FR7630006000011234567890189").is_ok());
        assert!(validate_iban("DE89370400440532013000").is_ok());
        assert!(validate_iban("MG4600005030071289421016045").is_ok());
    }

    #[test]
    fn test_validate_iban_accepts_spaced_lowercase() {
        assert!(validate_iban("fr76 3000 6000 0112 3456 7890 189").is_ok());
    }

    #[test]
    fn test_validate_iban_rejects_invalid() {
        assert!(validate_iban("").is_err());
        assert!(validate_iban("FR76").is_err());
        assert!(validate_iban("1234567890123456").is_err());
        assert!(validate_iban("FRXX30006000011234567890189").is_err());
    }

    #[test]
    fn test_validate_iban_error_message() {
        let err = validate_iban("nope").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Invalid IBAN format");
    }

    #[test]
    fn test_validate_bic_accepts_valid() {
        assert!(validate_bic("BNPAFRPP").is_ok());
        assert!(validate_bic("DEUTDEFF500").is_ok());
        assert!(validate_bic("bmoi mg mg").is_ok());
    }

    #[test]
    fn test_validate_bic_rejects_invalid() {
        assert!(validate_bic("").is_err());
        assert!(validate_bic("BNPA").is_err());
        assert!(validate_bic("12345678").is_err());
        assert!(validate_bic("TOOLONGBICCODE123").is_err());
    }

    #[test]
    fn test_normalize_bank_code() {
        assert_eq!(
            normalize_bank_code("fr76 3000 6000"),
            "FR7630006000".to_string()
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(19.99).is_ok());
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }
}
