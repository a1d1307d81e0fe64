/// Field validators for signup and profile updates
use std::borrow::Cow;
use validator::ValidationError;

const PHONE_PREFIX: &str = "+234";
const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 11;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// A name must contain a letter and must not be digits alone (spaces ignored).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let compact: String = name.split_whitespace().collect();
    if !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("name_only_digits", "Name cannot be only numbers"));
    }

    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "name_no_letter",
            "Name must contain at least one alphabet character",
        ));
    }

    Ok(())
}

/// Nigerian mobile numbers: `+234` followed by 8 to 11 digits.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let Some(digits) = phone.strip_prefix(PHONE_PREFIX) else {
        return Err(invalid(
            "phone_prefix",
            "Phone number must start with +234",
        ));
    };

    if digits.len() < PHONE_MIN_DIGITS || digits.len() > PHONE_MAX_DIGITS {
        return Err(invalid(
            "phone_length",
            "Phone number must have between 8 and 11 digits after +234",
        ));
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "phone_digits",
            "Phone number must contain only digits after +234",
        ));
    }

    Ok(())
}
