use thiserror::Error;

const MESSAGING_BASE: &str = "https://wa.me";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("name must not be empty")]
    MissingName,
    #[error("message must not be empty")]
    MissingMessage,
    #[error("contact phone number is not configured")]
    InvalidPhone,
}

/// Pre-filled messaging deep link for the studio's contact number.
pub fn contact_link(phone: &str, name: &str, message: &str) -> Result<String, ContactError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ContactError::InvalidPhone);
    }

    let name = name.trim();
    if name.is_empty() {
        return Err(ContactError::MissingName);
    }
    let message = message.trim();
    if message.is_empty() {
        return Err(ContactError::MissingMessage);
    }

    let text = format!("Hi, my name is {name}.\n{message}");
    Ok(format!(
        "{MESSAGING_BASE}/{digits}?text={}",
        urlencoding::encode(&text)
    ))
}
