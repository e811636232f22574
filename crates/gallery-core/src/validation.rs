//! Client-side form validation. Invalid forms never reach the service.

use gallery_api::{FormErrors, LoginForm, RegisterForm};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        Some("Please enter your email address.".to_string())
    } else if !EMAIL_RE.is_match(email) {
        Some("Please enter a valid email address.".to_string())
    } else {
        None
    }
}

pub fn validate_phone(phone: &str) -> Option<String> {
    if phone.trim().is_empty() {
        Some("Phone number is required.".to_string())
    } else if !PHONE_RE.is_match(phone) {
        Some("Please enter a valid phone number".to_string())
    } else {
        None
    }
}

pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        Some("Please enter a password.".to_string())
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some("Password must be at least 6 characters long.".to_string())
    } else {
        None
    }
}

pub fn validate_login(form: &LoginForm) -> FormErrors {
    FormErrors {
        email: validate_email(&form.email),
        password: validate_password(&form.password),
        ..Default::default()
    }
}

pub fn validate_register(form: &RegisterForm) -> FormErrors {
    FormErrors {
        email: validate_email(&form.email),
        phone: validate_phone(&form.phone),
        password: validate_password(&form.password),
        common: None,
    }
}
