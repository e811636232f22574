//! Authentication payloads and form state

use serde::{Deserialize, Serialize};

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_user: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user_data: UserData,
}

/// Error body returned by the service on 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Per-field validation messages plus one common slot for server-side failures
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormErrors {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub common: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.password.is_none() && self.common.is_none()
    }

    pub fn common(message: impl Into<String>) -> Self {
        Self {
            common: Some(message.into()),
            ..Default::default()
        }
    }

    /// All messages in display order, skipping empty slots
    pub fn messages(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.password, &self.common]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_reads_user_data() {
        let json = r#"{"token": "abc", "userData": {"email": "a@b.co", "isUser": true}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token, "abc");
        assert!(response.user_data.is_user);
        assert_eq!(response.user_data.email, "a@b.co");
    }

    #[test]
    fn test_form_errors_messages_in_order() {
        let errors = FormErrors {
            email: Some("bad email".into()),
            password: Some("short".into()),
            ..Default::default()
        };
        assert!(!errors.is_empty());
        assert_eq!(errors.messages(), vec!["bad email", "short"]);
        assert!(FormErrors::default().is_empty());
    }
}
