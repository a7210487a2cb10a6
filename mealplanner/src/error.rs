use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Network error: {message}")]
    Network { message: String, timeout: bool },

    #[error("Server rejected request ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    ServerRejection {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("{entity} {id} no longer exists")]
    ResolutionGap { entity: &'static str, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("A request is already in progress")]
    Busy,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl PlannerError {
    pub fn is_not_found(&self) -> bool {
        match self {
            PlannerError::ResolutionGap { .. } => true,
            PlannerError::ServerRejection { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PlannerError::Network { timeout: true, .. })
    }

    /// Message suitable for a user-facing notice. Prefers the server's `detail`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PlannerError::ServerRejection {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            PlannerError::Network { timeout: true, .. } => {
                format!("{fallback} (request timed out)")
            }
            PlannerError::Validation(msg) => msg.clone(),
            PlannerError::Unauthenticated => "Please log in first".to_string(),
            PlannerError::Busy => "Please wait for the current request to finish".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return PlannerError::ServerRejection {
                status,
                detail: None,
            };
        }
        if e.is_decode() {
            return PlannerError::Decode(e.to_string());
        }
        PlannerError::Network {
            timeout: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for PlannerError {
    fn from(e: validator::ValidationErrors) -> Self {
        PlannerError::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = PlannerError::ServerRejection {
            status: StatusCode::UNAUTHORIZED,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn test_user_message_falls_back_without_detail() {
        let err = PlannerError::ServerRejection {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        };
        assert_eq!(err.user_message("Failed to add item"), "Failed to add item");

        let blank = PlannerError::ServerRejection {
            status: StatusCode::BAD_REQUEST,
            detail: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Failed"), "Failed");
    }

    #[test]
    fn test_not_found_classification() {
        let gap = PlannerError::ResolutionGap {
            entity: "meal",
            id: 999,
        };
        assert!(gap.is_not_found());

        let rejected = PlannerError::ServerRejection {
            status: StatusCode::NOT_FOUND,
            detail: Some("Meal not found".to_string()),
        };
        assert!(rejected.is_not_found());

        let network = PlannerError::Network {
            message: "connection refused".to_string(),
            timeout: false,
        };
        assert!(!network.is_not_found());
        assert!(!network.is_timeout());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = PlannerError::ServerRejection {
            status: StatusCode::BAD_REQUEST,
            detail: Some("No fields to update".to_string()),
        };
        assert!(err.to_string().contains("No fields to update"));
        assert!(err.to_string().contains("400"));
    }
}
