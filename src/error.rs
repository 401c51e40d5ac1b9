//! Error types and handling for the travel planner

use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The backend answered with a status and body we cannot interpret
    #[error("API error: {message}")]
    Api { message: String },

    /// The backend could not be reached or the connection broke mid-response
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body was not JSON or did not fit the expected shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// HTML fragment rendering errors
    #[error("Render error: {message}")]
    Render { message: String },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Api { .. } | PlannerError::Network { .. } => {
                "Unable to reach the travel planner service. Is the backend running?".to_string()
            }
            PlannerError::Decode { .. } => {
                "The travel planner service sent a response we could not read.".to_string()
            }
            PlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::Render { .. } => "Failed to display the results.".to_string(),
        }
    }

    /// The planner error behind an `anyhow` chain, looking through context
    #[must_use]
    pub fn find_in(err: &anyhow::Error) -> Option<&PlannerError> {
        err.chain().find_map(|cause| cause.downcast_ref::<PlannerError>())
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<tera::Error> for PlannerError {
    fn from(err: tera::Error) -> Self {
        Self::render(err.to_string())
    }
}
