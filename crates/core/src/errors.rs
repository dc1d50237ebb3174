use thiserror::Error;

#[derive(Error, Debug)]
pub enum MidwayError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] eyre::Report),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl MidwayError {
    /// Message suitable for showing to a participant.
    ///
    /// Failures are never retried automatically; everything except a missing
    /// event or a rejected form collapses into a generic "try again".
    pub fn user_message(&self) -> String {
        match self {
            MidwayError::NotFound(_) => "The event you're looking for doesn't exist.".to_string(),
            MidwayError::Validation(message) => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

pub type MidwayResult<T> = Result<T, MidwayError>;
