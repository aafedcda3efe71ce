use thiserror::Error;

/// Failures surfaced by the query proxy service.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request was malformed; no database contact was attempted.
    #[error("{0}")]
    Validation(String),

    /// The database rejected the query, or the pool could not supply a
    /// connection in time.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ProxyError {
    /// SQLSTATE code from the backend, where the driver exposes one.
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            ProxyError::Database(sqlx::Error::Database(e)) => e.code().map(|c| c.to_string()),
            _ => None,
        }
    }

    /// Error text for the response envelope.
    pub fn message(&self) -> String {
        clean_error_message(&self.to_string())
    }
}

/// Strip the "error returned from database:" prefix that sqlx adds.
fn clean_error_message(error_msg: &str) -> String {
    error_msg
        .strip_prefix("error returned from database: ")
        .unwrap_or(error_msg)
        .to_string()
}
