#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("resource not found")]
    NotFound,
    #[error("resource conflict")]
    Conflict,
    #[error("authorization code has already been used")]
    InvalidatedCode,
    #[error("jti has already been used")]
    JtiKnown,
    #[error("access denied")]
    AccessDenied,
    #[error("session deserialization error: {0}")]
    Deserialization(String),
    #[error("session serialization error: {0}")]
    Serialization(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("operation timed out")]
    Timeout,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict)
    }

    /// Recovers a store error carried through a transaction's `anyhow`
    /// boundary; anything else is an engine failure.
    pub fn from_tx(err: anyhow::Error) -> Self {
        err.downcast::<StoreError>()
            .unwrap_or_else(|e| StoreError::Store(e.to_string()))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_errors_keep_their_kind() {
        assert!(StoreError::from_tx(anyhow::anyhow!(StoreError::NotFound)).is_not_found());
        assert!(StoreError::from_tx(anyhow::anyhow!(StoreError::Conflict)).is_conflict());
        assert!(matches!(
            StoreError::from_tx(anyhow::anyhow!("connection reset")),
            StoreError::Store(msg) if msg == "connection reset"
        ));
    }
}
