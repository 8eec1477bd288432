// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use eventdesk_app::OperationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("{0}")]
    Validation(String),
    #[error("simulated failure: {0}")]
    SimulatedFailure(String),
    #[error("operation cancelled")]
    Cancelled,
}

pub type DataResult<T> = Result<T, DataError>;

impl From<DataError> for OperationError {
    fn from(error: DataError) -> Self {
        match error {
            DataError::Cancelled => Self::Cancelled,
            other => Self::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DataError;
    use eventdesk_app::OperationError;

    #[test]
    fn only_cancellation_maps_to_cancelled() {
        assert_eq!(
            OperationError::from(DataError::Cancelled),
            OperationError::Cancelled
        );
        assert_eq!(
            OperationError::from(DataError::NotFound {
                kind: "invite",
                id: 9
            }),
            OperationError::Failed("invite #9 not found".to_owned())
        );
    }
}
