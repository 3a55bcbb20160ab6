use thiserror::Error;

use crate::store::StoreError;

/// Every way a lookup can fail. The `Display` text is what the caller sees
/// in the `error` field.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Error parsing request: {0}")]
    MalformedPayload(String),

    #[error("Missing required parameter: bucket or bucketNumber")]
    MissingBucketSelector,

    #[error("Invalid state '{0}': expected a two-letter state code")]
    InvalidState(String),

    #[error(
        "Invalid bucket '{0}': expected one of stateBucket1, stateBucket2, stateBucket3, \
         stateBucket4, otherNamesBucket1, otherNamesBucket2"
    )]
    InvalidBucket(String),

    #[error("Invalid bucketNumber {0}: must be an integer between 1 and 4")]
    InvalidBucketNumber(String),

    #[error("No names found for state '{0}'")]
    StateNotFound(String),

    #[error("Name store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl LookupError {
    /// Stable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::MalformedPayload(_) => "MalformedPayload",
            LookupError::MissingBucketSelector => "MissingBucketSelector",
            LookupError::InvalidState(_) => "InvalidState",
            LookupError::InvalidBucket(_) => "InvalidBucket",
            LookupError::InvalidBucketNumber(_) => "InvalidBucketNumber",
            LookupError::StateNotFound(_) => "StateNotFound",
            LookupError::StoreUnavailable(_) => "StoreUnavailable",
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::MalformedPayload(err.to_string())
    }
}
