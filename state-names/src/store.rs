use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

use crate::bucket::BucketKey;

/// Infrastructure-level failure talking to the store. Distinct from a
/// missing record, which is `Ok(None)`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The per-state row. Only the bucket attributes are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameRecord {
    pub state_code: String,
    pub buckets: HashMap<BucketKey, Vec<String>>,
}

impl NameRecord {
    pub fn new(state_code: impl Into<String>) -> Self {
        Self {
            state_code: state_code.into(),
            buckets: HashMap::new(),
        }
    }

    /// An absent attribute reads as an empty list.
    pub fn into_bucket(mut self, key: BucketKey) -> Vec<String> {
        self.buckets.remove(&key).unwrap_or_default()
    }
}

#[cfg(test)]
impl NameRecord {
    pub fn with_bucket<I, S>(mut self, key: BucketKey, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets
            .insert(key, names.into_iter().map(Into::into).collect());
        self
    }

    pub fn bucket(&self, key: BucketKey) -> &[String] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Read access to the state-keyed table.
pub trait NameStore {
    fn get(
        &self,
        state_code: &str,
    ) -> impl Future<Output = Result<Option<NameRecord>, StoreError>> + Send;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bucket_reads_empty() {
        let record = NameRecord::new("OH").with_bucket(BucketKey::StateBucket1, ["Michael"]);
        assert_eq!(record.bucket(BucketKey::StateBucket1), ["Michael".to_string()]);
        assert!(record.bucket(BucketKey::OtherNamesBucket2).is_empty());
        assert!(record.into_bucket(BucketKey::StateBucket4).is_empty());
    }
}
