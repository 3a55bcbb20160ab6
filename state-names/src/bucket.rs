use std::fmt;
use std::str::FromStr;

use crate::error::LookupError;

/// One of the six list attributes stored on every state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    StateBucket1,
    StateBucket2,
    StateBucket3,
    StateBucket4,
    OtherNamesBucket1,
    OtherNamesBucket2,
}

impl BucketKey {
    pub const ALL: [BucketKey; 6] = [
        BucketKey::StateBucket1,
        BucketKey::StateBucket2,
        BucketKey::StateBucket3,
        BucketKey::StateBucket4,
        BucketKey::OtherNamesBucket1,
        BucketKey::OtherNamesBucket2,
    ];

    /// Attribute name as written by the loader.
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKey::StateBucket1 => "stateBucket1",
            BucketKey::StateBucket2 => "stateBucket2",
            BucketKey::StateBucket3 => "stateBucket3",
            BucketKey::StateBucket4 => "stateBucket4",
            BucketKey::OtherNamesBucket1 => "otherNamesBucket1",
            BucketKey::OtherNamesBucket2 => "otherNamesBucket2",
        }
    }

    /// The numbered form only ever addresses the state buckets.
    pub fn from_number(number: i64) -> Option<BucketKey> {
        match number {
            1 => Some(BucketKey::StateBucket1),
            2 => Some(BucketKey::StateBucket2),
            3 => Some(BucketKey::StateBucket3),
            4 => Some(BucketKey::StateBucket4),
            _ => None,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketKey {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| LookupError::InvalidBucket(s.to_string()))
    }
}

/// How the caller picked a bucket, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketSelector {
    Named(String),
    Numbered(i64),
}

impl BucketSelector {
    pub fn resolve(&self) -> Result<BucketKey, LookupError> {
        match self {
            BucketSelector::Named(name) => name.parse(),
            BucketSelector::Numbered(number) => BucketKey::from_number(*number)
                .ok_or_else(|| LookupError::InvalidBucketNumber(number.to_string())),
        }
    }
}
