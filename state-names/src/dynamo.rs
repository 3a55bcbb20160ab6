use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use lambda_runtime::tracing;

use crate::bucket::BucketKey;
use crate::config::Config;
use crate::store::{NameRecord, NameStore, StoreError};

/// `NameStore` backed by the DynamoDB table the loader populates.
#[derive(Clone)]
pub struct DynamoNameStore {
    client: Client,
    table_name: String,
    key_attribute: String,
}

impl DynamoNameStore {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            key_attribute: config.key_attribute.clone(),
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config), config)
    }
}

impl NameStore for DynamoNameStore {
    async fn get(&self, state_code: &str) -> Result<Option<NameRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, AttributeValue::S(state_code.to_string()))
            .send()
            .await
            .map_err(|err| StoreError::new(DisplayErrorContext(&err).to_string()))?;

        Ok(output
            .item()
            .map(|item| record_from_item(state_code, item)))
    }
}

pub(crate) fn record_from_item(
    state_code: &str,
    item: &HashMap<String, AttributeValue>,
) -> NameRecord {
    let mut record = NameRecord::new(state_code);
    for key in BucketKey::ALL {
        let Some(value) = item.get(key.as_str()) else {
            continue;
        };
        match names_from_attribute(value) {
            Some(names) => {
                record.buckets.insert(key, names);
            }
            None => {
                tracing::warn!(state = state_code, bucket = %key, "bucket attribute is not a list of strings");
            }
        }
    }
    record
}

fn names_from_attribute(value: &AttributeValue) -> Option<Vec<String>> {
    match value {
        AttributeValue::L(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_s().ok().cloned())
                .collect(),
        ),
        AttributeValue::Ss(names) => Some(names.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> AttributeValue {
        AttributeValue::L(
            values
                .iter()
                .map(|v| AttributeValue::S(v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn reads_bucket_lists_in_order() {
        let item = HashMap::from([
            ("State".to_string(), AttributeValue::S("OH".into())),
            ("stateBucket1".to_string(), names(&["Michael", "David", "James"])),
            ("otherNamesBucket2".to_string(), names(&["Aiko", "Lars"])),
            ("totalNameCount".to_string(), AttributeValue::N("12345".into())),
        ]);

        let record = record_from_item("OH", &item);
        assert_eq!(record.state_code, "OH");
        assert_eq!(
            record.bucket(BucketKey::StateBucket1),
            ["Michael", "David", "James"].map(String::from)
        );
        assert_eq!(
            record.bucket(BucketKey::OtherNamesBucket2),
            ["Aiko", "Lars"].map(String::from)
        );
        assert!(record.bucket(BucketKey::StateBucket2).is_empty());
        assert_eq!(record.buckets.len(), 2);
    }

    #[test]
    fn accepts_string_sets() {
        let item = HashMap::from([(
            "stateBucket3".to_string(),
            AttributeValue::Ss(vec!["Mary".into()]),
        )]);
        let record = record_from_item("PA", &item);
        assert_eq!(record.bucket(BucketKey::StateBucket3), ["Mary".to_string()]);
    }

    #[test]
    fn skips_unexpected_attribute_types() {
        let item = HashMap::from([
            ("stateBucket1".to_string(), AttributeValue::S("Michael".into())),
            (
                "stateBucket2".to_string(),
                AttributeValue::L(vec![
                    AttributeValue::S("Anna".into()),
                    AttributeValue::N("7".into()),
                ]),
            ),
        ]);
        let record = record_from_item("TX", &item);
        assert!(record.bucket(BucketKey::StateBucket1).is_empty());
        assert_eq!(record.bucket(BucketKey::StateBucket2), ["Anna".to_string()]);
    }
}
