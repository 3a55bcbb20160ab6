use std::env;

const DEFAULT_TABLE_NAME: &str = "StateNames";
const DEFAULT_REGION: &str = "us-east-2";
const KEY_ATTRIBUTE: &str = "State";

/// Where the name records live. Built once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub region: String,
    pub key_attribute: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            table_name: var("TABLE_NAME", DEFAULT_TABLE_NAME),
            region: var("AWS_REGION", DEFAULT_REGION),
            key_attribute: KEY_ATTRIBUTE.to_string(),
        }
    }
}
