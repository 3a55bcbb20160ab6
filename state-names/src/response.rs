use serde::Serialize;

use crate::error::LookupError;
use crate::request::Convention;

/// What a direct caller gets back: the bucket itself, or `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Names(Vec<String>),
    Error { error: String },
}

impl From<Result<Vec<String>, LookupError>> for Reply {
    fn from(result: Result<Vec<String>, LookupError>) -> Self {
        match result {
            Ok(names) => Reply::Names(names),
            Err(err) => Reply::Error {
                error: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: &'static str,
    #[serde(rename = "Access-Control-Allow-Origin")]
    pub allow_origin: &'static str,
    #[serde(rename = "Access-Control-Allow-Methods")]
    pub allow_methods: &'static str,
    #[serde(rename = "Access-Control-Allow-Headers")]
    pub allow_headers: &'static str,
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self {
            content_type: "application/json",
            allow_origin: "*",
            allow_methods: "GET, POST, OPTIONS",
            allow_headers: "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
        }
    }
}

/// Gateway envelope. Always 200: errors travel inside `body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: CorsHeaders,
    pub body: String,
}

impl GatewayResponse {
    pub fn wrap(reply: &Reply) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            headers: CorsHeaders::default(),
            body: serde_json::to_string(reply)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Direct(Reply),
    Gateway(GatewayResponse),
}

impl Response {
    pub fn shape(convention: Convention, reply: Reply) -> Result<Self, serde_json::Error> {
        Ok(match convention {
            Convention::Direct => Response::Direct(reply),
            Convention::Gateway => Response::Gateway(GatewayResponse::wrap(&reply)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn direct_replies_are_bare() {
        let names = Reply::Names(vec!["Michael".into(), "David".into()]);
        assert_eq!(serde_json::to_value(&names).unwrap(), json!(["Michael", "David"]));

        let error = Reply::from(Err::<Vec<String>, _>(LookupError::MissingBucketSelector));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"error": "Missing required parameter: bucket or bucketNumber"})
        );
    }

    #[test]
    fn envelope_has_fixed_headers() {
        let response =
            Response::shape(Convention::Gateway, Reply::Names(vec!["Mary".into()])).unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 200,
                "headers": {
                    "Content-Type": "application/json",
                    "Access-Control-Allow-Origin": "*",
                    "Access-Control-Allow-Methods": "GET, POST, OPTIONS",
                    "Access-Control-Allow-Headers": "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
                },
                "body": "[\"Mary\"]"
            })
        );
    }

    #[test]
    fn envelope_body_decodes_to_the_direct_reply() {
        let replies = [
            Reply::Names(vec![]),
            Reply::Names(vec!["Zoë".into(), "Anna \"Annie\"".into()]),
            Reply::from(Err::<Vec<String>, _>(LookupError::StateNotFound("ZZ".into()))),
        ];
        for reply in replies {
            let envelope = GatewayResponse::wrap(&reply).unwrap();
            assert_eq!(envelope.status_code, 200);
            let body: Value = serde_json::from_str(&envelope.body).unwrap();
            assert_eq!(body, serde_json::to_value(&reply).unwrap());
        }
    }
}
