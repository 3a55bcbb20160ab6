use serde_json::{Map, Value};

use crate::bucket::{BucketKey, BucketSelector};
use crate::error::LookupError;

/// Which calling convention the payload arrived in. Decides the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Direct,
    Gateway,
}

/// Where, inside a gateway body, the arguments were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayForm {
    Args,
    ToolCall,
}

/// The fields a caller supplied, before normalization.
#[derive(Debug)]
pub struct RawArgs {
    pub state: Option<Value>,
    pub selector: Option<BucketSelector>,
    invalid_selector: Option<LookupError>,
}

/// A validated `(state, bucket)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub state: String,
    pub bucket: BucketKey,
}

/// Which convention the payload uses. Anything with a top-level `body` is a
/// gateway event, whatever else it carries.
pub fn detect(payload: &Value) -> Convention {
    match payload {
        Value::Object(fields) if fields.contains_key("body") => Convention::Gateway,
        _ => Convention::Direct,
    }
}

/// Pull the request fields out of a payload of either convention.
pub fn extract(payload: &Value) -> Result<RawArgs, LookupError> {
    match detect(payload) {
        Convention::Direct => extract_direct(payload),
        Convention::Gateway => extract_gateway(payload).map(|(_, args)| args),
    }
}

pub fn extract_direct(payload: &Value) -> Result<RawArgs, LookupError> {
    match payload {
        Value::Object(fields) => Ok(RawArgs::from_fields(fields)),
        other => Err(LookupError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            type_name(other)
        ))),
    }
}

pub fn extract_gateway(payload: &Value) -> Result<(GatewayForm, RawArgs), LookupError> {
    let body = match payload.get("body") {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw)?,
        Some(decoded @ Value::Object(_)) => decoded.clone(),
        Some(other) => {
            return Err(LookupError::MalformedPayload(format!(
                "body must be a JSON string, got {}",
                type_name(other)
            )))
        }
        None => return Err(LookupError::MalformedPayload("missing body".into())),
    };

    let Value::Object(body) = body else {
        return Err(LookupError::MalformedPayload(
            "body does not encode a JSON object".into(),
        ));
    };

    if let Some(Value::Object(args)) = body.get("args") {
        return Ok((GatewayForm::Args, RawArgs::from_fields(args)));
    }

    if let Some(calls) = body
        .get("call")
        .and_then(|call| call.get("transcript_with_tool_calls"))
    {
        return extract_tool_call(calls).map(|args| (GatewayForm::ToolCall, args));
    }

    Err(LookupError::MalformedPayload(
        "body has neither args nor call.transcript_with_tool_calls".into(),
    ))
}

fn extract_tool_call(calls: &Value) -> Result<RawArgs, LookupError> {
    let Value::Array(calls) = calls else {
        return Err(LookupError::MalformedPayload(
            "transcript_with_tool_calls must be a list".into(),
        ));
    };

    let arguments = calls
        .iter()
        .find_map(|call| call.get("arguments"))
        .ok_or_else(|| {
            LookupError::MalformedPayload("no tool call carries arguments".into())
        })?;

    let Value::String(arguments) = arguments else {
        return Err(LookupError::MalformedPayload(
            "tool call arguments must be a JSON string".into(),
        ));
    };

    match serde_json::from_str::<Value>(arguments)? {
        Value::Object(fields) => Ok(RawArgs::from_fields(&fields)),
        other => Err(LookupError::MalformedPayload(format!(
            "tool call arguments must encode an object, got {}",
            type_name(&other)
        ))),
    }
}

impl RawArgs {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let present = |name: &str| fields.get(name).filter(|value| !value.is_null());

        let state = present("state").cloned();
        let mut invalid_selector = None;
        let selector = match (present("bucket"), present("bucketNumber")) {
            (Some(Value::String(name)), _) => Some(BucketSelector::Named(name.clone())),
            (Some(other), _) => {
                invalid_selector = Some(LookupError::InvalidBucket(other.to_string()));
                None
            }
            (None, Some(number)) => match number.as_i64() {
                Some(number) => Some(BucketSelector::Numbered(number)),
                None => {
                    invalid_selector =
                        Some(LookupError::InvalidBucketNumber(number.to_string()));
                    None
                }
            },
            (None, None) => None,
        };

        Self {
            state,
            selector,
            invalid_selector,
        }
    }

    /// Validate and normalize into a `Request`.
    pub fn into_request(self) -> Result<Request, LookupError> {
        let has_selector = self.selector.is_some() || self.invalid_selector.is_some();
        let state = match self.state {
            Some(state) => normalize_state(&state)?,
            None if has_selector => return Err(LookupError::InvalidState(String::new())),
            None => {
                return Err(LookupError::MalformedPayload(
                    "missing required parameters: state and bucket".into(),
                ))
            }
        };

        if let Some(err) = self.invalid_selector {
            return Err(err);
        }
        let bucket = self
            .selector
            .ok_or(LookupError::MissingBucketSelector)?
            .resolve()?;

        Ok(Request { state, bucket })
    }
}

/// Trim and uppercase; the result must be exactly two ASCII letters.
pub fn normalize_state(state: &Value) -> Result<String, LookupError> {
    let Value::String(raw) = state else {
        return Err(LookupError::InvalidState(state.to_string()));
    };
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(LookupError::InvalidState(raw.clone()))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
