//! Named serializer/deserializer extensions for the exchange codec.

use serde_json::Value;

use super::CodecError;
use crate::value::TraversalValue;

/// A named extension layered on top of the codec's base mapping.
///
/// Modules are consulted in registration order and get first crack at
/// both directions: returning `None` passes the value (or tag) on to the
/// next module and finally to the base mapping; returning `Some` settles
/// the outcome, success or failure.
///
/// # Examples
///
/// A module that renders timestamps as epoch seconds instead of the base
/// mapping's RFC 3339 form:
///
/// ```rust
/// use pathloom::codec::{CodecError, CodecModule};
/// use pathloom::value::TraversalValue;
/// use chrono::DateTime;
/// use serde_json::{Value, json};
///
/// struct EpochSeconds;
///
/// impl CodecModule for EpochSeconds {
///     fn name(&self) -> &'static str {
///         "epoch-seconds"
///     }
///
///     fn encode(&self, value: &TraversalValue) -> Option<Result<Value, CodecError>> {
///         match value {
///             TraversalValue::Timestamp(t) => Some(Ok(json!(t.timestamp()))),
///             _ => None,
///         }
///     }
///
///     fn decode(&self, tag: &str, payload: &Value) -> Option<Result<TraversalValue, CodecError>> {
///         if tag != "timestamp" {
///             return None;
///         }
///         let secs = payload.as_i64()?;
///         let parsed = DateTime::from_timestamp(secs, 0)?;
///         Some(Ok(TraversalValue::Timestamp(parsed)))
///     }
/// }
/// ```
pub trait CodecModule: Send + Sync {
    /// Name used in diagnostics and discovery listings.
    fn name(&self) -> &'static str;

    /// Encode hook. Return `None` to defer to later modules and the base
    /// mapping.
    fn encode(&self, value: &TraversalValue) -> Option<Result<Value, CodecError>>;

    /// Decode hook for tagged documents. Return `None` to defer.
    fn decode(&self, tag: &str, payload: &Value) -> Option<Result<TraversalValue, CodecError>>;
}
