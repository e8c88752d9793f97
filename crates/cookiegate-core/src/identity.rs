//! The identity payload recovered from a session cookie.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// An application-defined payload produced by successfully unsealing the
/// session cookie.
///
/// The payload is opaque to this layer: whatever JSON the application signed
/// in with is what comes back out. Handlers only ever see a present
/// `Identity` or nothing; invalid or tampered cookies never surface here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity {
    payload: Value,
}

impl Identity {
    /// The raw payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume into the raw payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Get a payload field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Deserialize the payload into a concrete type.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

impl From<Value> for Identity {
    fn from(payload: Value) -> Self {
        Self { payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_access() {
        let id = Identity::from(serde_json::json!({"userId": 42}));
        assert_eq!(id.get("userId").and_then(Value::as_i64), Some(42));
        assert_eq!(id.get("missing"), None);
    }

    #[test]
    fn typed_decode() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct User {
            user_id: u64,
        }

        let id = Identity::from(serde_json::json!({"user_id": 7}));
        assert_eq!(id.decode::<User>().unwrap(), User { user_id: 7 });
        assert!(id.decode::<Vec<String>>().is_err());
    }
}
