/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
[UPDATE]: Accept protobuf-JSON zero-value omission and enum names for status
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::TaskStatus;

/// Task as stored by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_i64")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_status_code")]
    pub status: i32,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_u32")]
    pub retries: u32,
}

impl Task {
    pub fn task_status(&self) -> TaskStatus {
        TaskStatus::from_code(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default = "empty_object", deserialize_with = "serde_helpers::deserialize_object_or_empty")]
    pub parameters: Value,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            parameters: empty_object(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// One status change recorded for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_i64")]
    pub id: i64,
    #[serde(default)]
    pub details: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_status_code")]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub(crate) mod serde_helpers {
    use super::TaskStatus;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};
    use std::collections::HashMap;

    /// Integers arrive as JSON numbers or, for 64-bit fields, decimal strings.
    fn value_to_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => number.as_i64(),
            Value::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(0);
        }
        value_to_i64(&value).ok_or_else(|| serde::de::Error::custom("invalid integer value"))
    }

    pub fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        value_to_i64(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("invalid integer value"))
    }

    pub fn deserialize_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = deserialize_i64(deserializer)?;
        u32::try_from(value).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_status_code<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let unknown = TaskStatus::Unknown.code();
        let code = match &value {
            Value::Null => 0,
            Value::Number(number) => number
                .as_i64()
                .and_then(|code| i32::try_from(code).ok())
                .unwrap_or(unknown),
            Value::String(raw) => match raw.parse::<TaskStatus>() {
                Ok(status) => status.code(),
                Err(_) => raw.trim().parse::<i32>().unwrap_or(unknown),
            },
            _ => return Err(serde::de::Error::custom("invalid status value")),
        };
        Ok(code)
    }

    pub fn deserialize_object_or_empty<'de, D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(value)
    }

    /// `map<int32, int64>` arrives with string keys and number-or-string values.
    pub fn deserialize_status_counts<'de, D>(
        deserializer: D,
    ) -> Result<HashMap<i32, u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(entries) = value else {
            if value.is_null() {
                return Ok(HashMap::new());
            }
            return Err(serde::de::Error::custom("statusCounts must be an object"));
        };

        let mut counts = HashMap::with_capacity(entries.len());
        for (key, raw) in entries {
            let code = match key.parse::<i32>() {
                Ok(code) => code,
                Err(_) => key
                    .parse::<TaskStatus>()
                    .map(TaskStatus::code)
                    .map_err(serde::de::Error::custom)?,
            };
            let count = value_to_i64(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid count for {key}")))?;
            counts.insert(code, count.max(0) as u64);
        }
        Ok(counts)
    }
}
