use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── Option id ──────────────────────────────────────────────────────

/// Identifier of a poll option.
///
/// Result maps are keyed by strings, so numeric ids in `options` are
/// normalized to their decimal form on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OptionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(number_key(&n)),
        })
    }
}

/// Decimal key for a JSON number. Integral floats drop the fraction, so
/// `1.0` looks up the same result entry as `1`.
fn number_key(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

// ─── Lenient fields ─────────────────────────────────────────────────

/// `None` when the value does not have the expected type, instead of
/// failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keep any value, `null` included, so key presence survives decoding.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Vote counts keyed by option id. A count that is not a non-negative
/// integer reads as 0 for that option only.
fn vote_counts<'de, D>(deserializer: D) -> Result<Option<HashMap<String, u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Object(map) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        map.into_iter()
            .map(|(id, count)| (id, count_of(&count)))
            .collect(),
    ))
}

fn count_of(value: &serde_json::Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => f as u64,
        _ => 0,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ─── Payload ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: OptionId,
    #[serde(default)]
    pub text: String,
}

/// Body of `GET /api/polls/{id}/result`.
///
/// Every field is optional on the wire: an unknown poll comes back as
/// `{"error": "..."}` and a fresh poll may not carry `results` yet. A field
/// of the wrong type decodes as absent without affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollResultPayload {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub poll_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PollOption>>,
    #[serde(
        default,
        deserialize_with = "vote_counts",
        skip_serializing_if = "Option::is_none"
    )]
    pub results: Option<HashMap<String, u64>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_votes: Option<u64>,
    /// Raw value; `Some` whenever the key is present, even as `null`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unique_voters: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One rendered line of the results list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow<'a> {
    pub text: &'a str,
    pub votes: u64,
}

impl PollResultPayload {
    /// Decode a parsed JSON body. Fails only when the body is not a JSON
    /// object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value)
    }

    /// Whether both `options` and `results` are present.
    pub fn has_results(&self) -> bool {
        self.options.is_some() && self.results.is_some()
    }

    /// Vote count for an option, `0` when the results map has no entry.
    pub fn votes_for(&self, id: &OptionId) -> u64 {
        self.results
            .as_ref()
            .and_then(|r| r.get(id.as_str()))
            .copied()
            .unwrap_or(0)
    }

    /// Rows in option order. `None` unless [`has_results`](Self::has_results).
    pub fn rows(&self) -> Option<Vec<ResultRow<'_>>> {
        if !self.has_results() {
            return None;
        }
        let options = self.options.as_deref()?;
        Some(
            options
                .iter()
                .map(|opt| ResultRow {
                    text: &opt.text,
                    votes: self.votes_for(&opt.id),
                })
                .collect(),
        )
    }

    /// `total_votes` as sent, falling back to the (saturating) sum of all
    /// result counts.
    pub fn total_votes_or_sum(&self) -> u64 {
        self.total_votes.unwrap_or_else(|| {
            self.results
                .as_ref()
                .map(|r| r.values().fold(0u64, |acc, v| acc.saturating_add(*v)))
                .unwrap_or(0)
        })
    }
}
