use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifies records that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &RecordId;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Timestamp-derived record identifier.
///
/// Ids are the decimal millisecond timestamp at creation. Ids minted by
/// [`RecordId::generate`] are strictly increasing within a process, so two
/// records created in the same millisecond still receive distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let issued = match LAST_ISSUED.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        }) {
            Ok(previous) | Err(previous) => now.max(previous + 1),
        };
        Self(issued.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Keeps only the ASCII digits of a phone number (`+91 81443-72669` -> `918144372669`).
pub fn mobile_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique_and_increasing() {
        let ids: Vec<RecordId> = (0..500).map(|_| RecordId::generate()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let numeric: Vec<i64> = ids.iter().map(|id| id.as_str().parse().unwrap()).collect();
        assert!(numeric.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn mobile_digits_strips_punctuation() {
        assert_eq!(mobile_digits("+91 81443-72669"), "918144372669");
        assert_eq!(mobile_digits("n/a"), "");
    }
}
