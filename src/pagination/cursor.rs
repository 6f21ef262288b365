//! Opaque cursor for timestamp-ordered records.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("invalid cursor: {0}")]
    Invalid(String),
}

/// Position of a record in an ordering by `(timestamp, id)`.
///
/// Carrying the sort key rather than only the id lets a source resume after
/// a record that was deleted between page requests. The id breaks ties
/// between records sharing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeCursor {
    at: DateTime<Utc>,
    id: Uuid,
}

impl TimeCursor {
    pub fn new(at: DateTime<Utc>, id: Uuid) -> Self {
        Self { at, id }
    }

    /// Sort key usable for comparisons against records.
    pub fn key(&self) -> (DateTime<Utc>, Uuid) {
        (self.at, self.id)
    }

    pub fn encode(&self) -> String {
        let raw = format!(
            "{}.{}:{}",
            self.at.timestamp(),
            self.at.timestamp_subsec_nanos(),
            self.id
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn decode(cursor: &str) -> Result<Self, CursorError> {
        let invalid = || CursorError::Invalid(cursor.to_string());

        let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

        let (time, id) = raw.split_once(':').ok_or_else(invalid)?;
        let (secs, nanos) = time.split_once('.').ok_or_else(invalid)?;
        let secs: i64 = secs.parse().map_err(|_| invalid())?;
        let nanos: u32 = nanos.parse().map_err(|_| invalid())?;

        let at = DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)?;
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(Self { at, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encode_then_decode_keeps_position() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let cursor = TimeCursor::new(at, Uuid::new_v4());

        let decoded = TimeCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn encoded_form_is_url_safe() {
        let cursor = TimeCursor::new(Utc::now(), Uuid::new_v4());
        let encoded = cursor.encode();

        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn garbage_is_rejected() {
        let bad_uuid = URL_SAFE_NO_PAD.encode("1.2:not-a-uuid");
        for bad in ["", "!!!", "bm90LWEtY3Vyc29y", bad_uuid.as_str()] {
            assert!(
                matches!(TimeCursor::decode(bad), Err(CursorError::Invalid(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn orders_by_time_then_id() {
        let at = Utc::now();
        let low = TimeCursor::new(at, Uuid::nil());
        let high = TimeCursor::new(at, Uuid::max());
        let later = TimeCursor::new(at + chrono::Duration::seconds(1), Uuid::nil());

        assert!(low < high);
        assert!(high < later);
    }
}
