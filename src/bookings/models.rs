use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Document;

/// Lifecycle of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Done,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Done => "done",
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of PATCH /bookings/:id
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

impl UpdateStatusRequest {
    /// The only fields a status update may touch
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        fields.insert("status".to_string(), Value::String(self.status.as_str().to_string()));
        fields
    }
}

/// Query string of GET /bookings
#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

/// Prepare a client-supplied booking body for insertion.
///
/// Provided fields are kept verbatim; `status` and `created_at` are only
/// filled in when absent.
pub fn new_booking(mut body: Document) -> Document {
    body.entry("status")
        .or_insert_with(|| Value::String(BookingStatus::default().as_str().to_string()));
    body.entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_booking_status_serialization() {
        assert_eq!(serde_json::to_value(BookingStatus::Confirmed).unwrap(), json!("confirmed"));
        let done: BookingStatus = serde_json::from_value(json!("done")).unwrap();
        assert_eq!(done, BookingStatus::Done);
        assert!(serde_json::from_value::<BookingStatus>(json!("shipped")).is_err());
    }

    #[test]
    fn test_update_status_touches_only_status() {
        let request: UpdateStatusRequest =
            serde_json::from_value(json!({"status": "done", "email": "evil@x.com"})).unwrap();
        let fields = request.into_fields();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["status"], "done");
    }

    #[test]
    fn test_new_booking_fills_defaults() {
        let booking = new_booking(doc(json!({"email": "a@x.com", "service_id": "s1"})));

        assert_eq!(booking["email"], "a@x.com");
        assert_eq!(booking["service_id"], "s1");
        assert_eq!(booking["status"], "pending");
        assert!(booking["created_at"].is_string());
    }

    #[test]
    fn test_new_booking_keeps_provided_fields() {
        let booking = new_booking(doc(json!({
            "email": "a@x.com",
            "status": "confirmed",
            "created_at": "2024-01-01T00:00:00Z",
            "price": 99
        })));

        assert_eq!(booking["status"], "confirmed");
        assert_eq!(booking["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(booking["price"], 99);
    }
}
