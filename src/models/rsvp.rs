use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Assigned once at RSVP creation. The `pending -> paid` transition belongs to
/// a payment-confirmation collaborator outside this service; no endpoint here
/// writes `paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Free,
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn for_price(price: Decimal) -> Self {
        if price.is_zero() {
            PaymentStatus::Free
        } else {
            PaymentStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// RSVP row joined with the attendee's identity, for organizer listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventAttendee {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_free_event_gets_free_status() {
        assert_eq!(
            PaymentStatus::for_price(Decimal::ZERO),
            PaymentStatus::Free
        );
        assert_eq!(
            PaymentStatus::for_price(Decimal::new(0, 2)),
            PaymentStatus::Free
        );
    }

    #[test]
    fn test_priced_event_gets_pending_status() {
        assert_eq!(
            PaymentStatus::for_price(Decimal::new(2500, 2)),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentStatus::for_price(Decimal::new(1, 2)),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn test_payment_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Free).unwrap(),
            "\"free\""
        );
    }
}
