use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Incomplete,
    Failed,
    // The backend owns this vocabulary; anything it adds later must not
    // break deserialization of the payments list.
    #[serde(other)]
    Unknown,
}

/// Client-side handle for a payment started at the gateway. Immutable once
/// created; `id` is the only correlation key for later records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: i64,
    pub service_id: i64,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Backend-owned snapshot of a payment. The client only ever reads these;
/// the gateway callback mutates them server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub service_id: i64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub result_code: Option<String>,
    #[serde(default)]
    pub result_desc: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload for the mpesa create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPayload {
    #[serde(rename = "serviceId")]
    pub service_id: i64,
    pub phone_number: String,
}

// Payload for the refund endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPayload {
    #[serde(rename = "paymentId")]
    pub payment_id: i64,
    #[serde(rename = "refundAmount")]
    pub refund_amount: u64,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Service ids the user has already paid for, in payment order.
pub fn paid_service_ids(records: &[PaymentRecord]) -> Vec<i64> {
    records
        .iter()
        .filter(|record| record.payment_status == PaymentStatus::Paid)
        .map(|record| record.service_id)
        .collect()
}
