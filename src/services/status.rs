use crate::models::payment::PaymentRecord;
use crate::services::confirmation::ConfirmError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Incomplete,
    Timeout,
    Transport,
    Cancelled,
}

/// The one shape the UI consumes, whichever way the poll loop ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConfirmationResult {
    Success(PaymentRecord),
    Failure { kind: FailureKind, message: String },
}

impl ConfirmationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Pure mapping from the poller's terminal outcome; no retries, no side
/// effects, same input always yields the same result.
pub fn classify(outcome: &Result<PaymentRecord, ConfirmError>) -> ConfirmationResult {
    match outcome {
        Ok(record) => ConfirmationResult::Success(record.clone()),
        Err(err) => {
            let kind = match err {
                ConfirmError::Incomplete(_) => FailureKind::Incomplete,
                ConfirmError::Timeout(_) => FailureKind::Timeout,
                ConfirmError::Transport(_) => FailureKind::Transport,
                ConfirmError::Cancelled => FailureKind::Cancelled,
            };
            ConfirmationResult::Failure {
                kind,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::PaymentStatus;
    use crate::services::gateway_client::GatewayError;
    use chrono::Utc;
    use reqwest::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;

    fn paid_record() -> PaymentRecord {
        PaymentRecord {
            id: 42,
            service_id: 7,
            payment_status: PaymentStatus::Paid,
            payment_method: Some("mpesa".to_string()),
            result_code: Some("0".to_string()),
            result_desc: None,
            amount: "1500.00".to_string(),
            transaction_id: Some("TX42".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_success_carries_the_record() {
        let outcome = Ok(paid_record());
        match classify(&outcome) {
            ConfirmationResult::Success(record) => assert_eq!(record.id, 42),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_kinds_map_one_to_one() {
        let cases: Vec<(Result<PaymentRecord, ConfirmError>, FailureKind)> = vec![
            (
                Err(ConfirmError::Incomplete("Insufficient funds".to_string())),
                FailureKind::Incomplete,
            ),
            (
                Err(ConfirmError::Timeout(Duration::from_secs(40))),
                FailureKind::Timeout,
            ),
            (
                Err(ConfirmError::Transport(Arc::new(GatewayError::Rejected {
                    status: StatusCode::BAD_GATEWAY,
                    body: "upstream unavailable".to_string(),
                }))),
                FailureKind::Transport,
            ),
            (Err(ConfirmError::Cancelled), FailureKind::Cancelled),
        ];

        for (outcome, expected) in cases {
            match classify(&outcome) {
                ConfirmationResult::Failure { kind, .. } => assert_eq!(kind, expected),
                other => panic!("expected Failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_incomplete_message_is_the_result_desc() {
        let outcome = Err(ConfirmError::Incomplete("Insufficient funds".to_string()));
        match classify(&outcome) {
            ConfirmationResult::Failure { message, .. } => {
                assert_eq!(message, "Insufficient funds")
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let outcomes: Vec<Result<PaymentRecord, ConfirmError>> = vec![
            Ok(paid_record()),
            Err(ConfirmError::Timeout(Duration::from_secs(40))),
            Err(ConfirmError::Cancelled),
        ];

        for outcome in &outcomes {
            assert_eq!(classify(outcome), classify(outcome));
        }
    }
}
