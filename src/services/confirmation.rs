use crate::app::config::Config;
use crate::models::payment::{PaymentIntent, PaymentRecord, PaymentStatus};
use crate::services::gateway_client::{GatewayError, PaymentsApi};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Error)]
pub enum ConfirmError {
    /// The gateway reported the payment as not completed. The message is the
    /// backend's result description, suitable for display.
    #[error("{0}")]
    Incomplete(String),
    /// The client gave up waiting. The payment may still resolve server-side,
    /// so this is not proof of failure.
    #[error("no payment confirmation within {0:?}")]
    Timeout(Duration),
    #[error("transport failure: {0}")]
    Transport(Arc<GatewayError>),
    #[error("confirmation cancelled by caller")]
    Cancelled,
}

impl From<GatewayError> for ConfirmError {
    fn from(err: GatewayError) -> Self {
        Self::Transport(Arc::new(err))
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl ConfirmOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.confirm_timeout(),
        }
    }
}

type InFlight = Shared<BoxFuture<'static, Result<PaymentRecord, ConfirmError>>>;

/// Watches payment intents until they reach a terminal state.
///
/// At most one poll loop runs per intent id: concurrent calls for the same
/// intent attach to the in-flight loop and observe its result. Cancelling the
/// service's token stops every active loop at its next suspension point.
pub struct ConfirmationService {
    api: Arc<dyn PaymentsApi>,
    options: ConfirmOptions,
    in_flight: Arc<DashMap<i64, InFlight>>,
    cancel: CancellationToken,
}

impl ConfirmationService {
    pub fn new(api: Arc<dyn PaymentsApi>, options: ConfirmOptions) -> Self {
        Self::with_cancellation(api, options, CancellationToken::new())
    }

    pub fn with_cancellation(
        api: Arc<dyn PaymentsApi>,
        options: ConfirmOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            options,
            in_flight: Arc::new(DashMap::new()),
            cancel,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Polls the payments list until the intent's record resolves, the budget
    /// runs out, or the token is cancelled.
    pub async fn await_confirmation(
        &self,
        intent: &PaymentIntent,
    ) -> Result<PaymentRecord, ConfirmError> {
        let future = match self.in_flight.entry(intent.id) {
            Entry::Occupied(occupied) if occupied.get().peek().is_none() => {
                info!("Joining in-flight confirmation for intent {}", intent.id);
                occupied.get().clone()
            }
            // A terminal result whose cleanup has not landed yet: the budget
            // of that loop already elapsed, so start a fresh one.
            Entry::Occupied(mut occupied) => {
                let future = self.start_loop(intent);
                occupied.insert(future.clone());
                future
            }
            Entry::Vacant(vacant) => {
                let future = self.start_loop(intent);
                vacant.insert(future.clone());
                future
            }
        };

        future.await
    }

    // The loop runs as a detached task so it reaches a terminal condition and
    // clears its own map entry even when every caller abandons its future.
    // remove_if with ptr_eq leaves a replacement loop for the same intent
    // untouched.
    fn start_loop(&self, intent: &PaymentIntent) -> InFlight {
        let future = poll_until_terminal(
            self.api.clone(),
            intent.clone(),
            self.options.clone(),
            self.cancel.clone(),
        )
        .boxed()
        .shared();

        let in_flight = self.in_flight.clone();
        let entry_id = intent.id;
        let driver = future.clone();
        tokio::spawn(async move {
            let _ = driver.clone().await;
            in_flight.remove_if(&entry_id, |_, entry| entry.ptr_eq(&driver));
        });

        future
    }
}

async fn poll_until_terminal(
    api: Arc<dyn PaymentsApi>,
    intent: PaymentIntent,
    options: ConfirmOptions,
    cancel: CancellationToken,
) -> Result<PaymentRecord, ConfirmError> {
    let started = Instant::now();
    info!("Awaiting confirmation for payment intent {}", intent.id);

    loop {
        if cancel.is_cancelled() {
            info!("Confirmation for intent {} cancelled", intent.id);
            return Err(ConfirmError::Cancelled);
        }

        let records = match api.list_payments().await {
            Ok(records) => records,
            Err(e) => {
                error!("Payment list fetch failed for intent {}: {}", intent.id, e);
                return Err(e.into());
            }
        };

        match find_record(&records, intent.id) {
            Some(record) if record.payment_status == PaymentStatus::Paid => {
                info!(
                    "Payment intent {} confirmed (transaction {})",
                    intent.id,
                    record.transaction_id.as_deref().unwrap_or("n/a")
                );
                return Ok(record.clone());
            }
            Some(record) if record.payment_status == PaymentStatus::Incomplete => {
                let reason = record
                    .result_desc
                    .clone()
                    .unwrap_or_else(|| "Payment not completed".to_string());
                warn!("Payment intent {} incomplete: {}", intent.id, reason);
                return Err(ConfirmError::Incomplete(reason));
            }
            // No record yet, or one that has not resolved: keep polling.
            _ => {}
        }

        if started.elapsed() >= options.timeout {
            warn!(
                "Gave up waiting for intent {} after {:?}",
                intent.id, options.timeout
            );
            return Err(ConfirmError::Timeout(options.timeout));
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Confirmation for intent {} cancelled", intent.id);
                return Err(ConfirmError::Cancelled);
            }
            _ = sleep(options.poll_interval) => {}
        }
    }
}

fn find_record(records: &[PaymentRecord], intent_id: i64) -> Option<&PaymentRecord> {
    records.iter().find(|record| record.id == intent_id)
}
