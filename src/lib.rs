//! Client for the Swift trading platform's mobile-money payment flow:
//! create a payment intent, poll until the gateway resolves it, classify
//! the terminal outcome for the UI.

pub mod app;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::Config;
pub use models::payment::{
    paid_service_ids, PaymentIntent, PaymentRecord, PaymentStatus,
};
pub use services::{
    classify, ConfirmError, ConfirmOptions, ConfirmationResult, ConfirmationService,
    FailureKind, GatewayClient, GatewayError, PaymentsApi, StaticTokens, TokenProvider,
};
