pub mod auth;
pub mod confirmation;
pub mod gateway_client;
pub mod status;

pub use auth::{StaticTokens, TokenProvider};
pub use confirmation::{ConfirmError, ConfirmOptions, ConfirmationService};
pub use gateway_client::{GatewayClient, GatewayError, PaymentsApi};
pub use status::{classify, ConfirmationResult, FailureKind};
