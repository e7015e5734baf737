use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub confirm_timeout_secs: u64,
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("SWIFT_BASE_URL")
                .unwrap_or_else(|_| "https://swift8393.pythonanywhere.com".to_string()),
            poll_interval_ms: env::var("SWIFT_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            confirm_timeout_secs: env::var("SWIFT_CONFIRM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .unwrap_or(40),
            request_timeout_ms: env::var("SWIFT_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
