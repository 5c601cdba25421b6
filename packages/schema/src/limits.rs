//! Platform-wide operational limits shared by schema consumers.

use std::time::Duration;

pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
pub const PASSWORD_MIN_LENGTH: usize = 12;
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const TOKEN_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
pub const REFRESH_TOKEN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Maximum accepted document payload, in bytes.
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;

pub const BIOMETRIC_MATCH_THRESHOLD: f64 = 0.85;
pub const ANOMALY_DETECTION_THRESHOLD: f64 = 0.95;

pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const CIRCUIT_BREAKER_THRESHOLD: u32 = 5;
pub const CIRCUIT_BREAKER_TIMEOUT: Duration = Duration::from_secs(30);
