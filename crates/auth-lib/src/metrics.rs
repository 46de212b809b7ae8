// ==============
// crates/auth-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_REGISTERED: &str = "auth.registered";
pub const AUTH_REGISTER_REJECTED: &str = "auth.register_rejected";
pub const AUTH_LOGIN: &str = "auth.login";
pub const AUTH_LOGIN_FAILED: &str = "auth.login_failed";
pub const AUTH_LOGOUT: &str = "auth.logout";
pub const STORE_RESET: &str = "store.reset";
pub const ADVICE_REQUEST: &str = "advice.request";
pub const ADVICE_FALLBACK: &str = "advice.fallback";
pub const STRENGTH_STALE_DROPPED: &str = "strength.stale_dropped";
