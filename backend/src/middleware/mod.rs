//! Cross-cutting HTTP middleware.

pub mod rate_limit;
pub mod trace;

pub use self::rate_limit::RateLimit;
pub use self::trace::Trace;
