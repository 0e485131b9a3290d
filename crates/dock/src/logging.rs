#![forbid(unsafe_code)]

//! Subscriber installation for hosts without their own.
//!
//! Requires the `subscriber` feature. The filter comes from `DOCK_LOG`
//! (`EnvFilter` syntax) and falls back to `info`. With the `json` feature the
//! output is one JSON object per line.

/// Environment variable read by [`init`].
pub const LOG_ENV: &str = "DOCK_LOG";

/// Default filter when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

#[cfg(feature = "subscriber")]
pub use imp::{init, init_with_filter};

#[cfg(feature = "subscriber")]
mod imp {
    use tracing_subscriber::EnvFilter;

    use super::{DEFAULT_FILTER, LOG_ENV};

    type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

    /// Install a global subscriber filtered by `DOCK_LOG`.
    pub fn init() -> InitResult {
        let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
        init_with_filter(&filter)
    }

    /// Install a global subscriber with an explicit filter directive.
    ///
    /// Fails if a global subscriber is already set.
    pub fn init_with_filter(directives: &str) -> InitResult {
        let filter =
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true);
        #[cfg(feature = "json")]
        let result = builder.json().try_init();
        #[cfg(not(feature = "json"))]
        let result = builder.try_init();
        result
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn second_install_fails() {
            assert!(init_with_filter("dock=debug,not a directive[").is_ok());
            tracing::debug!(target: "dock.runtime", "subscriber installed");
            assert!(init_with_filter("warn").is_err());
        }
    }
}
