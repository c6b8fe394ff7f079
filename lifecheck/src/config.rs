use std::time::Duration;

/// Runtime configuration for sessions and callback sources.
///
/// Use the builder methods to customize, or [`Default`] for the values the
/// lifecycle suites were written against.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use lifecheck::Config;
///
/// let config = Config::default()
///     .with_default_timeout(Duration::from_secs(10))   // slow device
///     .with_dispatcher_thread_name("ui-main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Upper bound for session-level waits that do not pass their own timeout.
    /// Default: 5s
    default_timeout: Duration,

    /// Name of the thread a [`CallbackSource`](crate::CallbackSource)
    /// delivers callbacks on.
    /// Default: `lifecycle-main`
    dispatcher_thread_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_timeout: Self::DEFAULT_TIMEOUT,
            dispatcher_thread_name: String::from("lifecycle-main"),
        }
    }
}

impl Config {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Set the timeout used by waits that don't specify one.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Returns the timeout used by waits that don't specify one.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Set the name of the callback dispatcher thread.
    pub fn with_dispatcher_thread_name(mut self, name: impl Into<String>) -> Self {
        self.dispatcher_thread_name = name.into();
        self
    }

    /// Returns the name of the callback dispatcher thread.
    pub fn dispatcher_thread_name(&self) -> &str {
        &self.dispatcher_thread_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.default_timeout(), Duration::from_secs(5));
        assert_eq!(config.dispatcher_thread_name(), "lifecycle-main");
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default()
            .with_default_timeout(Duration::from_millis(250))
            .with_dispatcher_thread_name("ui");
        assert_eq!(config.default_timeout(), Duration::from_millis(250));
        assert_eq!(config.dispatcher_thread_name(), "ui");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let config = Config::default().with_dispatcher_thread_name("ui");
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
