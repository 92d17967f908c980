//! Cache settings and their environment override.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use appconfig_core::constants::{
    DEFAULT_REFRESH_INTERVAL, ENV_REFRESH_DURATION, REFRESH_INTERVAL_WARN_THRESHOLD,
};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// How long a loaded snapshot is served before the next lookup reloads it
    pub refresh_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl CacheSettings {
    /// Settings with a fixed refresh interval.
    pub fn with_refresh_interval(refresh_interval: Duration) -> Self {
        Self { refresh_interval }
    }

    /// Reads `CONFIG_REFRESH_DURATION` (a `.env` file is honoured).
    ///
    /// Never fails: a missing or malformed value keeps the one minute default.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_override(std::env::var(ENV_REFRESH_DURATION).ok().as_deref())
    }

    /// Builds settings from an optional duration string such as `"30s"` or `"2m"`.
    pub fn from_override(value: Option<&str>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) {
            match humantime::parse_duration(raw) {
                Ok(interval) => settings.refresh_interval = interval,
                Err(e) => info!(
                    value = raw,
                    error = %e,
                    default = ?DEFAULT_REFRESH_INTERVAL,
                    "{} parse error, using default",
                    ENV_REFRESH_DURATION
                ),
            }
        }

        if settings.refresh_interval > REFRESH_INTERVAL_WARN_THRESHOLD {
            warn!(
                refresh_interval = ?settings.refresh_interval,
                "config refresh interval is longer than 5 minutes"
            );
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use test_case::test_case;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[test_case(None, DEFAULT_REFRESH_INTERVAL ; "absent")]
    #[test_case(Some(""), DEFAULT_REFRESH_INTERVAL ; "empty")]
    #[test_case(Some("notaduration"), DEFAULT_REFRESH_INTERVAL ; "malformed")]
    #[test_case(Some("30s"), Duration::from_secs(30) ; "seconds")]
    #[test_case(Some("2m"), Duration::from_secs(120) ; "minutes")]
    #[test_case(Some("1h 30m"), Duration::from_secs(5400) ; "compound")]
    #[test_case(Some("500ms"), Duration::from_millis(500) ; "millis")]
    #[test_case(Some(" 45s "), Duration::from_secs(45) ; "padded")]
    fn test_from_override(value: Option<&str>, expected: Duration) {
        assert_eq!(CacheSettings::from_override(value).refresh_interval, expected);
    }

    /// Counts events at one level.
    struct LevelCounter {
        level: Level,
        count: Arc<AtomicUsize>,
    }

    impl<S: tracing::Subscriber> Layer<S> for LevelCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == self.level {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Parses `value`, returning the settings and the info and warn event counts.
    fn logged_while_parsing(value: &str) -> (CacheSettings, usize, usize) {
        let infos = Arc::new(AtomicUsize::new(0));
        let warns = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(LevelCounter {
                level: Level::INFO,
                count: infos.clone(),
            })
            .with(LevelCounter {
                level: Level::WARN,
                count: warns.clone(),
            });

        let settings = tracing::subscriber::with_default(subscriber, || {
            CacheSettings::from_override(Some(value))
        });
        (
            settings,
            infos.load(Ordering::SeqCst),
            warns.load(Ordering::SeqCst),
        )
    }

    #[test]
    fn test_long_interval_is_kept_with_warning() {
        let (settings, infos, warns) = logged_while_parsing("10m");
        assert_eq!(settings.refresh_interval, Duration::from_secs(600));
        assert_eq!(infos, 0);
        assert_eq!(warns, 1);
    }

    #[test]
    fn test_malformed_value_logs_info() {
        let (settings, infos, warns) = logged_while_parsing("notaduration");
        assert_eq!(settings.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(infos, 1);
        assert_eq!(warns, 0);
    }

    #[test_case("2m" ; "under threshold")]
    #[test_case("5m" ; "at threshold")]
    fn test_normal_interval_logs_nothing(value: &str) {
        let (_, infos, warns) = logged_while_parsing(value);
        assert_eq!((infos, warns), (0, 0));
    }

    #[test]
    fn test_default_is_one_minute() {
        assert_eq!(
            CacheSettings::default().refresh_interval,
            Duration::from_secs(60)
        );
    }
}
