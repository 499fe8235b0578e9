//! Match store configuration.

use serde::{Deserialize, Serialize};

/// Environment variable holding a fixed base seed.
pub const ENV_SEED: &str = "VILLAIN_MATCH_SEED";
/// Environment variable holding the live-match cap.
pub const ENV_MAX_MATCHES: &str = "VILLAIN_MATCH_MAX_MATCHES";
/// Environment variable holding the per-match push buffer size.
pub const ENV_BROADCAST_CAPACITY: &str = "VILLAIN_MATCH_BROADCAST_CAPACITY";

/// Largest per-match push buffer accepted.
pub const MAX_BROADCAST_CAPACITY: usize = 1 << 16;

/// Match store configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Base seed for match RNGs.
    /// `None` seeds every match from OS entropy. With a base seed, the n-th
    /// match created (0-based) is seeded with `base + n`, so runs are
    /// reproducible.
    pub seed: Option<u64>,

    /// Maximum number of live matches.
    /// Creation is rejected once reached, until a match is closed.
    pub max_matches: usize,

    /// State pushes buffered per match before slow subscribers lag.
    /// Lagging subscribers skip the states they missed and resume from the
    /// oldest push still buffered. Clamped to `1..=MAX_BROADCAST_CAPACITY`.
    pub broadcast_capacity: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_matches: 10_000,
            broadcast_capacity: 64,
        }
    }
}

impl MatchConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, falling back to defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = parse_value(ENV_SEED, lookup(ENV_SEED)) {
            config.seed = Some(seed);
        }
        if let Some(max) = parse_value(ENV_MAX_MATCHES, lookup(ENV_MAX_MATCHES)) {
            config.max_matches = max;
        }
        if let Some(capacity) = parse_value(ENV_BROADCAST_CAPACITY, lookup(ENV_BROADCAST_CAPACITY)) {
            config = config.with_broadcast_capacity(capacity);
        }

        config
    }

    /// Create a new config with a fixed base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with a live-match cap.
    #[must_use]
    pub fn with_max_matches(mut self, max: usize) -> Self {
        self.max_matches = max;
        self
    }

    /// Create a new config with a push buffer size.
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.clamp(1, MAX_BROADCAST_CAPACITY);
        self
    }

    /// Push buffer size to allocate, clamped even if the field was set
    /// directly or deserialized out of range.
    #[must_use]
    pub fn push_buffer(&self) -> usize {
        self.broadcast_capacity.clamp(1, MAX_BROADCAST_CAPACITY)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.max_matches, 10_000);
        assert_eq!(config.broadcast_capacity, 64);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MatchConfig::default()
            .with_seed(123)
            .with_max_matches(2)
            .with_broadcast_capacity(0);

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.max_matches, 2);
        assert_eq!(config.broadcast_capacity, 1);
    }

    #[test]
    fn test_broadcast_capacity_is_clamped() {
        let config = MatchConfig::default().with_broadcast_capacity(usize::MAX);
        assert_eq!(config.broadcast_capacity, MAX_BROADCAST_CAPACITY);

        let raw = MatchConfig {
            broadcast_capacity: usize::MAX,
            ..MatchConfig::default()
        };
        assert_eq!(raw.push_buffer(), MAX_BROADCAST_CAPACITY);

        let raw = MatchConfig {
            broadcast_capacity: 0,
            ..MatchConfig::default()
        };
        assert_eq!(raw.push_buffer(), 1);
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = MatchConfig::from_lookup(|key| match key {
            ENV_SEED => Some("123".to_string()),
            ENV_MAX_MATCHES => Some(" 5 ".to_string()),
            ENV_BROADCAST_CAPACITY => Some("16".to_string()),
            _ => None,
        });

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.max_matches, 5);
        assert_eq!(config.broadcast_capacity, 16);
    }

    #[test]
    fn test_from_lookup_ignores_bad_values() {
        let config = MatchConfig::from_lookup(|key| match key {
            ENV_SEED => Some("not-a-seed".to_string()),
            ENV_MAX_MATCHES => Some("-3".to_string()),
            ENV_BROADCAST_CAPACITY => Some("99999999999999999999999".to_string()),
            _ => None,
        });

        assert_eq!(config, MatchConfig::default());
    }

    #[test]
    fn test_from_lookup_clamps_capacity() {
        let config = MatchConfig::from_lookup(|key| (key == ENV_BROADCAST_CAPACITY).then(|| "0".to_string()));
        assert_eq!(config.broadcast_capacity, 1);

        let empty = MatchConfig::from_lookup(|_| None);
        assert_eq!(empty, MatchConfig::default());
    }

    #[test]
    fn test_serialization() {
        let config = MatchConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
