//! Settings for [`ChainedHashTable`](crate::ChainedHashTable).

use std::{fmt, str::FromStr};

use crate::IndexError;

/// Bucket count used when nothing else is configured.
pub const DEFAULT_TABLE_SIZE: usize = 179;

/// Environment variable holding the bucket count.
pub const TABLE_SIZE_VAR: &str = "BID_INDEX_TABLE_SIZE";
/// Environment variable holding the key strategy.
pub const KEY_STRATEGY_VAR: &str = "BID_INDEX_KEY_STRATEGY";
/// Environment variable holding the removal policy.
pub const REMOVAL_POLICY_VAR: &str = "BID_INDEX_REMOVAL";

/// How a bid id is turned into a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Read the leading integer of the id the way C `atoi` does. Ids without
    /// leading digits read as `0`.
    #[default]
    Numeric,
    /// The whole id must be an integer; anything else is an invalid key.
    StrictNumeric,
    /// Hash the id as a string.
    Text,
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "numeric",
            Self::StrictNumeric => "strict",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

impl FromStr for KeyStrategy {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "strict" | "strict-numeric" => Ok(Self::StrictNumeric),
            "text" | "string" => Ok(Self::Text),
            _ => Err(IndexError::UnknownSetting { setting: "key strategy", value: s.to_string() }),
        }
    }
}

/// What `remove` takes out of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Unlink the first entry with a matching id and keep the rest of its chain.
    #[default]
    Unlink,
    /// Drop every entry in the bucket the id hashes to.
    ClearBucket,
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unlink => "unlink",
            Self::ClearBucket => "clear-bucket",
        };
        f.write_str(name)
    }
}

impl FromStr for RemovalPolicy {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unlink" => Ok(Self::Unlink),
            "clear-bucket" | "clear" => Ok(Self::ClearBucket),
            _ => Err(IndexError::UnknownSetting { setting: "removal policy", value: s.to_string() }),
        }
    }
}

/// Hash table settings. The table never resizes, so `table_size` is fixed for
/// the table's whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of buckets.
    table_size: usize,
    /// How ids become buckets.
    key_strategy: KeyStrategy,
    /// What removal takes out.
    removal_policy: RemovalPolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableConfig {
    /// Creates the default configuration: 179 buckets, numeric keys, unlink on remove.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            key_strategy: KeyStrategy::Numeric,
            removal_policy: RemovalPolicy::Unlink,
        }
    }

    /// Sets the bucket count.
    #[must_use]
    pub const fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    /// Sets the key strategy.
    #[must_use]
    pub const fn with_key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
        self.key_strategy = key_strategy;
        self
    }

    /// Sets the removal policy.
    #[must_use]
    pub const fn with_removal_policy(mut self, removal_policy: RemovalPolicy) -> Self {
        self.removal_policy = removal_policy;
        self
    }

    /// Number of buckets.
    #[must_use]
    pub const fn table_size(&self) -> usize {
        self.table_size
    }

    /// Key strategy in use.
    #[must_use]
    pub const fn key_strategy(&self) -> KeyStrategy {
        self.key_strategy
    }

    /// Removal policy in use.
    #[must_use]
    pub const fn removal_policy(&self) -> RemovalPolicy {
        self.removal_policy
    }

    /// Checks the configuration can back a table.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ZeroTableSize`] when the table would have no buckets.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.table_size == 0 {
            return Err(IndexError::ZeroTableSize);
        }
        Ok(())
    }

    /// Reads the configuration from the process environment, falling back to
    /// the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Fails when a variable is set to something that does not parse, or when
    /// the resulting configuration does not validate.
    pub fn from_env() -> Result<Self, IndexError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from any variable source. `lookup` returns the
    /// value of a variable, or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Same as [`TableConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(raw) = lookup(TABLE_SIZE_VAR) {
            let table_size = raw.trim().parse::<usize>().map_err(|_| {
                IndexError::UnknownSetting { setting: "table size", value: raw.clone() }
            })?;
            config = config.with_table_size(table_size);
        }
        if let Some(raw) = lookup(KEY_STRATEGY_VAR) {
            config = config.with_key_strategy(raw.parse()?);
        }
        if let Some(raw) = lookup(REMOVAL_POLICY_VAR) {
            config = config.with_removal_policy(raw.parse()?);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.table_size(), 179);
        assert_eq!(config.key_strategy(), KeyStrategy::Numeric);
        assert_eq!(config.removal_policy(), RemovalPolicy::Unlink);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_table_size_is_rejected() {
        let config = TableConfig::new().with_table_size(0);
        assert!(matches!(config.validate(), Err(IndexError::ZeroTableSize)));
    }

    #[test]
    fn test_from_lookup() {
        let config = TableConfig::from_lookup(lookup_from(&[
            (TABLE_SIZE_VAR, "31"),
            (KEY_STRATEGY_VAR, "Text"),
            (REMOVAL_POLICY_VAR, "clear-bucket"),
        ]))
        .unwrap();

        assert_eq!(config.table_size(), 31);
        assert_eq!(config.key_strategy(), KeyStrategy::Text);
        assert_eq!(config.removal_policy(), RemovalPolicy::ClearBucket);
    }

    #[test]
    fn test_from_lookup_unset_uses_defaults() {
        let config = TableConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, TableConfig::new());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad_size = TableConfig::from_lookup(lookup_from(&[(TABLE_SIZE_VAR, "lots")]));
        assert!(matches!(bad_size, Err(IndexError::UnknownSetting { setting: "table size", .. })));

        let zero = TableConfig::from_lookup(lookup_from(&[(TABLE_SIZE_VAR, "0")]));
        assert!(matches!(zero, Err(IndexError::ZeroTableSize)));

        let bad_policy = TableConfig::from_lookup(lookup_from(&[(REMOVAL_POLICY_VAR, "shred")]));
        assert!(matches!(bad_policy, Err(IndexError::UnknownSetting { .. })));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for strategy in [KeyStrategy::Numeric, KeyStrategy::StrictNumeric, KeyStrategy::Text] {
            assert_eq!(strategy.to_string().parse::<KeyStrategy>().unwrap(), strategy);
        }
        for policy in [RemovalPolicy::Unlink, RemovalPolicy::ClearBucket] {
            assert_eq!(policy.to_string().parse::<RemovalPolicy>().unwrap(), policy);
        }
    }
}
