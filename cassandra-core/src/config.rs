//! Plan configuration.
//!
//! The plan config is declared in a YAML document. A subset of its fields may additionally be
//! overridden from the environment using `CASSANDRA_` prefixed variables, which take precedence
//! over the document.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::PlanError;
use crate::repair::{validate_keyspace, validate_repair_day};
use crate::seeds::DEFAULT_MAX_SEEDS;
use crate::sizing::validate_ram_fraction;
use crate::token::parse_token;
use crate::version::{CassandraVersion, DEFAULT_VERSION};

/// The prefix of all environment overrides.
pub const ENV_PREFIX: &str = "CASSANDRA_";
/// The default fraction of host memory given to the Cassandra JVM.
pub const DEFAULT_RAM_FRACTION: f64 = 0.25;

/// The declarative plan configuration of a cluster.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlanConfig {
    /// The Cassandra version to deploy, `major.minor[.patch]`.
    #[serde(default = "PlanConfig::default_version")]
    pub version: String,
    /// The name of the cluster.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// The fraction of usable host memory given to the Cassandra JVM heap.
    ///
    /// Must be within `(0, 0.5]`.
    #[serde(default = "PlanConfig::default_ram_fraction")]
    pub ram_fraction: f64,
    /// The maximum number of seeds selected from the group.
    #[serde(default = "PlanConfig::default_max_seeds")]
    pub max_seeds: usize,
    /// An explicit seed list, used verbatim instead of group derived seeds.
    #[serde(default)]
    pub seeds: Option<Vec<String>>,
    /// An explicit token map keyed by member primary IP.
    ///
    /// When present, members absent from the map receive the default token `0`.
    #[serde(default)]
    pub tokens: Option<BTreeMap<IpAddr, String>>,
    /// An offset applied to each member's index when deriving tokens.
    #[serde(default)]
    pub token_index: Option<i64>,
    /// The cron day of week on which repairs run.
    #[serde(default)]
    pub repair_day: Option<u8>,
    /// The keyspace to repair; all keyspaces when absent.
    #[serde(default)]
    pub repair_keyspace: Option<String>,
    /// Explicit overrides, a document with optional `server` & `service` keys.
    #[serde(default = "PlanConfig::default_overrides")]
    pub overrides: Value,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            cluster_name: None,
            ram_fraction: Self::default_ram_fraction(),
            max_seeds: Self::default_max_seeds(),
            seeds: None,
            tokens: None,
            token_index: None,
            repair_day: None,
            repair_keyspace: None,
            overrides: Self::default_overrides(),
        }
    }
}

impl PlanConfig {
    /// Load the config from the given YAML file, applying environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).with_context(|| format!("error reading plan config {:?}", path))?;
        let mut config = Self::from_yaml_str(&yaml)?;
        config.apply_env(EnvOverrides::from_env()?);
        config.validate()?;
        Ok(config)
    }

    /// Parse the config from the given YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("error parsing plan config YAML")
    }

    /// Apply the given environment overrides to this config.
    pub fn apply_env(&mut self, env: EnvOverrides) {
        if let Some(version) = env.version {
            self.version = version;
        }
        if let Some(cluster_name) = env.cluster_name {
            self.cluster_name = Some(cluster_name);
        }
        if let Some(ram_fraction) = env.ram_fraction {
            self.ram_fraction = ram_fraction;
        }
        if let Some(max_seeds) = env.max_seeds {
            self.max_seeds = max_seeds;
        }
        if let Some(seeds) = env.seeds {
            self.seeds = Some(seeds);
        }
        if let Some(token_index) = env.token_index {
            self.token_index = Some(token_index);
        }
        if let Some(repair_day) = env.repair_day {
            self.repair_day = Some(repair_day);
        }
        if let Some(repair_keyspace) = env.repair_keyspace {
            self.repair_keyspace = Some(repair_keyspace);
        }
    }

    /// Statically validate this config.
    pub fn validate(&self) -> Result<()> {
        self.parsed_version()?;
        validate_ram_fraction(self.ram_fraction)?;
        ensure!(
            self.max_seeds > 0,
            PlanError::PreconditionViolation("max_seeds must be greater than 0".into())
        );
        if let Some(seeds) = &self.seeds {
            ensure!(!seeds.is_empty(), PlanError::InvalidInput("an explicit seed list may not be empty".into()));
        }
        if let Some(tokens) = &self.tokens {
            for token in tokens.values() {
                parse_token(token)?;
            }
        }
        if let Some(day) = self.repair_day {
            validate_repair_day(day)?;
        }
        if let Some(keyspace) = &self.repair_keyspace {
            validate_keyspace(keyspace)?;
        }
        Ok(())
    }

    /// The configured version, parsed.
    pub fn parsed_version(&self) -> Result<CassandraVersion> {
        self.version.parse()
    }

    fn default_version() -> String {
        DEFAULT_VERSION.into()
    }

    fn default_ram_fraction() -> f64 {
        DEFAULT_RAM_FRACTION
    }

    fn default_max_seeds() -> usize {
        DEFAULT_MAX_SEEDS
    }

    fn default_overrides() -> Value {
        Value::Null
    }
}

/// Plan config values which may be overridden from the environment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct EnvOverrides {
    pub version: Option<String>,
    pub cluster_name: Option<String>,
    pub ram_fraction: Option<f64>,
    pub max_seeds: Option<usize>,
    /// Comma-separated.
    pub seeds: Option<Vec<String>>,
    pub token_index: Option<i64>,
    pub repair_day: Option<u8>,
    pub repair_keyspace: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("error building plan config overrides from env")
    }
}
