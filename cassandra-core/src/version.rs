//! Built-in engine defaults per Cassandra release line.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error, Result};
use lazy_static::lazy_static;
use maplit::btreemap;
use regex::Regex;
use serde_yaml::{Number, Value};

use crate::error::PlanError;
use crate::settings::{yaml_mapping, yaml_string, KEY_SERVER, KEY_SERVICE};

/// The release line used when no version is configured.
pub const DEFAULT_VERSION: &str = "1.2.19";

lazy_static! {
    /// Regular expression used to parse version strings.
    static ref RE_VERSION: Regex = Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").expect("failed to compile RE_VERSION regex");
}

/// A Cassandra version, `major.minor[.patch]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CassandraVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl CassandraVersion {
    /// Create a new instance.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// The release line of this version, e.g. `(1, 2)`.
    pub fn release_line(&self) -> (u32, u32) {
        (self.major, self.minor)
    }
}

impl FromStr for CassandraVersion {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self> {
        let caps = match RE_VERSION.captures(val.trim()) {
            Some(caps) => caps,
            None => bail!(PlanError::InvalidInput(format!(
                "version `{}` is invalid, must match the pattern `{}`",
                val,
                RE_VERSION.as_str()
            ))),
        };
        let part = |idx: usize| -> Result<u32> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| PlanError::InvalidInput(format!("version component `{}` of `{}` is out of range", m.as_str(), val)).into()),
                None => Ok(0),
            }
        };
        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl fmt::Display for CassandraVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Build the engine & service defaults for the given version.
///
/// The returned document has `server` & `service` keys and is meant to be merged above the
/// computed topology values and below user overrides.
pub fn version_defaults(version: &CassandraVersion) -> Value {
    let mut server = btreemap! {
        "cluster_name" => yaml_string("Test Cluster"),
        // The token allocator computes tokens on the RandomPartitioner ring.
        "partitioner" => yaml_string("org.apache.cassandra.dht.RandomPartitioner"),
        "data_file_directories" => Value::Sequence(vec![yaml_string("/var/lib/cassandra/data")]),
        "commitlog_directory" => yaml_string("/var/lib/cassandra/commitlog"),
        "saved_caches_directory" => yaml_string("/var/lib/cassandra/saved_caches"),
        "commitlog_sync" => yaml_string("periodic"),
        "commitlog_sync_period_in_ms" => number(10_000),
        "storage_port" => number(7000),
        "ssl_storage_port" => number(7001),
        "rpc_port" => number(9160),
        "start_rpc" => Value::Bool(true),
        "rpc_server_type" => yaml_string("sync"),
        "auto_bootstrap" => Value::Bool(true),
    };
    let service = btreemap! {
        "jmx_port" => number(7199),
    };

    match version.release_line() {
        (0, _) | (1, 0) | (1, 1) => {
            server.insert("thrift_framed_transport_size_in_mb", number(15));
            server.insert("memtable_flush_queue_size", number(4));
        }
        (1, 2) => {
            server.insert("start_native_transport", Value::Bool(false));
            server.insert("native_transport_port", number(9042));
            server.insert("thrift_framed_transport_size_in_mb", number(15));
        }
        _ => {
            server.insert("start_native_transport", Value::Bool(true));
            server.insert("native_transport_port", number(9042));
            server.insert("rpc_server_type", yaml_string("hsha"));
        }
    }
    tracing::debug!(%version, "built version defaults");

    yaml_mapping(btreemap! {
        KEY_SERVER => yaml_mapping(server),
        KEY_SERVICE => yaml_mapping(service),
    })
}

fn number(val: u64) -> Value {
    Value::Number(Number::from(val))
}
