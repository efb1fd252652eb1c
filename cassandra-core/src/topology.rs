//! Topology resolution.
//!
//! The endpoint snitch and the RPC address selection strategy are both functions of a member's
//! cloud provider tag. Both are stored together in one `ProviderStrategy` entry so that a single
//! registry lookup always yields a consistent pair.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inventory::ClusterMember;

/// The snitch used when no provider-specific strategy applies.
pub const SNITCH_SIMPLE: &str = "SimpleSnitch";
/// The snitch used for members running on EC2.
pub const SNITCH_EC2: &str = "Ec2Snitch";
/// The provider tag of EC2 members.
pub const PROVIDER_EC2: &str = "ec2";
/// The bind-all address.
pub const BIND_ALL_ADDRESS: &str = "0.0.0.0";

/// The strategy used for selecting a member's RPC address.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RpcAddressMode {
    /// The primary IP, falling back to the private IP.
    Public,
    /// The private IP, falling back to the primary IP.
    Private,
    /// Bind on all interfaces.
    All,
}

impl fmt::Display for RpcAddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Public => "public",
                Self::Private => "private",
                Self::All => "all",
            }
        )
    }
}

/// Provider-specific topology strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderStrategy {
    /// The endpoint snitch class name.
    pub endpoint_snitch: String,
    /// The RPC address selection mode.
    pub rpc_address_mode: RpcAddressMode,
}

impl ProviderStrategy {
    /// Create a new instance.
    pub fn new(endpoint_snitch: impl Into<String>, rpc_address_mode: RpcAddressMode) -> Self {
        Self {
            endpoint_snitch: endpoint_snitch.into(),
            rpc_address_mode,
        }
    }
}

/// The addresses & snitch chosen for a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyChoice {
    pub listen_address: String,
    pub rpc_address: String,
    pub endpoint_snitch: String,
}

/// A registry of topology strategies keyed by provider tag.
///
/// The registry always holds a default strategy, which is used for members without a provider
/// tag and for tags which have not been registered.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
    default: ProviderStrategy,
    providers: HashMap<String, ProviderStrategy>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let mut registry = Self::with_default(ProviderStrategy::new(SNITCH_SIMPLE, RpcAddressMode::Public));
        registry.register(PROVIDER_EC2, ProviderStrategy::new(SNITCH_EC2, RpcAddressMode::Private));
        registry
    }
}

impl ProviderRegistry {
    /// Create an empty registry with the given default strategy.
    pub fn with_default(default: ProviderStrategy) -> Self {
        Self {
            default,
            providers: HashMap::new(),
        }
    }

    /// Register a strategy for the given provider tag, returning any strategy it replaces.
    pub fn register(&mut self, tag: impl Into<String>, strategy: ProviderStrategy) -> Option<ProviderStrategy> {
        self.providers.insert(tag.into(), strategy)
    }

    /// Look up the strategy for the given provider tag.
    pub fn strategy(&self, tag: Option<&str>) -> &ProviderStrategy {
        match tag {
            Some(tag) => match self.providers.get(tag) {
                Some(strategy) => strategy,
                None => {
                    tracing::debug!(provider = tag, "unrecognized provider, using default topology strategy");
                    &self.default
                }
            },
            None => &self.default,
        }
    }

    /// Resolve the endpoint snitch for the given provider tag.
    pub fn resolve_snitch(&self, tag: Option<&str>) -> &str {
        &self.strategy(tag).endpoint_snitch
    }

    /// Resolve the RPC address mode for the given provider tag.
    pub fn resolve_rpc_address_mode(&self, tag: Option<&str>) -> RpcAddressMode {
        self.strategy(tag).rpc_address_mode
    }

    /// Resolve the full topology choice for the given member.
    pub fn resolve_topology(&self, member: &ClusterMember) -> TopologyChoice {
        let strategy = self.strategy(member.provider());
        TopologyChoice {
            listen_address: resolve_listen_address(member),
            rpc_address: resolve_address(strategy.rpc_address_mode, member),
            endpoint_snitch: strategy.endpoint_snitch.clone(),
        }
    }
}

/// Resolve the address of the given member according to the given mode.
pub fn resolve_address(mode: RpcAddressMode, member: &ClusterMember) -> String {
    match mode {
        RpcAddressMode::Public => member.primary_ip().to_string(),
        RpcAddressMode::Private => member.private_or_primary_ip().to_string(),
        RpcAddressMode::All => BIND_ALL_ADDRESS.into(),
    }
}

/// Resolve the listen address of the given member: private IP if present, else primary IP.
pub fn resolve_listen_address(member: &ClusterMember) -> String {
    member.private_or_primary_ip().to_string()
}

/// Render the property-file snitch topology for the given members.
///
/// One `IP=datacenter:rack` line per member, in the given order.
pub fn render_topology_properties(members: &[ClusterMember]) -> String {
    members
        .iter()
        .map(|member| format!("{}={}:{}", member.private_or_primary_ip(), member.datacenter(), member.rack()))
        .collect::<Vec<_>>()
        .join("\n")
}
