//! Cluster inventory snapshot.
//!
//! The inventory is supplied by an external collaborator once per planning pass and is never
//! mutated afterwards. Member order within a group is significant: it drives token placement,
//! seed selection and repair staggering.

use std::collections::HashSet;
use std::convert::TryFrom;
use std::net::IpAddr;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// The default datacenter name used for members which do not declare one.
pub const DEFAULT_DATACENTER: &str = "DC1";
/// The default rack name used for members which do not declare one.
pub const DEFAULT_RACK: &str = "RAC1";

/// A snapshot of all cluster members known to the orchestration layer.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Inventory {
    /// All groups of this inventory.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Inventory {
    /// Parse an inventory from the given YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let inventory: Self = serde_yaml::from_str(yaml).context("error parsing inventory YAML")?;
        inventory.validate()?;
        Ok(inventory)
    }

    /// Statically validate every group of this inventory.
    pub fn validate(&self) -> Result<()> {
        self.groups.iter().try_for_each(Group::validate)
    }

    /// Get the target group by name.
    pub fn group(&self, name: &str) -> Result<&Group> {
        match self.groups.iter().find(|group| group.name == name) {
            Some(group) => Ok(group),
            None => bail!(PlanError::UnknownGroup(name.into())),
        }
    }
}

/// A named, ordered set of cluster members sharing a role.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Group {
    /// The name of this group.
    pub name: String,
    /// The members of this group, in inventory order.
    #[serde(default)]
    pub members: Vec<ClusterMember>,
}

impl Group {
    /// The number of members in this group.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get the target member of this group by ID.
    pub fn member(&self, id: &str) -> Result<&ClusterMember> {
        match self.members.iter().find(|member| member.id() == id) {
            Some(member) => Ok(member),
            None => bail!(PlanError::UnknownMember(id.into())),
        }
    }

    /// Statically validate this group.
    ///
    /// Member IDs and primary IPs must be unique within the group.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut ips = HashSet::new();
        for member in self.members.iter() {
            ensure!(
                ids.insert(member.id()),
                PlanError::InvalidInput(format!("group `{}` declares member `{}` more than once", self.name, member.id()))
            );
            ensure!(
                ips.insert(member.primary_ip()),
                PlanError::InvalidInput(format!(
                    "member `{}` of group `{}` shares primary IP {} with another member",
                    member.id(),
                    self.name,
                    member.primary_ip()
                ))
            );
        }
        Ok(())
    }

    /// Get the index of the target member within this group.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.members.iter().position(|member| member.id() == id)
    }
}

/// One deployment target of the cluster.
///
/// At least one of the public or private IPs is always present.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(try_from = "RawClusterMember")]
pub struct ClusterMember {
    id: String,
    public_ip: Option<IpAddr>,
    private_ip: Option<IpAddr>,
    memory_bytes: u64,
    provider: Option<String>,
    datacenter: String,
    rack: String,
}

impl ClusterMember {
    /// Create a new instance.
    ///
    /// Fails if neither a public nor a private IP is given.
    pub fn new(id: impl Into<String>, public_ip: Option<IpAddr>, private_ip: Option<IpAddr>, memory_bytes: u64) -> Result<Self> {
        let id = id.into();
        if public_ip.is_none() && private_ip.is_none() {
            bail!(PlanError::InvalidInput(format!("cluster member `{}` must have a public or private IP", id)));
        }
        Ok(Self {
            id,
            public_ip,
            private_ip,
            memory_bytes,
            provider: None,
            datacenter: DEFAULT_DATACENTER.into(),
            rack: DEFAULT_RACK.into(),
        })
    }

    /// Set the cloud provider tag of this member.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the datacenter & rack of this member.
    pub fn with_location(mut self, datacenter: impl Into<String>, rack: impl Into<String>) -> Self {
        self.datacenter = datacenter.into();
        self.rack = rack.into();
        self
    }

    /// The stable identity of this member.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The public IP of this member, if any.
    pub fn public_ip(&self) -> Option<IpAddr> {
        self.public_ip
    }

    /// The private IP of this member, if any.
    pub fn private_ip(&self) -> Option<IpAddr> {
        self.private_ip
    }

    /// The primary IP of this member: public, falling back to private.
    pub fn primary_ip(&self) -> IpAddr {
        // Construction guarantees that one of the two is present.
        self.public_ip.or(self.private_ip).unwrap_or(IpAddr::from([0, 0, 0, 0]))
    }

    /// The private IP of this member, falling back to the primary IP.
    pub fn private_or_primary_ip(&self) -> IpAddr {
        self.private_ip.unwrap_or_else(|| self.primary_ip())
    }

    /// The total installed memory of this member in bytes.
    pub fn memory_bytes(&self) -> u64 {
        self.memory_bytes
    }

    /// The cloud provider tag of this member, if any.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// The datacenter of this member.
    pub fn datacenter(&self) -> &str {
        &self.datacenter
    }

    /// The rack of this member.
    pub fn rack(&self) -> &str {
        &self.rack
    }
}

/// The wire form of a cluster member, validated into a `ClusterMember`.
#[derive(Deserialize)]
struct RawClusterMember {
    id: String,
    #[serde(default)]
    public_ip: Option<IpAddr>,
    #[serde(default)]
    private_ip: Option<IpAddr>,
    memory_bytes: u64,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    datacenter: Option<String>,
    #[serde(default)]
    rack: Option<String>,
}

impl TryFrom<RawClusterMember> for ClusterMember {
    type Error = PlanError;

    fn try_from(raw: RawClusterMember) -> Result<Self, Self::Error> {
        if raw.public_ip.is_none() && raw.private_ip.is_none() {
            return Err(PlanError::InvalidInput(format!("cluster member `{}` must have a public or private IP", raw.id)));
        }
        Ok(Self {
            id: raw.id,
            public_ip: raw.public_ip,
            private_ip: raw.private_ip,
            memory_bytes: raw.memory_bytes,
            provider: raw.provider,
            datacenter: raw.datacenter.unwrap_or_else(|| DEFAULT_DATACENTER.into()),
            rack: raw.rack.unwrap_or_else(|| DEFAULT_RACK.into()),
        })
    }
}
