use std::net::IpAddr;

use crate::inventory::{ClusterMember, Group};

/// 8 GiB, the memory given to all fixture members.
pub const FIXTURE_MEMORY_BYTES: u64 = 8 * 1024 * 1024 * 1024;

/// Build a member with both a public & private IP, derived from the given offset.
pub fn member(offset: u8) -> ClusterMember {
    ClusterMember::new(
        format!("node-{}", offset),
        Some(public_ip(offset)),
        Some(private_ip(offset)),
        FIXTURE_MEMORY_BYTES,
    )
    .expect("fixture member must be valid")
}

/// Build a member with only a public IP.
pub fn public_only_member(offset: u8) -> ClusterMember {
    ClusterMember::new(format!("node-{}", offset), Some(public_ip(offset)), None, FIXTURE_MEMORY_BYTES).expect("fixture member must be valid")
}

/// Build a member with only a private IP.
pub fn private_only_member(offset: u8) -> ClusterMember {
    ClusterMember::new(format!("node-{}", offset), None, Some(private_ip(offset)), FIXTURE_MEMORY_BYTES).expect("fixture member must be valid")
}

/// Build a group of `count` members with both IPs populated.
pub fn group(name: &str, count: u8) -> Group {
    Group {
        name: name.into(),
        members: (0..count).map(member).collect(),
    }
}

/// The public IP used for the fixture member at the given offset.
pub fn public_ip(offset: u8) -> IpAddr {
    IpAddr::from([54, 0, 0, offset])
}

/// The private IP used for the fixture member at the given offset.
pub fn private_ip(offset: u8) -> IpAddr {
    IpAddr::from([10, 0, 0, offset])
}
