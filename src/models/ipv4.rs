//! IPv4 network blocks in CIDR notation.
//!
//! Provides [`NetworkBlock`] along with the bit helpers the partitioner
//! builds on.

use crate::error::PlanError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Longest prefix a planned subnet may have: 4 addresses, network and
/// broadcast reserved, at least one usable host.
pub const MAX_SUBNET_PREFIX: u8 = 30;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use subnet_planner::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, PlanError> {
    if len > MAX_LENGTH {
        Err(PlanError::InvalidNetworkBlock(format!(
            "prefix /{len} is longer than /{MAX_LENGTH}"
        )))
    } else {
        let right_len = MAX_LENGTH - len;
        // u64 so that a /0 shift by 32 stays defined
        let all_bits = u32::MAX as u64;
        let mask = (all_bits >> right_len) << right_len;
        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, PlanError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Number of usable host addresses in a subnet of the given prefix.
///
/// Network and broadcast addresses are reserved, so anything longer
/// than /30 is rejected.
pub fn num_usable_hosts(len: u8) -> Result<u64, PlanError> {
    if len > MAX_SUBNET_PREFIX {
        Err(PlanError::InvalidNetworkBlock(format!(
            "prefix /{len} leaves no usable hosts"
        )))
    } else {
        Ok((1u64 << (MAX_LENGTH - len)) - 2)
    }
}

/// An IPv4 network: base address plus prefix length.
///
/// The base address is always a network address; host bits are cleared
/// on construction.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct NetworkBlock {
    /// The network (base) address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub prefix: u8,
}

impl NetworkBlock {
    /// Parse a CIDR string such as `"10.0.0.0/16"`.
    ///
    /// A base address with host bits set is normalized to its network
    /// address.
    pub fn new(addr_cidr: &str) -> Result<NetworkBlock, PlanError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, prefix) = addr_cidr
            .split_once('/')
            .ok_or_else(|| PlanError::InvalidNetworkBlock(format!("missing prefix: {addr_cidr}")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| PlanError::InvalidNetworkBlock(format!("invalid address: {addr_cidr}")))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| PlanError::InvalidNetworkBlock(format!("invalid prefix: {addr_cidr}")))?;
        NetworkBlock::from_parts(addr, prefix)
    }

    /// Build a block from an address and prefix, clearing host bits.
    pub fn from_parts(addr: Ipv4Addr, prefix: u8) -> Result<NetworkBlock, PlanError> {
        let network = cut_addr(addr, prefix)?;
        if network != addr {
            log::warn!("Normalized {addr}/{prefix} to network address {network}/{prefix}");
        }
        Ok(NetworkBlock {
            addr: network,
            prefix,
        })
    }

    /// Subnet mask of this block.
    pub fn netmask(&self) -> Ipv4Addr {
        // prefix <= 32 holds for every constructed block
        Ipv4Addr::from(get_cidr_mask(self.prefix).unwrap_or(u32::MAX))
    }

    /// Total number of addresses in the block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    /// Lowest (network) address.
    pub fn lo(&self) -> Ipv4Addr {
        self.addr
    }

    /// Highest (broadcast) address.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !u32::from(self.netmask()))
    }

    /// Usable host count, `None` for blocks longer than /30.
    pub fn usable_hosts(&self) -> Option<u64> {
        num_usable_hosts(self.prefix).ok()
    }

    /// True if `ip` lies inside the block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.lo() <= ip && ip <= self.hi()
    }

    /// True if `other` lies entirely inside this block.
    pub fn contains_block(&self, other: &NetworkBlock) -> bool {
        self.prefix <= other.prefix && self.contains(other.lo()) && self.contains(other.hi())
    }

    /// True if the two blocks share any address.
    pub fn overlaps(&self, other: &NetworkBlock) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }
}

impl FromStr for NetworkBlock {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkBlock::new(s)
    }
}

impl std::fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl Serialize for NetworkBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkBlock {
    fn deserialize<D>(deserializer: D) -> Result<NetworkBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NetworkBlock::new(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(30).unwrap(), 0xFFFFFFFC);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(cut_addr(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(cut_addr(ip, 16).unwrap(), Ipv4Addr::new(192, 168, 0, 0));
        assert_eq!(cut_addr(ip, 0).unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(cut_addr(ip, 32).unwrap(), ip);
        assert!(cut_addr(ip, 33).is_err());
    }

    #[test]
    fn test_hi_is_broadcast() {
        let block = NetworkBlock::new("10.0.64.0/18").unwrap();
        assert_eq!(block.netmask(), Ipv4Addr::new(255, 255, 192, 0));
        assert_eq!(block.hi(), Ipv4Addr::new(10, 0, 127, 255));
        assert_eq!(
            NetworkBlock::new("255.255.255.0/24").unwrap().hi(),
            Ipv4Addr::new(255, 255, 255, 255)
        );
        assert_eq!(NetworkBlock::new("0.0.0.0/0").unwrap().hi(), Ipv4Addr::BROADCAST);
        let host = NetworkBlock::new("10.1.2.3/32").unwrap();
        assert_eq!(host.hi(), host.lo());
    }

    #[test]
    fn test_num_usable_hosts() {
        assert_eq!(num_usable_hosts(0).unwrap(), 4294967294);
        assert_eq!(num_usable_hosts(16).unwrap(), 65534);
        assert_eq!(num_usable_hosts(24).unwrap(), 254);
        assert_eq!(num_usable_hosts(30).unwrap(), 2);
        assert!(num_usable_hosts(31).is_err());
    }

    #[test]
    fn test_new_valid() {
        let block = NetworkBlock::new(" 10.0.0.0/16 ").unwrap();
        assert_eq!(block.addr, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(block.prefix, 16);
        assert_eq!(block.to_string(), "10.0.0.0/16");
        assert_eq!(block.netmask(), Ipv4Addr::new(255, 255, 0, 0));
        assert_eq!(block.hi(), Ipv4Addr::new(10, 0, 255, 255));
        assert_eq!(block.size(), 65536);
    }

    #[test]
    fn test_new_normalizes_host_bits() {
        let block = NetworkBlock::new("10.0.3.7/16").unwrap();
        assert_eq!(block, NetworkBlock::new("10.0.0.0/16").unwrap());
    }

    #[test]
    fn test_new_invalid() {
        for bad in [
            "10.0.0/16",
            "10.0.0.0/33",
            "10.0.0.256/16",
            "10.0.0.0",
            "10.0.0.0/",
            "10.0.0.0/-1",
            "10.0.0.0.0/8",
            "ten.0.0.0/8",
        ] {
            match NetworkBlock::new(bad) {
                Err(PlanError::InvalidNetworkBlock(_)) => {}
                other => panic!("{bad} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_overlap_and_contains() {
        let vpc = NetworkBlock::new("10.0.0.0/16").unwrap();
        let a = NetworkBlock::new("10.0.0.0/18").unwrap();
        let b = NetworkBlock::new("10.0.64.0/18").unwrap();
        let outside = NetworkBlock::new("10.1.0.0/18").unwrap();

        assert!(vpc.contains_block(&a));
        assert!(vpc.contains_block(&b));
        assert!(!vpc.contains_block(&outside));
        assert!(!a.contains_block(&vpc));
        assert!(!a.overlaps(&b));
        assert!(vpc.overlaps(&a));
        assert!(a < b);
    }

    #[test]
    fn test_serde_round_trip() {
        let block = NetworkBlock::new("172.16.0.0/12").unwrap();
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, "\"172.16.0.0/12\"");
        let back: NetworkBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
        assert!(serde_json::from_str::<NetworkBlock>("\"172.16.0.0/40\"").is_err());
    }
}
