//! CIDR blocks and positional subnet slots.
//!
//! Links and networks carry an ordered list of [`SubnetSlot`]s parsed from their
//! diagram label. Tokens that are not valid CIDR blocks stay in the list as
//! [`SubnetSlot::Unparseable`] so that positions line up across dual-stack
//! entries; consumers skip them when emitting address configuration.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use thiserror::Error;

/// Errors produced while parsing a CIDR block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    #[error("invalid address `{0}`")]
    Address(String),

    #[error("invalid prefix length `{0}`")]
    Prefix(String),

    #[error("prefix length {prefix} exceeds {max} for this address family")]
    PrefixTooLong { prefix: u8, max: u8 },

    #[error("`{0}` has host bits set")]
    HostBitsSet(String),
}

/// An IPv4 or IPv6 network in CIDR notation.
///
/// Parsing is strict: an address with bits set below the prefix is rejected.
/// A bare address without `/prefix` denotes a single-host network.
///
/// # Examples
///
/// ```
/// use drawnet_core::subnet::Cidr;
///
/// let cidr: Cidr = "10.0.0.0/30".parse().unwrap();
/// assert_eq!(cidr.prefix(), 30);
/// assert_eq!(cidr.to_string(), "10.0.0.0/30");
///
/// assert!("10.0.0.1/30".parse::<Cidr>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    addr: IpAddr,
    prefix: u8,
}

impl Cidr {
    /// Returns the network address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Returns the prefix length.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Returns `true` for IPv6 networks.
    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }
}

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn host_bits_clear(addr: &IpAddr, prefix: u8) -> bool {
    match addr {
        IpAddr::V4(v4) => {
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            u32::from(*v4) & !mask == 0
        }
        IpAddr::V6(v6) => {
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            u128::from(*v6) & !mask == 0
        }
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_part, prefix_part) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = if addr_part.contains(':') {
            addr_part.parse::<Ipv6Addr>().map(IpAddr::V6)
        } else {
            addr_part.parse::<Ipv4Addr>().map(IpAddr::V4)
        }
        .map_err(|_| CidrError::Address(addr_part.to_string()))?;

        let max = max_prefix(&addr);
        let prefix = match prefix_part {
            Some(p) => p
                .parse::<u8>()
                .map_err(|_| CidrError::Prefix(p.to_string()))?,
            None => max,
        };
        if prefix > max {
            return Err(CidrError::PrefixTooLong { prefix, max });
        }
        if !host_bits_clear(&addr, prefix) {
            return Err(CidrError::HostBitsSet(s.to_string()));
        }

        Ok(Self { addr, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// One positional entry of a subnet list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetSlot {
    /// A successfully parsed block.
    Parsed(Cidr),
    /// A token that failed to parse, kept for positional alignment.
    Unparseable(String),
}

impl SubnetSlot {
    /// Returns the parsed block, if any.
    pub fn cidr(&self) -> Option<&Cidr> {
        match self {
            SubnetSlot::Parsed(cidr) => Some(cidr),
            SubnetSlot::Unparseable(_) => None,
        }
    }

    /// Returns `true` if this slot is a placeholder.
    pub fn is_unparseable(&self) -> bool {
        matches!(self, SubnetSlot::Unparseable(_))
    }
}

/// Splits a label on commas and parses every token as a CIDR block.
///
/// A blank label yields no slots. Otherwise every token gets a slot, empty
/// tokens included, so positions match the label.
///
/// # Examples
///
/// ```
/// use drawnet_core::subnet::{SubnetSlot, parse_subnet_list};
///
/// let slots = parse_subnet_list("10.0.0.0/30, not-a-cidr");
/// assert_eq!(slots.len(), 2);
/// assert!(slots[1].is_unparseable());
/// ```
pub fn parse_subnet_list(label: &str) -> Vec<SubnetSlot> {
    if label.trim().is_empty() {
        return Vec::new();
    }
    label
        .split(',')
        .map(str::trim)
        .map(|token| match token.parse::<Cidr>() {
            Ok(cidr) => SubnetSlot::Parsed(cidr),
            Err(_) => SubnetSlot::Unparseable(token.to_string()),
        })
        .collect()
}
