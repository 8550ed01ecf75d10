//! Drawnet Core Types and Definitions
//!
//! This crate provides the foundational types shared by the drawnet
//! extraction engine and its generators:
//!
//! - **Identifiers**: Interned diagram cell identifiers ([`identifier::CellId`])
//!   and arena indices ([`identifier::ElementIndex`])
//! - **Subnets**: Strict CIDR parsing with positional placeholders ([`subnet`] module)
//! - **Topology**: Routers, links, networks and the [`topology::NetworkSegment`]
//!   capability ([`topology`] module)

pub mod identifier;
pub mod subnet;
pub mod topology;
