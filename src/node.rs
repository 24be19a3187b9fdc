// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// Node number within a FINS network.
pub type NodeId = u8;

/// Logical address of a device on a FINS network.
///
/// Every node is identified by a network number (0 = local network), a node
/// number within that network and a unit number within the node (0 = CPU
/// unit). All three are transmitted as single bytes in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAddress {
    /// Network address (0 = local network).
    pub network: u8,
    /// Node address within the network.
    pub node: NodeId,
    /// Unit address within the node (0 = CPU unit).
    pub unit: u8,
}

impl NodeAddress {
    /// Creates a new node address.
    #[must_use]
    pub const fn new(network: u8, node: NodeId, unit: u8) -> Self {
        Self {
            network,
            node,
            unit,
        }
    }

    /// The CPU unit of `node` on the local network.
    #[must_use]
    pub const fn cpu(node: NodeId) -> Self {
        Self::new(0, node, 0)
    }
}

impl Default for NodeAddress {
    /// Node `0x01` on the local network, the conventional default for
    /// directly connected controllers.
    fn default() -> Self {
        Self::cpu(0x01)
    }
}

impl From<NodeId> for NodeAddress {
    fn from(node: NodeId) -> Self {
        Self::cpu(node)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.network, self.node, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_node_address() {
        let addr = NodeAddress::cpu(10);
        assert_eq!(addr.network, 0);
        assert_eq!(addr.node, 10);
        assert_eq!(addr.unit, 0);
    }

    #[test]
    fn default_node_address() {
        assert_eq!(NodeAddress::default(), NodeAddress::new(0, 0x01, 0));
    }

    #[test]
    fn display_node_address() {
        assert_eq!(NodeAddress::new(1, 20, 0).to_string(), "1.20.0");
    }
}
