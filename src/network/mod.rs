//! Port-level connectivity graph.
//!
//! The grid never touches samples. What it manipulates are *ports*: the input
//! and output terminals of blocks, the junctions that merge signal inside a
//! cell, and one destination port standing for the final audio output. This
//! module owns those ports and the directed edges between them.
//!
//! Port ids are handed out monotonically and never reused, so an edge recorded
//! against a released port can be disconnected later without ever hitting a
//! newer port that happens to share its slot.

use std::collections::VecDeque;
use std::fmt;

use crate::error::NetworkError;

/// Handle to a port in a [`Network`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(u32);

impl PortId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        PortId(raw)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a port is used for. Purely descriptive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// Summing point inside a grid cell
    Junction,
    /// Input terminal of a block
    BlockInput,
    /// Output terminal of a block
    BlockOutput,
    /// Final output of the whole network
    Destination,
}

#[derive(Debug)]
struct Port {
    role: PortRole,
    outgoing: Vec<PortId>,
    incoming: Vec<PortId>,
}

/// Arena of ports plus the edges between them.
#[derive(Debug)]
pub struct Network {
    ports: Vec<Option<Port>>,
    destination: PortId,
    edge_count: usize,
}

impl Network {
    pub fn new() -> Self {
        let mut network = Self {
            ports: Vec::new(),
            destination: PortId(0),
            edge_count: 0,
        };
        network.destination = network.add_port(PortRole::Destination);
        network
    }

    /// Port every sink block feeds into.
    pub fn destination(&self) -> PortId {
        self.destination
    }

    pub fn add_port(&mut self, role: PortRole) -> PortId {
        let id = PortId(self.ports.len() as u32);
        self.ports.push(Some(Port {
            role,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        id
    }

    pub fn contains(&self, port: PortId) -> bool {
        self.port(port).is_some()
    }

    pub fn role(&self, port: PortId) -> Option<PortRole> {
        self.port(port).map(|p| p.role)
    }

    /// Connect `from`'s output into `to`'s input.
    ///
    /// Returns `Ok(true)` if a new edge was created and `Ok(false)` if the edge
    /// already existed. Connecting twice never creates a duplicate edge.
    pub fn connect(&mut self, from: PortId, to: PortId) -> Result<bool, NetworkError> {
        if !self.contains(from) {
            return Err(NetworkError::UnknownPort(from));
        }
        if !self.contains(to) {
            return Err(NetworkError::UnknownPort(to));
        }
        if self.is_connected(from, to) {
            return Ok(false);
        }

        if let Some(port) = self.port_mut(from) {
            port.outgoing.push(to);
        }
        if let Some(port) = self.port_mut(to) {
            port.incoming.push(from);
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Remove the edge `from -> to`. Returns whether an edge was removed;
    /// unknown ports and missing edges are a no-op.
    pub fn disconnect(&mut self, from: PortId, to: PortId) -> bool {
        if !self.is_connected(from, to) {
            return false;
        }
        if let Some(port) = self.port_mut(from) {
            port.outgoing.retain(|p| *p != to);
        }
        if let Some(port) = self.port_mut(to) {
            port.incoming.retain(|p| *p != from);
        }
        self.edge_count -= 1;
        true
    }

    /// Remove every edge leaving `from`.
    pub fn disconnect_all(&mut self, from: PortId) {
        let targets = match self.port(from) {
            Some(port) => port.outgoing.clone(),
            None => return,
        };
        for to in targets {
            self.disconnect(from, to);
        }
    }

    /// Drop every edge touching `port` and free it. Safe to call repeatedly.
    pub fn release(&mut self, port: PortId) {
        let sources = match self.port(port) {
            Some(p) => p.incoming.clone(),
            None => return,
        };
        for from in sources {
            self.disconnect(from, port);
        }
        self.disconnect_all(port);
        if let Some(entry) = self.ports.get_mut(port.index()) {
            *entry = None;
        }
    }

    pub fn is_connected(&self, from: PortId, to: PortId) -> bool {
        self.port(from)
            .map(|p| p.outgoing.contains(&to))
            .unwrap_or(false)
    }

    pub fn outgoing(&self, port: PortId) -> &[PortId] {
        self.port(port).map(|p| p.outgoing.as_slice()).unwrap_or(&[])
    }

    pub fn incoming(&self, port: PortId) -> &[PortId] {
        self.port(port).map(|p| p.incoming.as_slice()).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of live (unreleased) ports, destination included.
    pub fn port_count(&self) -> usize {
        self.ports.iter().flatten().count()
    }

    /// All edges as `(from, to)` pairs, ordered by source port.
    pub fn edges(&self) -> Vec<(PortId, PortId)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (idx, port) in self.ports.iter().enumerate() {
            if let Some(port) = port {
                for &to in &port.outgoing {
                    edges.push((PortId(idx as u32), to));
                }
            }
        }
        edges
    }

    /// Whether signal leaving `from` can arrive at `to` along existing edges.
    pub fn reachable(&self, from: PortId, to: PortId) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        let mut visited = vec![false; self.ports.len()];
        let mut queue = VecDeque::new();
        visited[from.index()] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for &next in self.outgoing(current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Whether any port can reach itself.
    pub fn has_cycle(&self) -> bool {
        // Kahn's algorithm: anything left unvisited sits on a cycle
        let mut in_degree: Vec<usize> = self
            .ports
            .iter()
            .map(|p| p.as_ref().map(|p| p.incoming.len()).unwrap_or(0))
            .collect();
        let mut queue: VecDeque<PortId> = self
            .ports
            .iter()
            .enumerate()
            .filter(|(idx, p)| p.is_some() && in_degree[*idx] == 0)
            .map(|(idx, _)| PortId(idx as u32))
            .collect();

        let mut visited = 0;
        while let Some(current) = queue.pop_front() {
            visited += 1;
            for &next in self.outgoing(current) {
                in_degree[next.index()] -= 1;
                if in_degree[next.index()] == 0 {
                    queue.push_back(next);
                }
            }
        }
        visited != self.port_count()
    }

    fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.index()).and_then(|p| p.as_ref())
    }

    fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.get_mut(id.index()).and_then(|p| p.as_mut())
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_idempotent() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::BlockOutput);
        let b = net.add_port(PortRole::Junction);

        assert_eq!(net.connect(a, b), Ok(true));
        assert_eq!(net.connect(a, b), Ok(false));
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.outgoing(a), &[b]);
        assert_eq!(net.incoming(b), &[a]);
    }

    #[test]
    fn test_role_of_released_port_is_gone() {
        let mut net = Network::new();
        let j = net.add_port(PortRole::Junction);

        assert_eq!(net.role(net.destination()), Some(PortRole::Destination));
        assert_eq!(net.role(j), Some(PortRole::Junction));
        net.release(j);
        assert_eq!(net.role(j), None);
    }

    #[test]
    fn test_disconnect_missing_edge_is_noop() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::BlockOutput);
        let b = net.add_port(PortRole::Junction);

        assert!(!net.disconnect(a, b));
        net.connect(a, b).unwrap();
        assert!(net.disconnect(a, b));
        assert!(!net.disconnect(a, b));
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn test_connect_unknown_port_fails() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::BlockOutput);
        let b = net.add_port(PortRole::Junction);
        net.release(b);

        assert_eq!(net.connect(a, b), Err(NetworkError::UnknownPort(b)));
        assert_eq!(net.connect(b, a), Err(NetworkError::UnknownPort(b)));
    }

    #[test]
    fn test_release_drops_all_edges() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::BlockOutput);
        let j = net.add_port(PortRole::Junction);
        let c = net.add_port(PortRole::BlockInput);
        net.connect(a, j).unwrap();
        net.connect(j, c).unwrap();

        net.release(j);
        net.release(j); // twice is fine

        assert!(!net.contains(j));
        assert_eq!(net.edge_count(), 0);
        assert!(net.outgoing(a).is_empty());
        assert!(net.incoming(c).is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_release() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::Junction);
        net.release(a);
        let b = net.add_port(PortRole::Junction);
        assert_ne!(a, b);
        assert!(!net.contains(a));
    }

    #[test]
    fn test_disconnect_all_only_touches_outgoing() {
        let mut net = Network::new();
        let up = net.add_port(PortRole::BlockOutput);
        let j = net.add_port(PortRole::Junction);
        let d1 = net.add_port(PortRole::BlockInput);
        let d2 = net.add_port(PortRole::BlockInput);
        net.connect(up, j).unwrap();
        net.connect(j, d1).unwrap();
        net.connect(j, d2).unwrap();

        net.disconnect_all(j);

        assert!(net.is_connected(up, j));
        assert_eq!(net.edge_count(), 1);
    }

    #[test]
    fn test_reachable_follows_chains() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::BlockOutput);
        let j = net.add_port(PortRole::Junction);
        let dest = net.destination();
        net.connect(a, j).unwrap();

        assert!(!net.reachable(a, dest));
        net.connect(j, dest).unwrap();
        assert!(net.reachable(a, dest));
        assert!(!net.reachable(dest, a));
    }

    #[test]
    fn test_cycle_detection() {
        let mut net = Network::new();
        let a = net.add_port(PortRole::Junction);
        let b = net.add_port(PortRole::Junction);
        net.connect(a, b).unwrap();
        assert!(!net.has_cycle());

        net.connect(b, a).unwrap();
        assert!(net.has_cycle());
    }
}
