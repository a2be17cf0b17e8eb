//! Search graph: nodes, typed links and the arena that owns both.
//!
//! Nodes and links reference each other by index only. Ko links close real
//! cycles, so nothing here owns anything else: the [`NodeStore`] holds every
//! node and link for the lifetime of a solve.

use std::fmt;

use crate::board::{Color, Point};
use crate::pool::EntryId;
use crate::transform::Transform;

pub type NodeId = usize;
pub type LinkId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place { x: usize, y: usize },
    Pass,
    /// Root of a tree started from a set-up position.
    EditBoard,
    /// Root of a tree started from the empty board.
    GameInit,
    /// Second consecutive pass.
    GameEnd,
}

impl Move {
    pub fn point(&self) -> Option<Point> {
        match *self {
            Move::Place { x, y } => Some((x, y)),
            _ => None,
        }
    }

    /// Same move on a board seen through `t`.
    pub fn transformed(&self, t: Transform, width: usize, height: usize) -> Move {
        match *self {
            Move::Place { x, y } => {
                let (x, y) = t.apply((x, y), width, height);
                Move::Place { x, y }
            }
            other => other,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place { x, y } => write!(f, "({x},{y})"),
            Move::Pass => write!(f, "pass"),
            Move::EditBoard => write!(f, "edit"),
            Move::GameInit => write!(f, "init"),
            Move::GameEnd => write!(f, "end"),
        }
    }
}

/// Edge type, with the transform carried when the child's orientation
/// differs from the board the move produced.
///
/// `Init` anchors the root (its `from` and `to` are the root itself) and
/// `End` leads from an after-pass node to the terminal node of a double pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Simple,
    WithTransform(Transform),
    KoSimple {
        resolved: bool,
    },
    KoWithTransform {
        transform: Transform,
        resolved: bool,
    },
    Init,
    End,
}

impl LinkKind {
    /// Ordinary link, carrying `t` only when it is not the identity.
    pub fn ordinary(t: Transform) -> Self {
        if t.is_identity() {
            LinkKind::Simple
        } else {
            LinkKind::WithTransform(t)
        }
    }

    pub fn ko(t: Transform, resolved: bool) -> Self {
        if t.is_identity() {
            LinkKind::KoSimple { resolved }
        } else {
            LinkKind::KoWithTransform {
                transform: t,
                resolved,
            }
        }
    }

    pub fn transform(&self) -> Transform {
        match *self {
            LinkKind::WithTransform(t) => t,
            LinkKind::KoWithTransform { transform, .. } => transform,
            _ => Transform::IDENTITY,
        }
    }

    #[inline]
    pub fn is_ko(&self) -> bool {
        matches!(self, LinkKind::KoSimple { .. } | LinkKind::KoWithTransform { .. })
    }

    /// Tree edge between two positions, i.e. neither ko nor an anchor.
    #[inline]
    pub fn is_ordinary(&self) -> bool {
        matches!(self, LinkKind::Simple | LinkKind::WithTransform(_))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            LinkKind::KoSimple { resolved: true } | LinkKind::KoWithTransform { resolved: true, .. }
        )
    }

    /// The ko version of an ordinary link; ko links keep their flag.
    pub fn to_ko(self, resolved: bool) -> Self {
        match self {
            LinkKind::Simple | LinkKind::WithTransform(_) => LinkKind::ko(self.transform(), resolved),
            other => other,
        }
    }

    /// The ordinary version of a ko link.
    pub fn to_ordinary(self) -> Self {
        match self {
            LinkKind::KoSimple { .. } | LinkKind::KoWithTransform { .. } => {
                LinkKind::ordinary(self.transform())
            }
            other => other,
        }
    }

    pub fn resolve(self) -> Self {
        match self {
            LinkKind::KoSimple { .. } => LinkKind::KoSimple { resolved: true },
            LinkKind::KoWithTransform { transform, .. } => LinkKind::KoWithTransform {
                transform,
                resolved: true,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub mv: Move,
    pub kind: LinkKind,
}

/// Outcome of a node for its own mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solution {
    Unknown,
    Good,
    Bad,
    Fair,
    /// Every continuation is disallowed.
    Forbidden,
    /// Provisional win, pending a ko cycle.
    KoGood,
    /// Provisional loss or draw, pending a ko cycle.
    KoBad,
}

impl Solution {
    /// Classify a doubled score against the break-even point `area`.
    pub fn from_score(score: u32, area: u32, provisional: bool) -> Solution {
        match (score.cmp(&area), provisional) {
            (std::cmp::Ordering::Greater, false) => Solution::Good,
            (std::cmp::Ordering::Less, false) => Solution::Bad,
            (std::cmp::Ordering::Equal, false) => Solution::Fair,
            (std::cmp::Ordering::Greater, true) => Solution::KoGood,
            (_, true) => Solution::KoBad,
        }
    }

    /// The same outcome seen by the other player.
    pub fn invert(self) -> Solution {
        match self {
            Solution::Good => Solution::Bad,
            Solution::Bad => Solution::Good,
            Solution::KoGood => Solution::KoBad,
            Solution::KoBad => Solution::KoGood,
            other => other,
        }
    }

    #[inline]
    pub fn is_ko(self) -> bool {
        matches!(self, Solution::KoGood | Solution::KoBad)
    }

    #[inline]
    pub fn is_definitive(self) -> bool {
        matches!(
            self,
            Solution::Good | Solution::Bad | Solution::Fair | Solution::Forbidden
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Registered in the pool under its configuration and mover.
    Regular,
    /// Reached by a pass; a second pass ends the game.
    AfterPass,
    /// Finished game, scored from territory.
    Terminal,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub mover: Color,
    pub role: NodeRole,
    pub incoming: Vec<LinkId>,
    pub outgoing: Vec<LinkId>,
    pub pool: EntryId,
    /// Maps the pool configuration onto this node's board.
    pub transform: Transform,
    pub solution: Solution,
    /// Doubled score for `mover`, once solved.
    pub score: Option<u32>,
}

impl Node {
    pub fn new(mover: Color, role: NodeRole, pool: EntryId, transform: Transform) -> Self {
        Self {
            mover,
            role,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            pool,
            transform,
            solution: Solution::Unknown,
            score: None,
        }
    }

    /// More than one way in: a transposition merge point.
    #[inline]
    pub fn is_upward_fork(&self) -> bool {
        self.incoming.len() > 1
    }
}

/// Turn a possibly negative fork index into a position in a list of `len`.
fn fork_position(len: usize, fork: isize) -> usize {
    let pos = if fork < 0 {
        len as isize + fork
    } else {
        fork
    };
    assert!(
        pos >= 0 && (pos as usize) < len,
        "fork index {fork} out of range for {len} links"
    );
    pos as usize
}

#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Create a link and register it on both ends. An `Init` anchor is only
    /// registered as incoming.
    pub fn add_link(&mut self, from: NodeId, to: NodeId, mv: Move, kind: LinkKind) -> LinkId {
        let id = self.links.len();
        self.links.push(Link { from, to, mv, kind });
        if kind != LinkKind::Init {
            self.nodes[from].outgoing.push(id);
        }
        self.nodes[to].incoming.push(id);
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id]
    }

    #[inline]
    pub fn link_mut(&mut self, id: LinkId) -> &mut Link {
        &mut self.links[id]
    }

    pub fn nnode(&self) -> usize {
        self.nodes.len()
    }

    pub fn nlink(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate()
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.links.iter().enumerate()
    }

    /// Outgoing links of `id` with their link data.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.nodes[id]
            .outgoing
            .iter()
            .map(move |&l| (l, &self.links[l]))
    }

    pub fn incoming(&self, id: NodeId, fork: isize) -> LinkId {
        let list = &self.nodes[id].incoming;
        list[fork_position(list.len(), fork)]
    }

    pub fn outgoing(&self, id: NodeId, fork: isize) -> LinkId {
        let list = &self.nodes[id].outgoing;
        list[fork_position(list.len(), fork)]
    }

    pub fn push_incoming(&mut self, id: NodeId, link: LinkId) {
        self.nodes[id].incoming.push(link);
    }

    pub fn push_outgoing(&mut self, id: NodeId, link: LinkId) {
        self.nodes[id].outgoing.push(link);
    }

    /// Swap the link at `fork`, returning the old one.
    pub fn replace_incoming(&mut self, id: NodeId, fork: isize, link: LinkId) -> LinkId {
        let list = &mut self.nodes[id].incoming;
        let pos = fork_position(list.len(), fork);
        std::mem::replace(&mut list[pos], link)
    }

    pub fn replace_outgoing(&mut self, id: NodeId, fork: isize, link: LinkId) -> LinkId {
        let list = &mut self.nodes[id].outgoing;
        let pos = fork_position(list.len(), fork);
        std::mem::replace(&mut list[pos], link)
    }

    pub fn delete_incoming(&mut self, id: NodeId, fork: isize) -> LinkId {
        let list = &mut self.nodes[id].incoming;
        let pos = fork_position(list.len(), fork);
        list.remove(pos)
    }

    pub fn delete_outgoing(&mut self, id: NodeId, fork: isize) -> LinkId {
        let list = &mut self.nodes[id].outgoing;
        let pos = fork_position(list.len(), fork);
        list.remove(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> NodeStore {
        let mut store = NodeStore::new();
        for _ in 0..n {
            store.add_node(Node::new(Color::Black, NodeRole::Regular, 0, Transform::IDENTITY));
        }
        store
    }

    #[test]
    fn test_add_link_registers_both_ends() {
        let mut store = store_with(3);
        let a = store.add_link(0, 1, Move::Place { x: 0, y: 0 }, LinkKind::Simple);
        let b = store.add_link(2, 1, Move::Pass, LinkKind::Simple);
        let init = store.add_link(0, 0, Move::GameInit, LinkKind::Init);
        assert_eq!(store.node(0).outgoing, vec![a]);
        assert_eq!(store.node(1).incoming, vec![a, b]);
        assert!(store.node(1).is_upward_fork());
        assert_eq!(store.node(0).incoming, vec![init]);
        assert_eq!(store.nlink(), 3);
    }

    #[test]
    fn test_fork_indices_count_from_the_end() {
        let mut store = store_with(4);
        let l1 = store.add_link(0, 1, Move::Place { x: 0, y: 0 }, LinkKind::Simple);
        let l2 = store.add_link(0, 2, Move::Place { x: 1, y: 0 }, LinkKind::Simple);
        let l3 = store.add_link(0, 3, Move::Pass, LinkKind::Simple);
        assert_eq!(store.outgoing(0, 0), l1);
        assert_eq!(store.outgoing(0, -1), l3);
        assert_eq!(store.outgoing(0, -3), l1);

        assert_eq!(store.replace_outgoing(0, -2, l3), l2);
        assert_eq!(store.node(0).outgoing, vec![l1, l3, l3]);
        assert_eq!(store.delete_outgoing(0, 1), l3);
        assert_eq!(store.node(0).outgoing, vec![l1, l3]);

        store.push_incoming(3, l2);
        assert_eq!(store.incoming(3, -1), l2);
        assert_eq!(store.replace_incoming(3, 0, l1), l3);
        assert_eq!(store.delete_incoming(3, -1), l2);
        assert_eq!(store.node(3).incoming, vec![l1]);
        store.push_outgoing(3, l2);
        assert_eq!(store.outgoing(3, 0), l2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_fork_index_out_of_range() {
        let store = store_with(1);
        store.outgoing(0, -1);
    }

    #[test]
    fn test_link_kind_conversions() {
        let t = Transform::new(1, false, false);
        let k = LinkKind::ordinary(t);
        assert_eq!(k, LinkKind::WithTransform(t));
        let ko = k.to_ko(false);
        assert!(ko.is_ko() && !ko.is_resolved());
        assert_eq!(ko.transform(), t);
        let ko = ko.resolve();
        assert!(ko.is_resolved());
        assert_eq!(ko.to_ordinary(), LinkKind::WithTransform(t));
        assert_eq!(LinkKind::ordinary(Transform::IDENTITY).to_ko(true), LinkKind::KoSimple { resolved: true });
        assert!(!LinkKind::Init.is_ordinary());
        assert_eq!(LinkKind::End.to_ko(false), LinkKind::End);
    }

    #[test]
    fn test_solution_inversion() {
        assert_eq!(Solution::from_score(5, 4, false), Solution::Good);
        assert_eq!(Solution::from_score(4, 4, false), Solution::Fair);
        assert_eq!(Solution::from_score(3, 4, false), Solution::Bad);
        assert_eq!(Solution::from_score(4, 4, true), Solution::KoBad);
        for s in [Solution::Good, Solution::Bad, Solution::Fair, Solution::KoGood, Solution::KoBad] {
            assert_eq!(s.invert().invert(), s);
        }
        // a parent sees the complement of the child's score
        let (area, child) = (4u32, 7u32);
        let parent = 2 * area - child;
        assert_eq!(
            Solution::from_score(parent, area, false),
            Solution::from_score(child, area, false).invert()
        );
    }
}
