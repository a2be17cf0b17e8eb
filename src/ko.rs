//! Ko-cycle bookkeeping.
//!
//! The solver walks one line of play at a time. A move that recreates a
//! position already on that line is a repetition: it is recorded as a ko link
//! and the nodes whose value depends on it stay provisional (`KoGood` /
//! `KoBad`). A provisional node whose repetitions all stay at or below it is a
//! clean ko node; its value stands in for a solved one on every line that
//! avoids the provisional nodes it was computed from.
//!
//! Link kinds describe the line a node was last expanded on. Ordinary links
//! stay acyclic, and the ordinary ancestry of a node on the line is the line
//! itself, which is what [`KoTracker::check_ko`] relies on.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::board::{Board, Color};
use crate::graph::{LinkId, NodeId, NodeStore, Solution};
use crate::pool::{EntryId, Lookup, Pool};

/// Ancestry of one node relative to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linked {
    NotLinked,
    /// The first node is a strict ancestor of the second.
    LinkedDownstream,
    Same,
}

/// How a position produced by a move relates to the existing tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KoCheck {
    /// Unknown configuration; insert at the given position.
    New(Lookup),
    /// Known configuration, but never reached with this mover.
    NewSituation(EntryId),
    /// Transposition into an unrelated branch.
    ExistsNotKo(NodeId),
    /// Repetition of an ancestor.
    ExistsIsKo(NodeId),
}

/// Nodes currently being expanded, outermost first.
#[derive(Debug, Default)]
pub struct Line {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node`, returning its depth.
    ///
    /// # Panics
    /// If `node` is already on the line.
    pub fn push(&mut self, node: NodeId) -> usize {
        let depth = self.nodes.len();
        let previous = self.index.insert(node, depth);
        assert!(previous.is_none(), "node {node} is already on the line of play");
        self.nodes.push(node);
        depth
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        let node = self.nodes.pop()?;
        self.index.remove(&node);
        Some(node)
    }

    #[inline]
    pub fn index(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Provisional result that can stand in for a solved node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanKo {
    pub node: NodeId,
    pub score: u32,
    pub solution: Solution,
    /// Provisional nodes the result was computed from.
    pub cycle: BTreeSet<NodeId>,
}

impl CleanKo {
    /// The record holds on `line` when none of its cycle is on it.
    pub fn holds_on(&self, line: &Line) -> bool {
        !line.contains(self.node) && self.cycle.iter().all(|&n| !line.contains(n))
    }
}

#[derive(Debug, Default)]
pub struct KoTracker {
    unresolved: BTreeSet<LinkId>,
    clean: BTreeMap<NodeId, CleanKo>,
}

impl KoTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `from` is an ancestor of `to` through ordinary links.
    ///
    /// Single-parent chains are followed in a loop; at forks every parent is
    /// queued. The walk stops at the first match.
    pub fn is_linked(&self, store: &NodeStore, from: NodeId, to: NodeId) -> Linked {
        if from == to {
            return Linked::Same;
        }
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![to];
        while let Some(start) = stack.pop() {
            let mut current = start;
            loop {
                let mut parents = store
                    .node(current)
                    .incoming
                    .iter()
                    .map(|&l| store.link(l))
                    .filter(|link| link.kind.is_ordinary())
                    .map(|link| link.from);
                let Some(first) = parents.next() else {
                    break;
                };
                let rest: Vec<NodeId> = parents.collect();
                if first == from || rest.contains(&from) {
                    return Linked::LinkedDownstream;
                }
                if rest.is_empty() {
                    if !visited.insert(first) {
                        break;
                    }
                    current = first;
                    continue;
                }
                for p in std::iter::once(first).chain(rest) {
                    if visited.insert(p) {
                        stack.push(p);
                    }
                }
                break;
            }
        }
        Linked::NotLinked
    }

    /// Classify the canonical configuration `canon`, with `slot` to move in
    /// the canonical frame, reached by a move from `current`.
    pub fn check_ko(
        &self,
        store: &NodeStore,
        pool: &Pool,
        current: NodeId,
        canon: &Board,
        slot: Color,
    ) -> KoCheck {
        match pool.search(canon) {
            Lookup::Found(entry) => match pool.node(entry, slot) {
                None => KoCheck::NewSituation(entry),
                Some(existing) => match self.is_linked(store, existing, current) {
                    Linked::NotLinked => KoCheck::ExistsNotKo(existing),
                    Linked::LinkedDownstream | Linked::Same => KoCheck::ExistsIsKo(existing),
                },
            },
            other => KoCheck::New(other),
        }
    }

    /// Start tracking a freshly created ko link.
    pub fn register(&mut self, link: LinkId, resolved: bool) {
        if !resolved {
            self.unresolved.insert(link);
        }
    }

    pub fn unresolved(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.unresolved.iter().copied()
    }

    pub fn is_unresolved(&self, link: LinkId) -> bool {
        self.unresolved.contains(&link)
    }

    pub fn record_clean(
        &mut self,
        node: NodeId,
        score: u32,
        solution: Solution,
        cycle: BTreeSet<NodeId>,
    ) {
        self.clean.insert(
            node,
            CleanKo {
                node,
                score,
                solution,
                cycle,
            },
        );
    }

    /// Drop the clean record of `node`, if any.
    pub fn forget(&mut self, node: NodeId) -> bool {
        self.clean.remove(&node).is_some()
    }

    #[inline]
    pub fn is_clean(&self, node: NodeId) -> bool {
        self.clean.contains_key(&node)
    }

    pub fn clean(&self, node: NodeId) -> Option<&CleanKo> {
        self.clean.get(&node)
    }

    /// The clean record of `node` if it can be reused on `line`.
    pub fn clean_for(&self, node: NodeId, line: &Line) -> Option<&CleanKo> {
        self.clean.get(&node).filter(|record| record.holds_on(line))
    }

    pub fn clean_nodes(&self) -> impl Iterator<Item = &CleanKo> + '_ {
        self.clean.values()
    }

    /// Solved for good: definitive, or a clean ko node.
    pub fn is_settled(&self, store: &NodeStore, node: NodeId) -> bool {
        store.node(node).solution.is_definitive() || self.is_clean(node)
    }

    /// Provisional child that still depends on an open cycle.
    pub fn is_ko_child(&self, store: &NodeStore, node: NodeId) -> bool {
        store.node(node).solution.is_ko() && !self.is_clean(node)
    }

    /// None of the ko links collected below `node` reaches above it on the
    /// line: the cycle is self-contained.
    pub fn is_new_clean_ko_node(
        &self,
        store: &NodeStore,
        line: &Line,
        node: NodeId,
        ko_links: &[LinkId],
    ) -> bool {
        let Some(depth) = line.index(node) else {
            return false;
        };
        ko_links
            .iter()
            .all(|&id| line.index(store.link(id).to).is_some_and(|i| i >= depth))
    }

    /// `node` is settled: ko links into it can no longer be live threats.
    pub fn resolve_ko(&mut self, store: &mut NodeStore, node: NodeId) {
        let incoming = store.node(node).incoming.clone();
        for id in incoming {
            let link = store.link_mut(id);
            if link.kind.is_ko() && !link.kind.is_resolved() {
                link.kind = link.kind.resolve();
                self.unresolved.remove(&id);
            }
        }
    }

    /// Mark `link` as a repetition on the current line or as an ordinary
    /// move. Returns true when a ko link became ordinary.
    ///
    /// A ko link stays one when making it ordinary would close a cycle of
    /// ordinary links.
    pub fn judge(&mut self, store: &mut NodeStore, link: LinkId, repeats: bool) -> bool {
        let (from, to, kind) = {
            let l = store.link(link);
            (l.from, l.to, l.kind)
        };
        if repeats {
            if kind.is_ordinary() {
                store.link_mut(link).kind = kind.to_ko(false);
                self.unresolved.insert(link);
            }
            return false;
        }
        if !kind.is_ko() || self.is_linked(store, to, from) != Linked::NotLinked {
            return false;
        }
        store.link_mut(link).kind = kind.to_ordinary();
        self.unresolved.remove(&link);
        true
    }

    /// Re-orient the links around a provisional node re-entered on `line`
    /// through `from.outgoing[fork]`.
    ///
    /// Ordinary links into the node from parents off the line become ko
    /// links, so that the node's ordinary ancestry is the line again. The
    /// node's own links are then judged against the line: ko links to nodes
    /// off the line become ordinary, ordinary links to nodes on it become
    /// ko. Returns the number of links turned ordinary.
    pub fn shift_ko_links(
        &mut self,
        store: &mut NodeStore,
        line: &Line,
        from: NodeId,
        fork: isize,
    ) -> usize {
        let entry = store.outgoing(from, fork);
        let node = store.link(entry).to;

        let promoted: Vec<LinkId> = store
            .node(node)
            .incoming
            .iter()
            .copied()
            .filter(|&id| {
                let link = store.link(id);
                id != entry && link.kind.is_ordinary() && !line.contains(link.from)
            })
            .collect();
        for id in promoted {
            let link = store.link_mut(id);
            link.kind = link.kind.to_ko(false);
            self.unresolved.insert(id);
        }

        let outgoing = store.node(node).outgoing.clone();
        let mut shifted = 0;
        for id in outgoing {
            let repeats = line.contains(store.link(id).to);
            if self.judge(store, id, repeats) {
                shifted += 1;
            }
        }
        shifted
    }
}
