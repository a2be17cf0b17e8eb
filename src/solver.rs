//! Exhaustive backward induction over the position graph.
//!
//! [`Solver::solve`] expands a node depth-first, merges transpositions through
//! the [`Pool`], records repetitions as ko links and writes a [`Solution`]
//! with a doubled score back into every node it finishes. Scores are always
//! from the point of view of the node's mover; a parent sees a child's score
//! `d` as `2 * area - d`.
//!
//! A move is a repetition when it recreates a position on the current line of
//! play. Values are combined while the line is walked, never read back from
//! nodes that may have been re-evaluated since, so a provisional node reached
//! again is expanded again in the new context unless its clean ko record
//! holds there.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, trace};

use crate::board::{Board, Color};
use crate::constants::REPORT_PERIOD;
use crate::error::PlayError;
use crate::graph::{LinkId, LinkKind, Move, Node, NodeId, NodeRole, NodeStore, Solution};
use crate::ko::{KoCheck, KoTracker, Line};
use crate::pool::{EntryId, Pool};
use crate::settings::Settings;
use crate::transform::Transform;

/// What a call to [`Solver::solve`] or [`Solver::solve_ko`] left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Definitive solution.
    Solved,
    /// Provisional solution whose cycle is self-contained.
    SolvedKo,
    /// No usable move.
    Forbidden,
    /// Provisional, waiting for an ancestor to close a ko cycle.
    Pending,
}

/// Effect of a single move added with [`Solver::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Played {
    /// A new child node was created.
    New(LinkId),
    /// Transposition into an existing node that is not waiting on a ko.
    Merged(LinkId),
    /// Transposition into a provisional node.
    MergedKo(LinkId),
    /// Repetition of an ancestor, recorded as a ko link.
    Ko(LinkId),
    /// Second pass in a row; the link leads to a terminal node.
    DoublePass(LinkId),
}

impl Played {
    pub fn link(self) -> LinkId {
        match self {
            Played::New(l)
            | Played::Merged(l)
            | Played::MergedKo(l)
            | Played::Ko(l)
            | Played::DoublePass(l) => l,
        }
    }
}

/// How far a value computed on the current line of play can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Holds on every line.
    Definitive,
    /// Holds on every line that avoids the provisional nodes it came from.
    Clean,
    /// Holds on the current line only.
    Open,
}

/// Value of a subtree for the mover of its top node.
#[derive(Debug)]
struct Eval {
    score: Option<u32>,
    reach: Reach,
    /// Provisional nodes the value was computed from.
    cycle: BTreeSet<NodeId>,
    /// Ko links below that repeat a node above the evaluated one.
    ko_links: Vec<LinkId>,
}

impl Eval {
    fn definitive(score: Option<u32>) -> Self {
        Eval {
            score,
            reach: Reach::Definitive,
            cycle: BTreeSet::new(),
            ko_links: Vec::new(),
        }
    }
}

/// Options of a node under expansion, in the node's own view.
#[derive(Debug, Default)]
struct Tally {
    best: Option<u32>,
    clean: bool,
    open: bool,
    cycle: BTreeSet<NodeId>,
    ko_links: Vec<LinkId>,
    /// Settled option that wins the node outright.
    winner: Option<(u32, Reach, BTreeSet<NodeId>)>,
}

impl Tally {
    fn repetition(&mut self, link: LinkId) {
        self.open = true;
        self.ko_links.push(link);
    }

    /// Add the option of moving to `child`. True when it wins outright.
    fn add(&mut self, child: NodeId, eval: Eval, max: u32, area: u32) -> bool {
        let Some(score) = eval.score else {
            return false;
        };
        let option = max - score;
        self.best = self.best.max(Some(option));
        match eval.reach {
            Reach::Definitive => {}
            Reach::Clean => self.clean = true,
            Reach::Open => {
                self.open = true;
                self.ko_links.extend_from_slice(&eval.ko_links);
            }
        }
        if eval.reach != Reach::Definitive {
            self.cycle.insert(child);
            self.cycle.extend(eval.cycle.iter().copied());
        }
        if eval.reach == Reach::Open || option <= area {
            return false;
        }
        let mut cycle = eval.cycle;
        if eval.reach == Reach::Clean {
            cycle.insert(child);
        }
        self.winner = Some((option, eval.reach, cycle));
        true
    }
}

/// Counters reported in the solve summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub merges: usize,
    pub ko_links: usize,
    pub shifted: usize,
    pub clean: usize,
}

pub struct Solver {
    settings: Settings,
    store: NodeStore,
    pool: Pool,
    ko: KoTracker,
    rng: fastrand::Rng,
    /// Moves still to try, next one last.
    untried: HashMap<NodeId, Vec<Move>>,
    line: Line,
    root: NodeId,
    stats: Stats,
}

impl Solver {
    /// Solver rooted at the empty board with Black to move.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let board = Board::empty(&settings);
        Self::with_root(settings, board, Color::Black, Move::GameInit, seed)
    }

    /// Solver rooted at a set-up position.
    ///
    /// # Panics
    /// If the board does not have the configured dimensions.
    pub fn from_position(settings: Settings, board: Board, mover: Color, seed: u64) -> Self {
        assert!(
            board.width() == settings.width() && board.height() == settings.height(),
            "set-up board is {}x{}, settings say {}x{}",
            board.width(),
            board.height(),
            settings.width(),
            settings.height()
        );
        Self::with_root(settings, board, mover, Move::EditBoard, seed)
    }

    fn with_root(settings: Settings, board: Board, mover: Color, mv: Move, seed: u64) -> Self {
        let mut solver = Self {
            settings,
            store: NodeStore::new(),
            pool: Pool::new(),
            ko: KoTracker::new(),
            rng: fastrand::Rng::with_seed(seed),
            untried: HashMap::new(),
            line: Line::new(),
            root: 0,
            stats: Stats::default(),
        };
        let (canon, s) = board.canonicalize(settings.allows_color_flip());
        let hint = solver.pool.search(&canon);
        let entry = solver.pool.push(canon, hint);
        let root = solver.add_regular(entry, mover, s.apply_color(mover), s.inverse());
        solver.store.add_link(root, root, mv, LinkKind::Init);
        solver.root = root;
        solver
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    #[inline]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[inline]
    pub fn ko(&self) -> &KoTracker {
        &self.ko
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn nnode(&self) -> usize {
        self.store.nnode()
    }

    fn area(&self) -> u32 {
        self.settings.area() as u32
    }

    /// The node's board in its own orientation.
    pub fn board_of(&self, node: NodeId) -> Board {
        let n = self.store.node(node);
        self.pool.config(n.pool).transformed(n.transform)
    }

    /// Solution and doubled score of a node for its mover.
    ///
    /// The solution class is exact. The score is the exact margin only when
    /// every option was tried: a node settled by a cutoff, and any node whose
    /// value was built on one, holds a bound that already decides the class.
    pub fn result(&self, node: NodeId) -> (Solution, Option<u32>) {
        let n = self.store.node(node);
        (n.solution, n.score)
    }

    /// Winner of a scored node under best play, `None` for a draw or when
    /// nothing is known yet.
    pub fn winner(&self, node: NodeId) -> Option<Color> {
        let n = self.store.node(node);
        let score = n.score?;
        match score.cmp(&self.area()) {
            std::cmp::Ordering::Greater => Some(n.mover),
            std::cmp::Ordering::Less => Some(n.mover.opponent()),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.store.add_node(node);
        if id > 0 && id % REPORT_PERIOD == 0 {
            info!(
                "{id} nodes, {} links, {} pool entries, {} ko links",
                self.store.nlink(),
                self.pool.len(),
                self.stats.ko_links
            );
        }
        id
    }

    fn add_regular(&mut self, entry: EntryId, mover: Color, slot: Color, t: Transform) -> NodeId {
        let id = self.add_node(Node::new(mover, NodeRole::Regular, entry, t));
        self.pool.link(entry, slot, id);
        trace!("node {id}: pool entry {entry}, {mover} to move, transform {t}");
        id
    }

    /// Transform of a link into `target` from a board canonicalized by `s`.
    fn link_transform(&self, target: NodeId, s: Transform) -> Transform {
        self.store.node(target).transform.inverse().compose(s.inverse())
    }

    fn has_child_move(&self, node: NodeId, mv: Move) -> bool {
        self.store
            .children(node)
            .any(|(_, link)| link.mv == mv || (mv == Move::Pass && link.mv == Move::GameEnd))
    }

    /// Add one move below `node` without solving anything.
    pub fn play(&mut self, node: NodeId, mv: Move) -> Result<Played, PlayError> {
        if self.store.node(node).role == NodeRole::Terminal {
            return Err(PlayError::GameOver { node });
        }
        if self.has_child_move(node, mv) {
            return Err(PlayError::AlreadyPlayed {
                node,
                mv: mv.to_string(),
            });
        }
        match mv {
            Move::Pass => Ok(self.play_pass(node)),
            Move::Place { x, y } => self.play_place(node, x, y),
            other => Err(PlayError::NotABoardMove {
                mv: other.to_string(),
            }),
        }
    }

    fn play_pass(&mut self, node: NodeId) -> Played {
        let parent = self.store.node(node);
        let (role, pool, t) = (parent.role, parent.pool, parent.transform);
        let next = parent.mover.opponent();
        match role {
            NodeRole::Regular => {
                let child = self.add_node(Node::new(next, NodeRole::AfterPass, pool, t));
                Played::New(self.store.add_link(node, child, Move::Pass, LinkKind::Simple))
            }
            NodeRole::AfterPass => {
                let child = self.add_node(Node::new(next, NodeRole::Terminal, pool, t));
                self.score_from_board(child);
                Played::DoublePass(self.store.add_link(node, child, Move::GameEnd, LinkKind::End))
            }
            NodeRole::Terminal => panic!("node {node}: pass after the game ended"),
        }
    }

    fn play_place(&mut self, node: NodeId, x: usize, y: usize) -> Result<Played, PlayError> {
        let mover = self.store.node(node).mover;
        let next = mover.opponent();
        let mv = Move::Place { x, y };
        let mut board = self.board_of(node);
        board.place(x, y, mover)?;
        let (canon, s) = board.canonicalize(self.settings.allows_color_flip());
        let slot = s.apply_color(next);

        let played = match self.ko.check_ko(&self.store, &self.pool, node, &canon, slot) {
            KoCheck::New(hint) => {
                let entry = self.pool.push(canon, hint);
                let child = self.add_regular(entry, next, slot, s.inverse());
                Played::New(self.store.add_link(node, child, mv, LinkKind::Simple))
            }
            KoCheck::NewSituation(entry) => {
                let child = self.add_regular(entry, next, slot, s.inverse());
                Played::New(self.store.add_link(node, child, mv, LinkKind::Simple))
            }
            KoCheck::ExistsNotKo(target) => {
                let kind = LinkKind::ordinary(self.link_transform(target, s));
                let link = self.store.add_link(node, target, mv, kind);
                self.stats.merges += 1;
                trace!("node {node}: {mv} transposes into node {target}");
                if self.ko.is_ko_child(&self.store, target) {
                    Played::MergedKo(link)
                } else {
                    Played::Merged(link)
                }
            }
            KoCheck::ExistsIsKo(target) => {
                let resolved = self.ko.is_settled(&self.store, target);
                let kind = LinkKind::ko(self.link_transform(target, s), resolved);
                let link = self.store.add_link(node, target, mv, kind);
                self.ko.register(link, resolved);
                self.stats.ko_links += 1;
                debug!("node {node}: {mv} repeats node {target}, ko link {link}");
                Played::Ko(link)
            }
        };
        Ok(played)
    }

    /// Score a node straight from the board.
    fn score_from_board(&mut self, node: NodeId) {
        let mover = self.store.node(node).mover;
        let score = self.board_of(node).territory_doubled(mover, &self.settings);
        let area = self.area();
        let n = self.store.node_mut(node);
        n.score = Some(score);
        n.solution = Solution::from_score(score, area, false);
    }

    fn outcome(&self, node: NodeId) -> Outcome {
        if self.ko.is_clean(node) {
            return Outcome::SolvedKo;
        }
        match self.store.node(node).solution {
            Solution::Forbidden => Outcome::Forbidden,
            Solution::KoGood | Solution::KoBad => Outcome::Pending,
            Solution::Unknown => panic!("node {node} has no solution yet"),
            _ => Outcome::Solved,
        }
    }

    /// Solve the whole game from the root.
    pub fn solve_root(&mut self) -> Outcome {
        let outcome = self.solve(self.root);
        let (solution, score) = self.result(self.root);
        info!(
            "{}x{} komi {}: {:?} {:?} ({} nodes, {} links, {} pool entries, {} ko links, {} shifted, {} clean ko records)",
            self.settings.width(),
            self.settings.height(),
            self.settings.komi(),
            solution,
            score,
            self.store.nnode(),
            self.store.nlink(),
            self.pool.len(),
            self.stats.ko_links,
            self.stats.shifted,
            self.stats.clean
        );
        outcome
    }

    /// Solve `node` and everything below it, on a line of play starting at
    /// `node`. A node that already has a solution is left as it is.
    pub fn solve(&mut self, node: NodeId) -> Outcome {
        if self.store.node(node).solution != Solution::Unknown {
            return self.outcome(node);
        }
        self.expand(node);
        self.outcome(node)
    }

    /// Re-evaluate the node reached through `from.outgoing[fork]` on the
    /// current line of play, `from` being the node on top of it. Outside a
    /// search the line starts at `from`.
    pub fn solve_ko(&mut self, from: NodeId, fork: isize) -> Outcome {
        let link = self.store.outgoing(from, fork);
        let target = self.store.link(link).to;
        if self.line.contains(target) {
            return Outcome::Pending;
        }
        let outside = self.line.is_empty();
        if outside {
            self.line.push(from);
        }
        self.evaluate(from, link);
        if outside {
            self.line.pop();
        }
        self.outcome(target)
    }

    /// Put `node` on the line of play and try its options: links already
    /// present first, then the moves not tried yet.
    fn expand(&mut self, node: NodeId) -> Eval {
        let n = self.store.node(node);
        if n.role == NodeRole::Regular && n.outgoing.is_empty() && self.board_of(node).is_game_end() {
            self.finish_game(node);
            return Eval::definitive(self.store.node(node).score);
        }

        let depth = self.line.push(node);
        let mut tally = Tally::default();
        let mut won = false;
        let existing = self.store.node(node).outgoing.clone();
        for link in existing {
            if self.visit(node, link, &mut tally) {
                won = true;
                break;
            }
        }
        while !won {
            let Some(mv) = self.next_move(node) else {
                break;
            };
            let played = match self.play(node, mv) {
                Ok(played) => played,
                Err(PlayError::Illegal(_)) => continue,
                Err(e) => panic!("node {node}: generated move {mv} rejected: {e}"),
            };
            won = self.visit(node, played.link(), &mut tally);
            if won {
                trace!("node {node}: {mv} refutes every alternative");
            }
        }

        let eval = self.finalize(node, depth, tally);
        self.line.pop();
        eval
    }

    /// Fold the option behind `link` into the tally of `node`.
    fn visit(&mut self, node: NodeId, link: LinkId, tally: &mut Tally) -> bool {
        let to = self.store.link(link).to;
        let repeats = self.line.contains(to);
        self.ko.judge(&mut self.store, link, repeats);
        if repeats {
            tally.repetition(link);
            return false;
        }
        let eval = self.evaluate(node, link);
        tally.add(to, eval, self.settings.max_score(), self.area())
    }

    /// Value of the target of `link`, which is not on the line.
    fn evaluate(&mut self, from: NodeId, link: LinkId) -> Eval {
        let to = self.store.link(link).to;
        let n = self.store.node(to);
        if n.solution == Solution::Unknown {
            return self.expand(to);
        }
        if n.solution.is_definitive() {
            return Eval::definitive(n.score);
        }
        if let Some(record) = self.ko.clean_for(to, &self.line) {
            return Eval {
                score: Some(record.score),
                reach: Reach::Clean,
                cycle: record.cycle.clone(),
                ko_links: Vec::new(),
            };
        }

        let fork = self
            .store
            .node(from)
            .outgoing
            .iter()
            .position(|&l| l == link)
            .map(|i| i as isize);
        let Some(fork) = fork else {
            panic!("link {link} does not leave node {from}");
        };
        let shifted = self.ko.shift_ko_links(&mut self.store, &self.line, from, fork);
        if shifted > 0 {
            self.stats.shifted += shifted;
            debug!("node {to}: {shifted} ko link(s) re-oriented for entry from node {from}");
        }
        self.expand(to)
    }

    /// Nothing left to play but passes: score the node, its after-pass child
    /// and the terminal node from the board.
    fn finish_game(&mut self, node: NodeId) {
        let pass = self.play_pass(node).link();
        let after = self.store.link(pass).to;
        self.play_pass(after);
        self.score_from_board(after);
        self.score_from_board(node);
        self.ko.resolve_ko(&mut self.store, after);
        self.ko.resolve_ko(&mut self.store, node);
        self.untried.remove(&node);
    }

    fn next_move(&mut self, node: NodeId) -> Option<Move> {
        if !self.untried.contains_key(&node) {
            let moves = self.generate_moves(node);
            self.untried.insert(node, moves);
        }
        loop {
            let mv = self.untried.get_mut(&node)?.pop()?;
            if !self.has_child_move(node, mv) {
                return Some(mv);
            }
        }
    }

    /// Captures first, biggest first; then the other sensible moves in
    /// random order; the pass last. Returned reversed, for popping.
    fn generate_moves(&mut self, node: NodeId) -> Vec<Move> {
        let mover = self.store.node(node).mover;
        let board = self.board_of(node);
        let eats = board.eat_candidates(mover);
        let mut moves: Vec<Move> = eats
            .iter()
            .map(|&((x, y), _)| Move::Place { x, y })
            .collect();
        moves.extend(
            board
                .legal_moves_random_order(mover, &mut self.rng)
                .filter(|pt| !eats.iter().any(|(p, _)| p == pt))
                .map(|(x, y)| Move::Place { x, y }),
        );
        moves.push(Move::Pass);
        moves.reverse();
        moves
    }

    /// Write the combined options of `node`, at `depth` on the line, into
    /// the node and say how far the result can be reused.
    fn finalize(&mut self, node: NodeId, depth: usize, tally: Tally) -> Eval {
        let area = self.area();
        let (score, reach, cycle, ko_links) = match tally.winner {
            Some((score, reach, cycle)) => (Some(score), reach, cycle, Vec::new()),
            None if !tally.open && !tally.clean => {
                (tally.best, Reach::Definitive, BTreeSet::new(), Vec::new())
            }
            None => {
                let reach =
                    if self.ko.is_new_clean_ko_node(&self.store, &self.line, node, &tally.ko_links) {
                        Reach::Clean
                    } else {
                        Reach::Open
                    };
                let above: Vec<LinkId> = tally
                    .ko_links
                    .into_iter()
                    .filter(|&l| self.line.index(self.store.link(l).to).is_some_and(|i| i < depth))
                    .collect();
                // no move left in this context counts as nothing gained
                (Some(tally.best.unwrap_or(0)), reach, tally.cycle, above)
            }
        };

        let Some(score) = score else {
            let n = self.store.node_mut(node);
            n.solution = Solution::Forbidden;
            n.score = None;
            self.untried.remove(&node);
            self.ko.forget(node);
            self.ko.resolve_ko(&mut self.store, node);
            return Eval::definitive(None);
        };
        let solution = Solution::from_score(score, area, reach != Reach::Definitive);
        let n = self.store.node_mut(node);
        n.score = Some(score);
        n.solution = solution;

        match reach {
            Reach::Definitive => {
                self.untried.remove(&node);
                self.ko.forget(node);
                self.ko.resolve_ko(&mut self.store, node);
            }
            Reach::Clean => {
                self.ko.record_clean(node, score, solution, cycle.clone());
                self.ko.resolve_ko(&mut self.store, node);
                self.stats.clean += 1;
                debug!("node {node}: clean ko, {solution:?} {score} over {} node(s)", cycle.len());
            }
            Reach::Open => {
                self.ko.forget(node);
            }
        }
        Eval {
            score: Some(score),
            reach,
            cycle,
            ko_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(x: usize, y: usize) -> Move {
        Move::Place { x, y }
    }

    #[test]
    fn test_root_holds_the_start_position() {
        let s = Settings::new(3, 3, 0).unwrap();
        let solver = Solver::new(s, 1);
        assert_eq!(solver.nnode(), 1);
        assert_eq!(solver.board_of(solver.root()), Board::empty(&s));
        let init = solver.store().incoming(solver.root(), 0);
        assert_eq!(solver.store().link(init).kind, LinkKind::Init);
        assert_eq!(solver.store().link(init).mv, Move::GameInit);
    }

    #[test]
    fn test_play_rejects_bad_moves() {
        let s = Settings::new(2, 2, 0).unwrap();
        let mut solver = Solver::new(s, 1);
        let root = solver.root();
        assert!(matches!(solver.play(root, place(0, 0)), Ok(Played::New(_))));
        assert_eq!(
            solver.play(root, place(0, 0)),
            Err(PlayError::AlreadyPlayed {
                node: root,
                mv: "(0,0)".to_string()
            })
        );
        assert!(matches!(solver.play(root, place(5, 0)), Err(PlayError::Illegal(_))));
        assert!(matches!(
            solver.play(root, Move::GameInit),
            Err(PlayError::NotABoardMove { .. })
        ));
    }

    #[test]
    fn test_symmetric_moves_merge() {
        let s = Settings::new(3, 3, 1).unwrap();
        let mut solver = Solver::new(s, 1);
        let root = solver.root();
        let a = solver.play(root, place(0, 0)).unwrap();
        let b = solver.play(root, place(2, 2)).unwrap();
        assert!(matches!(a, Played::New(_)));
        assert!(matches!(b, Played::Merged(_)));
        let (la, lb) = (solver.store().link(a.link()), solver.store().link(b.link()));
        assert_eq!(la.to, lb.to);
        // the merged link maps the shared child onto the corner actually played
        let child = solver.board_of(lb.to);
        let mut expected = Board::empty(&s);
        expected.place(2, 2, Color::Black).unwrap();
        assert_eq!(child.transformed(lb.kind.transform()), expected);
    }

    #[test]
    fn test_passes_lead_to_a_terminal_node() {
        let s = Settings::new(2, 2, 1).unwrap();
        let mut solver = Solver::new(s, 1);
        let root = solver.root();
        let first = solver.play(root, Move::Pass).unwrap();
        let after = solver.store().link(first.link()).to;
        assert_eq!(solver.store().node(after).role, NodeRole::AfterPass);
        assert_eq!(solver.store().node(after).mover, Color::White);

        let second = solver.play(after, Move::Pass).unwrap();
        assert!(matches!(second, Played::DoublePass(_)));
        let end = solver.store().link(second.link()).to;
        assert_eq!(solver.store().link(second.link()).kind, LinkKind::End);
        // empty board: Black scores 0 + 4 neutral - 1 komi
        assert_eq!(solver.result(end), (Solution::Bad, Some(3)));
        assert_eq!(solver.play(end, Move::Pass), Err(PlayError::GameOver { node: end }));
        assert!(matches!(
            solver.play(after, Move::Pass),
            Err(PlayError::AlreadyPlayed { .. })
        ));
    }

    #[test]
    fn test_single_point_board_is_a_draw() {
        let s = Settings::new(1, 1, 0).unwrap();
        let mut solver = Solver::new(s, 1);
        assert_eq!(solver.solve_root(), Outcome::Solved);
        assert_eq!(solver.result(solver.root()), (Solution::Fair, Some(1)));
        assert_eq!(solver.winner(solver.root()), None);
        assert_eq!(solver.nnode(), 3);
        // solving again is a no-op
        assert_eq!(solver.solve(solver.root()), Outcome::Solved);
        assert_eq!(solver.nnode(), 3);
    }

    #[test]
    fn test_solve_ko_settles_a_branch_below_an_open_node() {
        // 2x1, komi 1: after Black's first stone White captures, and Black
        // may not retake into the position on the line
        let s = Settings::new(2, 1, 2).unwrap();
        let mut solver = Solver::new(s, 1);
        let root = solver.root();
        let first = solver.play(root, place(0, 0)).unwrap();
        let p1 = solver.store().link(first.link()).to;

        assert_eq!(solver.solve_ko(root, 0), Outcome::SolvedKo);
        assert_eq!(solver.result(root).0, Solution::Unknown);
        assert_eq!(solver.result(p1), (Solution::KoGood, Some(4)));
        let record = solver.ko().clean(p1).unwrap();
        assert!(!record.cycle.is_empty());
        // the record holds off its cycle, so nothing is expanded again
        let nodes = solver.nnode();
        assert_eq!(solver.solve_ko(root, 0), Outcome::SolvedKo);
        assert_eq!(solver.nnode(), nodes);
    }

    #[test]
    fn test_scores_respect_the_pass_option() {
        let s = Settings::new(2, 2, 1).unwrap();
        let mut solver = Solver::new(s, 5);
        solver.solve_root();
        let (area, max) = (s.area() as u32, s.max_score());
        let mut ends = 0;
        for (_, link) in solver.store().links() {
            if link.kind != LinkKind::End {
                continue;
            }
            ends += 1;
            let end = solver.store().node(link.to);
            let after = solver.store().node(link.from);
            assert_eq!(end.role, NodeRole::Terminal);
            let (Some(end_score), Some(after_score)) = (end.score, after.score) else {
                panic!("link {} joins unscored nodes", link.from);
            };
            assert!(after_score >= max - end_score);
        }
        assert!(ends > 0);
        for (id, node) in solver.store().nodes() {
            if let (Some(score), true) = (node.score, node.solution.is_definitive()) {
                assert_eq!(Solution::from_score(score, area, false), node.solution, "node {id}");
            }
        }
    }
}
