//! SGF export of a solved tree.
//!
//! Every node is written once, as a full SGF node, the first time a link
//! reaches it; later links to it become placeholder nodes named after the
//! link. Moves and colours are mapped into the root's orientation by
//! accumulating link transforms along the way down.
//!
//! Comments carry each node's mover and score as reported by
//! [`Solver::result`]: the winner is exact, while a score written after a
//! cutoff is a bound on the margin rather than the margin itself.

use std::io::{self, Write};

use crate::board::Color;
use crate::graph::{LinkId, Move, NodeId};
use crate::solver::Solver;
use crate::transform::Transform;

fn coord(x: usize, y: usize) -> String {
    let letter = |v: usize| (b'a' + v as u8) as char;
    format!("{}{}", letter(x), letter(y))
}

/// Doubled score as points, e.g. `7` as `3.5`.
fn points(doubled: u32) -> String {
    format!("{}.{}", doubled / 2, if doubled % 2 == 1 { 5 } else { 0 })
}

struct Exporter<'a, W: Write> {
    solver: &'a Solver,
    out: &'a mut W,
    visited: Vec<bool>,
    written: usize,
}

impl<W: Write> Exporter<'_, W> {
    fn node_props(&mut self, id: NodeId, acc: Transform) -> io::Result<()> {
        let solver = self.solver;
        let node = solver.store().node(id);
        let ko = solver.ko();
        self.written += 1;
        write!(self.out, "N[{id}]")?;

        let mover = acc.apply_color(node.mover);
        let comment = match node.score {
            None => format!("{:?}", node.solution).to_lowercase(),
            Some(score) if ko.is_clean(id) => format!("{mover} {} ko clean", points(score)),
            Some(score) if node.solution.is_ko() => format!("{mover} {} ko", points(score)),
            Some(score) => format!("{mover} {}", points(score)),
        };
        write!(self.out, "C[{comment}]")?;

        if ko.is_settled(solver.store(), id) {
            match solver.winner(id).map(|c| acc.apply_color(c)) {
                Some(Color::Black) => write!(self.out, "GB[1]")?,
                Some(Color::White) => write!(self.out, "GW[1]")?,
                None => {}
            }
        }
        Ok(())
    }

    fn children(&mut self, id: NodeId, acc: Transform) -> io::Result<()> {
        let solver = self.solver;
        let (w, h) = (solver.settings().width(), solver.settings().height());
        let store = solver.store();
        let letter = acc.apply_color(store.node(id).mover).letter();
        let outgoing: Vec<LinkId> = store.node(id).outgoing.clone();

        for l in outgoing {
            let link = store.link(l);
            write!(self.out, "\n(;")?;
            match link.mv {
                Move::Place { x, y } => {
                    let (x, y) = acc.apply((x, y), w, h);
                    write!(self.out, "{letter}[{}]", coord(x, y))?;
                }
                _ => write!(self.out, "{letter}[]")?,
            }
            let to = link.to;
            if self.visited[to] {
                write!(self.out, "N[link {l}]C[see node {to}]")?;
            } else {
                self.visited[to] = true;
                let child_acc = link.kind.transform().compose(acc);
                self.node_props(to, child_acc)?;
                self.children(to, child_acc)?;
            }
            write!(self.out, ")")?;
        }
        Ok(())
    }
}

/// Write the whole tree as one SGF game, returning the number of full nodes.
pub fn export<W: Write>(solver: &Solver, out: &mut W) -> io::Result<usize> {
    let settings = solver.settings();
    write!(out, "(;GM[1]FF[4]")?;
    if settings.is_square() {
        write!(out, "SZ[{}]", settings.width())?;
    } else {
        write!(out, "SZ[{}:{}]", settings.width(), settings.height())?;
    }
    write!(out, "KM[{}]", settings.komi())?;

    let root = solver.root();
    let store = solver.store();
    if store.link(store.incoming(root, 0)).mv == Move::EditBoard {
        let board = solver.board_of(root);
        for color in [Color::Black, Color::White] {
            let stones: Vec<String> = board
                .points()
                .filter(|&(x, y)| board.get(x, y) == Some(color))
                .map(|(x, y)| format!("[{}]", coord(x, y)))
                .collect();
            if !stones.is_empty() {
                write!(out, "A{}{}", color.letter(), stones.concat())?;
            }
        }
        write!(out, "PL[{}]", store.node(root).mover.letter())?;
    }

    let mut exporter = Exporter {
        solver,
        out: &mut *out,
        visited: vec![false; store.nnode()],
        written: 0,
    };
    exporter.visited[root] = true;
    exporter.node_props(root, Transform::IDENTITY)?;
    exporter.children(root, Transform::IDENTITY)?;
    let written = exporter.written;
    writeln!(out, ")")?;
    Ok(written)
}
