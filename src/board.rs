//! Board rules: stone placement, captures, eyes, territory and canonical form.
//!
//! A [`Board`] is a plain snapshot of stone placement with no notion of whose
//! turn it is. The solver treats it as the configuration of a search node and
//! calls into this module for everything rule related.

use std::fmt;

use crate::constants::{CHAR_BLACK, CHAR_EMPTY, CHAR_WHITE, DIGIT_BLACK, DIGIT_EMPTY, DIGIT_WHITE};
use crate::error::{DiagramError, PlaceError};
use crate::settings::Settings;
use crate::transform::Transform;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// SGF property letter.
    pub fn letter(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Empty board of the configured size.
    pub fn empty(settings: &Settings) -> Self {
        Self::new(settings.width(), settings.height())
    }

    /// Parse a diagram, one string per row, using `X` for Black, `O` for
    /// White and `.` for empty points.
    pub fn from_rows(settings: &Settings, rows: &[&str]) -> Result<Self, DiagramError> {
        if rows.len() != settings.height() {
            return Err(DiagramError::RowCount {
                got: rows.len(),
                expected: settings.height(),
            });
        }
        let mut board = Self::empty(settings);
        for (y, row) in rows.iter().enumerate() {
            let points: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if points.len() != settings.width() {
                return Err(DiagramError::RowLength {
                    row: y,
                    got: points.len(),
                    expected: settings.width(),
                });
            }
            for (x, ch) in points.into_iter().enumerate() {
                let stone = match ch.to_ascii_uppercase() {
                    CHAR_BLACK => Some(Color::Black),
                    CHAR_WHITE => Some(Color::White),
                    CHAR_EMPTY => None,
                    _ => return Err(DiagramError::BadChar { row: y, ch }),
                };
                board.set(x, y, stone);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    fn set(&mut self, x: usize, y: usize, stone: Option<Color>) {
        let i = self.idx(x, y);
        self.cells[i] = stone;
    }

    pub fn stones(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    /// Base-3 number of the configuration, first point most significant.
    pub fn key(&self) -> u128 {
        self.cells.iter().fold(0u128, |acc, c| {
            let digit = match c {
                None => DIGIT_EMPTY,
                Some(Color::Black) => DIGIT_BLACK,
                Some(Color::White) => DIGIT_WHITE,
            };
            acc * 3 + digit
        })
    }

    fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = Point> + '_ {
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < self.width {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < self.height {
            v.push((x, y + 1));
        }
        v.into_iter()
    }

    fn diagonals(&self, x: usize, y: usize) -> (Vec<Point>, bool) {
        let mut v = Vec::with_capacity(4);
        let mut at_edge = false;
        for (dx, dy) in [(-1isize, -1isize), (1, -1), (-1, 1), (1, 1)] {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
                at_edge = true;
            } else {
                v.push((nx as usize, ny as usize));
            }
        }
        (v, at_edge)
    }

    /// Place a stone, removing captured groups.
    ///
    /// Returns the number of captured stones. Suicide is illegal.
    pub fn place(&mut self, x: usize, y: usize, color: Color) -> Result<usize, PlaceError> {
        if x >= self.width || y >= self.height {
            return Err(PlaceError::OutOfRange { x, y });
        }
        if self.get(x, y).is_some() {
            return Err(PlaceError::Occupied { x, y });
        }
        self.set(x, y, Some(color));

        let opp = color.opponent();
        let mut total_captures = 0;
        let mut to_remove: Vec<Point> = Vec::new();
        let adjacent: Vec<Point> = self.neighbors(x, y).collect();
        for (nx, ny) in adjacent {
            if self.get(nx, ny) == Some(opp)
                && !to_remove.contains(&(nx, ny))
                && self.group_liberties(nx, ny) == 0
            {
                total_captures += self.collect_group(nx, ny, &mut to_remove);
            }
        }
        for (rx, ry) in to_remove {
            self.set(rx, ry, None);
        }

        if total_captures == 0 && self.group_liberties(x, y) == 0 {
            self.set(x, y, None);
            return Err(PlaceError::NoLiberties { x, y });
        }
        Ok(total_captures)
    }

    /// Same verdict as [`Board::place`] without touching the board.
    pub fn check(&self, x: usize, y: usize, color: Color) -> Result<usize, PlaceError> {
        self.clone().place(x, y, color)
    }

    fn collect_group(&self, x: usize, y: usize, out: &mut Vec<Point>) -> usize {
        let Some(color) = self.get(x, y) else {
            return 0;
        };
        let mut stack = vec![(x, y)];
        let mut visited = vec![false; self.area()];
        let mut count = 0;
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if self.get(cx, cy) == Some(color) {
                out.push((cx, cy));
                count += 1;
                for (nx, ny) in self.neighbors(cx, cy) {
                    let ni = self.idx(nx, ny);
                    if !visited[ni] && self.get(nx, ny) == Some(color) {
                        stack.push((nx, ny));
                    }
                }
            }
        }
        count
    }

    fn group_liberties(&self, x: usize, y: usize) -> usize {
        let Some(color) = self.get(x, y) else {
            return 0;
        };
        let mut stack = vec![(x, y)];
        let mut visited = vec![false; self.area()];
        let mut liberty_seen = vec![false; self.area()];
        let mut liberties = 0;
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            for (nx, ny) in self.neighbors(cx, cy) {
                let ni = self.idx(nx, ny);
                match self.get(nx, ny) {
                    None if !liberty_seen[ni] => {
                        liberty_seen[ni] = true;
                        liberties += 1;
                    }
                    Some(c) if c == color && !visited[ni] => stack.push((nx, ny)),
                    _ => {}
                }
            }
        }
        liberties
    }

    /// Colour of the stones around an empty point whose neighbours all share
    /// one colour. Not necessarily a true eye.
    pub fn is_eyeish(&self, x: usize, y: usize) -> Option<Color> {
        if self.get(x, y).is_some() {
            return None;
        }
        let mut eyecolor = None;
        for (nx, ny) in self.neighbors(x, y) {
            match (self.get(nx, ny), eyecolor) {
                (None, _) => return None,
                (Some(c), None) => eyecolor = Some(c),
                (Some(c), Some(e)) if c != e => return None,
                _ => {}
            }
        }
        eyecolor
    }

    /// True eye of `color`: eyeish, and at most one diagonal held by the
    /// opponent away from the edge, none on the edge.
    pub fn is_eye(&self, x: usize, y: usize, color: Color) -> bool {
        if self.is_eyeish(x, y) != Some(color) {
            return false;
        }
        let (diagonals, at_edge) = self.diagonals(x, y);
        let mut false_count = usize::from(at_edge);
        for (dx, dy) in diagonals {
            if self.get(dx, dy) == Some(color.opponent()) {
                false_count += 1;
            }
        }
        false_count < 2
    }

    /// Filling one's own true eye.
    pub fn is_dumb_eye_filling(&self, x: usize, y: usize, color: Color) -> bool {
        self.is_eye(x, y, color)
    }

    /// Filling half of a two-point eye enclosed by `color`.
    pub fn is_dumb_2eye_filling(&self, x: usize, y: usize, color: Color) -> bool {
        if self.get(x, y).is_some() {
            return false;
        }
        let mut partner = None;
        let mut walls = 0;
        for (nx, ny) in self.neighbors(x, y) {
            match self.get(nx, ny) {
                None if partner.is_none() => partner = Some((nx, ny)),
                None => return false,
                Some(c) if c == color => walls += 1,
                Some(_) => return false,
            }
        }
        let Some((px, py)) = partner else {
            return false;
        };
        for (nx, ny) in self.neighbors(px, py) {
            if (nx, ny) == (x, y) {
                continue;
            }
            match self.get(nx, ny) {
                Some(c) if c == color => walls += 1,
                _ => return false,
            }
        }
        walls > 0
    }

    fn is_dumb(&self, x: usize, y: usize, color: Color) -> bool {
        self.is_dumb_eye_filling(x, y, color) || self.is_dumb_2eye_filling(x, y, color)
    }

    /// Doubled area score of `mover`, net of komi, clamped to `0..=2*area`.
    ///
    /// Stones count for their owner, empty regions bordered by one colour
    /// only count for that colour, and every other empty point counts half
    /// for each side. The two players' scores always sum to `2 * area`.
    pub fn territory_doubled(&self, mover: Color, settings: &Settings) -> u32 {
        let mut own = 0i64;
        let mut neutral = 0i64;
        let mut visited = vec![false; self.area()];
        for (x, y) in self.points() {
            match self.get(x, y) {
                Some(c) if c == mover => own += 1,
                Some(_) => {}
                None => {
                    if visited[self.idx(x, y)] {
                        continue;
                    }
                    let (size, owner) = self.empty_region(x, y, &mut visited);
                    match owner {
                        Some(c) if c == mover => own += size as i64,
                        Some(_) => {}
                        None => neutral += size as i64,
                    }
                }
            }
        }
        let komi = match mover {
            Color::White => settings.komi2() as i64,
            Color::Black => -(settings.komi2() as i64),
        };
        let score = 2 * own + neutral + komi;
        score.clamp(0, 2 * self.area() as i64) as u32
    }

    /// Size of the empty region containing `(x, y)` and the single colour
    /// bordering it, if there is exactly one.
    fn empty_region(&self, x: usize, y: usize, visited: &mut [bool]) -> (usize, Option<Color>) {
        let mut stack = vec![(x, y)];
        let mut size = 0;
        let mut black = false;
        let mut white = false;
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            size += 1;
            for (nx, ny) in self.neighbors(cx, cy) {
                match self.get(nx, ny) {
                    None => {
                        if !visited[self.idx(nx, ny)] {
                            stack.push((nx, ny));
                        }
                    }
                    Some(Color::Black) => black = true,
                    Some(Color::White) => white = true,
                }
            }
        }
        let owner = match (black, white) {
            (true, false) => Some(Color::Black),
            (false, true) => Some(Color::White),
            _ => None,
        };
        (size, owner)
    }

    /// Neither side has a legal move other than filling its own eyes.
    pub fn is_game_end(&self) -> bool {
        [Color::Black, Color::White].into_iter().all(|color| {
            self.points()
                .all(|(x, y)| self.check(x, y, color).is_err() || self.is_dumb(x, y, color))
        })
    }

    /// Capturing moves for `color`, most stones captured first.
    pub fn eat_candidates(&self, color: Color) -> Vec<(Point, usize)> {
        let mut out: Vec<(Point, usize)> = self
            .points()
            .filter_map(|(x, y)| match self.check(x, y, color) {
                Ok(captures) if captures > 0 => Some(((x, y), captures)),
                _ => None,
            })
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }

    /// Legal moves for `color` that do not fill its own eyes, shuffled.
    pub fn legal_moves_random_order(
        &self,
        color: Color,
        rng: &mut fastrand::Rng,
    ) -> std::vec::IntoIter<Point> {
        let mut moves: Vec<Point> = self
            .points()
            .filter(|&(x, y)| self.check(x, y, color).is_ok() && !self.is_dumb(x, y, color))
            .collect();
        rng.shuffle(&mut moves);
        moves.into_iter()
    }

    /// The board seen through `t`.
    pub fn transformed(&self, t: Transform) -> Board {
        let (w, h) = t.apply_dims(self.width, self.height);
        let mut out = Board::new(w, h);
        for (x, y) in self.points() {
            let (tx, ty) = t.apply((x, y), self.width, self.height);
            let stone = self.get(x, y).map(|c| t.apply_color(c));
            out.set(tx, ty, stone);
        }
        out
    }

    /// Smallest-key image of the board and the transform that produces it.
    pub fn canonicalize(&self, allow_color_flip: bool) -> (Board, Transform) {
        let mut best: Option<(u128, Board, Transform)> = None;
        for t in Transform::all(self.width, self.height, allow_color_flip) {
            let image = self.transformed(t);
            let key = image.key();
            if best.as_ref().is_none_or(|(k, _, _)| key < *k) {
                best = Some((key, image, t));
            }
        }
        match best {
            Some((_, board, t)) => (board, t),
            None => (self.clone(), Transform::IDENTITY),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.get(x, y) {
                    Some(Color::Black) => CHAR_BLACK,
                    Some(Color::White) => CHAR_WHITE,
                    None => CHAR_EMPTY,
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(w: usize, h: usize, rows: &[&str]) -> Board {
        let s = Settings::new(w, h, 0).unwrap();
        Board::from_rows(&s, rows).unwrap()
    }

    #[test]
    fn test_single_point_board_has_no_legal_move() {
        let b = board(1, 1, &["."]);
        assert_eq!(
            b.check(0, 0, Color::Black),
            Err(PlaceError::NoLiberties { x: 0, y: 0 })
        );
        assert!(b.is_game_end());
    }

    #[test]
    fn test_capture_on_two_point_board() {
        let mut b = board(2, 1, &["X."]);
        assert_eq!(b.place(1, 0, Color::White), Ok(1));
        assert_eq!(b.get(0, 0), None);
        assert_eq!(b.get(1, 0), Some(Color::White));
        assert_eq!(
            b.place(1, 0, Color::Black),
            Err(PlaceError::Occupied { x: 1, y: 0 })
        );
    }

    #[test]
    fn test_suicide_is_rejected_and_undone() {
        let mut b = board(2, 2, &["XX", "X."]);
        assert_eq!(
            b.place(1, 1, Color::White),
            Err(PlaceError::NoLiberties { x: 1, y: 1 })
        );
        assert_eq!(b.get(1, 1), None);
    }

    #[test]
    fn test_eyes() {
        let b = board(3, 3, &["X.X", "XXX", "..."]);
        assert_eq!(b.is_eyeish(1, 0), Some(Color::Black));
        assert!(b.is_eye(1, 0, Color::Black));
        assert!(b.is_dumb_eye_filling(1, 0, Color::Black));
        assert!(!b.is_eye(1, 0, Color::White));

        let b = board(3, 3, &["X.X", "OXX", "..."]);
        // edge eye with a hostile diagonal is false
        assert!(!b.is_eye(1, 0, Color::Black));
    }

    #[test]
    fn test_two_point_eye() {
        let b = board(2, 2, &["XX", ".."]);
        assert!(b.is_dumb_2eye_filling(0, 1, Color::Black));
        assert!(!b.is_dumb_2eye_filling(0, 1, Color::White));
        let b = board(2, 1, &[".."]);
        assert!(!b.is_dumb_2eye_filling(0, 0, Color::Black));
    }

    #[test]
    fn test_territory_sums_to_board() {
        let s = Settings::new(3, 3, 3).unwrap();
        let b = Board::from_rows(&s, &[".X.", "XXO", ".O."]).unwrap();
        let black = b.territory_doubled(Color::Black, &s);
        let white = b.territory_doubled(Color::White, &s);
        assert_eq!(black + white, s.max_score());
        // black: 3 stones + corner; white: 2 stones + corner; two neutral
        assert_eq!(black, 2 * 4 + 2 - 3);
    }

    #[test]
    fn test_territory_clamps_with_large_komi() {
        let s = Settings::new(1, 1, 9).unwrap();
        let b = Board::empty(&s);
        assert_eq!(b.territory_doubled(Color::Black, &s), 0);
        assert_eq!(b.territory_doubled(Color::White, &s), 2);
    }

    #[test]
    fn test_eat_candidates_prefer_bigger_captures() {
        let b = board(3, 3, &[".OX", "OOX", "XX."]);
        let eats = b.eat_candidates(Color::Black);
        assert_eq!(eats, vec![((0, 0), 3)]);
        // white takes both black groups at once
        let eats = b.eat_candidates(Color::White);
        assert_eq!(eats, vec![((2, 2), 4)]);
    }

    #[test]
    fn test_key_orders_base3() {
        let b = board(2, 1, &[".X"]);
        assert_eq!(b.key(), 1);
        let b = board(2, 1, &["O."]);
        assert_eq!(b.key(), 6);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let s = Settings::new(3, 3, 0).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let mut b = Board::empty(&s);
            for _ in 0..5 {
                let x = rng.usize(0..3);
                let y = rng.usize(0..3);
                let c = if rng.bool() { Color::Black } else { Color::White };
                let _ = b.place(x, y, c);
            }
            let (canon, t) = b.canonicalize(true);
            assert_eq!(b.transformed(t), canon);
            let (again, _) = canon.canonicalize(true);
            assert_eq!(again, canon);
            assert_eq!(again.key(), canon.key());
            // any symmetric image shares the canonical form
            let image = b.transformed(Transform::new(1, true, true));
            assert_eq!(image.canonicalize(true).0, canon);
        }
    }
}
