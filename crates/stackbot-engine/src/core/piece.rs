use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};

/// A piece instance: a shape kind, a rotation state and a bounding box anchor.
///
/// `row` and `column` locate the top-left corner of the kind's square bounding box on the
/// board. The anchor may lie outside the board (a vertical I-piece hangs its empty
/// columns past the wall) as long as no occupied cell does.
///
/// Pieces are values. Transitions such as [`Piece::moved_left`] return a new piece or
/// `None` when the move is rejected; the `move_*` and [`Piece::rotate`] wrappers apply
/// the same transitions in place and report whether they did.
///
/// # Example
///
/// ```
/// use stackbot_engine::{Board, Piece, PieceKind};
///
/// let board = Board::standard();
/// let piece = Piece::spawn(PieceKind::T, &board);
/// let rotated = piece.rotated(&board).unwrap();
/// let landed = rotated.dropped(&board);
/// assert!(!landed.can_move_down(&board));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
    row: i32,
    column: i32,
}

impl Piece {
    /// Creates a piece, reducing `rotation` modulo the kind's rotation count.
    #[must_use]
    pub fn new(kind: PieceKind, rotation: usize, row: i32, column: i32) -> Self {
        Self {
            kind,
            rotation: kind.normalize_rotation(rotation),
            row,
            column,
        }
    }

    /// Places a piece of `kind` at the spawn position of `board`: row 0, horizontally
    /// centered bounding box.
    #[must_use]
    pub fn spawn(kind: PieceKind, board: &Board) -> Self {
        let column = (board.columns_i32() - i32::from(kind.dimension())) / 2;
        Self::new(kind, 0, 0, column)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        usize::from(self.rotation)
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.column
    }

    /// Bounding box side length.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.pattern().dimension()
    }

    /// Cell pattern of the current rotation.
    #[must_use]
    pub fn pattern(&self) -> &'static Pattern {
        &self.kind.rotations()[self.rotation()]
    }

    /// Absolute `(row, column)` of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.pattern()
            .occupied_offsets()
            .map(move |(dr, dc)| (self.row + dr, self.column + dc))
    }

    /// Same kind and rotation, anchored elsewhere.
    #[must_use]
    pub fn with_position(&self, row: i32, column: i32) -> Self {
        Self {
            row,
            column,
            ..*self
        }
    }

    /// Same kind and anchor, `rotation` reduced modulo the rotation count.
    #[must_use]
    pub fn with_rotation(&self, rotation: usize) -> Self {
        Self {
            rotation: self.kind.normalize_rotation(rotation),
            ..*self
        }
    }

    fn shifted(&self, d_row: i32, d_column: i32, board: &Board) -> Option<Self> {
        let piece = self.with_position(self.row + d_row, self.column + d_column);
        (!board.is_colliding(piece)).then_some(piece)
    }

    #[must_use]
    pub fn moved_left(&self, board: &Board) -> Option<Self> {
        self.shifted(0, -1, board)
    }

    #[must_use]
    pub fn moved_right(&self, board: &Board) -> Option<Self> {
        self.shifted(0, 1, board)
    }

    #[must_use]
    pub fn moved_down(&self, board: &Board) -> Option<Self> {
        self.shifted(1, 0, board)
    }

    #[must_use]
    pub fn can_move_left(&self, board: &Board) -> bool {
        self.moved_left(board).is_some()
    }

    #[must_use]
    pub fn can_move_right(&self, board: &Board) -> bool {
        self.moved_right(board).is_some()
    }

    #[must_use]
    pub fn can_move_down(&self, board: &Board) -> bool {
        self.moved_down(board).is_some()
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.apply(self.moved_left(board))
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.apply(self.moved_right(board))
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.apply(self.moved_down(board))
    }

    /// Advances to the next rotation pattern in place.
    ///
    /// The rotation keeps the anchor; there is no wall kick. A rejected rotation leaves
    /// the piece unchanged and returns `false`.
    pub fn rotate(&mut self, board: &Board) -> bool {
        self.apply(self.rotated(board))
    }

    /// Next rotation pattern at the same anchor, or `None` if it collides.
    #[must_use]
    pub fn rotated(&self, board: &Board) -> Option<Self> {
        let piece = self.with_rotation(self.rotation() + 1);
        (!board.is_colliding(piece)).then_some(piece)
    }

    /// Moves straight down until blocked.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while dropped.move_down(board) {}
        dropped
    }

    fn apply(&mut self, next: Option<Self>) -> bool {
        match next {
            Some(piece) => {
                *self = piece;
                true
            }
            None => false,
        }
    }
}

/// Compact text form `"kind#rotation@row,column"`, e.g. `"T#1@0,3"`.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.row,
            self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece '{input}': {reason}")]
pub struct ParsePieceError {
    input: String,
    reason: &'static str,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &'static str| ParsePieceError {
            input: s.to_owned(),
            reason,
        };

        let (kind, rest) = s
            .split_once('#')
            .ok_or_else(|| error("expected format 'kind#rotation@row,column'"))?;
        let (rotation, position) = rest
            .split_once('@')
            .ok_or_else(|| error("missing '@' before the position"))?;
        let (row, column) = position
            .split_once(',')
            .ok_or_else(|| error("missing ',' between row and column"))?;

        let mut chars = kind.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or_else(|| error("unknown kind"))?,
            _ => return Err(error("kind must be a single character")),
        };
        let rotation = rotation
            .parse::<usize>()
            .map_err(|_| error("invalid rotation"))?;
        if rotation >= kind.rotation_count() {
            return Err(error("rotation out of range for kind"));
        }
        let row = row.parse().map_err(|_| error("invalid row"))?;
        let column = column.parse().map_err(|_| error("invalid column"))?;

        Ok(Piece::new(kind, rotation, row, column))
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The seven piece shapes.
///
/// Discriminants are the table order O, J, L, Z, S, T, I, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    O = 0,
    J = 1,
    L = 2,
    Z = 3,
    S = 4,
    T = 5,
    I = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::O,
        Self::J,
        Self::L,
        Self::Z,
        Self::S,
        Self::T,
        Self::I,
    ];

    /// Ordered rotation patterns; pattern `k + 1` is pattern `k` turned clockwise.
    ///
    /// ```
    /// use stackbot_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.rotations().len(), 1);
    /// assert_eq!(PieceKind::I.rotations().len(), 2);
    /// assert_eq!(PieceKind::T.rotations().len(), 4);
    /// ```
    #[must_use]
    pub fn rotations(self) -> &'static [Pattern] {
        let (_, count, _) = SHAPE_TABLE[self as usize];
        &PIECE_PATTERNS[self as usize][..count]
    }

    #[must_use]
    pub fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    /// Bounding box side length: 2 for O, 4 for I, 3 otherwise.
    #[must_use]
    pub fn dimension(self) -> u8 {
        PIECE_PATTERNS[self as usize][0].dimension
    }

    /// RGB color written into the board when a piece of this kind locks.
    #[must_use]
    pub fn color(self) -> Cell {
        SHAPE_TABLE[self as usize].2
    }

    #[expect(clippy::cast_possible_truncation)]
    fn normalize_rotation(self, rotation: usize) -> u8 {
        (rotation % self.rotation_count()) as u8
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::I => 'I',
        }
    }

    /// Parses a piece kind from its letter.
    ///
    /// ```
    /// use stackbot_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(PieceKind::O),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'I' => Some(PieceKind::I),
            _ => None,
        }
    }
}

/// Square cell pattern of one rotation state.
///
/// Only the top-left `dimension × dimension` corner of the 4×4 storage is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    dimension: u8,
    cells: [[Cell; 4]; 4],
}

impl Pattern {
    #[must_use]
    pub fn dimension(&self) -> usize {
        usize::from(self.dimension)
    }

    /// Cell at `(row, column)` inside the bounding box; empty outside it.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        if row < self.dimension() && column < self.dimension() {
            self.cells[row][column]
        } else {
            Cell::EMPTY
        }
    }

    /// `(row, column)` offsets of the occupied cells, row-major.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.dimension).flat_map(move |r| {
            (0..self.dimension).filter_map(move |c| {
                let cell = self.cells[usize::from(r)][usize::from(c)];
                (!cell.is_empty()).then_some((i32::from(r), i32::from(c)))
            })
        })
    }
}

/// Turns `pattern` clockwise three times, producing all four states.
const fn pattern_rotations(pattern: Pattern) -> [Pattern; 4] {
    let size = pattern.dimension as usize;
    let mut rotations = [pattern; 4];
    let mut i = 1;
    while i < 4 {
        let mut cells = [[Cell::EMPTY; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                cells[y][x] = rotations[i - 1].cells[size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotations[i] = Pattern {
            dimension: pattern.dimension,
            cells,
        };
        i += 1;
    }
    rotations
}

/// Spawn pattern rows (`#` occupied), distinct rotation count and color per kind.
const SHAPE_TABLE: [(&[&str], usize, Cell); PieceKind::LEN] = [
    (&["##", "##"], 1, Cell::new(0x00_00_AA)),
    (&["#..", "###", "..."], 4, Cell::new(0xC0_C0_C0)),
    (&["..#", "###", "..."], 4, Cell::new(0xAA_00_AA)),
    (&["##.", ".##", "..."], 2, Cell::new(0x00_AA_AA)),
    (&[".##", "##.", "..."], 2, Cell::new(0x00_AA_00)),
    (&[".#.", "###", "..."], 4, Cell::new(0xAA_55_00)),
    (&["....", "####", "....", "...."], 2, Cell::new(0xAA_00_00)),
];

const fn spawn_pattern(rows: &[&str], color: Cell) -> Pattern {
    let mut cells = [[Cell::EMPTY; 4]; 4];
    let mut y = 0;
    while y < rows.len() {
        let bytes = rows[y].as_bytes();
        let mut x = 0;
        while x < bytes.len() {
            if bytes[x] == b'#' {
                cells[y][x] = color;
            }
            x += 1;
        }
        y += 1;
    }
    #[expect(clippy::cast_possible_truncation)]
    let dimension = rows.len() as u8;
    Pattern { dimension, cells }
}

static PIECE_PATTERNS: [[Pattern; 4]; PieceKind::LEN] = {
    let mut patterns = [[Pattern {
        dimension: 0,
        cells: [[Cell::EMPTY; 4]; 4],
    }; 4]; PieceKind::LEN];
    let mut i = 0;
    while i < PieceKind::LEN {
        let (rows, _, color) = SHAPE_TABLE[i];
        patterns[i] = pattern_rotations(spawn_pattern(rows, color));
        i += 1;
    }
    patterns
};
