use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH};

/// A falling tetromino: kind, rotation, anchor and a one-slot snapshot.
///
/// Pieces are values. Movement and rotation return new `Piece`s and never
/// look at the board; collision checks belong to the caller.
///
/// # Transactions
///
/// A tentative transform is wrapped as [`store`](Self::store) →
/// transform → collision test → [`revert`](Self::revert) on failure. The
/// snapshot is a copied [`PieceTransform`], so transforms applied after
/// `store` cannot touch it. It holds exactly one level of history.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.store().moved_left().rotated();
/// let restored = moved.revert();
/// assert_eq!(restored.transform(), piece.transform());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
    saved: Option<PieceTransform>,
}

impl Piece {
    /// Creates a piece in its first layout, centered at the top of the board.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let rotation = PieceRotation::default();
        let (min_col, max_col, min_row) = kind.layout(rotation).iter().fold(
            (i32::MAX, i32::MIN, i32::MAX),
            |(min_col, max_col, min_row), &(dcol, drow)| {
                (min_col.min(dcol), max_col.max(dcol), min_row.min(drow))
            },
        );
        let width = max_col - min_col + 1;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let board_width = BOARD_WIDTH as i32;
        let col = (board_width - width) / 2 - min_col;
        Self::new(kind, rotation, PiecePosition::new(-min_row, col))
    }

    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            kind,
            rotation: rotation.normalized(kind),
            position,
            saved: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// The current `(rotation, anchor)` pair.
    #[must_use]
    pub fn transform(&self) -> PieceTransform {
        PieceTransform {
            rotation: self.rotation,
            position: self.position,
        }
    }

    /// The snapshot taken by the last [`store`](Self::store), if any.
    #[must_use]
    pub fn saved(&self) -> Option<PieceTransform> {
        self.saved
    }

    /// Absolute board coordinates of the four occupied cells.
    #[must_use]
    pub fn cells(&self) -> [PiecePosition; 4] {
        self.kind
            .layout(self.rotation)
            .map(|(dcol, drow)| self.position.offset(drow, dcol))
    }

    /// Linear board positions of the occupied cells that lie inside the board.
    #[must_use]
    pub fn positions(&self) -> ArrayVec<usize, 4> {
        self.cells()
            .iter()
            .filter_map(|cell| cell.to_index())
            .collect()
    }

    #[must_use]
    pub fn top_row(&self) -> i32 {
        self.cells().iter().map(|c| c.row).min().unwrap_or_default()
    }

    #[must_use]
    pub fn bottom_row(&self) -> i32 {
        self.cells().iter().map(|c| c.row).max().unwrap_or_default()
    }

    #[must_use]
    pub fn left_col(&self) -> i32 {
        self.cells().iter().map(|c| c.col).min().unwrap_or_default()
    }

    #[must_use]
    pub fn right_col(&self) -> i32 {
        self.cells().iter().map(|c| c.col).max().unwrap_or_default()
    }

    /// Returns `true` if every occupied cell lies on the board.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.cells().iter().all(|cell| cell.to_index().is_some())
    }

    #[must_use]
    pub fn moved_left(&self) -> Self {
        self.with_position(self.position.offset(0, -1))
    }

    #[must_use]
    pub fn moved_right(&self) -> Self {
        self.with_position(self.position.offset(0, 1))
    }

    #[must_use]
    pub fn moved_down(&self) -> Self {
        self.with_position(self.position.offset(1, 0))
    }

    /// Advances to the next layout in the kind's rotation cycle.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(self.kind),
            ..*self
        }
    }

    /// Returns this piece with its snapshot set to the current transform.
    #[must_use]
    pub fn store(&self) -> Self {
        Self {
            saved: Some(self.transform()),
            ..*self
        }
    }

    /// Returns this piece with the transform restored from the snapshot.
    ///
    /// Without a snapshot the piece is returned unchanged.
    #[must_use]
    pub fn revert(&self) -> Self {
        match self.saved {
            Some(PieceTransform { rotation, position }) => Self {
                rotation,
                position,
                ..*self
            },
            None => *self,
        }
    }

    /// Drops the snapshot once a transaction has been resolved.
    #[must_use]
    pub fn clear_store(&self) -> Self {
        Self {
            saved: None,
            ..*self
        }
    }

    fn with_position(&self, position: PiecePosition) -> Self {
        Self { position, ..*self }
    }
}

/// The `(rotation, anchor)` pair captured by [`Piece::store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTransform {
    pub rotation: PieceRotation,
    pub position: PiecePosition,
}

/// A board coordinate, or the anchor of a piece.
///
/// Coordinates are signed because tentative transforms may leave the board
/// before the collision test rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiecePosition {
    pub row: i32,
    pub col: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, drow: i32, dcol: i32) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }

    /// Converts to a linear board position, or `None` if off the board.
    #[must_use]
    pub fn to_index(self) -> Option<usize> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < BOARD_HEIGHT && col < BOARD_WIDTH).then_some(row * BOARD_WIDTH + col)
    }
}

/// Index into a kind's rotation cycle.
///
/// Kinds have one (O), two (I, S, Z) or four (T, J, L) layouts; advancing
/// past the last layout wraps to the first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    const fn normalized(self, kind: PieceKind) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let count = kind.layout_count() as u8;
        Self(self.0 % count)
    }

    #[must_use]
    fn next(self, kind: PieceKind) -> Self {
        Self(self.0 + 1).normalized(kind)
    }
}

/// Offsets `(dcol, drow)` of the four cells within a piece's 4×4 box.
type Layout = [(i32, i32); 4];

/// The tetromino catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Number of distinct layouts in this kind's rotation cycle.
    #[must_use]
    pub const fn layout_count(self) -> usize {
        LAYOUTS[self as usize].len()
    }

    fn layout(self, rotation: PieceRotation) -> Layout {
        LAYOUTS[self as usize][rotation.index()]
    }

    /// Single-letter name, used in log output.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

// Indexed by `PieceKind as usize`, then by rotation.
const LAYOUTS: [&[Layout]; PieceKind::LEN] = [
    // I-piece
    &[
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O-piece
    &[[(0, 0), (1, 0), (0, 1), (1, 1)]],
    // T-piece
    &[
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S-piece
    &[
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z-piece
    &[
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J-piece
    &[
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L-piece
    &[
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_every_layout_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for index in 0..kind.layout_count() {
                #[expect(clippy::cast_possible_truncation)]
                let layout = kind.layout(PieceRotation::new(index as u8));
                let distinct: HashSet<_> = layout.iter().collect();
                assert_eq!(distinct.len(), 4, "{kind:?} layout {index}");
            }
        }
    }

    #[test]
    fn test_layout_counts() {
        assert_eq!(PieceKind::I.layout_count(), 2);
        assert_eq!(PieceKind::O.layout_count(), 1);
        assert_eq!(PieceKind::S.layout_count(), 2);
        assert_eq!(PieceKind::Z.layout_count(), 2);
        assert_eq!(PieceKind::T.layout_count(), 4);
        assert_eq!(PieceKind::J.layout_count(), 4);
        assert_eq!(PieceKind::L.layout_count(), 4);
    }

    #[test]
    fn test_spawn_is_on_board_touching_top() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            assert!(piece.is_within_bounds(), "{kind:?}");
            assert_eq!(piece.top_row(), 0, "{kind:?}");
            assert_eq!(piece.rotation(), PieceRotation::default());
            assert!(piece.saved().is_none());
        }
    }

    #[test]
    fn test_spawn_is_horizontally_centered() {
        let i = Piece::spawn(PieceKind::I);
        assert_eq!((i.left_col(), i.right_col()), (3, 6));

        let o = Piece::spawn(PieceKind::O);
        assert_eq!((o.left_col(), o.right_col()), (4, 5));

        let t = Piece::spawn(PieceKind::T);
        assert_eq!((t.left_col(), t.right_col()), (3, 5));
    }

    #[test]
    fn test_moves_shift_bounding_box() {
        let piece = Piece::spawn(PieceKind::T);

        let left = piece.moved_left();
        assert_eq!(left.left_col(), piece.left_col() - 1);
        assert_eq!(left.right_col(), piece.right_col() - 1);

        let right = piece.moved_right();
        assert_eq!(right.left_col(), piece.left_col() + 1);

        let down = piece.moved_down();
        assert_eq!(down.top_row(), piece.top_row() + 1);
        assert_eq!(down.bottom_row(), piece.bottom_row() + 1);
    }

    #[test]
    fn test_moves_do_not_check_bounds() {
        let mut piece = Piece::spawn(PieceKind::O);
        for _ in 0..10 {
            piece = piece.moved_left();
        }
        assert!(piece.left_col() < 0);
        assert!(!piece.is_within_bounds());
        assert!(piece.positions().len() < 4);
    }

    #[test]
    fn test_rotation_cycle_wraps() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            let mut rotated = piece;
            for _ in 0..kind.layout_count() {
                rotated = rotated.rotated();
            }
            assert_eq!(rotated.transform(), piece.transform(), "{kind:?}");
        }
    }

    #[test]
    fn test_i_piece_rotates_between_horizontal_and_vertical() {
        let horizontal = Piece::spawn(PieceKind::I);
        assert_eq!(horizontal.top_row(), horizontal.bottom_row());

        let vertical = horizontal.rotated();
        assert_eq!(vertical.left_col(), vertical.right_col());
        assert_eq!(vertical.bottom_row() - vertical.top_row(), 3);
    }

    #[test]
    fn test_store_and_revert_restore_transform() {
        let piece = Piece::spawn(PieceKind::L).moved_down();
        let stored = piece.store();
        assert_eq!(stored.saved(), Some(piece.transform()));

        let moved = stored.moved_right().rotated().moved_down();
        assert_ne!(moved.transform(), piece.transform());
        assert_eq!(moved.saved(), Some(piece.transform()));

        let reverted = moved.revert();
        assert_eq!(reverted.transform(), piece.transform());
    }

    #[test]
    fn test_store_is_single_slot() {
        let first = Piece::spawn(PieceKind::J);
        let second = first.store().moved_down();
        let third = second.store().moved_down();

        assert_eq!(third.revert().transform(), second.transform());
        assert_eq!(third.revert().revert().transform(), second.transform());
    }

    #[test]
    fn test_revert_without_store_is_identity() {
        let piece = Piece::spawn(PieceKind::S).moved_left();
        assert_eq!(piece.revert(), piece);
    }

    #[test]
    fn test_clear_store() {
        let piece = Piece::spawn(PieceKind::Z);
        let stored = piece.store().moved_down();
        let cleared = stored.clear_store();
        assert!(cleared.saved().is_none());
        assert_eq!(cleared.revert(), cleared);
    }

    #[test]
    fn test_positions_are_row_major() {
        let piece = Piece::new(
            PieceKind::O,
            PieceRotation::default(),
            PiecePosition::new(18, 0),
        );
        let positions = piece.positions();
        assert_eq!(positions.as_slice(), &[180, 181, 190, 191]);
    }

    #[test]
    fn test_to_index_rejects_outside_cells() {
        assert_eq!(PiecePosition::new(0, 0).to_index(), Some(0));
        assert_eq!(PiecePosition::new(19, 9).to_index(), Some(199));
        assert_eq!(PiecePosition::new(-1, 0).to_index(), None);
        assert_eq!(PiecePosition::new(0, -1).to_index(), None);
        assert_eq!(PiecePosition::new(20, 0).to_index(), None);
        assert_eq!(PiecePosition::new(0, 10).to_index(), None);
    }

    #[test]
    fn test_random_kind_covers_catalog() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let kind: PieceKind = rng.random();
            seen.insert(kind);
        }
        assert_eq!(seen.len(), PieceKind::LEN);
    }
}
