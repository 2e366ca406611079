//! Headings of the 5-direction motion model.

/// A heading on the lattice. `Stay` means "no displacement".
///
/// Coordinates follow screen convention: `j` grows southward, so North is
/// `(0, -1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Stay = 0,
    North = 1,
    East = 2,
    South = 3,
    West = 4,
}

impl Direction {
    /// Number of headings, i.e. the velocity factor of the state space.
    pub const COUNT: usize = 5;

    /// All headings in index order.
    pub const ALL: [Direction; 5] = [
        Direction::Stay,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The four moving headings in index order.
    pub const MOVES: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Direction::index`]; `None` outside `0..5`.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Unit lattice displacement `(di, dj)`.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Stay => (0, 0),
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    #[inline]
    pub fn is_stay(self) -> bool {
        self == Direction::Stay
    }
}
