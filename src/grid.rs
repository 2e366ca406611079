//! Manhattan lattice of road intersections.
//!
//! Cells are addressed either by lattice coordinates `(i, j)` with
//! `0 <= i, j < N` or by the linear index `i + j * N`. Cell centers sit at
//! their integer coordinates, so the continuous plane and the lattice share
//! units.

use crate::direction::Direction;
use crate::error::{Error, Result};

/// A point in the continuous plane (lattice units).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// An `N x N` grid with 4-neighbor road adjacency.
///
/// Adjacency is precomputed at construction; the grid is immutable after.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: usize,
    /// adjacency[cell] = in-bounds neighbors in North, East, South, West order
    adjacency: Vec<Vec<usize>>,
}

impl Grid {
    /// Build the lattice for side length `size`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidGridSize { size });
        }
        let cells = size * size;
        let mut adjacency = Vec::with_capacity(cells);
        for cell in 0..cells {
            let (i, j) = (cell % size, cell / size);
            let neighbors = Direction::MOVES
                .iter()
                .filter_map(|&d| offset_within(size, i, j, d))
                .map(|(ni, nj)| ni + nj * size)
                .collect();
            adjacency.push(neighbors);
        }
        Ok(Self { size, adjacency })
    }

    /// Side length `N`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells `N²`.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.size * self.size
    }

    /// Linear index of `(i, j)`. Callers guarantee the coordinates are in range.
    #[inline]
    pub fn id(&self, i: usize, j: usize) -> usize {
        debug_assert!(self.contains(i, j));
        i + j * self.size
    }

    /// Lattice coordinates of a linear index.
    #[inline]
    pub fn coords(&self, cell: usize) -> (usize, usize) {
        (cell % self.size, cell / self.size)
    }

    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size
    }

    /// Continuous position of a cell center.
    #[inline]
    pub fn center(&self, cell: usize) -> Point {
        let (i, j) = self.coords(cell);
        Point::new(i as f64, j as f64)
    }

    /// Centers of all cells in index order.
    pub fn centers(&self) -> Vec<Point> {
        (0..self.num_cells()).map(|c| self.center(c)).collect()
    }

    /// In-bounds 4-neighbors of `cell`, North/East/South/West order.
    #[inline]
    pub fn neighbors(&self, cell: usize) -> &[usize] {
        &self.adjacency[cell]
    }

    /// Neighbor reached from `cell` by heading `dir`.
    ///
    /// `Stay` returns the cell itself; a move that leaves the grid returns `None`.
    #[inline]
    pub fn step(&self, cell: usize, dir: Direction) -> Option<usize> {
        let (i, j) = self.coords(cell);
        offset_within(self.size, i, j, dir).map(|(ni, nj)| ni + nj * self.size)
    }

    /// Validate a caller-supplied cell index.
    pub fn check_cell(&self, cell: usize) -> Result<()> {
        if cell < self.num_cells() {
            Ok(())
        } else {
            Err(Error::CellOutOfRange {
                cell,
                cells: self.num_cells(),
            })
        }
    }
}

/// Apply `dir` to `(i, j)` if the result stays inside a `size x size` lattice.
#[inline]
pub(crate) fn offset_within(
    size: usize,
    i: usize,
    j: usize,
    dir: Direction,
) -> Option<(usize, usize)> {
    let (di, dj) = dir.offset();
    let ni = i.checked_add_signed(di)?;
    let nj = j.checked_add_signed(dj)?;
    (ni < size && nj < size).then_some((ni, nj))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(Grid::new(0), Err(Error::InvalidGridSize { size: 0 }));
    }

    #[test]
    fn id_and_coords_are_inverse() {
        let g = Grid::new(7).unwrap();
        for j in 0..7 {
            for i in 0..7 {
                let id = g.id(i, j);
                assert_eq!(id, i + 7 * j);
                assert_eq!(g.coords(id), (i, j));
            }
        }
    }

    #[test]
    fn corner_edge_and_interior_degrees() {
        let g = Grid::new(4).unwrap();
        assert_eq!(g.neighbors(g.id(0, 0)), &[g.id(1, 0), g.id(0, 1)]);
        assert_eq!(g.neighbors(g.id(2, 0)).len(), 3);
        assert_eq!(
            g.neighbors(g.id(1, 1)),
            &[g.id(1, 0), g.id(2, 1), g.id(1, 2), g.id(0, 1)]
        );
    }

    #[test]
    fn single_cell_grid_has_no_roads() {
        let g = Grid::new(1).unwrap();
        assert_eq!(g.num_cells(), 1);
        assert!(g.neighbors(0).is_empty());
        assert_eq!(g.step(0, Direction::North), None);
        assert_eq!(g.step(0, Direction::Stay), Some(0));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = Grid::new(5).unwrap();
        for a in 0..g.num_cells() {
            for &b in g.neighbors(a) {
                assert!(g.neighbors(b).contains(&a), "{a} -> {b} missing reverse edge");
            }
        }
    }

    #[test]
    fn step_matches_headings() {
        let g = Grid::new(3).unwrap();
        let mid = g.id(1, 1);
        assert_eq!(g.step(mid, Direction::North), Some(g.id(1, 0)));
        assert_eq!(g.step(mid, Direction::East), Some(g.id(2, 1)));
        assert_eq!(g.step(mid, Direction::South), Some(g.id(1, 2)));
        assert_eq!(g.step(mid, Direction::West), Some(g.id(0, 1)));
        assert_eq!(g.step(g.id(2, 2), Direction::East), None);
        assert_eq!(g.center(g.id(2, 1)), Point::new(2.0, 1.0));
    }
}
