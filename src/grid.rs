//! The board engine: tile states, queen placement and attack resolution.
//!
//! A [`Grid`] is an `n × n` matrix of [`TileState`]s. Placing a queen marks
//! every tile on the same row, column and both diagonals as
//! [`TileState::Dotted`]. Queens never block one another's lines, so the
//! attacked set only depends on the queen's coordinates and the board size.

use std::fmt;

/// Errors raised by state-mutating grid operations.
///
/// Nothing is written to the board when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("tile ({row}, {col}) is outside a {size}x{size} board")]
    InvalidCoordinate { row: usize, col: usize, size: usize },
    #[error("unknown tile state code {0}")]
    InvalidState(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TileState {
    #[default]
    Empty = 0,
    Dotted = 1,
    Queen = 2,
}

impl TileState {
    /// Numeric code used when a board is flattened into a string.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TileState {
    type Error = GridError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TileState::Empty),
            1 => Ok(TileState::Dotted),
            2 => Ok(TileState::Queen),
            other => Err(GridError::InvalidState(other)),
        }
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    tiles: Vec<Vec<TileState>>,
}

impl Grid {
    /// Creates an empty `size × size` board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "grid size must be at least 1");
        Self {
            size,
            tiles: vec![vec![TileState::Empty; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn max_idx(&self) -> usize {
        self.size - 1
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row < self.size && col < self.size {
            Ok(())
        } else {
            Err(GridError::InvalidCoordinate {
                row,
                col,
                size: self.size,
            })
        }
    }

    /// Row slices of the board.
    pub fn tiles(&self) -> &[Vec<TileState>] {
        &self.tiles
    }

    /// The board in row-major order.
    pub fn flat_tiles(&self) -> Vec<TileState> {
        self.tiles.iter().flatten().copied().collect()
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<TileState> {
        self.tiles.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn set_tile_state(
        &mut self,
        row: usize,
        col: usize,
        state: TileState,
    ) -> Result<(), GridError> {
        self.check_bounds(row, col)?;
        self.tiles[row][col] = state;
        Ok(())
    }

    /// Like [`Grid::set_tile_state`], but takes the raw numeric state code.
    pub fn set_tile_code(&mut self, row: usize, col: usize, code: u8) -> Result<(), GridError> {
        let state = TileState::try_from(code)?;
        self.set_tile_state(row, col, state)
    }

    /// Places a queen and dots every tile it attacks.
    ///
    /// Returns the attacked tiles (the queen's own tile excluded) in the
    /// order horizontal, vertical, descending diagonal, ascending diagonal.
    /// Tiles that were already dotted or held a queen are overwritten.
    pub fn place_queen(&mut self, row: usize, col: usize) -> Result<Vec<(usize, usize)>, GridError> {
        self.check_bounds(row, col)?;
        self.tiles[row][col] = TileState::Queen;

        let attacked = self.attacked_tiles(row, col);
        for &(r, c) in &attacked {
            self.tiles[r][c] = TileState::Dotted;
        }
        Ok(attacked)
    }

    /// Every tile attacked by a queen at `(row, col)`.
    pub fn attacked_tiles(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut coords = self.horizontal_coords(row, col);
        coords.extend(self.vertical_coords(row, col));
        coords.extend(self.descending_diagonal_coords(row, col));
        coords.extend(self.ascending_diagonal_coords(row, col));
        coords
    }

    pub fn horizontal_coords(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        (0..self.size).filter(|&i| i != col).map(|i| (row, i)).collect()
    }

    pub fn vertical_coords(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        (0..self.size).filter(|&i| i != row).map(|i| (i, col)).collect()
    }

    /// Top-left end of the `row - col` diagonal through `(row, col)`.
    ///
    /// `None` for the two corners whose descending diagonal is the tile
    /// itself: `(max, 0)` and `(0, max)`.
    pub fn descending_diagonal_start(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let max = self.max_idx();
        if (row == max && col == 0) || (row == 0 && col == max) {
            return None;
        }
        if row < col {
            Some((0, col - row))
        } else {
            Some((row - col, 0))
        }
    }

    /// Bottom-left end of the `row + col` diagonal through `(row, col)`.
    ///
    /// `None` for the two corners whose ascending diagonal is the tile
    /// itself: `(0, 0)` and `(max, max)`.
    pub fn ascending_diagonal_start(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let max = self.max_idx();
        if (row == 0 && col == 0) || (row == max && col == max) {
            return None;
        }
        let sum = row + col;
        if sum >= max {
            Some((max, sum - max))
        } else {
            Some((sum, 0))
        }
    }

    pub fn descending_diagonal_coords(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let Some((mut r, mut c)) = self.descending_diagonal_start(row, col) else {
            return Vec::new();
        };
        let max = self.max_idx();
        let mut coords = Vec::new();
        while r <= max && c <= max {
            if (r, c) != (row, col) {
                coords.push((r, c));
            }
            r += 1;
            c += 1;
        }
        coords
    }

    pub fn ascending_diagonal_coords(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let Some((mut r, mut c)) = self.ascending_diagonal_start(row, col) else {
            return Vec::new();
        };
        let max = self.max_idx();
        let mut coords = Vec::new();
        while c <= max {
            if (r, c) != (row, col) {
                coords.push((r, c));
            }
            if r == 0 {
                break;
            }
            r -= 1;
            c += 1;
        }
        coords
    }

    pub fn is_filled(&self) -> bool {
        self.tiles.iter().flatten().all(|&t| t != TileState::Empty)
    }

    /// True when the board holds exactly `size` queens.
    ///
    /// Queen positions are not checked against each other: a player can only
    /// click empty tiles, and every attacked tile is dotted on placement.
    pub fn is_solved(&self) -> bool {
        self.queen_count() == self.size
    }

    pub fn queen_count(&self) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|&&t| t == TileState::Queen)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_grid_is_empty() {
        for size in 1..=12 {
            let grid = Grid::new(size);
            assert_eq!(grid.tiles().len(), size);
            assert_eq!(grid.flat_tiles().len(), size * size);
            assert!(grid.flat_tiles().iter().all(|&t| t == TileState::Empty));
        }
    }

    #[test]
    fn set_tile_state_writes_one_tile() {
        let mut grid = Grid::new(8);
        grid.set_tile_state(0, 0, TileState::Queen).unwrap();
        assert_eq!(grid.flat_tiles()[0], TileState::Queen);
        assert_eq!(grid.queen_count(), 1);
    }

    #[test]
    fn invalid_writes_leave_board_unchanged() {
        let mut grid = Grid::new(8);
        let before = grid.clone();

        assert_eq!(
            grid.set_tile_state(8, 0, TileState::Dotted),
            Err(GridError::InvalidCoordinate { row: 8, col: 0, size: 8 })
        );
        assert!(grid.set_tile_state(0, 8, TileState::Dotted).is_err());
        assert_eq!(grid.set_tile_code(0, 0, 3), Err(GridError::InvalidState(3)));
        assert!(grid.place_queen(9, 9).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn tile_codes_round_trip() {
        for state in [TileState::Empty, TileState::Dotted, TileState::Queen] {
            assert_eq!(TileState::try_from(state.code()), Ok(state));
        }
        assert_eq!(TileState::Queen.to_string(), "2");
    }

    #[test]
    fn detects_filled_board() {
        let mut grid = Grid::new(8);
        assert!(!grid.is_filled());
        for i in 0..8 {
            for j in 0..8 {
                grid.set_tile_state(i, j, TileState::Dotted).unwrap();
            }
        }
        assert!(grid.is_filled());
    }

    #[test]
    fn solved_means_size_queens_anywhere() {
        let mut grid = Grid::new(8);
        assert!(!grid.is_solved());
        // All on one row: attacking each other, still counts.
        for i in 0..8 {
            grid.set_tile_state(0, i, TileState::Queen).unwrap();
        }
        assert!(grid.is_solved());
        grid.set_tile_state(1, 0, TileState::Queen).unwrap();
        assert!(!grid.is_solved());
    }

    #[test]
    fn descending_diagonal_start() {
        let grid = Grid::new(8);
        assert_eq!(grid.descending_diagonal_start(7, 0), None);
        assert_eq!(grid.descending_diagonal_start(0, 7), None);
        assert_eq!(grid.descending_diagonal_start(0, 0), Some((0, 0)));
        assert_eq!(grid.descending_diagonal_start(7, 7), Some((0, 0)));
        assert_eq!(grid.descending_diagonal_start(3, 1), Some((2, 0)));
        assert_eq!(grid.descending_diagonal_start(2, 6), Some((0, 4)));
    }

    #[test]
    fn ascending_diagonal_start() {
        let grid = Grid::new(8);
        assert_eq!(grid.ascending_diagonal_start(0, 0), None);
        assert_eq!(grid.ascending_diagonal_start(7, 7), None);
        assert_eq!(grid.ascending_diagonal_start(7, 0), Some((7, 0)));
        assert_eq!(grid.ascending_diagonal_start(0, 7), Some((7, 0)));
        assert_eq!(grid.ascending_diagonal_start(3, 1), Some((4, 0)));
        assert_eq!(grid.ascending_diagonal_start(2, 6), Some((7, 1)));
    }

    #[test]
    fn diagonal_coords() {
        let grid = Grid::new(8);
        assert!(grid.descending_diagonal_coords(7, 0).is_empty());
        assert!(grid.descending_diagonal_coords(0, 7).is_empty());
        assert_eq!(
            grid.descending_diagonal_coords(4, 2),
            vec![(2, 0), (3, 1), (5, 3), (6, 4), (7, 5)]
        );

        assert!(grid.ascending_diagonal_coords(0, 0).is_empty());
        assert!(grid.ascending_diagonal_coords(7, 7).is_empty());
        assert_eq!(
            grid.ascending_diagonal_coords(4, 2),
            vec![(6, 0), (5, 1), (3, 3), (2, 4), (1, 5), (0, 6)]
        );
    }

    #[test]
    fn row_and_column_coords() {
        let grid = Grid::new(8);
        assert_eq!(
            grid.horizontal_coords(4, 2),
            vec![(4, 0), (4, 1), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7)]
        );
        assert_eq!(
            grid.vertical_coords(4, 2),
            vec![(0, 2), (1, 2), (2, 2), (3, 2), (5, 2), (6, 2), (7, 2)]
        );
    }

    #[test]
    fn attacked_tiles_order() {
        let grid = Grid::new(8);
        assert_eq!(
            grid.attacked_tiles(4, 2),
            vec![
                (4, 0), (4, 1), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7),
                (0, 2), (1, 2), (2, 2), (3, 2), (5, 2), (6, 2), (7, 2),
                (2, 0), (3, 1), (5, 3), (6, 4), (7, 5),
                (6, 0), (5, 1), (3, 3), (2, 4), (1, 5), (0, 6),
            ]
        );
        // No ascending diagonal.
        assert_eq!(
            grid.attacked_tiles(0, 0),
            vec![
                (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7),
                (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0), (7, 0),
                (1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7),
            ]
        );
        // No descending diagonal.
        assert_eq!(
            grid.attacked_tiles(0, 7),
            vec![
                (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
                (1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7), (7, 7),
                (7, 0), (6, 1), (5, 2), (4, 3), (3, 4), (2, 5), (1, 6),
            ]
        );
    }

    #[test]
    fn place_queen_dots_attacked_tiles() {
        let mut grid = Grid::new(8);
        let attacked = grid.place_queen(4, 2).unwrap();

        let distinct: HashSet<_> = attacked.iter().copied().collect();
        assert_eq!(attacked.len(), 25);
        assert_eq!(distinct.len(), 25);
        assert!(!distinct.contains(&(4, 2)));
        assert!(attacked
            .iter()
            .all(|&(r, c)| grid.tile(r, c) == Some(TileState::Dotted)));
        assert_eq!(grid.tile(4, 2), Some(TileState::Queen));

        let dotted = grid
            .flat_tiles()
            .iter()
            .filter(|&&t| t == TileState::Dotted)
            .count();
        assert_eq!(dotted, 25);
    }

    #[test]
    fn attacked_set_matches_brute_force() {
        for size in 1..=9 {
            let grid = Grid::new(size);
            for row in 0..size {
                for col in 0..size {
                    let got: HashSet<_> = grid.attacked_tiles(row, col).into_iter().collect();
                    let mut want = HashSet::new();
                    for r in 0..size {
                        for c in 0..size {
                            let same_line = r == row
                                || c == col
                                || r.abs_diff(row) == c.abs_diff(col);
                            if same_line && (r, c) != (row, col) {
                                want.insert((r, c));
                            }
                        }
                    }
                    assert_eq!(got, want, "size {size}, queen ({row}, {col})");
                    assert_eq!(grid.attacked_tiles(row, col).len(), want.len());
                }
            }
        }
    }

    #[test]
    fn single_tile_board() {
        let mut grid = Grid::new(1);
        assert!(grid.place_queen(0, 0).unwrap().is_empty());
        assert!(grid.is_filled());
        assert!(grid.is_solved());
    }
}
