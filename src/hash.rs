use crate::grid::TileState;

/// 32-bit polynomial string hash: `h = h * 31 + code_point`, wrapping.
pub fn hash_code(s: &str) -> i32 {
    s.chars()
        .fold(0i32, |hash, ch| hash.wrapping_mul(31).wrapping_add(ch as i32))
}

/// Hash of a flattened board, used to tell solved boards apart.
pub fn tiles_hash_code(tiles: &[TileState]) -> i32 {
    let joined: String = tiles.iter().map(|t| t.to_string()).collect();
    hash_code(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn known_value() {
        assert_eq!(hash_code("testing123"), -1943301598);
        assert_eq!(hash_code(""), 0);
    }

    #[test]
    fn board_hash_follows_row_major_codes() {
        let mut grid = Grid::new(2);
        grid.set_tile_state(0, 1, TileState::Queen).unwrap();
        grid.set_tile_state(1, 0, TileState::Dotted).unwrap();
        assert_eq!(tiles_hash_code(&grid.flat_tiles()), hash_code("0210"));
    }

    #[test]
    fn different_boards_differ() {
        let mut a = Grid::new(8);
        let mut b = Grid::new(8);
        a.place_queen(0, 0).unwrap();
        b.place_queen(0, 1).unwrap();
        assert_ne!(
            tiles_hash_code(&a.flat_tiles()),
            tiles_hash_code(&b.flat_tiles())
        );
    }
}
