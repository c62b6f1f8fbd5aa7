//! ASCII stand-in for the image-based map decoder.
//!
//! Production maps are decoded from image pixels packed as
//! `(R<<16)|(G<<8)|B`; the command-line driver accepts the same grid as
//! text so scenarios can be edited by hand. `#` is a wall, `M` a market
//! wall, `.` (or a space) an open floor tile.

use anyhow::{bail, Result};
use dungeon_world::TileMap;

/// Code emitted for open floor tiles; the green channel stands in for the
/// floor color a map image would carry.
const OPEN_CODE: u32 = 0x00_ff00;

/// Built-in demo dungeon used when no map file is provided.
pub(crate) const DEMO_MAP: &str = "\
############
#....#.....#
#.##.#.###.#
#.#..M...#.#
#.#.####.#.#
#...#....#.#
#.###.##.#.#
#..........#
############
";

/// Parses an ASCII grid into a validated [`TileMap`].
pub(crate) fn parse(text: &str, tile_length: f32) -> Result<TileMap> {
    let mut rows = Vec::new();
    for (row_index, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for (column, glyph) in line.chars().enumerate() {
            row.push(match glyph {
                '#' => 0,
                'M' => 0xff_0000,
                '.' | ' ' => OPEN_CODE,
                other => bail!(
                    "unsupported map glyph {other:?} at row {row_index}, column {column}"
                ),
            });
        }
        rows.push(row);
    }
    Ok(TileMap::new(rows, tile_length)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::CellCoord;

    #[test]
    fn demo_map_parses_and_validates() {
        let map = parse(DEMO_MAP, 2.0).expect("demo map is valid");
        assert_eq!(map.columns(), 12);
        assert_eq!(map.rows(), 9);
        assert!(map.is_open(CellCoord::new(1, 1)));
        assert!(!map.is_open(CellCoord::new(5, 3)), "market wall blocks");
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        let error = parse("###\n#?#\n###", 2.0).expect_err("glyph is invalid");
        assert!(error.to_string().contains("unsupported map glyph"));
    }

    #[test]
    fn open_border_is_rejected() {
        let error = parse("#.#\n#.#\n###", 2.0).expect_err("border must be closed");
        assert!(error.to_string().contains("border"));
    }
}
