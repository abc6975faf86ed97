/// Presentation layer: prints the agent's known map to stderr.
///
/// Stdout is left alone and logs share stderr, so each frame is printed
/// below the previous output rather than redrawn in place. Every command
/// is batched with `queue!` and flushed once per frame.

use std::io::{self, BufWriter, Stderr, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::domain::entity::{Cell, Heading, Player};
use crate::domain::terrain::TerrainOracle;
use crate::domain::tile::Tile;
use crate::sim::map::WorldMap;

pub struct Renderer {
    writer: BufWriter<Stderr>,
}

fn player_glyph(facing: Heading) -> char {
    match facing {
        Heading::North => '^',
        Heading::East => '>',
        Heading::South => 'v',
        Heading::West => '<',
    }
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Water => Color::Blue,
        Tile::Tree => Color::Green,
        Tile::Door => Color::DarkYellow,
        Tile::Axe | Tile::Key => Color::Cyan,
        Tile::StonePile | Tile::PlacedStone => Color::Grey,
        Tile::Treasure => Color::Yellow,
        Tile::Wall | Tile::Edge => Color::DarkGrey,
        Tile::Unknown => Color::DarkMagenta,
        Tile::Floor => Color::White,
    }
}

/// The known map as text rows, `?` for unknown cells and an arrow for
/// the player. Empty if nothing has been seen yet.
pub fn map_lines(map: &WorldMap, player: &Player) -> Vec<String> {
    let Some(b) = map.bounds() else { return vec![] };
    (b.min.y..=b.max.y)
        .map(|y| {
            (b.min.x..=b.max.x)
                .map(|x| {
                    let cell = Cell::new(x, y);
                    if cell == player.pos {
                        player_glyph(player.facing)
                    } else {
                        map.tile_at(cell).symbol()
                    }
                })
                .collect()
        })
        .collect()
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stderr()),
        }
    }

    pub fn render(&mut self, map: &WorldMap, player: &Player, tick: u64) -> io::Result<()> {
        let inv = &player.inventory;
        let hud = format!(
            "tick {tick}  pos {}  axe:{} key:{} raft:{} afloat:{} stones:{} treasure:{}\n",
            player.pos,
            inv.has_axe as u8,
            inv.has_key as u8,
            inv.has_raft as u8,
            inv.on_raft as u8,
            inv.stones_held,
            inv.has_treasure as u8,
        );
        queue!(self.writer, SetForegroundColor(Color::White), Print(hud))?;

        let mut last_fg = Color::White;
        for row in map_lines(map, player) {
            for ch in row.chars() {
                let fg = match ch {
                    '^' | '>' | 'v' | '<' => Color::Red,
                    other => tile_color(match other {
                        '?' => Tile::Unknown,
                        s => Tile::from_symbol(s as u8),
                    }),
                };
                if fg != last_fg {
                    queue!(self.writer, SetForegroundColor(fg))?;
                    last_fg = fg;
                }
                queue!(self.writer, Print(ch))?;
            }
            queue!(self.writer, Print('\n'))?;
        }

        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::testing::view;

    #[test]
    fn nothing_seen_renders_nothing() {
        assert!(map_lines(&WorldMap::new(), &Player::new()).is_empty());
    }

    #[test]
    fn player_and_tiles_are_drawn() {
        let mut map = WorldMap::new();
        let player = Player::at(Cell::new(2, 2), Heading::North);
        map.update_from_view(
            &view(["~~~~~", " a   ", "  ^  ", "   T ", "*****"]),
            player.pos,
            player.facing,
        );
        let lines = map_lines(&map, &player);
        assert_eq!(lines, vec!["~~~~~", " a   ", "  ^  ", "   T ", "*****"]);
    }

    #[test]
    fn unseen_gaps_show_as_question_marks() {
        let mut map = WorldMap::new();
        map.set_tile(Cell::new(0, 0), Tile::Floor);
        map.set_tile(Cell::new(2, 0), Tile::Water);
        let player = Player::at(Cell::new(0, 0), Heading::West);
        assert_eq!(map_lines(&map, &player), vec!["<?~"]);
    }
}
