/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// ## Symbol legend (as sent by the world server):
///   ' ' = Floor          '~' = Water          'T' = Tree
///   '-' = Locked door    'a' = Axe            'k' = Key
///   'o' = Stone pile     'O' = Placed stone   '$' = Treasure
///   '*' = Wall           '.' = Map edge
/// Cells never seen are `Unknown`.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Tile {
    Floor,
    Water,
    Tree,
    Door,
    Axe,
    Key,
    StonePile,
    PlacedStone,
    Treasure,
    Wall,         // soft boundary
    Edge,         // hard boundary, outside the island
    #[default]
    Unknown,
}

impl Tile {
    /// Decode one byte of a view buffer.
    /// Symbols the agent has no rule for (e.g. dynamite) are treated as walls.
    pub fn from_symbol(symbol: u8) -> Tile {
        match symbol {
            b' ' => Tile::Floor,
            b'~' => Tile::Water,
            b'T' => Tile::Tree,
            b'-' => Tile::Door,
            b'a' => Tile::Axe,
            b'k' => Tile::Key,
            b'o' => Tile::StonePile,
            b'O' => Tile::PlacedStone,
            b'$' => Tile::Treasure,
            b'.' => Tile::Edge,
            _ => Tile::Wall,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Floor => ' ',
            Tile::Water => '~',
            Tile::Tree => 'T',
            Tile::Door => '-',
            Tile::Axe => 'a',
            Tile::Key => 'k',
            Tile::StonePile => 'o',
            Tile::PlacedStone => 'O',
            Tile::Treasure => '$',
            Tile::Wall => '*',
            Tile::Edge => '.',
            Tile::Unknown => '?',
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Tile::Water)
    }

    /// Can be picked up by walking onto it.
    pub fn is_item(self) -> bool {
        matches!(self, Tile::Axe | Tile::Key | Tile::StonePile | Tile::Treasure)
    }

    /// Walkable without any resource.
    pub fn is_open(self) -> bool {
        matches!(self, Tile::Floor | Tile::PlacedStone)
    }

    /// Never enterable, whatever the agent carries.
    pub fn is_blocking(self) -> bool {
        matches!(self, Tile::Wall | Tile::Edge | Tile::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_decode_and_print_back() {
        for &b in b" ~T-akoO$*." {
            assert_eq!(Tile::from_symbol(b).symbol(), b as char);
        }
    }

    #[test]
    fn unrecognised_symbol_is_wall() {
        assert_eq!(Tile::from_symbol(b'd'), Tile::Wall);
        assert!(Tile::from_symbol(b'#').is_blocking());
    }

    #[test]
    fn unknown_is_default_and_blocking() {
        assert_eq!(Tile::default(), Tile::Unknown);
        assert!(Tile::Unknown.is_blocking());
        assert!(!Tile::Floor.is_blocking());
    }
}
