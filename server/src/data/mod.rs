use std::fmt;

/// A grid position. Signed so that any coordinate a player sends can be
/// represented, bounds are checked by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Coordinate {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn is_within(self, rows: usize, columns: usize) -> bool {
        usize::try_from(self.row).is_ok_and(|row| row < rows)
            && usize::try_from(self.column).is_ok_and(|column| column < columns)
    }

    /// The up to 8 neighbours of this coordinate that lie on a
    /// `rows` x `columns` board.
    pub fn neighbors(self, rows: usize, columns: usize) -> impl Iterator<Item = Coordinate> {
        DISPLACEMENTS
            .into_iter()
            .map(move |(dr, dc)| Coordinate::new(self.row + dr, self.column + dc))
            .filter(move |neighbor| neighbor.is_within(rows, columns))
    }

    /// True for this coordinate and its 8 surrounding positions.
    pub fn is_neighbor_or_self(self, other: Coordinate) -> bool {
        (self.row - other.row).abs() <= 1 && (self.column - other.column).abs() <= 1
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibleState {
    Hidden,
    Flagged,
    Revealed,
    ExplodedMine,
    RevealedMine,
}

/// How a cell left hidden at the end of a game is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassiveReveal {
    /// Lost games show the remaining mines.
    ShowMine,
    /// Won games flag them.
    Flag,
}

#[derive(Clone, Debug)]
pub struct Cell {
    mine: bool,
    adjacent: u8,
    state: VisibleState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MineRevealed;

impl Default for Cell {
    fn default() -> Self {
        Self {
            mine: false,
            adjacent: 0,
            state: VisibleState::Hidden,
        }
    }
}

impl Cell {
    pub fn has_mine(&self) -> bool {
        self.mine
    }

    pub fn state(&self) -> VisibleState {
        self.state
    }

    /// The number shown on the cell, only available once it is revealed.
    pub fn adjacent_mines(&self) -> Option<u8> {
        (self.state == VisibleState::Revealed).then_some(self.adjacent)
    }

    pub(crate) fn set_mine(&mut self) {
        self.mine = true;
    }

    pub(crate) fn set_adjacent(&mut self, count: u8) {
        self.adjacent = count;
    }

    pub(crate) fn raw_adjacent(&self) -> u8 {
        self.adjacent
    }

    pub(crate) fn reveal(&mut self) -> Result<(), MineRevealed> {
        if self.mine {
            return Err(MineRevealed);
        }
        self.state = VisibleState::Revealed;
        Ok(())
    }

    pub(crate) fn flag(&mut self) -> bool {
        if self.state != VisibleState::Hidden {
            return false;
        }
        self.state = VisibleState::Flagged;
        true
    }

    pub(crate) fn unflag(&mut self) -> bool {
        if self.state != VisibleState::Flagged {
            return false;
        }
        self.state = VisibleState::Hidden;
        true
    }

    pub(crate) fn explode(&mut self) {
        self.state = VisibleState::ExplodedMine;
    }

    pub(crate) fn passively_reveal(&mut self, policy: PassiveReveal) {
        self.state = match policy {
            PassiveReveal::ShowMine => VisibleState::RevealedMine,
            PassiveReveal::Flag => VisibleState::Flagged,
        };
    }
}
