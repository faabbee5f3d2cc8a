use rand::Rng;
use tracing::{debug, trace};

use crate::{
    data::{Cell, Coordinate, PassiveReveal, VisibleState},
    error::{GameError, MAX_DIMENSION, Result},
};

/// Result of chording on a revealed number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    /// The target was not a revealed cell or its marked neighbours did not
    /// match its number. Nothing changed.
    Rejected,
    /// Every hidden neighbour was opened; `mines_hit` of them were mines.
    Expanded { mines_hit: usize },
}

/// The mine field: a dense row-major grid plus the counters derived from it.
#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    mine_count: usize,
    marks_left: i32,
    hidden_safe: usize,
    planted: bool,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(rows: usize, columns: usize, mine_count: usize) -> Result<Self> {
        if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&columns) {
            return Err(GameError::InvalidDimensions { rows, columns });
        }

        let total = rows * columns;
        if mine_count > total {
            return Err(GameError::TooManyMines {
                mines: mine_count,
                max: total,
            });
        }

        debug!(
            "Board initialized: {}x{}, {} cells, {} mines",
            rows, columns, total, mine_count
        );

        Ok(Self {
            rows,
            columns,
            mine_count,
            marks_left: mine_count as i32,
            hidden_safe: total - mine_count,
            planted: false,
            cells: vec![Cell::default(); total],
        })
    }

    /// A board with mines at exactly `mines`, already planted.
    pub fn with_mines(rows: usize, columns: usize, mines: &[Coordinate]) -> Result<Self> {
        let mut board = Self::new(rows, columns, 0)?;
        board.plant_mines_at(mines)?;
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn marks_left(&self) -> i32 {
        self.marks_left
    }

    pub fn hidden_safe_count(&self) -> usize {
        self.hidden_safe
    }

    pub fn is_planted(&self) -> bool {
        self.planted
    }

    pub fn won(&self) -> bool {
        self.hidden_safe == 0
    }

    pub fn is_out_of_bounds(&self, coordinate: Coordinate) -> bool {
        !coordinate.is_within(self.rows, self.columns)
    }

    pub fn cell(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.index(coordinate).map(|index| &self.cells[index])
    }

    pub fn has_mine(&self, coordinate: Coordinate) -> bool {
        self.cell(coordinate).is_some_and(Cell::has_mine)
    }

    pub fn state_of(&self, coordinate: Coordinate) -> Option<VisibleState> {
        self.cell(coordinate).map(Cell::state)
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let columns = self.columns;
        (0..self.rows * self.columns)
            .map(move |index| Coordinate::new((index / columns) as i32, (index % columns) as i32))
    }

    fn index(&self, coordinate: Coordinate) -> Option<usize> {
        coordinate
            .is_within(self.rows, self.columns)
            .then(|| coordinate.row as usize * self.columns + coordinate.column as usize)
    }

    fn neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + use<> {
        coordinate.neighbors(self.rows, self.columns)
    }

    /// Places `mine_count` mines uniformly at random, never on `safe_zone`
    /// or its neighbours, then computes every safe cell's number.
    pub fn plant_mines<R: Rng + ?Sized>(&mut self, safe_zone: Coordinate, rng: &mut R) -> Result<()> {
        if self.planted {
            return Err(GameError::AlreadyPlanted);
        }

        let excluded = self
            .coordinates()
            .filter(|candidate| safe_zone.is_neighbor_or_self(*candidate))
            .count();
        let available = self.cells.len() - excluded;
        if self.mine_count > available {
            return Err(GameError::TooManyMines {
                mines: self.mine_count,
                max: available,
            });
        }

        let mut mines_to_plant = self.mine_count;
        while mines_to_plant > 0 {
            let candidate = Coordinate::new(
                rng.random_range(0..self.rows) as i32,
                rng.random_range(0..self.columns) as i32,
            );
            if safe_zone.is_neighbor_or_self(candidate) {
                continue;
            }

            let index = candidate.row as usize * self.columns + candidate.column as usize;
            let cell = &mut self.cells[index];
            if cell.has_mine() {
                continue;
            }
            cell.set_mine();
            mines_to_plant -= 1;
        }

        self.finish_planting();
        debug!("Mines planted around safe zone {}", safe_zone);
        Ok(())
    }

    /// Places mines at fixed locations. The mine count and counters follow
    /// the layout; duplicates collapse into one mine.
    pub fn plant_mines_at(&mut self, mines: &[Coordinate]) -> Result<()> {
        if self.planted {
            return Err(GameError::AlreadyPlanted);
        }

        let indices = mines
            .iter()
            .map(|&mine| self.index(mine).ok_or(GameError::MineOutOfBounds(mine)))
            .collect::<Result<Vec<_>>>()?;
        for index in indices {
            self.cells[index].set_mine();
        }

        let planted = self.cells.iter().filter(|cell| cell.has_mine()).count();
        let flagged = self
            .cells
            .iter()
            .filter(|cell| cell.state() == VisibleState::Flagged)
            .count();
        let revealed = self
            .cells
            .iter()
            .filter(|cell| cell.state() == VisibleState::Revealed)
            .count();

        self.mine_count = planted;
        self.marks_left = planted as i32 - flagged as i32;
        self.hidden_safe = self.cells.len() - planted - revealed;
        self.finish_planting();
        Ok(())
    }

    fn finish_planting(&mut self) {
        for coordinate in self.coordinates() {
            let count = self
                .neighbors(coordinate)
                .filter(|neighbor| self.has_mine(*neighbor))
                .count() as u8;
            if let Some(index) = self.index(coordinate) {
                self.cells[index].set_adjacent(count);
            }
        }
        self.planted = true;
    }

    /// Reveals `coordinate` and, through cells showing 0, the whole blank
    /// region around it. Mines and cells that are not hidden are left alone.
    /// Returns how many cells were revealed. Nothing is revealed before the
    /// mines are planted.
    pub fn reveal_flood_fill(&mut self, coordinate: Coordinate) -> usize {
        if !self.planted {
            debug!("Flood fill at {} ignored, mines not planted", coordinate);
            return 0;
        }

        let mut revealed = 0;
        let mut stack = vec![coordinate];

        while let Some(current) = stack.pop() {
            let Some(index) = self.index(current) else {
                continue;
            };
            let cell = &mut self.cells[index];
            if cell.state() != VisibleState::Hidden || cell.reveal().is_err() {
                continue;
            }

            self.hidden_safe -= 1;
            revealed += 1;

            if cell.raw_adjacent() == 0 {
                let hidden_neighbors = self
                    .neighbors(current)
                    .filter(|neighbor| self.state_of(*neighbor) == Some(VisibleState::Hidden));
                stack.extend(hidden_neighbors);
            }
        }

        trace!("Flood fill from {} revealed {} cells", coordinate, revealed);
        revealed
    }

    /// Flags a hidden cell while flags remain, or removes a flag. Returns
    /// whether anything changed.
    pub fn toggle_flag(&mut self, coordinate: Coordinate) -> bool {
        let Some(index) = self.index(coordinate) else {
            return false;
        };

        match self.cells[index].state() {
            VisibleState::Hidden if self.marks_left > 0 => {
                self.cells[index].flag();
                self.marks_left -= 1;
                true
            }
            VisibleState::Hidden => {
                debug!("No flags left; cannot mark {}", coordinate);
                false
            }
            VisibleState::Flagged => {
                self.cells[index].unflag();
                self.marks_left += 1;
                true
            }
            _ => false,
        }
    }

    /// Opens every hidden neighbour of a revealed number whose flags (and
    /// already exploded mines) add up to that number. Flags sitting on safe
    /// cells are taken back.
    pub fn chord(&mut self, coordinate: Coordinate) -> ChordOutcome {
        let Some(cell) = self.cell(coordinate) else {
            return ChordOutcome::Rejected;
        };
        if cell.state() != VisibleState::Revealed {
            return ChordOutcome::Rejected;
        }

        let expected = usize::from(cell.raw_adjacent());
        let marked = self
            .neighbors(coordinate)
            .filter(|neighbor| {
                matches!(
                    self.state_of(*neighbor),
                    Some(VisibleState::Flagged | VisibleState::ExplodedMine)
                )
            })
            .count();
        if marked != expected {
            debug!(
                "Chord rejected at {}: {} marked neighbours, number is {}",
                coordinate, marked, expected
            );
            return ChordOutcome::Rejected;
        }

        let mut mines_hit = 0;
        for neighbor in self.neighbors(coordinate) {
            let Some(index) = self.index(neighbor) else {
                continue;
            };
            let (state, mine) = {
                let cell = &self.cells[index];
                (cell.state(), cell.has_mine())
            };

            match (state, mine) {
                (VisibleState::Hidden, true) => {
                    self.cells[index].explode();
                    mines_hit += 1;
                }
                (VisibleState::Hidden, false) => {
                    self.reveal_flood_fill(neighbor);
                }
                (VisibleState::Flagged, false) => {
                    debug!("Removing misplaced flag at {}", neighbor);
                    self.cells[index].unflag();
                    self.marks_left += 1;
                }
                _ => {}
            }
        }

        ChordOutcome::Expanded { mines_hit }
    }

    /// Marks a hidden mine as the one the player set off.
    pub fn explode(&mut self, coordinate: Coordinate) {
        if let Some(index) = self.index(coordinate) {
            self.cells[index].explode();
        }
    }

    /// Takes one mark away, used when a mine was survived.
    pub fn consume_mark(&mut self) {
        self.marks_left -= 1;
    }

    /// Shows what is left hidden at the end of a game. With
    /// [`PassiveReveal::ShowMine`] only mines change; with
    /// [`PassiveReveal::Flag`] every hidden cell is flagged and counted
    /// against the marks.
    pub fn reveal_remaining(&mut self, policy: PassiveReveal) -> usize {
        let mut changed = 0;
        for cell in &mut self.cells {
            if cell.state() != VisibleState::Hidden {
                continue;
            }
            if policy == PassiveReveal::ShowMine && !cell.has_mine() {
                continue;
            }
            cell.passively_reveal(policy);
            changed += 1;
        }

        if policy == PassiveReveal::Flag {
            self.marks_left -= changed as i32;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn at(row: i32, column: i32) -> Coordinate {
        Coordinate::new(row, column)
    }

    fn all_states(board: &Board) -> Vec<VisibleState> {
        board
            .coordinates()
            .map(|c| board.state_of(c).unwrap())
            .collect()
    }

    #[test]
    fn rejects_dimensions_outside_range() {
        assert_eq!(
            Board::new(0, 5, 0).unwrap_err(),
            GameError::InvalidDimensions { rows: 0, columns: 5 }
        );
        assert!(Board::new(31, 5, 0).is_err());
        assert!(Board::new(5, 31, 0).is_err());
        assert!(Board::new(30, 30, 10).is_ok());
        assert!(Board::new(1, 1, 0).is_ok());
    }

    #[test]
    fn counters_start_from_mine_count() {
        let board = Board::new(4, 5, 3).unwrap();
        assert_eq!(board.marks_left(), 3);
        assert_eq!(board.hidden_safe_count(), 17);
        assert!(!board.is_planted());
        assert!(!board.won());
    }

    #[test]
    fn first_click_opening_is_mine_free() {
        for seed in 0..200 {
            let mut board = Board::new(4, 4, 6).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            board.plant_mines(at(1, 1), &mut rng).unwrap();

            for row in 0..=2 {
                for column in 0..=2 {
                    assert!(!board.has_mine(at(row, column)), "seed {seed}: mine at ({row}, {column})");
                }
            }
            let planted = board.coordinates().filter(|c| board.has_mine(*c)).count();
            assert_eq!(planted, 6);
        }
    }

    #[test]
    fn corner_safe_zone_only_excludes_in_bounds_cells() {
        let mut board = Board::new(3, 3, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        board.plant_mines(at(0, 0), &mut rng).unwrap();

        for safe in [at(0, 0), at(0, 1), at(1, 0), at(1, 1)] {
            assert!(!board.has_mine(safe));
        }
        for mined in [at(0, 2), at(1, 2), at(2, 0), at(2, 1), at(2, 2)] {
            assert!(board.has_mine(mined));
        }
    }

    #[test]
    fn planting_more_mines_than_fit_fails() {
        let mut board = Board::new(3, 3, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            board.plant_mines(at(1, 1), &mut rng),
            Err(GameError::TooManyMines { mines: 1, max: 0 })
        );
        assert!(!board.is_planted());
    }

    #[test]
    fn planting_twice_fails() {
        let mut board = Board::with_mines(3, 3, &[at(0, 0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(board.plant_mines(at(2, 2), &mut rng), Err(GameError::AlreadyPlanted));
    }

    #[test]
    fn fixed_layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            Board::with_mines(3, 3, &[at(3, 0)]).unwrap_err(),
            GameError::MineOutOfBounds(at(3, 0))
        );
    }

    #[test]
    fn numbers_count_adjacent_mines() {
        let mut board = Board::with_mines(3, 3, &[at(0, 0), at(0, 1), at(0, 2)]).unwrap();
        board.reveal_flood_fill(at(2, 0));

        let numbers: Vec<_> = (0..3)
            .map(|column| board.cell(at(1, column)).unwrap().adjacent_mines())
            .collect();
        assert_eq!(numbers, vec![Some(2), Some(3), Some(2)]);
        assert_eq!(board.cell(at(2, 1)).unwrap().adjacent_mines(), Some(0));
    }

    #[test]
    fn flood_fill_reveals_whole_empty_board() {
        let mut board = Board::with_mines(3, 3, &[]).unwrap();
        assert_eq!(board.reveal_flood_fill(at(1, 1)), 9);
        assert!(all_states(&board).iter().all(|s| *s == VisibleState::Revealed));
        assert!(board.won());
    }

    #[test]
    fn flood_fill_stops_at_numbers() {
        let mut board = Board::with_mines(3, 3, &[at(0, 0), at(0, 1), at(0, 2)]).unwrap();
        board.reveal_flood_fill(at(2, 0));

        for column in 0..3 {
            assert_eq!(board.state_of(at(2, column)), Some(VisibleState::Revealed));
            assert_eq!(board.state_of(at(1, column)), Some(VisibleState::Revealed));
            assert_eq!(board.state_of(at(0, column)), Some(VisibleState::Hidden));
        }
        assert!(board.won());
    }

    #[test]
    fn flood_fill_skips_flags_and_mines() {
        let mut board = Board::with_mines(3, 3, &[at(0, 0)]).unwrap();
        assert!(board.toggle_flag(at(2, 2)));

        assert_eq!(board.reveal_flood_fill(at(0, 0)), 0);
        board.reveal_flood_fill(at(2, 0));

        assert_eq!(board.state_of(at(2, 2)), Some(VisibleState::Flagged));
        assert_eq!(board.state_of(at(0, 0)), Some(VisibleState::Hidden));
        assert_eq!(board.hidden_safe_count(), 1);
    }

    #[test]
    fn flood_fill_on_revealed_cell_is_noop() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        assert_eq!(board.reveal_flood_fill(at(1, 1)), 1);
        assert_eq!(board.reveal_flood_fill(at(1, 1)), 0);
        assert_eq!(board.hidden_safe_count(), 2);
    }

    #[test]
    fn flood_fill_handles_largest_board() {
        let mut board = Board::with_mines(30, 30, &[]).unwrap();
        assert_eq!(board.reveal_flood_fill(at(15, 15)), 900);
        assert!(board.won());
    }

    #[test]
    fn toggle_flag_respects_marks_left() {
        let mut board = Board::new(2, 2, 2).unwrap();

        assert!(board.toggle_flag(at(0, 0)));
        assert!(board.toggle_flag(at(0, 1)));
        assert_eq!(board.marks_left(), 0);

        assert!(!board.toggle_flag(at(1, 0)));
        assert_eq!(board.state_of(at(1, 0)), Some(VisibleState::Hidden));

        assert!(board.toggle_flag(at(0, 0)));
        assert_eq!(board.state_of(at(0, 0)), Some(VisibleState::Hidden));
        assert_eq!(board.marks_left(), 1);
    }

    #[test]
    fn toggle_flag_ignores_revealed_and_out_of_bounds() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        board.reveal_flood_fill(at(1, 1));

        assert!(!board.toggle_flag(at(1, 1)));
        assert!(!board.toggle_flag(at(-1, 0)));
        assert!(!board.toggle_flag(at(0, 2)));
        assert_eq!(board.marks_left(), 1);
    }

    #[test]
    fn chord_reveals_neighbors_when_flags_match() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        board.reveal_flood_fill(at(0, 1));
        board.toggle_flag(at(0, 0));

        assert_eq!(board.chord(at(0, 1)), ChordOutcome::Expanded { mines_hit: 0 });
        assert_eq!(board.state_of(at(1, 0)), Some(VisibleState::Revealed));
        assert_eq!(board.state_of(at(1, 1)), Some(VisibleState::Revealed));
        assert!(board.won());
    }

    #[test]
    fn chord_rejected_without_flags() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        board.reveal_flood_fill(at(0, 1));

        assert_eq!(board.chord(at(0, 1)), ChordOutcome::Rejected);
        assert_eq!(board.state_of(at(1, 1)), Some(VisibleState::Hidden));
        assert_eq!(board.state_of(at(1, 0)), Some(VisibleState::Hidden));
    }

    #[test]
    fn chord_rejected_on_unrevealed_target() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        assert_eq!(board.chord(at(1, 1)), ChordOutcome::Rejected);
        board.toggle_flag(at(1, 1));
        assert_eq!(board.chord(at(1, 1)), ChordOutcome::Rejected);
        assert_eq!(board.chord(at(5, 5)), ChordOutcome::Rejected);
    }

    #[test]
    fn chord_with_wrong_flag_triggers_mine() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        board.toggle_flag(at(1, 0));
        board.reveal_flood_fill(at(0, 1));

        assert_eq!(board.chord(at(0, 1)), ChordOutcome::Expanded { mines_hit: 1 });
        assert_eq!(board.state_of(at(0, 0)), Some(VisibleState::ExplodedMine));
        assert_eq!(board.state_of(at(1, 0)), Some(VisibleState::Hidden));
        assert_eq!(board.state_of(at(1, 1)), Some(VisibleState::Revealed));
        assert_eq!(board.marks_left(), 1);
    }

    #[test]
    fn chord_counts_exploded_mines_as_marked() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0)]).unwrap();
        board.reveal_flood_fill(at(0, 1));
        board.explode(at(0, 0));

        assert_eq!(board.chord(at(0, 1)), ChordOutcome::Expanded { mines_hit: 0 });
        assert!(board.won());
    }

    #[test]
    fn flood_fill_waits_for_planting() {
        let mut board = Board::new(3, 3, 1).unwrap();

        assert_eq!(board.reveal_flood_fill(at(1, 1)), 0);
        assert_eq!(board.hidden_safe_count(), 8);
        assert!(board.coordinates().all(|c| board.state_of(c) == Some(VisibleState::Hidden)));
        assert_eq!(board.chord(at(1, 1)), ChordOutcome::Rejected);
    }

    #[test]
    fn reveal_remaining_shows_only_mines_after_loss() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0), at(1, 1)]).unwrap();
        board.explode(at(0, 0));

        assert_eq!(board.reveal_remaining(PassiveReveal::ShowMine), 1);
        assert_eq!(board.state_of(at(0, 0)), Some(VisibleState::ExplodedMine));
        assert_eq!(board.state_of(at(1, 1)), Some(VisibleState::RevealedMine));
        assert_eq!(board.state_of(at(0, 1)), Some(VisibleState::Hidden));
    }

    #[test]
    fn reveal_remaining_flags_hidden_cells_and_spends_marks() {
        let mut board = Board::with_mines(2, 2, &[at(0, 0), at(1, 1)]).unwrap();
        board.toggle_flag(at(0, 0));
        board.reveal_flood_fill(at(0, 1));
        board.reveal_flood_fill(at(1, 0));

        assert_eq!(board.reveal_remaining(PassiveReveal::Flag), 1);
        assert_eq!(board.state_of(at(1, 1)), Some(VisibleState::Flagged));
        assert_eq!(board.marks_left(), 0);
    }

    #[test]
    fn revealed_cells_never_revert() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut board = Board::new(8, 8, 10).unwrap();
            let first = at(rng.random_range(0..8), rng.random_range(0..8));
            board.plant_mines(first, &mut rng).unwrap();
            board.reveal_flood_fill(first);

            for _ in 0..40 {
                let before = all_states(&board);
                let target = at(rng.random_range(-1..9), rng.random_range(-1..9));
                match rng.random_range(0..3) {
                    0 => {
                        board.reveal_flood_fill(target);
                    }
                    1 => {
                        board.toggle_flag(target);
                    }
                    _ => {
                        board.chord(target);
                    }
                }
                let after = all_states(&board);
                for (old, new) in before.iter().zip(&after) {
                    if *old == VisibleState::Revealed {
                        assert_eq!(*new, VisibleState::Revealed);
                    }
                }
            }
        }
    }
}
