//! Snapshots of board and level state used by history and save files.
//!
//! Units are recorded by handle, type and current health and rebuilt through
//! the factory, so a restored unit is indistinguishable from the captured one.

use std::collections::BTreeSet;

use lane_defence_core::{
    AttackerKind, CellCoord, DefenderKind, UnitId, UnitKind, GRID_COLUMNS, GRID_ROWS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::{cell_at, Board, BoardParts},
    factory,
    units::Unit,
};

const CELL_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Minimal description of one unit: enough to rebuild it through the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Handle of the unit.
    pub id: UnitId,
    /// Type tag of the unit.
    pub kind: UnitKind,
    /// Health at capture time.
    pub health: i32,
}

/// Structural problems found while validating a capture.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The capture does not hold one entry per grid cell.
    #[error("capture holds {found} cells, expected {expected}")]
    GridSize {
        /// Cells a grid must hold.
        expected: usize,
        /// Cells found in the capture.
        found: usize,
    },
    /// The same handle appears in more than one cell.
    #[error("unit {0:?} occupies more than one cell")]
    DuplicateUnit(UnitId),
    /// An index and the grid disagree about a unit.
    #[error("index entry for unit {0:?} does not match the grid")]
    IndexMismatch(UnitId),
    /// A unit handle is not below the next handle to allocate.
    #[error("unit {0:?} is not below the next unit handle")]
    HandleOutOfRange(UnitId),
    /// A unit's health is outside `1..=full_health` for its kind.
    #[error("unit {unit:?} has health {health} outside 1..={full_health}")]
    HealthOutOfRange {
        /// Handle of the offending unit.
        unit: UnitId,
        /// Health recorded in the capture.
        health: i32,
        /// Full health of the unit's kind.
        full_health: i32,
    },
}

/// Full board and level state captured around a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCapture {
    cells: Vec<Option<UnitRecord>>,
    defenders: Vec<UnitId>,
    attackers: Vec<UnitId>,
    occupants: Vec<UnitId>,
    currency: i32,
    cooldowns: Vec<(DefenderKind, u32)>,
    pending: Vec<AttackerKind>,
    next_unit_id: u32,
}

impl BoardCapture {
    /// Records the complete state of the board and its level.
    #[must_use]
    pub fn of(board: &Board) -> Self {
        let level = board.level();
        Self {
            cells: record_cells(board),
            defenders: board.defenders().to_vec(),
            attackers: board.attackers().to_vec(),
            occupants: board.occupants().to_vec(),
            currency: level.currency(),
            cooldowns: level.active_cooldowns(),
            pending: level.pending().to_vec(),
            next_unit_id: board.next_unit_id(),
        }
    }

    /// Writes the captured state back onto the board.
    pub fn restore(&self, board: &mut Board) {
        board.install(BoardParts {
            placed: rebuild_cells(&self.cells),
            defenders: self.defenders.clone(),
            attackers: Some(self.attackers.clone()),
            occupants: self.occupants.clone(),
            next_unit_id: self.next_unit_id,
        });
        let level = board.level_mut();
        level.set_currency(self.currency);
        level.restore_cooldowns(&self.cooldowns);
        level.set_pending(self.pending.clone());
    }

    /// Checks that the grid and every index describe the same units.
    pub fn validate(&self) -> Result<(), CaptureError> {
        validate_cells(
            &self.cells,
            &self.defenders,
            Some(self.attackers.as_slice()),
            &self.occupants,
            self.next_unit_id,
        )
    }

    /// Currency recorded in the capture.
    #[must_use]
    pub const fn currency(&self) -> i32 {
        self.currency
    }

    /// Pending attackers recorded in the capture.
    #[must_use]
    pub fn pending(&self) -> &[AttackerKind] {
        &self.pending
    }
}

/// Board state touched by a single defender placement.
///
/// Attackers, the pending queue and other types' cooldowns cannot change during
/// a placement, so they are left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCapture {
    cells: Vec<Option<UnitRecord>>,
    defenders: Vec<UnitId>,
    occupants: Vec<UnitId>,
    currency: i32,
    kind: DefenderKind,
    cooldown: u32,
    next_unit_id: u32,
}

impl PlacementCapture {
    /// Records the state a placement of `kind` may change.
    #[must_use]
    pub fn of(board: &Board, kind: DefenderKind) -> Self {
        Self {
            cells: record_cells(board),
            defenders: board.defenders().to_vec(),
            occupants: board.occupants().to_vec(),
            currency: board.level().currency(),
            kind,
            cooldown: board.level().cooldown(kind),
            next_unit_id: board.next_unit_id(),
        }
    }

    /// Writes the captured state back onto the board.
    pub fn restore(&self, board: &mut Board) {
        board.install(BoardParts {
            placed: rebuild_cells(&self.cells),
            defenders: self.defenders.clone(),
            attackers: None,
            occupants: self.occupants.clone(),
            next_unit_id: self.next_unit_id,
        });
        let level = board.level_mut();
        level.set_currency(self.currency);
        level.set_cooldown(self.kind, self.cooldown);
    }

    /// Checks that the grid and the captured indices describe the same units.
    pub fn validate(&self) -> Result<(), CaptureError> {
        validate_cells(
            &self.cells,
            &self.defenders,
            None,
            &self.occupants,
            self.next_unit_id,
        )
    }
}

fn record_cells(board: &Board) -> Vec<Option<UnitRecord>> {
    board
        .cells()
        .iter()
        .map(|occupant| {
            let id = occupant.unit()?;
            let unit = board.unit(id)?;
            Some(UnitRecord {
                id,
                kind: unit.kind(),
                health: unit.health(),
            })
        })
        .collect()
}

fn rebuild_cells(cells: &[Option<UnitRecord>]) -> Vec<(CellCoord, Unit)> {
    cells
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            record
                .as_ref()
                .map(|record| (cell_at(index), factory::restore(record)))
        })
        .collect()
}

fn validate_cells(
    cells: &[Option<UnitRecord>],
    defenders: &[UnitId],
    attackers: Option<&[UnitId]>,
    occupants: &[UnitId],
    next_unit_id: u32,
) -> Result<(), CaptureError> {
    if cells.len() != CELL_COUNT {
        return Err(CaptureError::GridSize {
            expected: CELL_COUNT,
            found: cells.len(),
        });
    }

    let mut on_grid = BTreeSet::new();
    let mut defenders_on_grid = BTreeSet::new();
    let mut attackers_on_grid = BTreeSet::new();
    for record in cells.iter().flatten() {
        if record.id.get() >= next_unit_id {
            return Err(CaptureError::HandleOutOfRange(record.id));
        }
        let full_health = record.kind.full_health();
        if record.health <= 0 || record.health > full_health {
            return Err(CaptureError::HealthOutOfRange {
                unit: record.id,
                health: record.health,
                full_health,
            });
        }
        if !on_grid.insert(record.id) {
            return Err(CaptureError::DuplicateUnit(record.id));
        }
        let _ = if record.kind.is_defender() {
            defenders_on_grid.insert(record.id)
        } else {
            attackers_on_grid.insert(record.id)
        };
    }

    check_index(defenders, &defenders_on_grid)?;
    if let Some(attackers) = attackers {
        check_index(attackers, &attackers_on_grid)?;
    }
    // Placement captures leave attackers out, so the occupant index is only
    // required to cover the grid.
    check_index(occupants, &on_grid)?;
    Ok(())
}

fn check_index(index: &[UnitId], expected: &BTreeSet<UnitId>) -> Result<(), CaptureError> {
    let mut seen = BTreeSet::new();
    for id in index {
        if !expected.contains(id) || !seen.insert(*id) {
            return Err(CaptureError::IndexMismatch(*id));
        }
    }
    if let Some(missing) = expected.iter().find(|id| !seen.contains(*id)) {
        return Err(CaptureError::IndexMismatch(*missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn populated_board() -> Board {
        let mut board = Board::new(Level::sandbox(vec![AttackerKind::Tank]));
        board.level_mut().set_currency(500);
        let shooter = board.create_unit(UnitKind::Defender(DefenderKind::PeaShooter));
        let _ = board.place(shooter, CellCoord::new(1, 2));
        let walker = board.create_unit(UnitKind::Attacker(AttackerKind::Walker));
        let _ = board.place(walker.with_health(75), CellCoord::new(6, 2));
        board
    }

    #[test]
    fn board_capture_restores_exact_state() {
        let mut board = populated_board();
        let capture = BoardCapture::of(&board);
        let expected_cells = board.cells().to_vec();

        board.setup();
        board.level_mut().set_currency(0);
        board.level_mut().set_pending(Vec::new());
        board.level_mut().restore_cooldowns(&[]);

        capture.restore(&mut board);

        assert_eq!(board.cells(), expected_cells.as_slice());
        assert_eq!(board.level().currency(), 400);
        assert_eq!(board.level().cooldown(DefenderKind::PeaShooter), 2);
        assert_eq!(board.level().pending(), &[AttackerKind::Tank]);
        let walker = board
            .unit_at(CellCoord::new(6, 2))
            .expect("walker restored");
        assert_eq!(walker.health(), 75);
        assert_eq!(BoardCapture::of(&board), capture);
    }

    #[test]
    fn placement_capture_keeps_other_cooldowns() {
        let mut board = populated_board();
        let before = PlacementCapture::of(&board, DefenderKind::Walnut);
        let wall = board.create_unit(UnitKind::Defender(DefenderKind::Walnut));
        let _ = board.place(wall, CellCoord::new(2, 2));

        before.restore(&mut board);

        assert!(board.occupant(CellCoord::new(2, 2)).is_empty());
        assert_eq!(board.level().cooldown(DefenderKind::Walnut), 0);
        assert_eq!(board.level().cooldown(DefenderKind::PeaShooter), 2);
        assert_eq!(board.level().currency(), 400);
        assert_eq!(board.defenders().len(), 1);
        assert_eq!(board.attackers().len(), 1);
    }

    #[test]
    fn validate_accepts_live_capture() {
        let board = populated_board();
        assert_eq!(BoardCapture::of(&board).validate(), Ok(()));
        assert_eq!(
            PlacementCapture::of(&board, DefenderKind::Potato).validate(),
            Ok(())
        );
    }

    #[test]
    fn validate_rejects_truncated_grid() {
        let mut capture = BoardCapture::of(&populated_board());
        let _ = capture.cells.pop();
        assert_eq!(
            capture.validate(),
            Err(CaptureError::GridSize {
                expected: CELL_COUNT,
                found: CELL_COUNT - 1
            })
        );
    }

    #[test]
    fn validate_rejects_index_disagreement() {
        let mut capture = BoardCapture::of(&populated_board());
        let walker = capture.attackers[0];
        capture.attackers.clear();
        assert_eq!(capture.validate(), Err(CaptureError::IndexMismatch(walker)));
    }

    #[test]
    fn validate_rejects_health_outside_kind_range() {
        let mut capture = BoardCapture::of(&populated_board());
        let record = capture
            .cells
            .iter_mut()
            .flatten()
            .find(|record| record.kind.is_attacker())
            .expect("walker recorded");
        record.health = 0;
        let walker = record.id;

        assert_eq!(
            capture.validate(),
            Err(CaptureError::HealthOutOfRange {
                unit: walker,
                health: 0,
                full_health: 250,
            })
        );
    }
}
