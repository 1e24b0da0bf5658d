//! Grid, entity indices and the turn-resolution algorithm.

use std::collections::BTreeMap;

use lane_defence_core::{
    CellCoord, DefenderKind, Direction, Event, GridMode, PlacementError, SpawnSource, UnitId,
    UnitKind, UnitSnapshot, DEFENDED_COLUMN, GRID_COLUMNS, GRID_ROWS, SPAWN_COLUMN,
};
use tracing::trace;

use crate::{factory, level::Level, units::Unit};

const CELL_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Marker for a cell that holds no unit.
    #[default]
    Empty,
    /// Handle of the unit occupying the cell.
    Unit(UnitId),
}

impl Occupant {
    /// Returns the occupying unit handle, if any.
    #[must_use]
    pub const fn unit(self) -> Option<UnitId> {
        match self {
            Self::Empty => None,
            Self::Unit(id) => Some(id),
        }
    }

    /// Reports whether the cell is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Authoritative battlefield: grid cells, unit table and the active level.
///
/// `cells`, `positions` and the three index lists always describe the same set
/// of units. Every mutation goes through [`Board::place`], [`Board::relocate`]
/// or [`Board::remove`], which keep them in step.
#[derive(Clone, Debug)]
pub struct Board {
    cells: Vec<Occupant>,
    units: BTreeMap<UnitId, Unit>,
    positions: BTreeMap<UnitId, CellCoord>,
    defenders: Vec<UnitId>,
    attackers: Vec<UnitId>,
    occupants: Vec<UnitId>,
    mode: GridMode,
    level: Level,
    next_unit_id: u32,
}

impl Board {
    /// Creates an empty board bound to the provided level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        let mut board = Self {
            cells: Vec::new(),
            units: BTreeMap::new(),
            positions: BTreeMap::new(),
            defenders: Vec::new(),
            attackers: Vec::new(),
            occupants: Vec::new(),
            mode: GridMode::default(),
            level,
            next_unit_id: 0,
        };
        board.setup();
        board
    }

    /// Reinitialises every cell to the empty marker and clears all indices.
    pub fn setup(&mut self) {
        self.cells = vec![Occupant::Empty; CELL_COUNT];
        self.units.clear();
        self.positions.clear();
        self.defenders.clear();
        self.attackers.clear();
        self.occupants.clear();
    }

    /// Constructs a fresh unit of the given kind with a newly allocated handle.
    ///
    /// The unit is not on the board until it is passed to [`Board::place`].
    pub fn create_unit(&mut self, kind: UnitKind) -> Unit {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.wrapping_add(1);
        factory::create(id, kind)
    }

    /// Writes the unit into the target cell and registers it in the indices.
    ///
    /// Defenders debit their price from the level and arm their type cooldown.
    /// The caller guarantees the cell is empty and in bounds and that the
    /// balance covers the price; use [`Board::check_placement`] first.
    pub fn place(&mut self, unit: Unit, cell: CellCoord) -> UnitId {
        let index = cell_index(cell);
        debug_assert!(self.cells[index].is_empty(), "place requires an empty cell");
        let id = unit.id();
        match unit.kind() {
            UnitKind::Defender(kind) => {
                self.level.debit(kind.price());
                self.level.arm(kind);
                self.defenders.push(id);
            }
            UnitKind::Attacker(_) => self.attackers.push(id),
        }
        self.occupants.push(id);
        self.cells[index] = Occupant::Unit(id);
        let _ = self.positions.insert(id, cell);
        let _ = self.units.insert(id, unit);
        self.debug_assert_consistent();
        id
    }

    /// Validates a defender placement against the current board and level.
    pub fn check_placement(&self, kind: DefenderKind, cell: CellCoord) -> Result<(), PlacementError> {
        if !cell.in_bounds() {
            return Err(PlacementError::OutOfBounds);
        }
        if cell.column() == SPAWN_COLUMN {
            return Err(PlacementError::SpawnColumn);
        }
        if !self.occupant(cell).is_empty() {
            return Err(PlacementError::Occupied);
        }
        let turns_remaining = self.level.cooldown(kind);
        if turns_remaining > 0 {
            return Err(PlacementError::CoolingDown { turns_remaining });
        }
        let price = kind.price();
        let balance = self.level.currency();
        if price > balance {
            return Err(PlacementError::InsufficientFunds { price, balance });
        }
        Ok(())
    }

    /// Returns the occupant of the cell adjacent to `unit`, or `None` at a grid edge.
    #[must_use]
    pub fn neighbor(&self, unit: UnitId, direction: Direction) -> Option<Occupant> {
        self.neighbor_cell(unit, direction)
            .map(|cell| self.occupant(cell))
    }

    /// Returns the cell adjacent to `unit` in the given direction, if inside the grid.
    #[must_use]
    pub fn neighbor_cell(&self, unit: UnitId, direction: Direction) -> Option<CellCoord> {
        self.position(unit)?.step(direction)
    }

    /// Moves `unit` into the empty `target` cell, leaving the empty marker behind.
    pub fn relocate(&mut self, unit: UnitId, target: CellCoord) {
        let Some(from) = self.position(unit) else {
            debug_assert!(false, "relocate called for a unit that is not on the board");
            return;
        };
        let target_index = cell_index(target);
        debug_assert!(self.cells[target_index].is_empty(), "relocate requires an empty target");
        self.cells.swap(cell_index(from), target_index);
        let _ = self.positions.insert(unit, target);
        self.debug_assert_consistent();
    }

    /// Removes `unit` from the grid and all indices. Returns whether it was found.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        let Some(cell) = self.positions.remove(&unit) else {
            return false;
        };
        self.cells[cell_index(cell)] = Occupant::Empty;
        let _ = self.units.remove(&unit);
        self.defenders.retain(|id| *id != unit);
        self.attackers.retain(|id| *id != unit);
        self.occupants.retain(|id| *id != unit);
        self.debug_assert_consistent();
        true
    }

    /// Applies `source`'s strength as damage to `target` and reports the hit.
    pub fn strike(&mut self, source: UnitId, target: UnitId, out_events: &mut Vec<Event>) {
        let Some(damage) = self.units.get(&source).map(Unit::strength) else {
            return;
        };
        if let Some(unit) = self.units.get_mut(&target) {
            let remaining = unit.lose_health(damage);
            out_events.push(Event::UnitStruck {
                source,
                target,
                damage,
                remaining,
            });
        }
    }

    /// Resolves one full turn: acts, death sweep, spawn draw and upkeep.
    pub fn resolve_turn(&mut self, spawner: &mut dyn SpawnSource, out_events: &mut Vec<Event>) {
        if !self.attackers.is_empty() {
            for id in self.defenders.clone() {
                self.act(id, out_events);
            }
            for id in self.attackers.clone() {
                self.act(id, out_events);
            }
        }

        self.sweep_dead(out_events);
        self.spawn_attacker(spawner, out_events);
        self.upkeep(out_events);
    }

    fn act(&mut self, id: UnitId, out_events: &mut Vec<Event>) {
        if let Some(behavior) = self.units.get(&id).map(Unit::behavior) {
            behavior.act(id, self, out_events);
        }
    }

    fn sweep_dead(&mut self, out_events: &mut Vec<Event>) {
        let fallen: Vec<UnitId> = self
            .defenders
            .iter()
            .chain(self.attackers.iter())
            .copied()
            .filter(|id| self.units.get(id).is_some_and(|unit| !unit.is_alive()))
            .collect();

        for id in fallen {
            let (Some(kind), Some(cell)) = (self.units.get(&id).map(Unit::kind), self.position(id))
            else {
                continue;
            };
            if self.remove(id) {
                out_events.push(Event::UnitDefeated {
                    unit: id,
                    kind,
                    cell,
                });
            }
        }
    }

    fn spawn_attacker(&mut self, spawner: &mut dyn SpawnSource, out_events: &mut Vec<Event>) {
        let pending = self.level.pending().len();
        if pending == 0 {
            return;
        }

        let draw = spawner.draw(pending, GRID_ROWS);
        debug_assert!(draw.pending_index < pending && draw.row < GRID_ROWS);
        let pending_index = draw.pending_index.min(pending - 1);
        let row = draw.row.min(GRID_ROWS - 1);

        // The drawn attacker leaves the queue even when its spawn cell is taken.
        let kind = self.level.take_pending(pending_index);
        let cell = CellCoord::new(SPAWN_COLUMN, row);
        if self.occupant(cell).is_empty() {
            let unit = self.create_unit(UnitKind::Attacker(kind));
            let id = self.place(unit, cell);
            trace!(unit = id.get(), row, kind = kind.label(), "attacker spawned");
            out_events.push(Event::AttackerSpawned {
                unit: id,
                kind,
                cell,
            });
        } else {
            trace!(row, kind = kind.label(), "spawn cell occupied, attacker discarded");
            out_events.push(Event::SpawnDiscarded { kind, row });
        }
    }

    fn upkeep(&mut self, out_events: &mut Vec<Event>) {
        let generators: Vec<UnitId> = self
            .defenders
            .iter()
            .copied()
            .filter(|id| {
                matches!(
                    self.units.get(id).map(Unit::kind),
                    Some(UnitKind::Defender(kind)) if kind.generates_currency()
                )
            })
            .collect();

        for unit in generators {
            let amount = lane_defence_core::GENERATOR_BONUS;
            self.level.credit(amount);
            out_events.push(Event::CurrencyGenerated { unit, amount });
        }

        self.level.advance_cooldowns();
    }

    /// Reports whether any attacker stands in the defended column.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.attackers.iter().any(|id| {
            self.position(*id)
                .is_some_and(|cell| cell.column() == DEFENDED_COLUMN)
        })
    }

    /// Reports whether the wave is exhausted and no attacker remains on the board.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.level.pending().is_empty() && self.attackers.is_empty()
    }

    /// Reports whether a currency generator is currently on the board.
    #[must_use]
    pub fn has_generator(&self) -> bool {
        self.defenders.iter().any(|id| {
            matches!(
                self.units.get(id).map(Unit::kind),
                Some(UnitKind::Defender(kind)) if kind.generates_currency()
            )
        })
    }

    /// Returns the occupant of the provided cell.
    ///
    /// Out-of-grid coordinates read as empty.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Occupant {
        if !cell.in_bounds() {
            return Occupant::Empty;
        }
        self.cells[cell_index(cell)]
    }

    /// Returns the unit with the provided handle, if it is on the board.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Returns the unit standing in the provided cell, if any.
    #[must_use]
    pub fn unit_at(&self, cell: CellCoord) -> Option<&Unit> {
        self.occupant(cell).unit().and_then(|id| self.units.get(&id))
    }

    /// Returns the cell occupied by the unit, if it is on the board.
    #[must_use]
    pub fn position(&self, id: UnitId) -> Option<CellCoord> {
        self.positions.get(&id).copied()
    }

    /// Captures a query snapshot of the unit, if it is on the board.
    #[must_use]
    pub fn snapshot(&self, id: UnitId) -> Option<UnitSnapshot> {
        let unit = self.units.get(&id)?;
        Some(UnitSnapshot {
            id,
            kind: unit.kind(),
            cell: self.position(id)?,
            health: unit.health(),
            full_health: unit.full_health(),
            strength: unit.strength(),
        })
    }

    /// Handles of every defender on the board in registration order.
    #[must_use]
    pub fn defenders(&self) -> &[UnitId] {
        &self.defenders
    }

    /// Handles of every attacker on the board in registration order.
    #[must_use]
    pub fn attackers(&self) -> &[UnitId] {
        &self.attackers
    }

    /// Handles of every unit on the board in registration order.
    #[must_use]
    pub fn occupants(&self) -> &[UnitId] {
        &self.occupants
    }

    /// Raw row-major cell contents.
    #[must_use]
    pub fn cells(&self) -> &[Occupant] {
        &self.cells
    }

    /// Current grid interaction mode.
    #[must_use]
    pub const fn mode(&self) -> GridMode {
        self.mode
    }

    /// Switches the grid interaction mode.
    pub fn set_mode(&mut self, mode: GridMode) {
        self.mode = mode;
    }

    /// Active level.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Mutable access to the active level.
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub(crate) const fn next_unit_id(&self) -> u32 {
        self.next_unit_id
    }

    /// Replaces grid contents and indices wholesale from restored parts.
    pub(crate) fn install(&mut self, parts: BoardParts) {
        self.cells = vec![Occupant::Empty; CELL_COUNT];
        self.units.clear();
        self.positions.clear();
        for (cell, unit) in parts.placed {
            let id = unit.id();
            self.cells[cell_index(cell)] = Occupant::Unit(id);
            let _ = self.positions.insert(id, cell);
            let _ = self.units.insert(id, unit);
        }
        self.defenders = parts.defenders;
        if let Some(attackers) = parts.attackers {
            self.attackers = attackers;
        }
        self.occupants = parts.occupants;
        self.next_unit_id = parts.next_unit_id;
        self.debug_assert_consistent();
    }

    fn debug_assert_consistent(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(self.cells.len(), CELL_COUNT);
            debug_assert_eq!(self.units.len(), self.positions.len());
            debug_assert_eq!(
                self.occupants.len(),
                self.defenders.len() + self.attackers.len()
            );
            for (id, cell) in &self.positions {
                debug_assert_eq!(self.cells[cell_index(*cell)], Occupant::Unit(*id));
            }
            for id in &self.occupants {
                debug_assert!(self.units.contains_key(id), "index names a missing unit");
            }
        }
    }
}

/// Grid contents rebuilt from a capture, ready to be installed on a board.
#[derive(Debug)]
pub(crate) struct BoardParts {
    pub(crate) placed: Vec<(CellCoord, Unit)>,
    pub(crate) defenders: Vec<UnitId>,
    /// `None` keeps the board's current attacker index.
    pub(crate) attackers: Option<Vec<UnitId>>,
    pub(crate) occupants: Vec<UnitId>,
    pub(crate) next_unit_id: u32,
}

/// Converts an in-bounds cell into its row-major index.
pub(crate) fn cell_index(cell: CellCoord) -> usize {
    debug_assert!(cell.in_bounds(), "cell {cell} lies outside the grid");
    (cell.row() * GRID_COLUMNS + cell.column()) as usize
}

/// Converts a row-major index back into a cell coordinate.
pub(crate) fn cell_at(index: usize) -> CellCoord {
    let index = index as u32;
    CellCoord::new(index % GRID_COLUMNS, index / GRID_COLUMNS)
}
