#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.

pub mod board;
pub mod capture;
pub mod factory;
pub mod history;
pub mod level;
pub mod persistence;
pub mod units;

use lane_defence_core::{Command, Event, LevelId, SpawnSource, STARTING_CURRENCY};
use lane_defence_system_spawning::{Config, SeededSpawner};
use tracing::{debug, info};

use crate::{
    board::Board,
    history::{History, HistoryCommand, PlacementCommand, TurnCommand},
    level::Level,
};

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    history: History,
    spawner: Box<dyn SpawnSource>,
}

impl World {
    /// Creates a world on the first campaign level with the default seeded spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawn_source(
            first_level(),
            Box::new(SeededSpawner::new(Config::default())),
        )
    }

    /// Creates a world on the provided level, drawing spawns from `spawner`.
    #[must_use]
    pub fn with_spawn_source(level: Level, spawner: Box<dyn SpawnSource>) -> Self {
        Self::from_parts(Board::new(level), History::new(), spawner)
    }

    pub(crate) fn from_parts(
        board: Board,
        history: History,
        spawner: Box<dyn SpawnSource>,
    ) -> Self {
        Self {
            board,
            history,
            spawner,
        }
    }

    /// Replaces the spawn source used by future turns.
    pub fn set_spawn_source(&mut self, spawner: Box<dyn SpawnSource>) {
        self.spawner = spawner;
    }

    fn start_level(&mut self, level: Level, out_events: &mut Vec<Event>) {
        let number = level.number();
        let custom = level.is_custom();
        let pending = level.pending().len();
        self.board = Board::new(level);
        self.history.clear();
        info!(level = number.get(), custom, pending, "level started");
        out_events.push(Event::LevelStarted {
            level: number,
            custom,
            pending,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn first_level() -> Level {
    Level::campaign(LevelId::new(1)).unwrap_or_else(|| Level::sandbox(Vec::new()))
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceDefender { kind, cell } => {
            if let Err(reason) = world.board.check_placement(kind, cell) {
                debug!(kind = kind.label(), %cell, %reason, "placement rejected");
                out_events.push(Event::PlacementRejected { kind, cell, reason });
                return;
            }
            world.history.execute(
                HistoryCommand::Placement(PlacementCommand::new(kind, cell)),
                &mut world.board,
                world.spawner.as_mut(),
                out_events,
            );
        }
        Command::EndTurn => {
            world.history.execute(
                HistoryCommand::Turn(TurnCommand::new()),
                &mut world.board,
                world.spawner.as_mut(),
                out_events,
            );
            let turn = world.history.turn_count();
            debug!(
                turn,
                currency = world.board.level().currency(),
                attackers = world.board.attackers().len(),
                pending = world.board.level().pending().len(),
                "turn resolved"
            );
            out_events.push(Event::TurnResolved { turn });
        }
        Command::Undo => {
            if let Some(entry) = world.history.undo(&mut world.board) {
                out_events.push(Event::HistoryUndone { entry });
            }
        }
        Command::Redo => {
            if let Some(entry) = world.history.redo(&mut world.board) {
                out_events.push(Event::HistoryRedone { entry });
            }
        }
        Command::StartLevel { level } => match Level::campaign(level) {
            Some(next) => world.start_level(next, out_events),
            None => {
                debug!(level = level.get(), "unknown campaign level");
                out_events.push(Event::LevelRejected { level });
            }
        },
        Command::StartCustomLevel { roster } => {
            world.start_level(Level::custom(roster), out_events);
        }
        Command::SetGridMode { mode } => {
            world.board.set_mode(mode);
            out_events.push(Event::GridModeChanged { mode });
        }
        Command::GrantRelief => {
            world.board.level_mut().set_currency(STARTING_CURRENCY);
            info!(balance = STARTING_CURRENCY, "relief granted");
            out_events.push(Event::ReliefGranted {
                balance: STARTING_CURRENCY,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        CellCoord, DefenderAvailability, DefenderKind, GridMode, LevelId, PlacementPreview,
        UnitSnapshot,
    };

    use super::World;
    use crate::board::Board;

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Captures the unit standing in the provided cell, if any.
    #[must_use]
    pub fn cell(world: &World, cell: CellCoord) -> Option<UnitSnapshot> {
        world
            .board
            .occupant(cell)
            .unit()
            .and_then(|id| world.board.snapshot(id))
    }

    /// Captures every unit on the board, ordered by handle.
    #[must_use]
    pub fn units(world: &World) -> Vec<UnitSnapshot> {
        let mut snapshots: Vec<UnitSnapshot> = world
            .board
            .occupants()
            .iter()
            .filter_map(|id| world.board.snapshot(*id))
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Current currency balance.
    #[must_use]
    pub fn currency(world: &World) -> i32 {
        world.board.level().currency()
    }

    /// Reports whether the wave is exhausted and the board holds no attacker.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.board.is_won()
    }

    /// Reports whether an attacker reached the defended column.
    #[must_use]
    pub fn is_lost(world: &World) -> bool {
        world.board.is_lost()
    }

    /// Reports whether an undo would change anything.
    #[must_use]
    pub fn can_undo(world: &World) -> bool {
        world.history.can_undo()
    }

    /// Reports whether a redo would change anything.
    #[must_use]
    pub fn can_redo(world: &World) -> bool {
        world.history.can_redo()
    }

    /// Availability, cooldown and affordability of every defender type.
    #[must_use]
    pub fn defender_catalog(world: &World) -> Vec<DefenderAvailability> {
        world.board.level().availability()
    }

    /// Number of attackers still waiting to spawn.
    #[must_use]
    pub fn pending_count(world: &World) -> usize {
        world.board.level().pending().len()
    }

    /// Number of the active level.
    #[must_use]
    pub fn level(world: &World) -> LevelId {
        world.board.level().number()
    }

    /// Reports whether the active level was built from a custom roster.
    #[must_use]
    pub fn is_custom(world: &World) -> bool {
        world.board.level().is_custom()
    }

    /// Campaign level that follows the active one, if any.
    #[must_use]
    pub fn next_level(world: &World) -> Option<LevelId> {
        world.board.level().next_level()
    }

    /// Current grid interaction mode.
    #[must_use]
    pub fn grid_mode(world: &World) -> GridMode {
        world.board.mode()
    }

    /// Number of turns resolved on the active history.
    #[must_use]
    pub fn turn_number(world: &World) -> u64 {
        world.history.turn_count()
    }

    /// Predicts how the world would answer a placement request right now.
    #[must_use]
    pub fn placement_preview(world: &World, kind: DefenderKind, cell: CellCoord) -> PlacementPreview {
        PlacementPreview {
            kind,
            cell,
            verdict: world.board.check_placement(kind, cell),
        }
    }

    /// Reports whether some defender type costs strictly less than the balance.
    #[must_use]
    pub fn any_affordable(world: &World) -> bool {
        world.board.level().any_affordable()
    }

    /// Reports whether a currency generator stands on the board.
    #[must_use]
    pub fn has_generator(world: &World) -> bool {
        world.board.has_generator()
    }
}
