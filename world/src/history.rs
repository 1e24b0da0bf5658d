//! Undoable commands and the undo/redo stacks.
//!
//! Commands record the state before and after they run. Undo and redo restore
//! those captures and never re-run the action, so a redone turn reproduces the
//! recorded spawn draw exactly.

use lane_defence_core::{CellCoord, DefenderKind, Event, HistoryEntryKind, SpawnSource, UnitKind};
use serde::{Deserialize, Serialize};

use crate::{
    board::Board,
    capture::{BoardCapture, CaptureError, PlacementCapture},
};

/// Operations shared by every command kept in the history.
pub trait Reversible {
    /// Runs the action for the first time and records its captures.
    fn execute(
        &mut self,
        board: &mut Board,
        spawner: &mut dyn SpawnSource,
        out_events: &mut Vec<Event>,
    );

    /// Restores the state captured before the action ran.
    fn undo(&self, board: &mut Board);

    /// Restores the state captured after the action ran.
    fn redo(&self, board: &mut Board);
}

/// Placement of one defender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCommand {
    kind: DefenderKind,
    cell: CellCoord,
    before: Option<PlacementCapture>,
    after: Option<PlacementCapture>,
}

impl PlacementCommand {
    /// Creates a command that places `kind` at `cell` once executed.
    ///
    /// The placement is not validated here; the world checks it first.
    #[must_use]
    pub const fn new(kind: DefenderKind, cell: CellCoord) -> Self {
        Self {
            kind,
            cell,
            before: None,
            after: None,
        }
    }
}

impl Reversible for PlacementCommand {
    fn execute(
        &mut self,
        board: &mut Board,
        _spawner: &mut dyn SpawnSource,
        out_events: &mut Vec<Event>,
    ) {
        self.before = Some(PlacementCapture::of(board, self.kind));
        let unit = board.create_unit(UnitKind::Defender(self.kind));
        let id = board.place(unit, self.cell);
        self.after = Some(PlacementCapture::of(board, self.kind));
        out_events.push(Event::DefenderPlaced {
            unit: id,
            kind: self.kind,
            cell: self.cell,
            balance: board.level().currency(),
        });
    }

    fn undo(&self, board: &mut Board) {
        if let Some(before) = &self.before {
            before.restore(board);
        }
    }

    fn redo(&self, board: &mut Board) {
        if let Some(after) = &self.after {
            after.restore(board);
        }
    }
}

/// Resolution of one full turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCommand {
    before: Option<BoardCapture>,
    after: Option<BoardCapture>,
}

impl TurnCommand {
    /// Creates a command that resolves a turn once executed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            before: None,
            after: None,
        }
    }
}

impl Reversible for TurnCommand {
    fn execute(
        &mut self,
        board: &mut Board,
        spawner: &mut dyn SpawnSource,
        out_events: &mut Vec<Event>,
    ) {
        self.before = Some(BoardCapture::of(board));
        board.resolve_turn(spawner, out_events);
        self.after = Some(BoardCapture::of(board));
    }

    fn undo(&self, board: &mut Board) {
        if let Some(before) = &self.before {
            before.restore(board);
        }
    }

    fn redo(&self, board: &mut Board) {
        if let Some(after) = &self.after {
            after.restore(board);
        }
    }
}

/// Closed set of commands the history can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryCommand {
    /// A defender placement.
    Placement(PlacementCommand),
    /// A resolved turn.
    Turn(TurnCommand),
}

impl HistoryCommand {
    /// Kind tag reported in history events.
    #[must_use]
    pub const fn entry(&self) -> HistoryEntryKind {
        match self {
            Self::Placement(_) => HistoryEntryKind::Placement,
            Self::Turn(_) => HistoryEntryKind::Turn,
        }
    }

    fn as_reversible(&self) -> &dyn Reversible {
        match self {
            Self::Placement(command) => command,
            Self::Turn(command) => command,
        }
    }

    fn as_reversible_mut(&mut self) -> &mut dyn Reversible {
        match self {
            Self::Placement(command) => command,
            Self::Turn(command) => command,
        }
    }

    fn validate(&self) -> Result<(), CaptureError> {
        match self {
            Self::Placement(command) => [&command.before, &command.after]
                .into_iter()
                .flatten()
                .try_for_each(PlacementCapture::validate),
            Self::Turn(command) => [&command.before, &command.after]
                .into_iter()
                .flatten()
                .try_for_each(BoardCapture::validate),
        }
    }
}

impl Reversible for HistoryCommand {
    fn execute(
        &mut self,
        board: &mut Board,
        spawner: &mut dyn SpawnSource,
        out_events: &mut Vec<Event>,
    ) {
        self.as_reversible_mut().execute(board, spawner, out_events);
    }

    fn undo(&self, board: &mut Board) {
        self.as_reversible().undo(board);
    }

    fn redo(&self, board: &mut Board) {
        self.as_reversible().redo(board);
    }
}

/// Undo and redo stacks of executed commands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    undo_stack: Vec<HistoryCommand>,
    redo_stack: Vec<HistoryCommand>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the command, pushes it onto the undo stack and clears the redo stack.
    pub fn execute(
        &mut self,
        mut command: HistoryCommand,
        board: &mut Board,
        spawner: &mut dyn SpawnSource,
        out_events: &mut Vec<Event>,
    ) {
        command.execute(board, spawner, out_events);
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Undoes the most recent command. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, board: &mut Board) -> Option<HistoryEntryKind> {
        let command = self.undo_stack.pop()?;
        command.undo(board);
        let entry = command.entry();
        self.redo_stack.push(command);
        Some(entry)
    }

    /// Redoes the most recently undone command. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, board: &mut Board) -> Option<HistoryEntryKind> {
        let command = self.redo_stack.pop()?;
        command.redo(board);
        let entry = command.entry();
        self.undo_stack.push(command);
        Some(entry)
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Reports whether an undo would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Reports whether a redo would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of resolved turns on the undo stack.
    #[must_use]
    pub fn turn_count(&self) -> u64 {
        self.undo_stack
            .iter()
            .filter(|command| matches!(command, HistoryCommand::Turn(_)))
            .count() as u64
    }

    /// Checks every capture held by either stack.
    pub fn validate(&self) -> Result<(), CaptureError> {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .try_for_each(HistoryCommand::validate)
    }
}
