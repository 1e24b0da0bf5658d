#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system that turns defender selection and cell input into placement commands.

use lane_defence_core::{
    CellCoord, Command, DefenderAvailability, DefenderKind, Event, GridMode, PlacementError,
    PlacementPreview,
};

/// Input snapshot distilled from adapter-provided player input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Defender type the player picked from the catalog, if any.
    pub selection: Option<DefenderKind>,
    /// Cell the player pointed at, if any.
    pub cursor_cell: Option<CellCoord>,
    /// Indicates whether the player confirmed the pointed cell.
    pub confirm_action: bool,
    /// Indicates whether the player backed out of the current selection.
    pub cancel_action: bool,
}

impl BuilderInput {
    /// Input that selects the provided defender type.
    #[must_use]
    pub const fn select(kind: DefenderKind) -> Self {
        Self {
            selection: Some(kind),
            cursor_cell: None,
            confirm_action: false,
            cancel_action: false,
        }
    }

    /// Input that confirms the provided cell.
    #[must_use]
    pub const fn confirm(cell: CellCoord) -> Self {
        Self {
            selection: None,
            cursor_cell: Some(cell),
            confirm_action: true,
            cancel_action: false,
        }
    }

    /// Input that cancels the current selection.
    #[must_use]
    pub const fn cancel() -> Self {
        Self {
            selection: None,
            cursor_cell: None,
            confirm_action: false,
            cancel_action: true,
        }
    }
}

/// Feedback the builder wants the adapter to show to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The selected type is still cooling down.
    CoolingDown {
        /// Type that was selected.
        kind: DefenderKind,
        /// Turns left before the type is available.
        turns_remaining: u32,
    },
    /// The balance does not cover the selected type.
    Unaffordable {
        /// Type that was selected.
        kind: DefenderKind,
        /// Price of the type.
        price: i32,
    },
    /// The confirmed cell cannot take the selected type.
    Unplaceable {
        /// Type that was selected.
        kind: DefenderKind,
        /// Cell that was confirmed.
        cell: CellCoord,
        /// Reason reported by the placement preview.
        reason: PlacementError,
    },
}

/// Builder system that tracks the grid mode and the selected defender type.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    mode: GridMode,
    selected: Option<DefenderKind>,
    notices: Vec<Notice>,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: GridMode::ViewStats,
            selected: None,
            notices: Vec::new(),
        }
    }

    /// Defender type currently waiting for a target cell.
    #[must_use]
    pub const fn selected(&self) -> Option<DefenderKind> {
        self.selected
    }

    /// Grid mode as last reported by the world.
    #[must_use]
    pub const fn mode(&self) -> GridMode {
        self.mode
    }

    /// Drains the notices recorded since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// `catalog` should mirror the world's `query::defender_catalog` and
    /// `preview` its `query::placement_preview` helper. Input is ignored while
    /// the grid is locked.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        catalog: &[DefenderAvailability],
        input: BuilderInput,
        mut preview: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(DefenderKind, CellCoord) -> PlacementPreview,
    {
        for event in events {
            match event {
                Event::GridModeChanged { mode } => self.mode = *mode,
                Event::LevelStarted { .. } => {
                    self.mode = GridMode::ViewStats;
                    self.selected = None;
                }
                _ => {}
            }
        }

        if self.mode == GridMode::Locked {
            return;
        }

        if input.cancel_action {
            self.selected = None;
            out.push(Command::SetGridMode {
                mode: GridMode::ViewStats,
            });
            return;
        }

        if let Some(kind) = input.selection {
            self.select(kind, catalog, out);
        }

        if input.confirm_action {
            if let (Some(kind), Some(cell)) = (self.selected, input.cursor_cell) {
                let preview = preview(kind, cell);
                match preview.verdict {
                    Ok(()) => {
                        self.selected = None;
                        out.push(Command::SetGridMode {
                            mode: GridMode::Locked,
                        });
                        out.push(Command::PlaceDefender { kind, cell });
                        out.push(Command::SetGridMode {
                            mode: GridMode::ViewStats,
                        });
                    }
                    Err(reason) => self.notices.push(Notice::Unplaceable { kind, cell, reason }),
                }
            }
        }
    }

    fn select(&mut self, kind: DefenderKind, catalog: &[DefenderAvailability], out: &mut Vec<Command>) {
        let Some(entry) = catalog.iter().find(|entry| entry.kind == kind) else {
            return;
        };

        let notice = if !entry.available {
            Some(Notice::CoolingDown {
                kind,
                turns_remaining: entry.cooldown,
            })
        } else if !entry.affordable {
            Some(Notice::Unaffordable {
                kind,
                price: entry.price,
            })
        } else {
            None
        };

        match notice {
            Some(notice) => {
                self.notices.push(notice);
                self.selected = None;
                out.push(Command::SetGridMode {
                    mode: GridMode::ViewStats,
                });
            }
            None => {
                self.selected = Some(kind);
                out.push(Command::SetGridMode {
                    mode: GridMode::ChoosePosition,
                });
            }
        }
    }
}
