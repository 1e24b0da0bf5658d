#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure progression system that reacts to resolved turns.
//!
//! After each turn it decides whether the level was cleared, the campaign won
//! or the game lost, and whether the player needs currency relief to keep
//! playing.

use lane_defence_core::{Command, Event, LevelId};

/// Read-only facts about the world the progression rules depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressionView {
    /// Active level.
    pub level: LevelId,
    /// Campaign level that follows the active one, if any.
    pub next_level: Option<LevelId>,
    /// Whether the wave is exhausted and no attacker remains.
    pub won: bool,
    /// Whether an attacker reached the defended column.
    pub lost: bool,
    /// Whether some defender type costs strictly less than the balance.
    pub any_affordable: bool,
    /// Whether a currency generator stands on the board.
    pub has_generator: bool,
}

/// Result of a level decided by the last resolved turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The level was cleared and the next campaign level was requested.
    LevelCleared {
        /// Level that was cleared.
        level: LevelId,
        /// Level that starts next.
        next: LevelId,
    },
    /// The final campaign level or a custom level was cleared.
    Victory {
        /// Level that was cleared.
        level: LevelId,
    },
    /// An attacker broke through.
    Defeat {
        /// Level that was lost.
        level: LevelId,
    },
}

/// Progression system evaluating win, loss and relief after each turn.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Creates a new progression system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates the rules if `events` contain a resolved turn.
    ///
    /// Commands for the next level or for relief are appended to `out`.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &ProgressionView,
        out: &mut Vec<Command>,
    ) -> Option<Outcome> {
        let turn_resolved = events
            .iter()
            .any(|event| matches!(event, Event::TurnResolved { .. }));
        if !turn_resolved {
            return None;
        }

        if view.won {
            return Some(match view.next_level {
                Some(next) => {
                    out.push(Command::StartLevel { level: next });
                    Outcome::LevelCleared {
                        level: view.level,
                        next,
                    }
                }
                None => Outcome::Victory { level: view.level },
            });
        }

        if !view.any_affordable && !view.has_generator {
            out.push(Command::GrantRelief);
        }

        view.lost.then_some(Outcome::Defeat { level: view.level })
    }
}
