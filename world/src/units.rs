//! Unit state and the per-kind behaviors that run during the act phase.

use lane_defence_core::{
    AttackerKind, CellCoord, DefenderKind, Direction, Event, UnitId, UnitKind, GRID_COLUMNS,
};

use crate::board::{Board, Occupant};

/// A single unit living on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    health: i32,
    full_health: i32,
    strength: i32,
}

impl Unit {
    pub(crate) const fn new(id: UnitId, kind: UnitKind, full_health: i32, strength: i32) -> Self {
        Self {
            id,
            kind,
            health: full_health,
            full_health,
            strength,
        }
    }

    /// Overrides the current health, keeping the full health untouched.
    #[must_use]
    pub const fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Handle assigned when the unit was created.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Type tag of the unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Current health. Non-positive values mark the unit for the death sweep.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health the unit was created with.
    #[must_use]
    pub const fn full_health(&self) -> i32 {
        self.full_health
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn strength(&self) -> i32 {
        self.strength
    }

    /// Reports whether the unit survives the death sweep.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Strategy that drives the unit during the act phase.
    #[must_use]
    pub const fn behavior(&self) -> Behavior {
        Behavior::for_kind(self.kind)
    }

    pub(crate) fn lose_health(&mut self, amount: i32) -> i32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }
}

/// Closed set of act-phase strategies, selected per unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Hits the attacker directly to the right.
    Melee,
    /// Hits the first attacker found anywhere to the right along the row.
    Ranged,
    /// Never acts.
    Passive,
    /// Hits the defender to the left, or steps into the left cell when empty.
    Advance,
    /// Tunnels past a defender when the cell beyond it is empty, otherwise advances.
    Burrow,
}

impl Behavior {
    /// Strategy used by units of the provided kind.
    #[must_use]
    pub const fn for_kind(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Defender(DefenderKind::FlyTrap) => Self::Melee,
            UnitKind::Defender(DefenderKind::PeaShooter) => Self::Ranged,
            UnitKind::Defender(
                DefenderKind::Sunflower | DefenderKind::Potato | DefenderKind::Walnut,
            ) => Self::Passive,
            UnitKind::Attacker(AttackerKind::Walker | AttackerKind::Tank) => Self::Advance,
            UnitKind::Attacker(AttackerKind::Burrower) => Self::Burrow,
        }
    }

    /// Runs one act for `actor`, reporting hits and moves through `out_events`.
    pub fn act(self, actor: UnitId, board: &mut Board, out_events: &mut Vec<Event>) {
        match self {
            Self::Melee => melee(actor, board, out_events),
            Self::Ranged => ranged(actor, board, out_events),
            Self::Passive => {}
            Self::Advance => advance(actor, board, out_events),
            Self::Burrow => burrow(actor, board, out_events),
        }
    }
}

fn melee(actor: UnitId, board: &mut Board, out_events: &mut Vec<Event>) {
    if let Some(Occupant::Unit(target)) = board.neighbor(actor, Direction::East) {
        if is_attacker(board, target) {
            board.strike(actor, target, out_events);
        }
    }
}

fn ranged(actor: UnitId, board: &mut Board, out_events: &mut Vec<Event>) {
    let Some(origin) = board.position(actor) else {
        return;
    };
    let target = (origin.column() + 1..GRID_COLUMNS)
        .filter_map(|column| board.occupant(CellCoord::new(column, origin.row())).unit())
        .find(|id| is_attacker(board, *id));
    if let Some(target) = target {
        board.strike(actor, target, out_events);
    }
}

fn advance(actor: UnitId, board: &mut Board, out_events: &mut Vec<Event>) {
    let Some(target_cell) = board.neighbor_cell(actor, Direction::West) else {
        return;
    };
    match board.occupant(target_cell) {
        Occupant::Empty => move_to(actor, target_cell, board, out_events),
        Occupant::Unit(target) => {
            if is_defender(board, target) {
                board.strike(actor, target, out_events);
            }
        }
    }
}

fn burrow(actor: UnitId, board: &mut Board, out_events: &mut Vec<Event>) {
    let tunnel_exit = board
        .neighbor_cell(actor, Direction::West)
        .filter(|cell| board.occupant(*cell).unit().is_some_and(|id| is_defender(board, id)))
        .and_then(|cell| cell.step(Direction::West))
        .filter(|cell| board.occupant(*cell).is_empty());

    match tunnel_exit {
        Some(exit) => move_to(actor, exit, board, out_events),
        None => advance(actor, board, out_events),
    }
}

fn move_to(actor: UnitId, target: CellCoord, board: &mut Board, out_events: &mut Vec<Event>) {
    let Some(from) = board.position(actor) else {
        return;
    };
    board.relocate(actor, target);
    out_events.push(Event::UnitMoved {
        unit: actor,
        from,
        to: target,
    });
}

fn is_attacker(board: &Board, id: UnitId) -> bool {
    board.unit(id).is_some_and(|unit| unit.kind().is_attacker())
}

fn is_defender(board: &Board, id: UnitId) -> bool {
    board.unit(id).is_some_and(|unit| unit.kind().is_defender())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn board() -> Board {
        Board::new(Level::sandbox(Vec::new()))
    }

    fn spawn(board: &mut Board, kind: UnitKind, column: u32, row: u32) -> UnitId {
        let unit = board.create_unit(kind);
        board.place(unit, CellCoord::new(column, row))
    }

    fn health(board: &Board, id: UnitId) -> i32 {
        board.unit(id).map(Unit::health).expect("unit on board")
    }

    #[test]
    fn behavior_follows_kind() {
        assert_eq!(
            Behavior::for_kind(UnitKind::Defender(DefenderKind::FlyTrap)),
            Behavior::Melee
        );
        assert_eq!(
            Behavior::for_kind(UnitKind::Defender(DefenderKind::Walnut)),
            Behavior::Passive
        );
        assert_eq!(
            Behavior::for_kind(UnitKind::Attacker(AttackerKind::Tank)),
            Behavior::Advance
        );
        assert_eq!(
            Behavior::for_kind(UnitKind::Attacker(AttackerKind::Burrower)),
            Behavior::Burrow
        );
    }

    #[test]
    fn lose_health_saturates_at_minimum() {
        let mut unit = Unit::new(
            UnitId::new(0),
            UnitKind::Defender(DefenderKind::Walnut),
            1000,
            0,
        )
        .with_health(i32::MIN + 10);

        assert_eq!(unit.lose_health(100), i32::MIN);
        assert!(!unit.is_alive());
    }

    #[test]
    fn melee_hits_adjacent_attacker_only() {
        let mut board = board();
        let trap = spawn(&mut board, UnitKind::Defender(DefenderKind::FlyTrap), 2, 0);
        let walker = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 3, 0);
        let distant = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 5, 1);
        let mut events = Vec::new();

        Behavior::Melee.act(trap, &mut board, &mut events);

        assert_eq!(health(&board, walker), 250 - 175);
        assert_eq!(health(&board, distant), 250);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn ranged_skips_defenders_and_hits_first_attacker() {
        let mut board = board();
        let shooter = spawn(&mut board, UnitKind::Defender(DefenderKind::PeaShooter), 1, 2);
        let _wall = spawn(&mut board, UnitKind::Defender(DefenderKind::Walnut), 3, 2);
        let near = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 5, 2);
        let far = spawn(&mut board, UnitKind::Attacker(AttackerKind::Tank), 7, 2);
        let mut events = Vec::new();

        Behavior::Ranged.act(shooter, &mut board, &mut events);

        assert_eq!(health(&board, near), 100);
        assert_eq!(health(&board, far), 400, "only one hit per act");
    }

    #[test]
    fn passive_never_acts() {
        let mut board = board();
        let potato = spawn(&mut board, UnitKind::Defender(DefenderKind::Potato), 2, 0);
        let walker = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 3, 0);
        let mut events = Vec::new();

        Behavior::Passive.act(potato, &mut board, &mut events);

        assert_eq!(health(&board, walker), 250);
        assert!(events.is_empty());
    }

    #[test]
    fn advance_steps_into_empty_cell() {
        let mut board = board();
        let walker = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 4, 3);
        let mut events = Vec::new();

        Behavior::Advance.act(walker, &mut board, &mut events);

        assert_eq!(board.position(walker), Some(CellCoord::new(3, 3)));
        assert_eq!(
            events,
            vec![Event::UnitMoved {
                unit: walker,
                from: CellCoord::new(4, 3),
                to: CellCoord::new(3, 3),
            }]
        );
    }

    #[test]
    fn advance_hits_defender_instead_of_moving() {
        let mut board = board();
        let wall = spawn(&mut board, UnitKind::Defender(DefenderKind::Walnut), 3, 3);
        let tank = spawn(&mut board, UnitKind::Attacker(AttackerKind::Tank), 4, 3);
        let mut events = Vec::new();

        Behavior::Advance.act(tank, &mut board, &mut events);

        assert_eq!(board.position(tank), Some(CellCoord::new(4, 3)));
        assert_eq!(health(&board, wall), 1000 - 150);
    }

    #[test]
    fn advance_waits_behind_another_attacker() {
        let mut board = board();
        let front = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 3, 3);
        let back = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 4, 3);
        let mut events = Vec::new();

        Behavior::Advance.act(back, &mut board, &mut events);

        assert_eq!(board.position(back), Some(CellCoord::new(4, 3)));
        assert_eq!(health(&board, front), 250);
        assert!(events.is_empty());
    }

    #[test]
    fn advance_stops_at_defended_column() {
        let mut board = board();
        let walker = spawn(&mut board, UnitKind::Attacker(AttackerKind::Walker), 0, 1);
        let mut events = Vec::new();

        Behavior::Advance.act(walker, &mut board, &mut events);

        assert_eq!(board.position(walker), Some(CellCoord::new(0, 1)));
        assert!(events.is_empty());
    }

    #[test]
    fn burrow_tunnels_past_defender() {
        let mut board = board();
        let wall = spawn(&mut board, UnitKind::Defender(DefenderKind::Walnut), 4, 0);
        let burrower = spawn(&mut board, UnitKind::Attacker(AttackerKind::Burrower), 5, 0);
        let mut events = Vec::new();

        Behavior::Burrow.act(burrower, &mut board, &mut events);

        assert_eq!(board.position(burrower), Some(CellCoord::new(3, 0)));
        assert_eq!(health(&board, wall), 1000);
    }

    #[test]
    fn burrow_attacks_when_exit_is_blocked() {
        let mut board = board();
        let _blocker = spawn(&mut board, UnitKind::Defender(DefenderKind::Sunflower), 3, 0);
        let wall = spawn(&mut board, UnitKind::Defender(DefenderKind::Walnut), 4, 0);
        let burrower = spawn(&mut board, UnitKind::Attacker(AttackerKind::Burrower), 5, 0);
        let mut events = Vec::new();

        Behavior::Burrow.act(burrower, &mut board, &mut events);

        assert_eq!(board.position(burrower), Some(CellCoord::new(5, 0)));
        assert_eq!(health(&board, wall), 900);
    }

    #[test]
    fn burrow_walks_when_no_defender_ahead() {
        let mut board = board();
        let burrower = spawn(&mut board, UnitKind::Attacker(AttackerKind::Burrower), 5, 0);
        let mut events = Vec::new();

        Behavior::Burrow.act(burrower, &mut board, &mut events);

        assert_eq!(board.position(burrower), Some(CellCoord::new(4, 0)));
    }
}
