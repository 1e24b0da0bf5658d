#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows in the battlefield grid.
pub const GRID_ROWS: u32 = 6;

/// Number of columns in the battlefield grid.
pub const GRID_COLUMNS: u32 = 9;

/// Column that attackers must never reach. Column zero is the defended edge.
pub const DEFENDED_COLUMN: u32 = 0;

/// Column in which attackers spawn. Defenders may not be placed here.
pub const SPAWN_COLUMN: u32 = GRID_COLUMNS - 1;

/// Currency every level starts with, and the balance restored by relief.
pub const STARTING_CURRENCY: i32 = 50;

/// Currency credited by each generator on the board at the end of a turn.
pub const GENERATOR_BONUS: i32 = 25;

/// Highest campaign level. Levels above this number do not exist.
pub const FINAL_CAMPAIGN_LEVEL: u32 = 3;

/// Largest number of attackers a custom level may queue in total.
pub const MAX_CUSTOM_ATTACKERS: u32 = 100;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Requests placement of a defender of the given kind at the provided cell.
    PlaceDefender {
        /// Type of defender to construct.
        kind: DefenderKind,
        /// Cell that should hold the defender.
        cell: CellCoord,
    },
    /// Resolves a full turn: acts, death sweep, spawn draw and upkeep.
    EndTurn,
    /// Restores the state captured before the most recent history entry.
    Undo,
    /// Restores the state captured after the most recently undone entry.
    Redo,
    /// Replaces the active level with the given campaign level.
    StartLevel {
        /// Campaign level to start.
        level: LevelId,
    },
    /// Replaces the active level with a custom level built from a roster.
    StartCustomLevel {
        /// Validated attacker counts for the custom level.
        roster: CustomRoster,
    },
    /// Requests that the grid switch to the provided interaction mode.
    SetGridMode {
        /// Mode the grid should activate.
        mode: GridMode,
    },
    /// Resets the currency balance to [`STARTING_CURRENCY`].
    GrantRelief,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a defender was placed and paid for.
    DefenderPlaced {
        /// Identifier assigned to the new defender.
        unit: UnitId,
        /// Type of defender that was placed.
        kind: DefenderKind,
        /// Cell the defender occupies.
        cell: CellCoord,
        /// Currency balance after the price was debited.
        balance: i32,
    },
    /// Reports that a placement request was rejected before touching the board.
    PlacementRejected {
        /// Type of defender requested.
        kind: DefenderKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that one unit damaged another during the act phase.
    UnitStruck {
        /// Unit that dealt the damage.
        source: UnitId,
        /// Unit that received the damage.
        target: UnitId,
        /// Amount of health removed.
        damage: i32,
        /// Health left on the target after the hit. May be non-positive.
        remaining: i32,
    },
    /// Confirms that a unit moved between two cells.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
    },
    /// Reports that the death sweep removed a unit.
    UnitDefeated {
        /// Unit that was removed.
        unit: UnitId,
        /// Type of the removed unit.
        kind: UnitKind,
        /// Cell the unit occupied.
        cell: CellCoord,
    },
    /// Confirms that a pending attacker entered the board.
    AttackerSpawned {
        /// Identifier assigned to the attacker.
        unit: UnitId,
        /// Type of the attacker.
        kind: AttackerKind,
        /// Spawn cell in the rightmost column.
        cell: CellCoord,
    },
    /// Reports that a drawn attacker was discarded because its spawn cell was taken.
    SpawnDiscarded {
        /// Type of the discarded attacker.
        kind: AttackerKind,
        /// Row whose spawn cell was occupied.
        row: u32,
    },
    /// Reports currency produced by a generator during upkeep.
    CurrencyGenerated {
        /// Generator that produced the currency.
        unit: UnitId,
        /// Amount credited.
        amount: i32,
    },
    /// Marks the end of a resolved turn.
    TurnResolved {
        /// One-based number of the turn that just resolved.
        turn: u64,
    },
    /// Reports that the most recent history entry was undone.
    HistoryUndone {
        /// Kind of entry that was undone.
        entry: HistoryEntryKind,
    },
    /// Reports that the most recently undone history entry was redone.
    HistoryRedone {
        /// Kind of entry that was redone.
        entry: HistoryEntryKind,
    },
    /// Announces that a new level became active.
    LevelStarted {
        /// Level number. Custom levels report zero.
        level: LevelId,
        /// Whether the level was built from a custom roster.
        custom: bool,
        /// Number of attackers waiting to spawn.
        pending: usize,
    },
    /// Reports that a requested campaign level does not exist.
    LevelRejected {
        /// Level number provided in the request.
        level: LevelId,
    },
    /// Announces that the grid entered a new interaction mode.
    GridModeChanged {
        /// Mode that became active.
        mode: GridMode,
    },
    /// Reports that the currency balance was reset by relief.
    ReliefGranted {
        /// Balance after relief.
        balance: i32,
    },
}

/// Kinds of undoable history entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryEntryKind {
    /// A defender placement.
    Placement,
    /// A full turn resolution.
    Turn,
}

/// Interaction modes the grid can be in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridMode {
    /// Cells may be inspected for unit statistics.
    #[default]
    ViewStats,
    /// A defender type is selected and a target cell is being chosen.
    ChoosePosition,
    /// All grid input is disabled while a command runs.
    Locked,
}

/// Cardinal directions used for neighbour queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices, away from the defended edge.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices, toward the defended edge.
    West,
}

/// Unique handle assigned to every unit that enters the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Number of a level. Campaign levels start at one; custom levels use zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// Identifier reported by custom and sandbox levels.
    pub const CUSTOM: LevelId = LevelId(0);

    /// Creates a new level identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the level number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier names one of the campaign levels.
    #[must_use]
    pub const fn is_campaign(&self) -> bool {
        self.0 >= 1 && self.0 <= FINAL_CAMPAIGN_LEVEL
    }

    /// Returns the campaign level that follows this one, if any.
    #[must_use]
    pub const fn successor(&self) -> Option<LevelId> {
        if self.is_campaign() && self.0 < FINAL_CAMPAIGN_LEVEL {
            Some(LevelId(self.0 + 1))
        } else {
            None
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the cell lies inside the battlefield grid.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.column < GRID_COLUMNS && self.row < GRID_ROWS
    }

    /// Returns the adjacent cell in the given direction, or `None` past a grid edge.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
        };
        let next = CellCoord::new(column?, row?);
        next.in_bounds().then_some(next)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Fixed statistics shared by every instance of a defender type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderStats {
    /// Health a freshly placed defender starts with.
    pub full_health: i32,
    /// Damage dealt per attack.
    pub strength: i32,
    /// Currency debited when the defender is placed.
    pub price: i32,
    /// Turns the type stays unavailable after a placement.
    pub full_cooldown: u32,
}

/// Types of defenders that can be placed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Passive generator that credits currency every turn.
    Sunflower,
    /// Melee defender that bites the attacker directly to its right.
    FlyTrap,
    /// Cheap single-hit filler.
    Potato,
    /// High-health passive wall.
    Walnut,
    /// Ranged defender that hits the first attacker along its row.
    PeaShooter,
}

impl DefenderKind {
    /// Every defender type in catalog order.
    pub const ALL: [DefenderKind; 5] = [
        DefenderKind::Sunflower,
        DefenderKind::FlyTrap,
        DefenderKind::Potato,
        DefenderKind::Walnut,
        DefenderKind::PeaShooter,
    ];

    /// Returns the fixed statistics for the defender type.
    #[must_use]
    pub const fn stats(self) -> DefenderStats {
        match self {
            Self::Sunflower => DefenderStats {
                full_health: 100,
                strength: 0,
                price: 50,
                full_cooldown: 0,
            },
            Self::FlyTrap => DefenderStats {
                full_health: 320,
                strength: 175,
                price: 150,
                full_cooldown: 3,
            },
            Self::Potato => DefenderStats {
                full_health: 1,
                strength: 1000,
                price: 25,
                full_cooldown: 2,
            },
            Self::Walnut => DefenderStats {
                full_health: 1000,
                strength: 0,
                price: 50,
                full_cooldown: 4,
            },
            Self::PeaShooter => DefenderStats {
                full_health: 500,
                strength: 150,
                price: 100,
                full_cooldown: 2,
            },
        }
    }

    /// Currency debited when the defender is placed.
    #[must_use]
    pub const fn price(self) -> i32 {
        self.stats().price
    }

    /// Reports whether the type credits currency during upkeep.
    #[must_use]
    pub const fn generates_currency(self) -> bool {
        matches!(self, Self::Sunflower)
    }

    /// Stable textual identifier used by the factory and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunflower => "sunflower",
            Self::FlyTrap => "flytrap",
            Self::Potato => "potato",
            Self::Walnut => "walnut",
            Self::PeaShooter => "peashooter",
        }
    }
}

/// Fixed statistics shared by every instance of an attacker type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerStats {
    /// Health a freshly spawned attacker starts with.
    pub full_health: i32,
    /// Damage dealt per attack.
    pub strength: i32,
}

/// Types of attackers that spawn from the wave queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackerKind {
    /// Baseline attacker.
    Walker,
    /// Heavier attacker with more health and strength.
    Tank,
    /// Attacker that tunnels under a defender when the cell beyond is free.
    Burrower,
}

impl AttackerKind {
    /// Every attacker type.
    pub const ALL: [AttackerKind; 3] = [
        AttackerKind::Walker,
        AttackerKind::Tank,
        AttackerKind::Burrower,
    ];

    /// Returns the fixed statistics for the attacker type.
    #[must_use]
    pub const fn stats(self) -> AttackerStats {
        match self {
            Self::Walker => AttackerStats {
                full_health: 250,
                strength: 100,
            },
            Self::Tank => AttackerStats {
                full_health: 400,
                strength: 150,
            },
            Self::Burrower => AttackerStats {
                full_health: 200,
                strength: 100,
            },
        }
    }

    /// Stable textual identifier used by the factory and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Walker => "walker",
            Self::Tank => "tank",
            Self::Burrower => "burrower",
        }
    }
}

/// Type tag carried by every unit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// A player-placed defender.
    Defender(DefenderKind),
    /// A wave-spawned attacker.
    Attacker(AttackerKind),
}

impl UnitKind {
    /// Health a freshly constructed unit of this type starts with.
    #[must_use]
    pub const fn full_health(self) -> i32 {
        match self {
            Self::Defender(kind) => kind.stats().full_health,
            Self::Attacker(kind) => kind.stats().full_health,
        }
    }

    /// Damage dealt per attack by a unit of this type.
    #[must_use]
    pub const fn strength(self) -> i32 {
        match self {
            Self::Defender(kind) => kind.stats().strength,
            Self::Attacker(kind) => kind.stats().strength,
        }
    }

    /// Reports whether the type belongs to the defending side.
    #[must_use]
    pub const fn is_defender(self) -> bool {
        matches!(self, Self::Defender(_))
    }

    /// Reports whether the type belongs to the attacking side.
    #[must_use]
    pub const fn is_attacker(self) -> bool {
        matches!(self, Self::Attacker(_))
    }

    /// Stable textual identifier used by the factory and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Defender(kind) => kind.label(),
            Self::Attacker(kind) => kind.label(),
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a textual type identifier names no unit type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown unit type '{0}'")]
pub struct UnknownUnitKind(pub String);

impl FromStr for UnitKind {
    type Err = UnknownUnitKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        DefenderKind::ALL
            .iter()
            .map(|kind| UnitKind::Defender(*kind))
            .chain(AttackerKind::ALL.iter().map(|kind| UnitKind::Attacker(*kind)))
            .find(|kind| kind.label() == needle)
            .ok_or_else(|| UnknownUnitKind(value.to_owned()))
    }
}

impl FromStr for DefenderKind {
    type Err = UnknownUnitKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.parse::<UnitKind>()? {
            UnitKind::Defender(kind) => Ok(kind),
            UnitKind::Attacker(_) => Err(UnknownUnitKind(value.to_owned())),
        }
    }
}

/// Immutable representation of a single unit used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitSnapshot {
    /// Handle of the unit.
    pub id: UnitId,
    /// Type of the unit.
    pub kind: UnitKind,
    /// Cell the unit occupies.
    pub cell: CellCoord,
    /// Current health.
    pub health: i32,
    /// Health the unit started with.
    pub full_health: i32,
    /// Damage dealt per attack.
    pub strength: i32,
}

/// Availability of one defender type as seen by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderAvailability {
    /// Defender type described by the entry.
    pub kind: DefenderKind,
    /// Currency required to place the type.
    pub price: i32,
    /// Turns left before the type can be placed again.
    pub cooldown: u32,
    /// Whether the shared type cooldown has run out.
    pub available: bool,
    /// Whether the current balance covers the price.
    pub affordable: bool,
}

/// Declarative placement preview describing a potential defender placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Type proposed for placement.
    pub kind: DefenderKind,
    /// Cell proposed for placement.
    pub cell: CellCoord,
    /// Outcome the world would produce for the placement right now.
    pub verdict: Result<(), PlacementError>,
}

impl PlacementPreview {
    /// Reports whether the preview represents a valid placement.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Reasons a defender placement may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell is outside the grid")]
    OutOfBounds,
    /// The requested cell lies in the spawn column.
    #[error("defenders cannot be placed in the spawn column")]
    SpawnColumn,
    /// The requested cell already holds a unit.
    #[error("cell is already occupied")]
    Occupied,
    /// The defender type is still cooling down.
    #[error("type is available in {turns_remaining} turn(s)")]
    CoolingDown {
        /// Turns left before the type is available.
        turns_remaining: u32,
    },
    /// The balance does not cover the price.
    #[error("price {price} exceeds balance {balance}")]
    InsufficientFunds {
        /// Price of the requested type.
        price: i32,
        /// Balance at the time of the request.
        balance: i32,
    },
}

/// Validated attacker counts for a custom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomRoster {
    walkers: u32,
    tanks: u32,
    burrowers: u32,
}

impl CustomRoster {
    /// Creates a roster, rejecting one that contains no attackers or more
    /// than [`MAX_CUSTOM_ATTACKERS`] of them.
    pub fn new(walkers: u32, tanks: u32, burrowers: u32) -> Result<Self, RosterError> {
        let total = u64::from(walkers) + u64::from(tanks) + u64::from(burrowers);
        if total == 0 {
            return Err(RosterError::Empty);
        }
        if total > u64::from(MAX_CUSTOM_ATTACKERS) {
            return Err(RosterError::TooMany {
                max: MAX_CUSTOM_ATTACKERS,
            });
        }
        Ok(Self {
            walkers,
            tanks,
            burrowers,
        })
    }

    /// Parses a roster from raw per-kind count fields.
    ///
    /// Every field must be a base-ten integer. Negative values, empty rosters
    /// and oversized rosters are rejected.
    pub fn parse(walkers: &str, tanks: &str, burrowers: &str) -> Result<Self, RosterError> {
        let walkers = parse_count(walkers)?;
        let tanks = parse_count(tanks)?;
        let burrowers = parse_count(burrowers)?;
        if walkers < 0 || tanks < 0 || burrowers < 0 {
            return Err(RosterError::Negative);
        }
        // Non-negative i64 values above u32::MAX are treated as malformed.
        let convert = |value: i64| {
            u32::try_from(value).map_err(|_| RosterError::NotANumber(value.to_string()))
        };
        Self::new(convert(walkers)?, convert(tanks)?, convert(burrowers)?)
    }

    /// Number of walkers requested.
    #[must_use]
    pub const fn walkers(&self) -> u32 {
        self.walkers
    }

    /// Number of tanks requested.
    #[must_use]
    pub const fn tanks(&self) -> u32 {
        self.tanks
    }

    /// Number of burrowers requested.
    #[must_use]
    pub const fn burrowers(&self) -> u32 {
        self.burrowers
    }

    /// Expands the roster into a pending queue: walkers, then tanks, then burrowers.
    #[must_use]
    pub fn to_queue(&self) -> Vec<AttackerKind> {
        let mut queue = Vec::new();
        for (kind, count) in [
            (AttackerKind::Walker, self.walkers),
            (AttackerKind::Tank, self.tanks),
            (AttackerKind::Burrower, self.burrowers),
        ] {
            queue.extend(std::iter::repeat(kind).take(count as usize));
        }
        queue
    }
}

/// Reasons a custom level roster is rejected at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RosterError {
    /// A field was not a whole number.
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    /// A field held a negative count.
    #[error("attacker counts cannot be negative")]
    Negative,
    /// Every count was zero.
    #[error("a custom level needs at least one attacker")]
    Empty,
    /// The counts add up to more attackers than a level may queue.
    #[error("a custom level holds at most {max} attackers")]
    TooMany {
        /// Largest accepted total.
        max: u32,
    },
}

fn parse_count(field: &str) -> Result<i64, RosterError> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| RosterError::NotANumber(field.trim().to_owned()))
}

/// Outcome of one spawn draw: which pending attacker and which row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnDraw {
    /// Index into the pending queue of the attacker to remove.
    pub pending_index: usize,
    /// Row whose rightmost cell the attacker should enter.
    pub row: u32,
}

impl SpawnDraw {
    /// Creates a new spawn draw.
    #[must_use]
    pub const fn new(pending_index: usize, row: u32) -> Self {
        Self { pending_index, row }
    }
}

/// Source of the only nondeterministic step in turn resolution.
///
/// Implementations must return `pending_index < pending` and `row < rows`.
/// The world never calls [`SpawnSource::draw`] with an empty queue.
pub trait SpawnSource: fmt::Debug {
    /// Draws a pending attacker index and a spawn row.
    fn draw(&mut self, pending: usize, rows: u32) -> SpawnDraw;
}

#[cfg(test)]
mod tests {
    use super::{
        AttackerKind, CellCoord, CustomRoster, DefenderKind, Direction, LevelId,
        PlacementError, RosterError, UnitKind, GRID_COLUMNS, GRID_ROWS,
        MAX_CUSTOM_ATTACKERS,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientFunds {
            price: 150,
            balance: 75,
        });
    }

    #[test]
    fn roster_round_trips_through_bincode() {
        assert_round_trip(&CustomRoster::new(1, 2, 3).expect("valid roster"));
    }

    #[test]
    fn step_stops_at_grid_edges() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));

        let far = CellCoord::new(GRID_COLUMNS - 1, GRID_ROWS - 1);
        assert_eq!(far.step(Direction::East), None);
        assert_eq!(far.step(Direction::South), None);
        assert_eq!(
            far.step(Direction::West),
            Some(CellCoord::new(GRID_COLUMNS - 2, GRID_ROWS - 1))
        );
    }

    #[test]
    fn stat_table_matches_catalog() {
        let shooter = DefenderKind::PeaShooter.stats();
        assert_eq!(shooter.strength, 150);
        assert_eq!(shooter.price, 100);
        assert_eq!(shooter.full_cooldown, 2);
        assert_eq!(AttackerKind::Walker.stats().full_health, 250);
        assert_eq!(AttackerKind::Tank.stats().strength, 150);
        assert!(DefenderKind::Sunflower.generates_currency());
        assert!(!DefenderKind::Walnut.generates_currency());
    }

    #[test]
    fn unit_kind_parses_from_labels() {
        for kind in DefenderKind::ALL {
            assert_eq!(kind.label().parse::<UnitKind>(), Ok(UnitKind::Defender(kind)));
        }
        assert_eq!(
            " Burrower ".parse::<UnitKind>(),
            Ok(UnitKind::Attacker(AttackerKind::Burrower))
        );
        assert!("walker".parse::<DefenderKind>().is_err());
        assert!("cactus".parse::<UnitKind>().is_err());
    }

    #[test]
    fn level_successor_ends_at_final_level() {
        assert_eq!(LevelId::new(1).successor(), Some(LevelId::new(2)));
        assert_eq!(LevelId::new(3).successor(), None);
        assert_eq!(LevelId::CUSTOM.successor(), None);
        assert!(!LevelId::new(4).is_campaign());
    }

    #[test]
    fn roster_parse_rejects_malformed_fields() {
        assert_eq!(
            CustomRoster::parse("two", "0", "0"),
            Err(RosterError::NotANumber("two".to_owned()))
        );
        assert_eq!(CustomRoster::parse("1", "-1", "0"), Err(RosterError::Negative));
        assert_eq!(CustomRoster::parse("0", "0", "0"), Err(RosterError::Empty));
        assert_eq!(
            CustomRoster::parse("4294967295", "4294967295", "4294967295"),
            Err(RosterError::TooMany {
                max: MAX_CUSTOM_ATTACKERS
            })
        );
        assert_eq!(
            CustomRoster::new(MAX_CUSTOM_ATTACKERS, 1, 0),
            Err(RosterError::TooMany {
                max: MAX_CUSTOM_ATTACKERS
            })
        );
        assert!(CustomRoster::new(MAX_CUSTOM_ATTACKERS, 0, 0).is_ok());
    }

    #[test]
    fn roster_expands_in_kind_order() {
        let roster = CustomRoster::parse("2", " 1", "1 ").expect("valid roster");
        assert_eq!(
            roster.to_queue(),
            vec![
                AttackerKind::Walker,
                AttackerKind::Walker,
                AttackerKind::Tank,
                AttackerKind::Burrower,
            ]
        );
    }
}
