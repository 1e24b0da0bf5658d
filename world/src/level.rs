//! Level state: currency, the shared per-type cooldown catalog and the wave queue.

use std::collections::BTreeMap;

use lane_defence_core::{
    AttackerKind, CustomRoster, DefenderAvailability, DefenderKind, LevelId, STARTING_CURRENCY,
};
use serde::{Deserialize, Serialize};

/// Cooldown record shared by every instance of one defender type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCooldown {
    remaining: u32,
    full: u32,
}

impl TypeCooldown {
    /// Creates an available cooldown record with the provided full duration.
    #[must_use]
    pub const fn new(full: u32) -> Self {
        Self { remaining: 0, full }
    }

    /// Reports whether the type may be placed right now.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.remaining == 0
    }

    /// Turns left before the type becomes available.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Counts down one turn, stopping at zero.
    pub fn new_turn(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Resets the countdown to its full duration.
    pub fn arm(&mut self) {
        self.remaining = self.full;
    }

    fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
    }
}

/// Active level: balance, type cooldowns and the queue of attackers still to spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    number: LevelId,
    custom: bool,
    currency: i32,
    catalog: BTreeMap<DefenderKind, TypeCooldown>,
    pending: Vec<AttackerKind>,
}

impl Level {
    /// Builds one of the campaign levels, or `None` when the number names no level.
    #[must_use]
    pub fn campaign(number: LevelId) -> Option<Self> {
        let (rounds, pattern): (usize, &[AttackerKind]) = match number.get() {
            1 => (2, &[AttackerKind::Walker]),
            2 => (3, &[AttackerKind::Walker, AttackerKind::Tank]),
            3 => (
                4,
                &[
                    AttackerKind::Walker,
                    AttackerKind::Tank,
                    AttackerKind::Burrower,
                ],
            ),
            _ => return None,
        };
        let pending = pattern
            .iter()
            .copied()
            .cycle()
            .take(rounds * pattern.len())
            .collect();
        Some(Self::with_queue(number, false, pending))
    }

    /// Builds a custom level from a validated roster.
    #[must_use]
    pub fn custom(roster: CustomRoster) -> Self {
        Self::with_queue(LevelId::CUSTOM, true, roster.to_queue())
    }

    /// Builds a custom-flagged level with an explicit pending queue.
    ///
    /// Used for scripted scenarios where the caller wants full control over
    /// which attackers remain, including none at all.
    #[must_use]
    pub fn sandbox(pending: Vec<AttackerKind>) -> Self {
        Self::with_queue(LevelId::CUSTOM, true, pending)
    }

    /// Empty shell that a capture is restored into.
    pub(crate) fn blank(number: LevelId, custom: bool) -> Self {
        Self::with_queue(number, custom, Vec::new())
    }

    fn with_queue(number: LevelId, custom: bool, pending: Vec<AttackerKind>) -> Self {
        let catalog = DefenderKind::ALL
            .iter()
            .map(|kind| (*kind, TypeCooldown::new(kind.stats().full_cooldown)))
            .collect();
        Self {
            number,
            custom,
            currency: STARTING_CURRENCY,
            catalog,
            pending,
        }
    }

    /// Level number. Custom levels report [`LevelId::CUSTOM`].
    #[must_use]
    pub const fn number(&self) -> LevelId {
        self.number
    }

    /// Reports whether the level was built from a custom roster.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        self.custom
    }

    /// The campaign level that follows this one, if any.
    #[must_use]
    pub fn next_level(&self) -> Option<LevelId> {
        if self.custom {
            None
        } else {
            self.number.successor()
        }
    }

    /// Current currency balance.
    #[must_use]
    pub const fn currency(&self) -> i32 {
        self.currency
    }

    /// Removes the provided amount from the balance.
    pub fn debit(&mut self, amount: i32) {
        self.currency -= amount;
    }

    /// Adds the provided amount to the balance.
    pub fn credit(&mut self, amount: i32) {
        self.currency += amount;
    }

    /// Overwrites the balance.
    pub fn set_currency(&mut self, currency: i32) {
        self.currency = currency;
    }

    /// Reports whether some defender type's price lies strictly below the balance.
    #[must_use]
    pub fn any_affordable(&self) -> bool {
        DefenderKind::ALL
            .iter()
            .any(|kind| kind.price() < self.currency)
    }

    /// Cooldown record for the provided type.
    #[must_use]
    pub fn type_cooldown(&self, kind: DefenderKind) -> TypeCooldown {
        self.catalog
            .get(&kind)
            .copied()
            .unwrap_or_else(|| TypeCooldown::new(kind.stats().full_cooldown))
    }

    /// Turns left before the provided type becomes available.
    #[must_use]
    pub fn cooldown(&self, kind: DefenderKind) -> u32 {
        self.type_cooldown(kind).remaining()
    }

    /// Reports whether the provided type is off cooldown.
    #[must_use]
    pub fn is_available(&self, kind: DefenderKind) -> bool {
        self.type_cooldown(kind).is_available()
    }

    /// Arms the cooldown of the provided type to its full duration.
    pub fn arm(&mut self, kind: DefenderKind) {
        self.catalog
            .entry(kind)
            .or_insert_with(|| TypeCooldown::new(kind.stats().full_cooldown))
            .arm();
    }

    /// Counts every type cooldown down by one turn, placed or not.
    pub fn advance_cooldowns(&mut self) {
        for cooldown in self.catalog.values_mut() {
            cooldown.new_turn();
        }
    }

    /// Types whose cooldown is still running, with the turns they have left.
    #[must_use]
    pub fn active_cooldowns(&self) -> Vec<(DefenderKind, u32)> {
        self.catalog
            .iter()
            .filter(|(_, cooldown)| !cooldown.is_available())
            .map(|(kind, cooldown)| (*kind, cooldown.remaining()))
            .collect()
    }

    /// Resets every cooldown, then applies the provided remaining counts.
    pub(crate) fn restore_cooldowns(&mut self, active: &[(DefenderKind, u32)]) {
        for cooldown in self.catalog.values_mut() {
            cooldown.set_remaining(0);
        }
        for (kind, remaining) in active {
            self.set_cooldown(*kind, *remaining);
        }
    }

    /// Overwrites the remaining count of one type.
    pub(crate) fn set_cooldown(&mut self, kind: DefenderKind, remaining: u32) {
        self.catalog
            .entry(kind)
            .or_insert_with(|| TypeCooldown::new(kind.stats().full_cooldown))
            .set_remaining(remaining);
    }

    /// Availability of every defender type in catalog order.
    #[must_use]
    pub fn availability(&self) -> Vec<DefenderAvailability> {
        DefenderKind::ALL
            .iter()
            .map(|kind| {
                let cooldown = self.cooldown(*kind);
                DefenderAvailability {
                    kind: *kind,
                    price: kind.price(),
                    cooldown,
                    available: cooldown == 0,
                    affordable: kind.price() <= self.currency,
                }
            })
            .collect()
    }

    /// Attackers still waiting to spawn.
    #[must_use]
    pub fn pending(&self) -> &[AttackerKind] {
        &self.pending
    }

    /// Removes and returns the pending attacker at the provided index.
    pub(crate) fn take_pending(&mut self, index: usize) -> AttackerKind {
        self.pending.remove(index)
    }

    pub(crate) fn set_pending(&mut self, pending: Vec<AttackerKind>) {
        self.pending = pending;
    }
}
