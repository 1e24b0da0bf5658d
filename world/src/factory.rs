//! Construction of units by type tag.
//!
//! Every unit that enters the board is built here, whether it is freshly placed,
//! spawned from the wave queue or rebuilt from a history capture.

use lane_defence_core::{UnitId, UnitKind, UnknownUnitKind};

use crate::{capture::UnitRecord, units::Unit};

/// Builds a unit of the provided kind at full health.
#[must_use]
pub fn create(id: UnitId, kind: UnitKind) -> Unit {
    Unit::new(id, kind, kind.full_health(), kind.strength())
}

/// Builds a unit from its textual type identifier.
pub fn create_by_label(id: UnitId, label: &str) -> Result<Unit, UnknownUnitKind> {
    Ok(create(id, label.parse()?))
}

/// Rebuilds a captured unit with its recorded health.
#[must_use]
pub fn restore(record: &UnitRecord) -> Unit {
    create(record.id, record.kind).with_health(record.health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{AttackerKind, DefenderKind};

    #[test]
    fn create_uses_catalog_stats() {
        let unit = create(UnitId::new(4), UnitKind::Defender(DefenderKind::FlyTrap));
        assert_eq!(unit.id(), UnitId::new(4));
        assert_eq!(unit.health(), 320);
        assert_eq!(unit.full_health(), 320);
        assert_eq!(unit.strength(), 175);
    }

    #[test]
    fn create_by_label_rejects_unknown_types() {
        let tank = create_by_label(UnitId::new(0), "Tank").expect("known label");
        assert_eq!(tank.kind(), UnitKind::Attacker(AttackerKind::Tank));
        assert_eq!(
            create_by_label(UnitId::new(0), "cactus"),
            Err(UnknownUnitKind("cactus".to_owned()))
        );
    }

    #[test]
    fn restore_keeps_recorded_health() {
        let record = UnitRecord {
            id: UnitId::new(9),
            kind: UnitKind::Attacker(AttackerKind::Walker),
            health: 40,
        };
        let unit = restore(&record);
        assert_eq!(unit.health(), 40);
        assert_eq!(unit.full_health(), 250);
        assert_eq!(unit.id(), UnitId::new(9));
    }
}
