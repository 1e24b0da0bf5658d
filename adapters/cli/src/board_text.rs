//! Plain-text rendering of the battlefield and its status line.

use std::fmt::Write as _;

use lane_defence_core::{
    AttackerKind, CellCoord, DefenderKind, GridMode, UnitKind, UnitSnapshot, GRID_COLUMNS,
    GRID_ROWS,
};
use lane_defence_world::{query, World};

/// Renders the status line, the grid and a catalog summary.
pub(crate) fn render(world: &World) -> String {
    let mut text = String::new();
    let level = query::level(world);
    let level_label = if query::is_custom(world) {
        "custom".to_owned()
    } else {
        level.get().to_string()
    };
    let _ = writeln!(
        text,
        "level {level_label} | turn {} | currency {} | pending {} | mode {}",
        query::turn_number(world),
        query::currency(world),
        query::pending_count(world),
        mode_label(query::grid_mode(world)),
    );

    text.push_str("   ");
    for column in 0..GRID_COLUMNS {
        let _ = write!(text, " {column} ");
    }
    text.push('\n');
    for row in 0..GRID_ROWS {
        let _ = write!(text, "{row} |");
        for column in 0..GRID_COLUMNS {
            let symbol = query::cell(world, CellCoord::new(column, row))
                .map_or('.', |unit| symbol(unit.kind));
            let _ = write!(text, " {symbol} ");
        }
        text.push('\n');
    }

    let catalog: Vec<String> = query::defender_catalog(world)
        .iter()
        .map(|entry| {
            let state = if !entry.available {
                format!("wait {}", entry.cooldown)
            } else if !entry.affordable {
                "broke".to_owned()
            } else {
                "ready".to_owned()
            };
            format!("{} {} ({state})", entry.kind.label(), entry.price)
        })
        .collect();
    let _ = writeln!(text, "catalog: {}", catalog.join(", "));
    text
}

/// Describes a single unit for cell inspection.
pub(crate) fn describe(unit: &UnitSnapshot) -> String {
    format!(
        "{} #{} at {}: health {}/{}, strength {}",
        unit.kind,
        unit.id.get(),
        unit.cell,
        unit.health,
        unit.full_health,
        unit.strength
    )
}

pub(crate) fn mode_label(mode: GridMode) -> &'static str {
    match mode {
        GridMode::ViewStats => "view-stats",
        GridMode::ChoosePosition => "choose-position",
        GridMode::Locked => "locked",
    }
}

fn symbol(kind: UnitKind) -> char {
    match kind {
        UnitKind::Defender(DefenderKind::Sunflower) => 'S',
        UnitKind::Defender(DefenderKind::FlyTrap) => 'F',
        UnitKind::Defender(DefenderKind::Potato) => 'P',
        UnitKind::Defender(DefenderKind::Walnut) => 'N',
        UnitKind::Defender(DefenderKind::PeaShooter) => 'R',
        UnitKind::Attacker(AttackerKind::Walker) => 'w',
        UnitKind::Attacker(AttackerKind::Tank) => 't',
        UnitKind::Attacker(AttackerKind::Burrower) => 'b',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{Command, LevelId};
    use lane_defence_system_spawning::ScriptedSpawns;
    use lane_defence_world::{self as world, level::Level};

    #[test]
    fn render_shows_status_and_units() {
        let mut world = World::with_spawn_source(
            Level::campaign(LevelId::new(1)).expect("level 1 exists"),
            Box::new(ScriptedSpawns::default()),
        );
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceDefender {
                kind: DefenderKind::Potato,
                cell: CellCoord::new(1, 2),
            },
            &mut events,
        );
        world::apply(&mut world, Command::EndTurn, &mut events);

        let text = render(&world);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "level 1 | turn 1 | currency 25 | pending 1 | mode view-stats"
        );
        assert_eq!(lines.len(), 2 + GRID_ROWS as usize + 1);
        assert!(lines[2].ends_with(" w "), "walker spawns in row 0: {}", lines[2]);
        assert!(lines[4].contains(" P "), "potato sits in row 2: {}", lines[4]);
        assert!(lines[8].starts_with("catalog: sunflower 50 (broke)"));
    }

    #[test]
    fn describe_reports_health() {
        let unit = UnitSnapshot {
            id: lane_defence_core::UnitId::new(3),
            kind: UnitKind::Attacker(AttackerKind::Tank),
            cell: CellCoord::new(5, 1),
            health: 250,
            full_health: 400,
            strength: 150,
        };
        assert_eq!(
            describe(&unit),
            "tank #3 at (5, 1): health 250/400, strength 150"
        );
    }
}
