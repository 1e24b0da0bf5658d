use lane_defence_core::{
    CellCoord, Command, DefenderAvailability, DefenderKind, Event, GridMode, LevelId,
    PlacementError, PlacementPreview,
};
use lane_defence_system_builder::{Builder, BuilderInput, Notice};

fn entry(kind: DefenderKind, cooldown: u32, affordable: bool) -> DefenderAvailability {
    DefenderAvailability {
        kind,
        price: kind.price(),
        cooldown,
        available: cooldown == 0,
        affordable,
    }
}

fn open_catalog() -> Vec<DefenderAvailability> {
    DefenderKind::ALL
        .iter()
        .map(|kind| entry(*kind, 0, true))
        .collect()
}

fn placeable(kind: DefenderKind, cell: CellCoord) -> PlacementPreview {
    PlacementPreview {
        kind,
        cell,
        verdict: Ok(()),
    }
}

fn selected_builder(kind: DefenderKind) -> Builder {
    let mut builder = Builder::new();
    let mut commands = Vec::new();
    builder.handle(
        &[],
        &open_catalog(),
        BuilderInput::select(kind),
        placeable,
        &mut commands,
    );
    builder
}

fn chose_position() -> Event {
    Event::GridModeChanged {
        mode: GridMode::ChoosePosition,
    }
}

#[test]
fn selecting_available_type_enters_choose_position() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        &open_catalog(),
        BuilderInput::select(DefenderKind::Walnut),
        placeable,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SetGridMode {
            mode: GridMode::ChoosePosition
        }],
        "a valid selection should switch the grid to position choice",
    );
    assert_eq!(builder.selected(), Some(DefenderKind::Walnut));
    assert!(builder.take_notices().is_empty());
}

#[test]
fn selecting_cooling_type_records_notice() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();
    let catalog = vec![entry(DefenderKind::FlyTrap, 2, true)];

    builder.handle(
        &[],
        &catalog,
        BuilderInput::select(DefenderKind::FlyTrap),
        placeable,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SetGridMode {
            mode: GridMode::ViewStats
        }]
    );
    assert_eq!(builder.selected(), None);
    assert_eq!(
        builder.take_notices(),
        vec![Notice::CoolingDown {
            kind: DefenderKind::FlyTrap,
            turns_remaining: 2
        }]
    );
    assert!(builder.take_notices().is_empty(), "notices drain once");
}

#[test]
fn selecting_unaffordable_type_records_notice() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();
    let catalog = vec![entry(DefenderKind::PeaShooter, 0, false)];

    builder.handle(
        &[],
        &catalog,
        BuilderInput::select(DefenderKind::PeaShooter),
        placeable,
        &mut commands,
    );

    assert_eq!(
        builder.take_notices(),
        vec![Notice::Unaffordable {
            kind: DefenderKind::PeaShooter,
            price: 100
        }]
    );
    assert_eq!(
        commands,
        vec![Command::SetGridMode {
            mode: GridMode::ViewStats
        }]
    );
}

#[test]
fn confirm_emits_locked_placement_sequence() {
    let mut builder = selected_builder(DefenderKind::Potato);
    let mut commands = Vec::new();

    builder.handle(
        &[chose_position()],
        &open_catalog(),
        BuilderInput::confirm(CellCoord::new(2, 4)),
        placeable,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::SetGridMode {
                mode: GridMode::Locked
            },
            Command::PlaceDefender {
                kind: DefenderKind::Potato,
                cell: CellCoord::new(2, 4),
            },
            Command::SetGridMode {
                mode: GridMode::ViewStats
            },
        ],
        "confirming a placeable cell should lock, place and unlock",
    );
    assert_eq!(builder.selected(), None);
}

#[test]
fn confirm_on_unplaceable_cell_keeps_selection() {
    let mut builder = selected_builder(DefenderKind::Potato);
    let mut commands = Vec::new();

    builder.handle(
        &[chose_position()],
        &open_catalog(),
        BuilderInput::confirm(CellCoord::new(8, 0)),
        |kind, cell| PlacementPreview {
            kind,
            cell,
            verdict: Err(PlacementError::SpawnColumn),
        },
        &mut commands,
    );

    assert!(commands.is_empty(), "invalid preview must not emit commands");
    assert_eq!(builder.selected(), Some(DefenderKind::Potato));
    assert_eq!(
        builder.take_notices(),
        vec![Notice::Unplaceable {
            kind: DefenderKind::Potato,
            cell: CellCoord::new(8, 0),
            reason: PlacementError::SpawnColumn,
        }]
    );
}

#[test]
fn confirm_without_selection_is_ignored() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        &open_catalog(),
        BuilderInput::confirm(CellCoord::new(1, 1)),
        placeable,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn cancel_returns_to_view_stats() {
    let mut builder = selected_builder(DefenderKind::Sunflower);
    let mut commands = Vec::new();

    builder.handle(
        &[chose_position()],
        &open_catalog(),
        BuilderInput::cancel(),
        placeable,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SetGridMode {
            mode: GridMode::ViewStats
        }]
    );
    assert_eq!(builder.selected(), None);
}

#[test]
fn input_ignored_while_grid_is_locked() {
    let mut builder = selected_builder(DefenderKind::Sunflower);
    let mut commands = Vec::new();

    builder.handle(
        &[Event::GridModeChanged {
            mode: GridMode::Locked,
        }],
        &open_catalog(),
        BuilderInput::confirm(CellCoord::new(1, 1)),
        placeable,
        &mut commands,
    );

    assert!(commands.is_empty(), "locked grid must swallow input");
    assert_eq!(builder.mode(), GridMode::Locked);
}

#[test]
fn level_start_clears_selection() {
    let mut builder = selected_builder(DefenderKind::Walnut);
    let mut commands = Vec::new();

    builder.handle(
        &[Event::LevelStarted {
            level: LevelId::new(2),
            custom: false,
            pending: 6,
        }],
        &open_catalog(),
        BuilderInput::default(),
        placeable,
        &mut commands,
    );

    assert_eq!(builder.selected(), None);
    assert_eq!(builder.mode(), GridMode::ViewStats);
    assert!(commands.is_empty());
}
