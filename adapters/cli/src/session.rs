//! Interactive session: routes requests through the world and the pure systems.

use std::{collections::VecDeque, io::BufRead, io::Write};

use anyhow::{Context, Result};
use lane_defence_core::{Command, Event, GridMode};
use lane_defence_system_builder::{Builder, BuilderInput, Notice};
use lane_defence_system_progression::{Outcome, Progression, ProgressionView};
use lane_defence_system_spawning::{Config, SeededSpawner};
use lane_defence_world::{self as world, persistence, query, World};
use tracing::{debug, warn};

use crate::{
    board_text,
    input::{Request, HELP},
};

/// Whether the session should keep reading requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Owns the world and the systems that react to its events.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    progression: Progression,
    seed: u64,
}

impl Session {
    pub(crate) fn new(world: World, seed: u64) -> Self {
        Self {
            world,
            builder: Builder::new(),
            progression: Progression::new(),
            seed,
        }
    }

    /// Reads requests line by line until `quit` or end of input.
    pub(crate) fn run(&mut self, input: impl BufRead, out: &mut dyn Write) -> Result<()> {
        write!(out, "{}", board_text::render(&self.world))?;
        for line in input.lines() {
            let line = line.context("failed to read request")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let request = match line.parse::<Request>() {
                Ok(request) => request,
                Err(error) => {
                    writeln!(out, "error: {error}")?;
                    continue;
                }
            };
            debug!(?request, "request received");
            match self.handle(request, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(error) => {
                    warn!(error = %error, "request failed");
                    writeln!(out, "error: {error:#}")?;
                }
            }
        }
        Ok(())
    }

    /// Executes one request, writing feedback to `out`.
    pub(crate) fn handle(&mut self, request: Request, out: &mut dyn Write) -> Result<Flow> {
        match request {
            Request::Place { kind, cell } => {
                self.execute(vec![Command::PlaceDefender { kind, cell }], out)?;
            }
            Request::Select(kind) => self.drive_builder(BuilderInput::select(kind), out)?,
            Request::Click(cell) => {
                if self.builder.selected().is_some()
                    && query::grid_mode(&self.world) == GridMode::ChoosePosition
                {
                    self.drive_builder(BuilderInput::confirm(cell), out)?;
                } else {
                    match query::cell(&self.world, cell) {
                        Some(unit) => writeln!(out, "{}", board_text::describe(&unit))?,
                        None => writeln!(out, "{cell} is empty")?,
                    }
                }
            }
            Request::Cancel => self.drive_builder(BuilderInput::cancel(), out)?,
            Request::End => {
                self.execute(vec![Command::EndTurn], out)?;
                write!(out, "{}", board_text::render(&self.world))?;
            }
            Request::Undo => self.execute(vec![Command::Undo], out)?,
            Request::Redo => self.execute(vec![Command::Redo], out)?,
            Request::Level(level) => self.execute(vec![Command::StartLevel { level }], out)?,
            Request::Custom(roster) => {
                // The first attacker enters right away.
                self.execute(
                    vec![Command::StartCustomLevel { roster }, Command::EndTurn],
                    out,
                )?;
                write!(out, "{}", board_text::render(&self.world))?;
            }
            Request::Save(path) => {
                persistence::save(&self.world, &path)
                    .with_context(|| format!("failed to save {}", path.display()))?;
                writeln!(out, "saved to {}", path.display())?;
            }
            Request::Load(path) => {
                let spawner = Box::new(SeededSpawner::new(Config::new(self.seed)));
                self.world = persistence::load(&path, spawner)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                self.builder = Builder::new();
                writeln!(out, "loaded {}", path.display())?;
                write!(out, "{}", board_text::render(&self.world))?;
            }
            Request::Show => write!(out, "{}", board_text::render(&self.world))?,
            Request::Help => writeln!(out, "{HELP}")?,
            Request::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn drive_builder(&mut self, input: BuilderInput, out: &mut dyn Write) -> Result<()> {
        let catalog = query::defender_catalog(&self.world);
        let mut commands = Vec::new();
        let world = &self.world;
        self.builder.handle(
            &[],
            &catalog,
            input,
            |kind, cell| query::placement_preview(world, kind, cell),
            &mut commands,
        );
        self.report_notices(out)?;
        self.execute(commands, out)
    }

    /// Applies commands and feeds the resulting events back through the systems
    /// until nothing new is requested.
    fn execute(&mut self, commands: Vec<Command>, out: &mut dyn Write) -> Result<()> {
        let mut queue: VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            for event in &events {
                report_event(event, out)?;
            }

            let mut follow_up = Vec::new();
            let catalog = query::defender_catalog(&self.world);
            let world = &self.world;
            self.builder.handle(
                &events,
                &catalog,
                BuilderInput::default(),
                |kind, cell| query::placement_preview(world, kind, cell),
                &mut follow_up,
            );
            let view = progression_view(&self.world);
            if let Some(outcome) = self.progression.handle(&events, &view, &mut follow_up) {
                report_outcome(outcome, out)?;
            }
            queue.extend(follow_up);
        }
        Ok(())
    }

    fn report_notices(&mut self, out: &mut dyn Write) -> Result<()> {
        for notice in self.builder.take_notices() {
            match notice {
                Notice::CoolingDown {
                    kind,
                    turns_remaining,
                } => writeln!(
                    out,
                    "{} is available in {turns_remaining} turn(s)",
                    kind.label()
                )?,
                Notice::Unaffordable { kind, price } => writeln!(
                    out,
                    "{} costs {price}, balance is {}",
                    kind.label(),
                    query::currency(&self.world)
                )?,
                Notice::Unplaceable { kind, cell, reason } => {
                    writeln!(out, "cannot place {} at {cell}: {reason}", kind.label())?;
                }
            }
        }
        Ok(())
    }
}

fn progression_view(world: &World) -> ProgressionView {
    ProgressionView {
        level: query::level(world),
        next_level: query::next_level(world),
        won: query::is_won(world),
        lost: query::is_lost(world),
        any_affordable: query::any_affordable(world),
        has_generator: query::has_generator(world),
    }
}

fn report_event(event: &Event, out: &mut dyn Write) -> Result<()> {
    match event {
        Event::DefenderPlaced {
            kind,
            cell,
            balance,
            ..
        } => writeln!(out, "placed {} at {cell}, balance {balance}", kind.label())?,
        Event::PlacementRejected { kind, cell, reason } => {
            writeln!(out, "cannot place {} at {cell}: {reason}", kind.label())?;
        }
        Event::UnitDefeated { kind, cell, .. } => writeln!(out, "{kind} at {cell} defeated")?,
        Event::AttackerSpawned { kind, cell, .. } => {
            writeln!(out, "{} entered at {cell}", kind.label())?;
        }
        Event::SpawnDiscarded { kind, row } => {
            writeln!(out, "{} lost its way: row {row} was blocked", kind.label())?;
        }
        Event::HistoryUndone { entry } => writeln!(out, "undid {entry:?}")?,
        Event::HistoryRedone { entry } => writeln!(out, "redid {entry:?}")?,
        Event::LevelStarted {
            level,
            custom,
            pending,
        } => {
            if *custom {
                writeln!(out, "custom level started with {pending} attacker(s)")?;
            } else {
                writeln!(
                    out,
                    "level {} started with {pending} attacker(s)",
                    level.get()
                )?;
            }
        }
        Event::LevelRejected { level } => {
            writeln!(out, "level {} does not exist", level.get())?;
        }
        Event::ReliefGranted { balance } => {
            writeln!(out, "out of options: balance reset to {balance}")?;
        }
        Event::UnitStruck { .. }
        | Event::UnitMoved { .. }
        | Event::CurrencyGenerated { .. }
        | Event::TurnResolved { .. }
        | Event::GridModeChanged { .. } => {}
    }
    Ok(())
}

fn report_outcome(outcome: Outcome, out: &mut dyn Write) -> Result<()> {
    match outcome {
        Outcome::LevelCleared { level, next } => writeln!(
            out,
            "level {} cleared, moving on to level {}",
            level.get(),
            next.get()
        )?,
        Outcome::Victory { .. } => writeln!(out, "victory: every attacker was stopped")?,
        Outcome::Defeat { .. } => {
            writeln!(out, "defeat: an attacker broke through (undo to retry)")?;
        }
    }
    Ok(())
}
