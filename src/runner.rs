use crate::ast::Program;
use crate::config::RunConfig;
use crate::evaluator::{step, RuntimeState};
use crate::opponent;
use crate::parser::parse_program_with_diagnostics;
use crate::world::World;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Advances the simulation by one tick: one program statement, one opponent
/// turn, then the tick counter.
///
/// Returns whatever [`step`] returned, i.e. `false` once the program has
/// finished.
pub fn advance_tick<'p>(
    world: &mut World,
    program: &'p Program,
    state: &mut RuntimeState<'p>,
) -> bool {
    let advanced = step(world, program, state);
    opponent::take_turn(world);
    world.advance_tick();
    advanced
}

/// Why a headless run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    ProgramFinished,
    TickLimit,
}

impl Outcome {
    pub fn describe(self) -> &'static str {
        match self {
            Outcome::Victory => "enemy destroyed",
            Outcome::Defeat => "your tank was destroyed",
            Outcome::ProgramFinished => "program finished",
            Outcome::TickLimit => "tick limit reached",
        }
    }
}

/// Drives ticks until the program ends, a tank is destroyed or the tick
/// limit is hit.
pub fn simulate(world: &mut World, program: &Program, config: &RunConfig) -> Outcome {
    let mut state = RuntimeState::new();

    loop {
        if world.opponent().is_destroyed() {
            return Outcome::Victory;
        }
        if world.actor().is_destroyed() {
            return Outcome::Defeat;
        }
        if world.tick() >= config.max_ticks {
            return Outcome::TickLimit;
        }

        let advanced = advance_tick(world, program, &mut state);
        if config.show_board {
            println!("{}\n", world);
        } else if !world.message().is_empty() {
            println!("[{:>4}] {}", world.tick(), world.message());
        }
        if !advanced {
            return Outcome::ProgramFinished;
        }

        if config.delay_ms > 0 {
            thread::sleep(Duration::from_millis(config.delay_ms));
        }
    }
}

pub fn run(source: &str, filename: Option<&str>, config: &RunConfig) -> Outcome {
    let (program, diagnostics) = parse_program_with_diagnostics(source);
    for diagnostic in &diagnostics {
        diagnostic.report(source, filename);
    }

    info!(
        statements = program.top_level.len(),
        functions = program.functions.len(),
        warnings = diagnostics.len(),
        max_ticks = config.max_ticks,
        "starting simulation"
    );

    let mut world = World::new();
    let outcome = simulate(&mut world, &program, config);

    info!(tick = world.tick(), outcome = ?outcome, "simulation stopped");
    println!("{}", world);
    println!("Stopped after {} ticks: {}.", world.tick(), outcome.describe());
    outcome
}
