use crate::ast::{Expr, MoveDirection, Program, Stmt, TurnDirection};
use crate::config::GRID_SIZE;
use crate::world::{line_of_sight, World};
use std::collections::HashMap;
use std::slice;
use tracing::debug;

/// Label of the frame pushed for a taken IF branch.
pub const IF_FRAME_LABEL: &str = "<if>";

/// One activation on the call stack: a function body or a chosen IF branch.
///
/// `body` borrows straight out of the [`Program`]; frames never own
/// statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'p> {
    pub label: &'p str,
    pub program_counter: usize,
    pub body: &'p [Stmt],
}

/// Interpreter state carried between steps.
///
/// Variables live in one flat namespace shared by the top level and every
/// frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeState<'p> {
    pub program_counter: usize,
    pub call_stack: Vec<Frame<'p>>,
    pub variables: HashMap<String, i64>,
}

impl<'p> RuntimeState<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.program_counter = 0;
        self.call_stack.clear();
        self.variables.clear();
    }

    /// Top-level position and variables, for continuing on a rebuilt
    /// program that only grew at the end. Frames borrow the old program and
    /// are dropped.
    pub fn resume(&self) -> RuntimeState<'static> {
        RuntimeState {
            program_counter: self.program_counter,
            call_stack: Vec::new(),
            variables: self.variables.clone(),
        }
    }

    pub fn variable(&self, name: &str) -> i64 {
        self.variables.get(name).copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn evaluate(&self, expr: &Expr) -> i64 {
        expr.evaluate(&self.variables)
    }

    /// The statement list and counter execution currently reads from.
    fn active(&self, program: &'p Program) -> (&'p [Stmt], usize) {
        match self.call_stack.last() {
            Some(frame) => (frame.body, frame.program_counter),
            None => (program.top_level.as_slice(), self.program_counter),
        }
    }

    fn advance(&mut self) {
        match self.call_stack.last_mut() {
            Some(frame) => frame.program_counter += 1,
            None => self.program_counter += 1,
        }
    }

    fn push_frame(&mut self, label: &'p str, body: &'p [Stmt]) {
        debug!(label, depth = self.call_stack.len() + 1, "push frame");
        self.call_stack.push(Frame {
            label,
            program_counter: 0,
            body,
        });
    }
}

/// Executes exactly one statement of the active frame against `world`.
///
/// Returns `false` only when the top level has run out of statements; every
/// later call is then a no-op. Finishing a frame (function return or the end
/// of an IF branch) takes a step of its own and returns `true`.
pub fn step<'p>(world: &mut World, program: &'p Program, state: &mut RuntimeState<'p>) -> bool {
    let (body, program_counter) = state.active(program);

    let Some(statement) = body.get(program_counter) else {
        return match state.call_stack.pop() {
            Some(frame) => {
                debug!(label = frame.label, depth = state.call_stack.len(), "pop frame");
                true
            }
            None => false,
        };
    };

    debug!(kind = statement.kind_name(), program_counter, depth = state.depth(), "step");
    execute(world, program, state, statement);
    true
}

fn execute<'p>(
    world: &mut World,
    program: &'p Program,
    state: &mut RuntimeState<'p>,
    statement: &'p Stmt,
) {
    match statement {
        Stmt::Assign { name, value } => {
            let value = state.evaluate(value);
            state.variables.insert(name.clone(), value);
            state.advance();
            world.set_message(format!("${} = {}", name, value));
        }
        Stmt::Move { amount, direction } => {
            let amount = state.evaluate(amount).max(0);
            move_actor(world, amount, *direction);
            state.advance();
            world.set_message(format!("MOVE {} {}", amount, direction.keyword()));
        }
        Stmt::Turn { direction } => {
            let actor = world.actor_mut();
            actor.facing = match direction {
                TurnDirection::Left => actor.facing.turn_left(),
                TurnDirection::Right => actor.facing.turn_right(),
            };
            state.advance();
            world.set_message(format!("TURN {}", direction.keyword()));
        }
        Stmt::Scan => {
            let sight = line_of_sight(world.actor(), world.opponent());
            state
                .variables
                .insert("ENEMY".to_string(), i64::from(sight.seen));
            world.set_enemy_spotted(sight.seen);
            state.advance();
            if sight.seen {
                world.set_message(format!("Enemy spotted at {} tiles.", sight.distance));
            } else {
                world.set_message("No enemy in sight.");
            }
        }
        Stmt::Attack => {
            let hit = world.actor_attack();
            state.advance();
            if hit {
                world.set_message("ATTACK hit! Enemy -40 HP");
            } else {
                world.set_message("ATTACK missed.");
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let value = state.evaluate(condition);
            let chosen = if value != 0 {
                Some(("THEN", &**then_branch))
            } else {
                else_branch.as_deref().map(|branch| ("ELSE", branch))
            };

            // A taken branch leaves the enclosing counter on the IF itself.
            match chosen {
                Some((label, branch)) => {
                    state.push_frame(IF_FRAME_LABEL, slice::from_ref(branch));
                    world.set_message(format!("IF ({}) {}", value, label));
                }
                None => {
                    state.advance();
                    world.set_message(format!("IF ({}) no-op", value));
                }
            }
        }
        Stmt::Call { name } => {
            state.advance();
            match program.functions.get_key_value(name) {
                Some((label, body)) => state.push_frame(label, body),
                None => debug!(name = %name, "call to undefined function ignored"),
            }
            world.set_message(format!("CALL {}", name));
        }
        Stmt::NoOp | Stmt::FunctionDecl { .. } => state.advance(),
    }
}

/// Walks the actor `amount` cells, clamping after every cell. More than
/// `GRID_SIZE` cells cannot move it any further.
fn move_actor(world: &mut World, amount: i64, direction: MoveDirection) {
    let actor = world.actor_mut();
    let heading = match direction {
        MoveDirection::Forward => actor.facing,
        MoveDirection::Backward => actor.facing.reverse(),
        MoveDirection::StrafeLeft => actor.facing.turn_left(),
        MoveDirection::StrafeRight => actor.facing.turn_right(),
    };
    let steps = amount.min(i64::from(GRID_SIZE));
    for _ in 0..steps {
        actor.step_by(heading.vector());
    }
}
