//! The opponent's fixed per-tick rule: shoot if it can, otherwise close in.

use crate::config::OPPONENT_ATTACK_DAMAGE;
use crate::world::{line_of_sight, Direction, World};
use tracing::debug;

/// What the opponent did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentAction {
    /// Destroyed tanks do nothing.
    Inert,
    Fired,
    Advanced(Direction),
}

/// Plays one opponent turn. Runs after every stepper call, whatever the
/// Omega program is doing.
pub fn take_turn(world: &mut World) -> OpponentAction {
    if world.opponent().is_destroyed() {
        return OpponentAction::Inert;
    }

    let sight = line_of_sight(world.opponent(), world.actor());
    if sight.in_firing_range() {
        world.actor_mut().take_damage(OPPONENT_ATTACK_DAMAGE);
        world.append_message(&format!("Enemy hit you! -{} HP", OPPONENT_ATTACK_DAMAGE));
        debug!(distance = sight.distance, "opponent fired");
        return OpponentAction::Fired;
    }

    let heading = heading_toward(world);
    let opponent = world.opponent_mut();
    opponent.facing = heading;
    opponent.step_by(heading.vector());
    debug!(x = opponent.x, y = opponent.y, facing = %heading, "opponent advanced");
    OpponentAction::Advanced(heading)
}

/// The axis with the larger offset wins; ties go to the vertical axis.
fn heading_toward(world: &World) -> Direction {
    let dx = world.actor().x - world.opponent().x;
    let dy = world.actor().y - world.opponent().y;

    if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}
