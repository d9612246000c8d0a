use crate::config::{
    ACTOR_ATTACK_DAMAGE, ATTACK_RANGE, GRID_SIZE, MAX_HEALTH, NO_SIGHT_DISTANCE,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    const CYCLE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub fn turn_right(self) -> Self {
        Self::CYCLE[(self.index() + 1) % 4]
    }

    pub fn turn_left(self) -> Self {
        Self::CYCLE[(self.index() + 3) % 4]
    }

    pub fn reverse(self) -> Self {
        Self::CYCLE[(self.index() + 2) % 4]
    }

    /// Unit grid step, y growing downward.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    fn glyph(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tank {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    pub health: i32,
}

impl Tank {
    /// A full-health tank, with the position clamped onto the grid.
    pub fn new(x: i32, y: i32, facing: Direction) -> Self {
        Self {
            x: clamp_coord(x),
            y: clamp_coord(y),
            facing,
            health: MAX_HEALTH,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health.clamp(0, MAX_HEALTH);
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Moves one cell along `(dx, dy)`, stopping at the grid edge.
    pub(crate) fn step_by(&mut self, (dx, dy): (i32, i32)) {
        self.x = clamp_coord(self.x + dx);
        self.y = clamp_coord(self.y + dy);
    }

    pub(crate) fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }
}

pub fn clamp_coord(value: i32) -> i32 {
    value.clamp(0, GRID_SIZE - 1)
}

/// Result of the axis-aligned visibility test between two tanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOfSight {
    /// Aligned on exactly one axis and not on the same cell.
    pub seen: bool,
    /// The observer faces along the shared axis toward the target.
    pub facing_target: bool,
    /// Offset along the shared axis, or `NO_SIGHT_DISTANCE` when not aligned.
    pub distance: i32,
}

impl LineOfSight {
    /// Whether an attack along this sight line lands.
    pub fn in_firing_range(&self) -> bool {
        self.seen && self.facing_target && self.distance <= ATTACK_RANGE
    }
}

/// Nothing between the two tanks can block the line: obstruction is not
/// modelled.
pub fn line_of_sight(observer: &Tank, target: &Tank) -> LineOfSight {
    let same_column = observer.x == target.x;
    let same_row = observer.y == target.y;

    match (same_column, same_row) {
        (true, false) => {
            let dy = target.y - observer.y;
            let wanted = if dy < 0 { Direction::Up } else { Direction::Down };
            LineOfSight {
                seen: true,
                facing_target: observer.facing == wanted,
                distance: dy.abs(),
            }
        }
        (false, true) => {
            let dx = target.x - observer.x;
            let wanted = if dx < 0 { Direction::Left } else { Direction::Right };
            LineOfSight {
                seen: true,
                facing_target: observer.facing == wanted,
                distance: dx.abs(),
            }
        }
        (true, true) => LineOfSight {
            seen: false,
            facing_target: false,
            distance: 0,
        },
        (false, false) => LineOfSight {
            seen: false,
            facing_target: false,
            distance: NO_SIGHT_DISTANCE,
        },
    }
}

/// The two tanks plus the per-tick status shown to the player.
///
/// Only the stepper and the opponent policy mutate a world; everything else
/// gets read-only accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    actor: Tank,
    opponent: Tank,
    tick: u64,
    message: String,
    enemy_spotted: bool,
}

impl World {
    /// Fixed starting layout: actor bottom-left facing up, opponent
    /// top-right facing down.
    pub fn new() -> Self {
        Self::with_tanks(
            Tank::new(0, GRID_SIZE - 1, Direction::Up),
            Tank::new(GRID_SIZE - 1, 0, Direction::Down),
        )
    }

    pub fn with_tanks(actor: Tank, opponent: Tank) -> Self {
        Self {
            actor,
            opponent,
            tick: 0,
            message: String::new(),
            enemy_spotted: false,
        }
    }

    pub fn actor(&self) -> &Tank {
        &self.actor
    }

    pub fn opponent(&self) -> &Tank {
        &self.opponent
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Outcome of the most recent `SCAN_FOR_ENEMY`.
    pub fn enemy_spotted(&self) -> bool {
        self.enemy_spotted
    }

    pub fn is_over(&self) -> bool {
        self.actor.is_destroyed() || self.opponent.is_destroyed()
    }

    pub(crate) fn actor_mut(&mut self) -> &mut Tank {
        &mut self.actor
    }

    pub(crate) fn opponent_mut(&mut self) -> &mut Tank {
        &mut self.opponent
    }

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub(crate) fn append_message(&mut self, message: &str) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        self.message.push_str(message);
    }

    pub(crate) fn set_enemy_spotted(&mut self, spotted: bool) {
        self.enemy_spotted = spotted;
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Actor fires along its facing; returns whether the shot landed.
    pub(crate) fn actor_attack(&mut self) -> bool {
        let sight = line_of_sight(&self.actor, &self.opponent);
        if sight.in_firing_range() {
            self.opponent.take_damage(ACTOR_ATTACK_DAMAGE);
            true
        } else {
            false
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "tick {} | you ({},{}) {} {}hp | enemy ({},{}) {} {}hp",
            self.tick,
            self.actor.x,
            self.actor.y,
            self.actor.facing,
            self.actor.health,
            self.opponent.x,
            self.opponent.y,
            self.opponent.facing,
            self.opponent.health,
        )?;
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if x > 0 {
                    write!(f, " ")?;
                }
                let cell = if (self.actor.x, self.actor.y) == (x, y) {
                    self.actor.facing.glyph()
                } else if (self.opponent.x, self.opponent.y) == (x, y) {
                    if self.opponent.is_destroyed() { 'x' } else { 'E' }
                } else {
                    '.'
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        }
        Ok(())
    }
}
