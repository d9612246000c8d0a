//! Game constants and run configuration.

// Grid
pub const GRID_SIZE: i32 = 10; // Cells per side of the square arena

// Tanks
pub const MAX_HEALTH: i32 = 100;

// Combat
pub const ATTACK_RANGE: i32 = 3; // Maximum distance (in cells) for a hit
pub const ACTOR_ATTACK_DAMAGE: i32 = 40;
pub const OPPONENT_ATTACK_DAMAGE: i32 = 15;
pub const NO_SIGHT_DISTANCE: i32 = 999; // Reported distance when not aligned

// Driver defaults
pub const DEFAULT_MAX_TICKS: u64 = 200;

/// Settings for a headless run, filled in from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Stop after this many ticks even if the program is still running.
    pub max_ticks: u64,
    /// Pause between ticks, standing in for the host's periodic timer.
    pub delay_ms: u64,
    /// Print the board after every tick.
    pub show_board: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            delay_ms: 0,
            show_board: false,
        }
    }
}
