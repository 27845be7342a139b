use crate::types::Velocity;

pub const BOARD_SIZE: f64 = 800.0;
pub const TICK_MS: u64 = 1_000;

pub const CAPTURE_RADIUS: f64 = 10.0;
pub const CAPTURE_ACCELERATION: f64 = 1.1;

pub const MAX_PLAYERS: usize = 25;
pub const DEFAULT_VELOCITY: Velocity = Velocity { x: 10.0, y: 10.0 };

pub fn default_player_name(index: usize) -> String {
    format!("Player {}", index + 1)
}
