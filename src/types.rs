use std::time::Duration;

use serde::Serialize;

use crate::constants::{BOARD_SIZE, CAPTURE_ACCELERATION, CAPTURE_RADIUS, MAX_PLAYERS, TICK_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

pub type Velocity = Vec2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    LastSurvivor,
    NoSurvivors,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    Reflected {
        axis: Axis,
        velocity: Velocity,
    },
    PlayerEaten {
        name: String,
        position: Vec2,
    },
    Accelerated {
        velocity: Velocity,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    #[serde(rename = "roundId")]
    pub round_id: u64,
    pub tick: u64,
    pub chaser: Vec2,
    pub velocity: Velocity,
    pub players: Vec<PlayerView>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EliminationEntry {
    pub tick: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub reason: GameOverReason,
    pub winner: Option<PlayerView>,
    pub ticks: u64,
    pub captures: u32,
    #[serde(rename = "finalVelocity")]
    pub final_velocity: Velocity,
    pub eliminations: Vec<EliminationEntry>,
    #[serde(rename = "finishedAtIso")]
    pub finished_at_iso: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameOverNotice {
    #[serde(rename = "roundId")]
    pub round_id: u64,
    pub summary: GameSummary,
}

impl GameOverNotice {
    pub fn winner(&self) -> Option<&PlayerView> {
        self.summary.winner.as_ref()
    }

    pub fn message(&self) -> String {
        match self.winner() {
            Some(winner) => format!("Game Over! The winner is {}", winner.name),
            None => "Game Over! Nobody survived".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameConfig {
    #[serde(rename = "boardSize")]
    pub board_size: f64,
    #[serde(rename = "tickMs")]
    pub tick_ms: u64,
    #[serde(rename = "captureRadius")]
    pub capture_radius: f64,
    pub acceleration: f64,
    #[serde(rename = "maxPlayers")]
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            tick_ms: TICK_MS,
            capture_radius: CAPTURE_RADIUS,
            acceleration: CAPTURE_ACCELERATION,
            max_players: MAX_PLAYERS,
        }
    }
}

impl GameConfig {
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
