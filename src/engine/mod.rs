use tracing::{debug, info};

use crate::types::{
    Axis, EliminationEntry, GameConfig, GameOverReason, GameSummary, PlayerView, RuntimeEvent,
    Snapshot, Vec2, Velocity,
};

mod utils;

use self::utils::{is_out_of_bounds, now_iso, within_capture_box};

#[derive(Clone, Debug, Default)]
pub struct GameEngineOptions {
    pub round_id: u64,
    pub chaser_start: Vec2,
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    pub round_id: u64,
    pub config: GameConfig,

    chaser: Vec2,
    velocity: Velocity,
    players: Vec<PlayerView>,
    events: Vec<RuntimeEvent>,
    eliminations: Vec<EliminationEntry>,

    tick_counter: u64,
    captures: u32,
    ended: bool,
    end_reason: Option<GameOverReason>,
}

impl GameEngine {
    pub fn new(
        players: Vec<PlayerView>,
        velocity: Velocity,
        config: GameConfig,
        options: GameEngineOptions,
    ) -> Self {
        Self {
            round_id: options.round_id,
            config,
            chaser: options.chaser_start,
            velocity,
            players,
            events: Vec::new(),
            eliminations: Vec::new(),
            tick_counter: 0,
            captures: 0,
            ended: false,
            end_reason: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn end_reason(&self) -> Option<GameOverReason> {
        self.end_reason
    }

    pub fn winner(&self) -> Option<&PlayerView> {
        match self.end_reason {
            Some(GameOverReason::LastSurvivor) => self.players.first(),
            _ => None,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[PlayerView] {
        &self.players
    }

    pub fn chaser(&self) -> Vec2 {
        self.chaser
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }

    pub fn step(&mut self) {
        if self.ended {
            return;
        }
        self.tick_counter += 1;

        let mut candidate = Vec2::new(
            self.chaser.x + self.velocity.x,
            self.chaser.y + self.velocity.y,
        );
        for axis in [Axis::X, Axis::Y] {
            if is_out_of_bounds(candidate.get(axis), self.config.board_size) {
                self.velocity.set(axis, -self.velocity.get(axis));
                candidate.set(axis, self.chaser.get(axis));
                self.events.push(RuntimeEvent::Reflected {
                    axis,
                    velocity: self.velocity,
                });
            }
        }

        let radius = self.config.capture_radius;
        let eaten_idx = self
            .players
            .iter()
            .position(|player| within_capture_box(player.position, candidate, radius));
        if let Some(eaten_idx) = eaten_idx {
            self.eat_player(eaten_idx);
        }

        self.chaser = candidate;
        debug!(
            round_id = self.round_id,
            tick = self.tick_counter,
            x = self.chaser.x,
            y = self.chaser.y,
            "chaser moved"
        );
        self.check_game_over();
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            round_id: self.round_id,
            tick: self.tick_counter,
            chaser: self.chaser,
            velocity: self.velocity,
            players: self.players.clone(),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> GameSummary {
        GameSummary {
            reason: self.end_reason.unwrap_or(GameOverReason::NoSurvivors),
            winner: self.winner().cloned(),
            ticks: self.tick_counter,
            captures: self.captures,
            final_velocity: self.velocity,
            eliminations: self.eliminations.clone(),
            finished_at_iso: now_iso(),
        }
    }

    fn eat_player(&mut self, player_idx: usize) {
        let eaten = self.players.remove(player_idx);
        self.velocity.x *= self.config.acceleration;
        self.velocity.y *= self.config.acceleration;
        self.captures += 1;

        info!(
            round_id = self.round_id,
            tick = self.tick_counter,
            player = %eaten.name,
            remaining = self.players.len(),
            "player eaten"
        );
        self.eliminations.push(EliminationEntry {
            tick: self.tick_counter,
            name: eaten.name.clone(),
        });
        self.events.push(RuntimeEvent::PlayerEaten {
            name: eaten.name,
            position: eaten.position,
        });
        self.events.push(RuntimeEvent::Accelerated {
            velocity: self.velocity,
        });
    }

    fn check_game_over(&mut self) {
        let reason = match self.players.len() {
            0 => GameOverReason::NoSurvivors,
            1 => GameOverReason::LastSurvivor,
            _ => return,
        };
        self.ended = true;
        self.end_reason = Some(reason);
    }
}
