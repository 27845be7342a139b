use tracing::{debug, info};

use crate::engine::{GameEngine, GameEngineOptions};
use crate::error::OrchestratorError;
use crate::input_utils::default_name;
use crate::rng::Rng;
use crate::settings::{SettingsForm, StartRequest};
use crate::ticker::{Scheduler, TickHandle};
use crate::types::{GameConfig, GameOverNotice, PlayerView, Snapshot, Vec2};

pub struct RunningRound<H: TickHandle> {
    pub round_id: u64,
    pub engine: GameEngine,
    handle: H,
}

pub enum RoundState<H: TickHandle> {
    Setup(SettingsForm),
    Running(RunningRound<H>),
}

#[derive(Debug)]
pub enum TickOutcome {
    Ignored,
    Advanced(Snapshot),
    GameOver {
        snapshot: Snapshot,
        notice: GameOverNotice,
    },
}

pub struct Orchestrator<S: Scheduler> {
    config: GameConfig,
    scheduler: S,
    rng: Rng,
    state: RoundState<S::Handle>,
    notice: Option<GameOverNotice>,
    next_round_id: u64,
}

impl<S: Scheduler> Orchestrator<S> {
    pub fn new(config: GameConfig, scheduler: S, seed: u32) -> Self {
        let form = SettingsForm::with_slots(config.max_players);
        Self {
            config,
            scheduler,
            rng: Rng::new(seed),
            state: RoundState::Setup(form),
            notice: None,
            next_round_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RoundState::Running(_))
    }

    pub fn running_round_id(&self) -> Option<u64> {
        match &self.state {
            RoundState::Running(round) => Some(round.round_id),
            RoundState::Setup(_) => None,
        }
    }

    pub fn form(&self) -> Option<&SettingsForm> {
        match &self.state {
            RoundState::Setup(form) => Some(form),
            RoundState::Running(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        match &mut self.state {
            RoundState::Setup(form) => Some(form),
            RoundState::Running(_) => None,
        }
    }

    pub fn engine(&self) -> Option<&GameEngine> {
        match &self.state {
            RoundState::Running(round) => Some(&round.engine),
            RoundState::Setup(_) => None,
        }
    }

    pub fn snapshot(&mut self) -> Option<Snapshot> {
        match &mut self.state {
            RoundState::Running(round) => Some(round.engine.build_snapshot(false)),
            RoundState::Setup(_) => None,
        }
    }

    pub fn pending_notice(&self) -> Option<&GameOverNotice> {
        self.notice.as_ref()
    }

    pub fn submit(&mut self) -> Result<u64, OrchestratorError> {
        self.ensure_can_start()?;
        let request = match &self.state {
            RoundState::Setup(form) => form.submit()?,
            RoundState::Running(round) => {
                return Err(OrchestratorError::RoundRunning {
                    round_id: round.round_id,
                })
            }
        };
        self.start_round(request)
    }

    pub fn start_round(&mut self, request: StartRequest) -> Result<u64, OrchestratorError> {
        self.ensure_can_start()?;

        let round_id = self.next_round_id;
        self.next_round_id += 1;

        let players = build_roster(
            &request.names,
            self.config.max_players,
            self.config.board_size,
            &mut self.rng,
        );
        info!(
            round_id,
            players = players.len(),
            vx = request.velocity.x,
            vy = request.velocity.y,
            "round started"
        );
        let engine = GameEngine::new(
            players,
            request.velocity,
            self.config.clone(),
            GameEngineOptions {
                round_id,
                chaser_start: Vec2::default(),
            },
        );
        let handle = self.scheduler.start(round_id, self.config.tick_period());
        self.state = RoundState::Running(RunningRound {
            round_id,
            engine,
            handle,
        });
        Ok(round_id)
    }

    pub fn on_tick(&mut self, round_id: u64) -> TickOutcome {
        let RoundState::Running(round) = &mut self.state else {
            debug!(round_id, "tick ignored outside a running round");
            return TickOutcome::Ignored;
        };
        if round.round_id != round_id {
            debug!(
                round_id,
                running = round.round_id,
                "tick ignored for stale round"
            );
            return TickOutcome::Ignored;
        }

        round.engine.step();
        let snapshot = round.engine.build_snapshot(true);
        if !round.engine.is_ended() {
            return TickOutcome::Advanced(snapshot);
        }

        let notice = GameOverNotice {
            round_id,
            summary: round.engine.build_summary(),
        };
        info!(
            round_id,
            ticks = notice.summary.ticks,
            captures = notice.summary.captures,
            winner = notice.winner().map(|winner| winner.name.as_str()),
            "round finished"
        );
        self.leave_running();
        self.notice = Some(notice.clone());
        TickOutcome::GameOver { snapshot, notice }
    }

    pub fn abort(&mut self) -> bool {
        let Some(round_id) = self.running_round_id() else {
            return false;
        };
        info!(round_id, "round aborted");
        self.leave_running();
        true
    }

    pub fn acknowledge(&mut self) -> Option<GameOverNotice> {
        self.notice.take()
    }

    fn ensure_can_start(&self) -> Result<(), OrchestratorError> {
        if let Some(round_id) = self.running_round_id() {
            return Err(OrchestratorError::RoundRunning { round_id });
        }
        if let Some(notice) = &self.notice {
            return Err(OrchestratorError::NoticePending {
                round_id: notice.round_id,
            });
        }
        Ok(())
    }

    fn leave_running(&mut self) {
        let form = SettingsForm::with_slots(self.config.max_players);
        let previous = std::mem::replace(&mut self.state, RoundState::Setup(form));
        if let RoundState::Running(mut round) = previous {
            round.handle.cancel();
        }
    }
}

pub fn build_roster(
    names: &[String],
    max_players: usize,
    board_size: f64,
    rng: &mut Rng,
) -> Vec<PlayerView> {
    names
        .iter()
        .take(max_players)
        .enumerate()
        .map(|(index, name)| {
            let x = rng.below(board_size);
            let y = rng.below(board_size);
            PlayerView {
                name: default_name(name, index),
                position: Vec2::new(x, y),
            }
        })
        .collect()
}
