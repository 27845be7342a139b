use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use pacman_chase::constants::TICK_MS;
use pacman_chase::input_utils::normalize_tick_ms;
use pacman_chase::orchestrator::{Orchestrator, TickOutcome};
use pacman_chase::protocol::{
    error_frame, game_over_frame, parse_input_message, setup_frame, state_frame,
    ParsedInputMessage,
};
use pacman_chase::telemetry::init_tracing;
use pacman_chase::ticker::{IntervalScheduler, Scheduler, Tick};
use pacman_chase::types::GameConfig;
use rand::Rng;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, env = "PACMAN_TICK_MS")]
    tick_ms: Option<u64>,
    #[arg(long, env = "PACMAN_SEED")]
    seed: Option<u32>,
}

#[derive(Debug)]
enum LoopEvent {
    Input(String),
    InputClosed,
    Tick(Tick),
}

impl From<Tick> for LoopEvent {
    fn from(tick: Tick) -> Self {
        Self::Tick(tick)
    }
}

const SETTINGS_LOCKED: &str = "settings are locked while a round runs";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = GameConfig::default().with_tick_ms(normalize_tick_ms(cli.tick_ms, TICK_MS));
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, tick_ms = config.tick_ms, "game ready");

    let (tx, mut rx) = mpsc::channel::<LoopEvent>(256);
    spawn_stdin_reader(tx.clone());
    let mut orchestrator = Orchestrator::new(config, IntervalScheduler::new(tx), seed);
    emit_all(&setup_frames(&orchestrator))?;

    while let Some(event) = rx.recv().await {
        let frames = match event {
            LoopEvent::Input(line) => handle_input(&mut orchestrator, &line),
            LoopEvent::Tick(tick) => handle_tick(&mut orchestrator, tick),
            LoopEvent::InputClosed => {
                handle_input_closed(&mut orchestrator);
                break;
            }
        };
        emit_all(&frames)?;
    }
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<LoopEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tx.send(LoopEvent::Input(line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "failed to read stdin");
                    break;
                }
            }
        }
        let _ = tx.send(LoopEvent::InputClosed).await;
    });
}

fn handle_input<S: Scheduler>(orchestrator: &mut Orchestrator<S>, raw: &str) -> Vec<Value> {
    let Some(message) = parse_input_message(raw) else {
        return vec![error_frame("invalid message")];
    };

    match message {
        ParsedInputMessage::SetName { index, value } => {
            let Some(form) = orchestrator.form_mut() else {
                return vec![error_frame(SETTINGS_LOCKED)];
            };
            match form.set_name(index, value) {
                Ok(()) => Vec::new(),
                Err(error) => vec![error_frame(&error.to_string())],
            }
        }
        ParsedInputMessage::SetVelocity { axis, value } => {
            let Some(form) = orchestrator.form_mut() else {
                return vec![error_frame(SETTINGS_LOCKED)];
            };
            form.set_velocity(axis, value);
            Vec::new()
        }
        ParsedInputMessage::Start => match orchestrator.submit() {
            Ok(_) => orchestrator
                .snapshot()
                .map(|snapshot| state_frame(&snapshot))
                .into_iter()
                .collect(),
            Err(error) => {
                warn!(%error, "start rejected");
                vec![error_frame(&error.to_string())]
            }
        },
        ParsedInputMessage::Ack => {
            if orchestrator.acknowledge().is_none() {
                return vec![error_frame("no result to acknowledge")];
            }
            setup_frames(orchestrator)
        }
        ParsedInputMessage::Abort => {
            if !orchestrator.abort() {
                return vec![error_frame("no round is running")];
            }
            setup_frames(orchestrator)
        }
    }
}

fn handle_tick<S: Scheduler>(orchestrator: &mut Orchestrator<S>, tick: Tick) -> Vec<Value> {
    match orchestrator.on_tick(tick.round_id) {
        TickOutcome::Ignored => Vec::new(),
        TickOutcome::Advanced(snapshot) => vec![state_frame(&snapshot)],
        TickOutcome::GameOver { snapshot, notice } => {
            vec![state_frame(&snapshot), game_over_frame(&notice)]
        }
    }
}

fn handle_input_closed<S: Scheduler>(orchestrator: &mut Orchestrator<S>) {
    if let Some(round_id) = orchestrator.running_round_id() {
        info!(round_id, "input closed, stopping running round");
        orchestrator.abort();
    }
}

fn setup_frames<S: Scheduler>(orchestrator: &Orchestrator<S>) -> Vec<Value> {
    orchestrator.form().map(setup_frame).into_iter().collect()
}

fn emit_all(frames: &[Value]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for frame in frames {
        serde_json::to_writer(&mut stdout, frame).context("failed to encode frame")?;
        writeln!(stdout).context("failed to write frame")?;
    }
    stdout.flush().context("failed to flush stdout")
}
