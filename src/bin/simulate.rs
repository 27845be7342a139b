use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use pacman_chase::orchestrator::{Orchestrator, TickOutcome};
use pacman_chase::telemetry::init_tracing;
use pacman_chase::ticker::SteppedScheduler;
use pacman_chase::types::{Axis, GameConfig, GameOverReason, Velocity};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long = "name")]
    names: Vec<String>,
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    vx: String,
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    vy: String,
    #[arg(long, default_value_t = 1)]
    rounds: u32,
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
    #[arg(long, env = "PACMAN_SEED")]
    seed: Option<u32>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct RoundResultLine {
    round: u64,
    finished: bool,
    reason: Option<GameOverReason>,
    winner: Option<String>,
    ticks: u64,
    captures: u32,
    #[serde(rename = "aliveAtEnd")]
    alive_at_end: usize,
    #[serde(rename = "finalVelocity")]
    final_velocity: Velocity,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    seed: u32,
    #[serde(rename = "startedAtIso")]
    started_at_iso: String,
    #[serde(rename = "finishedAtIso")]
    finished_at_iso: String,
    #[serde(rename = "roundCount")]
    round_count: usize,
    #[serde(rename = "finishedCount")]
    finished_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "winCounts")]
    win_counts: BTreeMap<String, usize>,
    rounds: Vec<RoundResultLine>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let started_at_iso = now_iso();
    let run_id = default_run_id(seed, Utc::now().timestamp_millis());
    info!(%run_id, seed, rounds = cli.rounds, "run started");

    let mut orchestrator = Orchestrator::new(GameConfig::default(), SteppedScheduler, seed);
    let mut results = Vec::new();
    for _ in 0..cli.rounds {
        let result = run_round(&mut orchestrator, &cli)?;
        println!(
            "{}",
            serde_json::to_string(&result).context("failed to encode round result")?
        );
        results.push(result);
    }

    let summary = build_run_summary(run_id, seed, started_at_iso, now_iso(), results);
    info!(
        finished = summary.finished_count,
        rounds = summary.round_count,
        average_ticks = summary.average_ticks,
        "run finished"
    );
    if let Some(path) = cli.summary_out.as_ref() {
        write_summary(path, &summary)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }
    Ok(())
}

fn run_round(
    orchestrator: &mut Orchestrator<SteppedScheduler>,
    cli: &Cli,
) -> Result<RoundResultLine> {
    let form = orchestrator
        .form_mut()
        .context("previous round is still running")?;
    for (index, name) in cli.names.iter().enumerate() {
        form.set_name(index, name.as_str())?;
    }
    form.set_velocity(Axis::X, cli.vx.as_str());
    form.set_velocity(Axis::Y, cli.vy.as_str());
    let round_id = orchestrator.submit()?;

    loop {
        match orchestrator.on_tick(round_id) {
            TickOutcome::GameOver { snapshot, notice } => {
                orchestrator.acknowledge();
                let summary = notice.summary;
                return Ok(RoundResultLine {
                    round: round_id,
                    finished: true,
                    reason: Some(summary.reason),
                    winner: summary.winner.map(|winner| winner.name),
                    ticks: summary.ticks,
                    captures: summary.captures,
                    alive_at_end: snapshot.players.len(),
                    final_velocity: summary.final_velocity,
                });
            }
            TickOutcome::Advanced(snapshot) if snapshot.tick >= cli.max_ticks => {
                warn!(round_id, ticks = snapshot.tick, "round abandoned undecided");
                let captures = orchestrator.engine().map_or(0, |engine| engine.captures());
                orchestrator.abort();
                return Ok(RoundResultLine {
                    round: round_id,
                    finished: false,
                    reason: None,
                    winner: None,
                    ticks: snapshot.tick,
                    captures,
                    alive_at_end: snapshot.players.len(),
                    final_velocity: snapshot.velocity,
                });
            }
            TickOutcome::Advanced(_) => {}
            TickOutcome::Ignored => anyhow::bail!("round {round_id} stopped accepting ticks"),
        }
    }
}

fn default_run_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn build_run_summary(
    run_id: String,
    seed: u32,
    started_at_iso: String,
    finished_at_iso: String,
    rounds: Vec<RoundResultLine>,
) -> RunSummary {
    let round_count = rounds.len();
    let finished_count = rounds.iter().filter(|round| round.finished).count();
    let total_ticks: u64 = rounds.iter().map(|round| round.ticks).sum();
    let average_ticks = if round_count == 0 {
        0
    } else {
        total_ticks / round_count as u64
    };
    let mut win_counts = BTreeMap::new();
    for winner in rounds.iter().filter_map(|round| round.winner.as_ref()) {
        *win_counts.entry(winner.clone()).or_insert(0) += 1;
    }
    RunSummary {
        run_id,
        seed,
        started_at_iso,
        finished_at_iso,
        round_count,
        finished_count,
        average_ticks,
        win_counts,
        rounds,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_round(round: u64, winner: Option<&str>, ticks: u64) -> RoundResultLine {
        RoundResultLine {
            round,
            finished: winner.is_some(),
            reason: winner.map(|_| GameOverReason::LastSurvivor),
            winner: winner.map(str::to_string),
            ticks,
            captures: 0,
            alive_at_end: 1,
            final_velocity: Velocity { x: 10.0, y: 10.0 },
        }
    }

    fn cli_for(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("simulate").chain(args.iter().copied()))
    }

    #[test]
    fn default_run_id_contains_seed_and_timestamp() {
        assert_eq!(default_run_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_counts_winners_and_average_ticks() {
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            1,
            "a".to_string(),
            "b".to_string(),
            vec![
                make_round(1, Some("Alice"), 30),
                make_round(2, None, 90),
                make_round(3, Some("Alice"), 60),
            ],
        );
        assert_eq!(summary.round_count, 3);
        assert_eq!(summary.finished_count, 2);
        assert_eq!(summary.average_ticks, 60);
        assert_eq!(summary.win_counts.get("Alice"), Some(&2));
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let target = std::env::temp_dir()
            .join(format!("pacman-chase-missing-{now}"))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            1,
            "a".to_string(),
            "b".to_string(),
            vec![make_round(1, Some("Bob"), 5)],
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn undecided_round_is_abandoned_at_tick_limit() {
        let cli = cli_for(&[
            "--name", "A", "--name", "B", "--vx", "0", "--vy", "0", "--max-ticks", "25",
        ]);
        let mut orchestrator = Orchestrator::new(GameConfig::default(), SteppedScheduler, 3);

        let result = run_round(&mut orchestrator, &cli).expect("round runs");

        assert!(!result.finished);
        assert_eq!(result.ticks, 25);
        assert!(result.alive_at_end >= 2);
        assert!(!orchestrator.is_running());
    }

    #[test]
    fn non_numeric_velocity_fails_the_round() {
        let cli = cli_for(&["--vx", "fast"]);
        let mut orchestrator = Orchestrator::new(GameConfig::default(), SteppedScheduler, 3);

        assert!(run_round(&mut orchestrator, &cli).is_err());
        assert!(!orchestrator.is_running());
    }
}
