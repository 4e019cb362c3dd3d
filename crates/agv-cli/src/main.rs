//! `agv-cli` — a thin headless driver over `agv-sim`'s `Engine`.
//!
//! Exposes the two concrete subcommands `SPEC_FULL.md` §13 describes:
//! `generate-map` (pure map generation) and `run` (spawn a fleet, optionally
//! turn on auto-pilot, advance ticks, print a snapshot summary). `spawn`,
//! `set-target`, and `snapshot` are library-level building blocks `run`
//! composes internally rather than separate subcommands — nothing persists
//! between invocations, so there's no state for a standalone `spawn`
//! subcommand to act on.
//!
//! Library errors are `thiserror`-derived (`agv-sim::SimError` and friends);
//! this binary wraps them in `anyhow::Result` for human-readable reporting,
//! matching the teacher's example binaries (`examples/xsmall`, `large`).

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use agv_fleet::AgvStatus;
use agv_map::MapGenerator;
use agv_sim::{EngineBuilder, NoopObserver};

#[derive(Parser)]
#[command(name = "agv-cli", about = "Headless driver for the AGV fleet simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a map from a seed and print its node/edge table.
    GenerateMap {
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 50)]
        nodes: usize,
    },
    /// Build an engine, spawn a fleet, advance ticks, print a final snapshot.
    Run {
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 50)]
        nodes: usize,
        #[arg(long, default_value_t = 4)]
        agvs: usize,
        #[arg(long, default_value_t = 500)]
        ticks: u64,
        #[arg(long)]
        autopilot: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::GenerateMap { seed, nodes } => generate_map(&seed, nodes),
        Command::Run { seed, nodes, agvs, ticks, autopilot } => run(&seed, nodes, agvs, ticks, autopilot),
    }
}

fn generate_map(seed: &str, nodes: usize) -> Result<()> {
    let map = MapGenerator::generate(seed, nodes);
    println!("map: {} nodes, {} edges (seed={seed:?})", map.nodes.len(), map.edges.len());
    println!("{:<6} {:>6} {:>6}", "node", "x", "y");
    for node in &map.nodes {
        println!("{:<6} {:>6} {:>6}", node.label, node.x, node.y);
    }
    Ok(())
}

fn run(seed: &str, nodes: usize, agv_count: usize, ticks: u64, autopilot: bool) -> Result<()> {
    let mut engine = EngineBuilder::new(seed).generate_map(nodes).auto_pilot(autopilot).build();

    let mut ids = Vec::with_capacity(agv_count);
    for _ in 0..agv_count {
        let id = engine.spawn().context("spawning initial fleet")?;
        ids.push(id);
    }

    if !autopilot {
        // Without auto-pilot nobody would ever move: give every AGV a
        // uniformly random target so `run` demonstrates real traffic.
        let node_ids: Vec<_> = engine.graph().nodes().map(|n| n.id).collect();
        for (i, &id) in ids.iter().enumerate() {
            if let Some(&target) = node_ids.get((i + 1) % node_ids.len().max(1)) {
                let _ = engine.set_target(id, target);
            }
        }
    }

    engine.run(ticks, &mut NoopObserver);

    let snapshot = engine.snapshot();
    println!("ran {ticks} ticks (now = {})", snapshot.now);

    let mut histogram: BTreeMap<&'static str, usize> = BTreeMap::new();
    for agv in &snapshot.agvs {
        *histogram.entry(status_label(agv.status)).or_insert(0) += 1;
    }
    println!("status histogram:");
    for (status, count) in &histogram {
        println!("  {status:<10} {count}");
    }

    println!("{:<6} {:>10} {:>10} {:>12}", "agv", "x", "y", "status");
    for agv in &snapshot.agvs {
        println!(
            "{:<6} {:>10.2} {:>10.2} {:>12}",
            agv.id,
            agv.x,
            agv.y,
            status_label(agv.status)
        );
    }

    Ok(())
}

fn status_label(status: AgvStatus) -> &'static str {
    match status {
        AgvStatus::Idle => "IDLE",
        AgvStatus::Planning => "PLANNING",
        AgvStatus::Moving => "MOVING",
        AgvStatus::Waiting => "WAITING",
        AgvStatus::Blocked => "BLOCKED",
        AgvStatus::Repathing => "REPATHING",
        AgvStatus::Detour => "DETOUR",
        AgvStatus::Completed => "COMPLETED",
    }
}
