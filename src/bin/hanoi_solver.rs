use clap::Parser;
use hanoi_solver::playback::{Playback, PlaybackEvent};
use hanoi_solver::solver::{CancellationToken, SearchOutcome, SearchStatistics, Strategy};
use hanoi_solver::tower::TowerState;
use hanoi_solver::utils::tower_from_str;
use hanoi_solver::worker::{cancel_after, spawn_search, SearchEvent, WorkerConfig};
use hanoi_solver::TowerError;
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve the Tower of Hanoi from any arrangement", long_about = None)]
struct Args {
    /// Number of disks (ignored when --state is given)
    #[arg(short, long, default_value_t = 3)]
    disks: u8,

    /// Search strategy: bfs, dfs or bidirectional
    #[arg(short, long, default_value = "bfs")]
    strategy: Strategy,

    /// Start from a random arrangement instead of the canonical one
    #[arg(short, long)]
    random: bool,

    /// Seed for the random arrangement (implies --random)
    #[arg(long)]
    seed: Option<u64>,

    /// Explicit start arrangement, pegs separated by '/', e.g. "3 2 / 1 /"
    #[arg(long, conflicts_with_all = ["random", "seed", "disks"])]
    state: Option<String>,

    /// Cancel the search after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print a progress line every N explored nodes (0 disables)
    #[arg(long, default_value_t = 0)]
    progress_every: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Replay the solution, one move every this many milliseconds
    #[arg(long)]
    playback_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    strategy: String,
    start: [Vec<u8>; 3],
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<[usize; 2]>>,
    stats: StatsOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput {
    nodes_explored: u64,
    nodes_expanded: u64,
    states_visited: usize,
    max_frontier_size: usize,
    search_time_ms: f64,
    success: bool,
    path_length: usize,
}

impl From<&SearchStatistics> for StatsOutput {
    fn from(stats: &SearchStatistics) -> Self {
        StatsOutput {
            nodes_explored: stats.nodes_explored,
            nodes_expanded: stats.nodes_expanded,
            states_visited: stats.states_visited,
            max_frontier_size: stats.max_frontier_size,
            search_time_ms: stats.search_time.as_secs_f64() * 1000.0,
            success: stats.success,
            path_length: stats.path_length,
        }
    }
}

fn build_start(args: &Args) -> Result<TowerState, TowerError> {
    if let Some(text) = &args.state {
        return tower_from_str(text);
    }
    let mut tower = TowerState::new(args.disks);
    match args.seed {
        Some(seed) => tower.randomize_with_seed(seed),
        None if args.random => tower.randomize(),
        None => {}
    }
    Ok(tower)
}

fn outcome_label(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Solved(_) => "solved",
        SearchOutcome::Exhausted => "exhausted",
        SearchOutcome::Cancelled => "cancelled",
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let start = match build_start(&args) {
        Ok(tower) => tower,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if !args.json {
        println!("Start state ({} disks):\n{}\n", start.num_disks(), start);
        println!("Searching with {}...\n", args.strategy);
    }

    let token = CancellationToken::new();
    let config = WorkerConfig {
        strategy: args.strategy,
        report_progress: args.progress_every > 0,
    };
    let handle = match spawn_search(&start, config, token.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    let _timeout = args
        .timeout_ms
        .map(|ms| cancel_after(token, Duration::from_millis(ms)));

    let mut seen: u64 = 0;
    for event in handle.events().iter() {
        match event {
            SearchEvent::Progress { phase, path, .. } => {
                seen += 1;
                if seen % args.progress_every == 0 {
                    eprintln!("  {:>10} nodes | {} | depth {}", seen, phase, path.len());
                }
            }
            SearchEvent::Completed { .. } => {}
            SearchEvent::Finished { .. } | SearchEvent::Failed(_) => break,
        }
    }

    let report = match handle.join() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if args.json {
        let output = SolveOutput {
            strategy: args.strategy.to_string(),
            start: [start.peg(0).to_vec(), start.peg(1).to_vec(), start.peg(2).to_vec()],
            outcome: outcome_label(&report.outcome),
            moves: report
                .outcome
                .solution()
                .map(|path| path.iter().map(|mv| [mv.from, mv.to]).collect()),
            stats: StatsOutput::from(&report.stats),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to encode result: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        match &report.outcome {
            SearchOutcome::Solved(path) => {
                println!("Solution found:\n");
                println!("Moves ({}):", path.len());
                if path.is_empty() {
                    println!("  Already solved.");
                }
                for (i, mv) in path.iter().enumerate() {
                    println!("  Move {}: {}", i + 1, mv);
                }
            }
            SearchOutcome::Exhausted => println!("No solution exists from this state."),
            SearchOutcome::Cancelled => println!("Search cancelled before finishing."),
        }
        let stats = &report.stats;
        println!();
        println!("Nodes explored:    {}", stats.nodes_explored);
        println!("States visited:    {}", stats.states_visited);
        println!("Max frontier size: {}", stats.max_frontier_size);
        println!("Search time:       {:.3} s", stats.search_time.as_secs_f64());
    }

    if let (Some(ms), Some(path)) = (args.playback_ms, report.outcome.solution()) {
        println!("\nReplaying {} moves:\n\n{}\n", path.len(), start);
        let playback = Playback::start(&start, path.to_vec(), Duration::from_millis(ms));
        for event in playback.events().iter() {
            match event {
                PlaybackEvent::Step { index, mv, state } => {
                    println!("Move {}: {}\n{}\n", index + 1, mv, state)
                }
                PlaybackEvent::Finished(_) => println!("Done."),
                PlaybackEvent::Stopped { index } => println!("Stopped before move {}.", index + 1),
                PlaybackEvent::Failed(e) => eprintln!("Playback failed: {}", e),
            }
        }
        let _ = playback.join();
    }

    let code = match report.outcome {
        SearchOutcome::Solved(_) => 0,
        SearchOutcome::Exhausted => 1,
        SearchOutcome::Cancelled => 3,
    };
    std::process::exit(code);
}
