use clap::Parser;
use hanoi_solver::solver::{HanoiSearch, NoopObserver, SearchOutcome, SearchStatistics, Strategy};
use hanoi_solver::tower::TowerState;
use hanoi_solver::utils::replay;
use std::collections::HashMap;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare search strategies over random starts", long_about = None)]
struct Args {
    /// Number of disks in every start state
    #[arg(short, long, default_value_t = 6)]
    disks: u8,

    /// Number of random start states to evaluate
    #[arg(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first start state; the others use the following seeds
    #[arg(long, default_value_t = 0)]
    start_seed: u64,
}

#[derive(Default)]
struct Totals {
    solved: usize,
    path_length: usize,
    nodes_explored: u64,
    max_frontier: usize,
    time: Duration,
}

impl Totals {
    fn add(&mut self, stats: &SearchStatistics) {
        self.solved += 1;
        self.path_length += stats.path_length;
        self.nodes_explored += stats.nodes_explored;
        self.max_frontier = self.max_frontier.max(stats.max_frontier_size);
        self.time += stats.search_time;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut totals: HashMap<Strategy, Totals> = HashMap::new();

    println!(
        "Comparing strategies on {} random starts with {} disks...",
        args.boards, args.disks
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let mut start = TowerState::new(args.disks);
        start.randomize_with_seed(seed);

        println!("\nStart {} (Seed: {})\n{}", board_idx, seed, start);

        for strategy in Strategy::ALL {
            let mut search = HanoiSearch::new(&start, NoopObserver);
            let outcome = search.run(strategy);
            let stats = search.statistics();

            match &outcome {
                SearchOutcome::Solved(path) => {
                    if let Err(e) = replay(&start, path) {
                        eprintln!(
                            "Error: {} returned an invalid path for seed {}: {}",
                            strategy, seed, e
                        );
                        continue;
                    }
                    totals.entry(strategy).or_default().add(stats);
                    println!(
                        "  Strategy: {:<14} Moves: {:<6} Nodes: {:<8} Time: {:.2} ms",
                        strategy.to_string(),
                        path.len(),
                        stats.nodes_explored,
                        stats.search_time.as_secs_f64() * 1000.0
                    );
                }
                other => eprintln!(
                    "Warning: {} ended with {:?} for seed {}",
                    strategy, other, seed
                ),
            }
        }
    }

    println!("\n--- Comparison Complete ---");
    println!("Start states evaluated: {}", args.boards);
    println!("\n--- Averages over solved starts ---");

    for strategy in Strategy::ALL {
        match totals.get(&strategy) {
            Some(t) if t.solved > 0 => {
                let n = t.solved as f64;
                println!(
                    "Strategy {:<14}: Moves = {:.2}, Nodes = {:.1}, Time = {:.3} ms, Peak frontier = {}",
                    strategy.to_string(),
                    t.path_length as f64 / n,
                    t.nodes_explored as f64 / n,
                    t.time.as_secs_f64() * 1000.0 / n,
                    t.max_frontier
                );
            }
            _ => println!("Strategy {}: No results recorded.", strategy),
        }
    }
}
