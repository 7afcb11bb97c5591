use clap::Parser;
use hanoi_solver::playback::{Playback, PlaybackEvent};
use hanoi_solver::solver::{HanoiSearch, NoopObserver, SearchOutcome, Strategy};
use hanoi_solver::tower::{Snapshot, TowerState};
use hanoi_solver::utils::move_from_str;
use rand::Rng;
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play the Tower of Hanoi in the terminal", long_about = None)]
struct Args {
    /// Number of disks (random between 2 and 7 when omitted)
    #[arg(short, long)]
    disks: Option<u8>,

    /// Start from the canonical arrangement instead of a random one
    #[arg(long)]
    canonical: bool,

    /// Strategy used for hints and automatic solving
    #[arg(short, long, default_value = "bfs")]
    strategy: Strategy,

    /// Milliseconds between moves when the solver plays
    #[arg(long, default_value_t = 400)]
    playback_ms: u64,
}

fn solve(tower: &TowerState, strategy: Strategy) -> Option<Vec<hanoi_solver::Move>> {
    match HanoiSearch::new(tower, NoopObserver).run(strategy) {
        SearchOutcome::Solved(path) => Some(path),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let num_disks = args
        .disks
        .unwrap_or_else(|| rand::thread_rng().gen_range(2..=7));

    let mut tower = TowerState::new(num_disks);
    if !args.canonical {
        tower.randomize();
    }
    let initial = tower.snapshot();
    let mut history: Vec<(Snapshot, usize)> = Vec::new();
    let mut moves_made = 0usize;

    println!("Welcome to the Tower of Hanoi!");
    println!("Move every disk onto peg 2. A disk may never rest on a smaller one.");

    loop {
        println!("---------------------");
        println!("Moves: {}", moves_made);
        println!("{}", tower);

        if tower.is_goal_state() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total moves: {}", moves_made);
            println!("---------------------");
            break;
        }

        print!("Enter a move (from to), 'u' undo, 'h' hint, 's' solve, '0' restart, 'r' randomize, 'q' quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => match history.pop() {
                Some((previous, count)) => {
                    tower.restore(&previous);
                    moves_made = count;
                    println!("Move undone.");
                }
                None => println!("Nothing to undo."),
            },
            "r" => {
                tower.randomize();
                history.clear();
                moves_made = 0;
                println!("New random arrangement.");
            }
            "0" => {
                tower.restore(&initial);
                history.clear();
                moves_made = 0;
                println!("Back to the starting arrangement.");
            }
            "h" => match solve(&tower, args.strategy).and_then(|path| path.first().copied()) {
                Some(mv) => println!("Hint: move {}", mv),
                None => println!("No hint available."),
            },
            "s" => {
                let Some(path) = solve(&tower, args.strategy) else {
                    println!("The solver could not find a solution.");
                    continue;
                };
                let steps = path.len();
                println!("Solver found {} moves ({}). Playing them back...", steps, args.strategy);
                let playback =
                    Playback::start(&tower, path, Duration::from_millis(args.playback_ms));
                for event in playback.events().iter() {
                    if let PlaybackEvent::Step { index, mv, state } = event {
                        println!("Move {}: {}\n{}\n", index + 1, mv, state);
                    }
                }
                match playback.join() {
                    Ok(end) => {
                        history.push((tower.snapshot(), moves_made));
                        moves_made += steps;
                        tower = end;
                    }
                    Err(e) => println!("Playback failed: {}", e),
                }
            }
            other => match move_from_str(other) {
                Ok(mv) => {
                    let before = tower.snapshot();
                    if tower.apply_move(mv) {
                        history.push((before, moves_made));
                        moves_made += 1;
                        println!("Moved {}.", mv);
                    } else {
                        println!("Illegal move: {}.", mv);
                    }
                }
                Err(e) => println!("Invalid input: {}. Use 'from to', 'u', 'h', 's', 'r' or 'q'.", e),
            },
        }
    }
}
