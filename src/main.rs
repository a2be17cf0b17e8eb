//! tinygo-solver: exhaustive solver for tiny Go boards.
//!
//! ## Usage
//!
//! - `tinygo-solver` - Show a demo
//! - `tinygo-solver solve --width 2 --height 2 --komi 0.5` - Solve a board
//! - `tinygo-solver demo` - Solve a few tiny boards and print the results

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};

use tinygo_solver::board::{Board, Color};
use tinygo_solver::constants::{DEFAULT_SEED, SOLVER_STACK_SIZE};
use tinygo_solver::settings::Settings;
use tinygo_solver::sgf;
use tinygo_solver::solver::{Outcome, Solver};

/// tinygo-solver: exhaustive solver for tiny Go boards
#[derive(Parser)]
#[command(name = "tinygo-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board and optionally write the proof tree as SGF
    Solve(SolveArgs),
    /// Solve a few tiny boards and print the results
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Player {
    Black,
    White,
}

impl From<Player> for Color {
    fn from(p: Player) -> Color {
        match p {
            Player::Black => Color::Black,
            Player::White => Color::White,
        }
    }
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Board width
    #[arg(long, default_value_t = 2)]
    width: usize,
    /// Board height
    #[arg(long, default_value_t = 2)]
    height: usize,
    /// Komi credited to White, a multiple of 0.5
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    komi: f32,
    /// Seed for the random move order
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Write the solved tree to this SGF file
    #[arg(long)]
    sgf: Option<PathBuf>,
    /// Start position, one row per value, using X, O and '.'
    #[arg(long, num_args = 1..)]
    setup: Vec<String>,
    /// Player to move in the start position
    #[arg(long, value_enum, default_value_t = Player::Black)]
    to_move: Player,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // the search recurses along the line of play
    let handle = std::thread::Builder::new()
        .name("solver".into())
        .stack_size(SOLVER_STACK_SIZE)
        .spawn(move || match cli.command {
            Some(Commands::Solve(args)) => run_solve(args),
            Some(Commands::Demo) | None => run_demo(),
        })
        .context("cannot start the solver thread")?;
    handle
        .join()
        .map_err(|_| anyhow!("solver thread panicked"))?
}

fn run_solve(args: SolveArgs) -> Result<()> {
    let settings = Settings::with_komi(args.width, args.height, args.komi)
        .context("invalid board settings")?;
    let mut solver = if args.setup.is_empty() {
        Solver::new(settings, args.seed)
    } else {
        let rows: Vec<&str> = args.setup.iter().map(String::as_str).collect();
        let board = Board::from_rows(&settings, &rows).context("invalid --setup diagram")?;
        Solver::from_position(settings, board, args.to_move.into(), args.seed)
    };

    let outcome = solver.solve_root();
    report(&solver, outcome);

    if let Some(path) = args.sgf {
        let file = File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        let written = sgf::export(&solver, &mut out)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Wrote {written} nodes to {}", path.display());
    }
    Ok(())
}

fn report(solver: &Solver, outcome: Outcome) {
    let root = solver.root();
    let settings = solver.settings();
    let mover = solver.store().node(root).mover;
    let (solution, score) = solver.result(root);
    println!("{}", solver.board_of(root));
    println!(
        "{}x{} komi {}: {mover} to move is {solution:?} ({outcome:?})",
        settings.width(),
        settings.height(),
        settings.komi()
    );
    if let Some(score) = score {
        println!("Score for {mover}: {}", score as f32 / 2.0);
    }
    match solver.winner(root) {
        Some(color) => println!("Winner: {color}"),
        None => println!("Result: draw"),
    }
    let stats = solver.stats();
    println!(
        "Nodes: {}, links: {}, positions: {}, ko links: {}, re-oriented: {}, clean ko records: {}",
        solver.nnode(),
        solver.store().nlink(),
        solver.pool().len(),
        stats.ko_links,
        stats.shifted,
        solver.ko().clean_nodes().count()
    );
}

fn run_demo() -> Result<()> {
    println!("tinygo-solver: exhaustive solving of tiny Go boards\n");

    for (width, height, komi) in [(1, 1, 0.0), (2, 1, 0.0), (2, 2, 0.5), (2, 2, 4.5)] {
        println!("=== {width}x{height}, komi {komi} ===");
        let settings = Settings::with_komi(width, height, komi)?;
        let mut solver = Solver::new(settings, DEFAULT_SEED);
        let outcome = solver.solve_root();
        report(&solver, outcome);
        println!();
    }
    Ok(())
}
