use std::io::{self, BufRead, Write};

use clap::Parser;
use jumps::dice::{DEFAULT_SIDES, DieSource, FairDie};
use jumps::{Session, SessionConfig, TapeGenerator};

#[derive(Parser)]
#[command(name = "jumps", about = "Jumps and Hits: a dice-driven board of tiny instructions")]
struct Cli {
    /// Number of squares on the board. Prompted for when omitted.
    #[arg(long)]
    size: Option<usize>,

    /// Seed for board generation (omit for a random board).
    #[arg(long)]
    seed: Option<u64>,

    /// Faces on the die.
    #[arg(long, default_value_t = DEFAULT_SIDES)]
    sides: u32,

    /// Seed for the die, so a game replays roll for roll.
    #[arg(long)]
    dice_seed: Option<u64>,

    /// Give up on a game after this many rolls.
    #[arg(long)]
    step_limit: Option<usize>,

    /// Print a plain listing instead of the board grid.
    #[arg(long)]
    listing: bool,
}

/// Parse a "<size> [seed]" board request.
fn parse_board_request(line: &str) -> Result<(usize, Option<u64>), String> {
    let mut parts = line.split_whitespace();
    let size = parts
        .next()
        .ok_or_else(|| "Expected a board size".to_string())?
        .parse::<usize>()
        .map_err(|e| format!("Invalid board size: {e}"))?;
    let seed = parts
        .next()
        .map(|s| s.parse::<u64>().map_err(|e| format!("Invalid seed: {e}")))
        .transpose()?;
    if parts.next().is_some() {
        return Err("Expected '<size> [seed]'".to_string());
    }
    Ok((size, seed))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = SessionConfig {
        sides: cli.sides,
        step_limit: cli.step_limit,
    };
    let mut dice = match cli.dice_seed {
        Some(seed) => FairDie::seeded(cli.sides, seed),
        None => FairDie::new(cli.sides),
    }
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    let generator = TapeGenerator::default();

    if let Some(size) = cli.size {
        if let Err(e) = play_one(&generator, size, cli.seed, config, cli.listing, &mut dice) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let Some(line) = prompt(&mut lines, "Board Size and Seed: ") else {
            return;
        };
        let (size, seed) = match parse_board_request(&line) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if let Err(e) = play_one(&generator, size, seed, config, cli.listing, &mut dice) {
            eprintln!("{e}");
            continue;
        }
        match prompt(&mut lines, "Play again? (yes/no): ") {
            Some(answer) if answer.trim().eq_ignore_ascii_case("yes") => {}
            _ => return,
        }
    }
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, message: &str) -> Option<String> {
    print!("{message}");
    io::stdout().flush().ok()?;
    lines.next()?.ok()
}

fn play_one(
    generator: &TapeGenerator,
    size: usize,
    seed: Option<u64>,
    config: SessionConfig,
    listing: bool,
    dice: &mut dyn DieSource,
) -> jumps::Result<()> {
    let mut session = Session::generate(generator, size, seed, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if listing {
        write!(out, "{}", session.tape().disassemble())?;
    } else {
        session.render_board(&mut out)?;
    }
    session.play(dice, &mut out)?;
    Ok(())
}
