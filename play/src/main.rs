use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lightwire::{BoardBuilder, Direction, Game, Generation, Location, PuzzleState, Rotation, Rules};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Play a pipe-rotation puzzle in the terminal.
///
/// Commands, one per line: `cw COL ROW`, `ccw COL ROW`, `up`, `down`, `left`, `right`,
/// `tick`, `restart`, `quit`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 6)]
    width: usize,
    #[arg(long, default_value_t = 6)]
    height: usize,
    /// blank, manual, fractal or random
    #[arg(long, default_value_t = Generation::Random)]
    mode: Generation,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = Rules::default().max_moves)]
    max_moves: usize,
    #[arg(long, default_value_t = Rules::default().max_ticks)]
    max_ticks: usize,
}

enum Command {
    Rotate(Location, Rotation),
    Relocate(Direction),
    Tick,
    Restart,
    Quit,
}

fn parse(line: &str) -> Result<Command> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    Ok(match words.as_slice() {
        [turn @ ("cw" | "ccw"), col, row] => {
            let location = Location(col.parse().context("column")?, row.parse().context("row")?);
            let rotation = if *turn == "cw" { Rotation::Clockwise } else { Rotation::CounterClockwise };
            Command::Rotate(location, rotation)
        }
        ["tick"] => Command::Tick,
        ["restart"] => Command::Restart,
        ["quit"] => Command::Quit,
        [direction] => Command::Relocate(direction.parse().with_context(|| format!("unknown command {direction:?}"))?),
        _ => bail!("unknown command {line:?}"),
    })
}

fn show(game: &Game) {
    print!("{}", game.board());
    println!(
        "moves {}/{}  ticks {}/{}  lit {}/{}  {}",
        game.moves(),
        game.rules().max_moves,
        game.ticks(),
        game.rules().max_ticks,
        game.board().lit_count(),
        game.board().width() * game.board().height(),
        game.state(),
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut builder = BoardBuilder::new(args.width, args.height);
    builder.generation(args.mode);
    if let Some(seed) = args.seed {
        builder.seed(seed);
    }

    let rules = Rules { max_moves: args.max_moves, max_ticks: args.max_ticks };
    let mut game = Game::new(builder, rules)?;
    show(&game);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(Command::Rotate(location, rotation)) => {
                game.rotate_cell_at(location, rotation);
            }
            Ok(Command::Relocate(direction)) => {
                game.relocate_source(direction);
            }
            Ok(Command::Tick) => game.advance_tick(),
            Ok(Command::Restart) => game.restart()?,
            Ok(Command::Quit) => break,
            Err(err) => {
                debug!(%line, "rejected command");
                eprintln!("{err:#}");
                continue;
            }
        }

        show(&game);
        if game.state() != PuzzleState::InProgress {
            println!("{}", if game.state() == PuzzleState::Won { "You win!" } else { "You lose!" });
        }
        io::stdout().flush()?;
    }

    Ok(())
}
