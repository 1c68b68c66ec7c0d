/// Entry point: load a level, build its hint maps and print them.
///
/// Usage: noderunner-nav [--verbose] [--break X,Y]... [--ticks N] [LEVEL_FILE]
///
/// Without a level file the first level from the configured levels
/// directory is used, falling back to the embedded levels. `--break`
/// breaks bricks before the report and `--ticks` advances the
/// regeneration clock afterwards.

mod ui;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use log::{error, info};

use noderunner_nav::sim::level::{available_levels, load_level_file};
use noderunner_nav::{logging, Board, GameEvent, LevelDef, NavConfig};
use ui::report::Report;

#[derive(Debug, Default)]
struct Args {
    verbose: bool,
    level: Option<PathBuf>,
    breaks: Vec<(usize, usize)>,
    ticks: u64,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => parsed.verbose = true,
            "--break" => {
                let value = args.next().ok_or("--break needs X,Y")?;
                parsed.breaks.push(parse_cell(&value)?);
            }
            "--ticks" => {
                let value = args.next().ok_or("--ticks needs a count")?;
                parsed.ticks = value.parse().map_err(|_| format!("bad tick count {value:?}"))?;
            }
            s if s.starts_with('-') => return Err(format!("unknown option {s}")),
            _ if parsed.level.is_none() => parsed.level = Some(PathBuf::from(&arg)),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }
    Ok(parsed)
}

fn parse_cell(value: &str) -> Result<(usize, usize), String> {
    let bad = || format!("bad cell {value:?}, expected X,Y");
    let (x, y) = value.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok((x, y))
}

fn pick_level(args: &Args, config: &NavConfig) -> Result<LevelDef, Box<dyn std::error::Error>> {
    match &args.level {
        Some(path) => Ok(load_level_file(path)?),
        None => available_levels(&config.levels_dir)
            .into_iter()
            .next()
            .ok_or_else(|| "no levels available".into()),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = NavConfig::load();
    let level = pick_level(&args, &config)?;
    let mut board = Board::new(&level, &config)?;

    for &(x, y) in &args.breaks {
        if !board.grid().contains(x, y) {
            return Err(format!("cell ({x}, {y}) is outside the map").into());
        }
        if !board.break_brick(x, y) {
            info!("no brick to break at ({x}, {y})");
        }
    }
    for _ in 0..args.ticks {
        for event in board.tick() {
            if let GameEvent::ActorRelocated { id, from, to } = event {
                info!("actor {} pushed from {from:?} to {to:?}", id.0);
            }
        }
    }

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    Report::new(stdout.lock(), color).board(&board)?;
    Ok(())
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: noderunner-nav [--verbose] [--break X,Y]... [--ticks N] [LEVEL_FILE]");
            std::process::exit(2);
        }
    };
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}
