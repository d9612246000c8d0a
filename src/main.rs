use clap::{value_parser, Arg, ArgAction, Command};
use omega::config::{RunConfig, DEFAULT_MAX_TICKS};
use omega::error::OmegaError;
use omega::{repl, runner};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("omega")
        .about("Runs Omega tank programs one statement per tick")
        .arg(
            Arg::new("file")
                .help("The Omega program to run")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-ticks")
                .long("max-ticks")
                .help("Stop after this many ticks [default: 200]")
                .value_name("N")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .help("Milliseconds to wait between ticks")
                .value_name("MS")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("board")
                .short('b')
                .long("board")
                .help("Print the board after every tick")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log interpreter activity to stderr (RUST_LOG overrides)")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let config = RunConfig {
        max_ticks: matches
            .get_one::<u64>("max-ticks")
            .copied()
            .unwrap_or(DEFAULT_MAX_TICKS),
        delay_ms: matches.get_one::<u64>("delay-ms").copied().unwrap_or(0),
        show_board: matches.get_flag("board"),
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, &config),
        _ => repl::start(),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "omega=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_file(path: &str, config: &RunConfig) {
    let file = Path::new(path);

    if !file.exists() {
        eprintln!("Error: File '{}' not found", file.display());
        std::process::exit(1);
    }

    match fs::read_to_string(file) {
        Ok(source) => {
            runner::run(&source, Some(path), config);
        }
        Err(error) => {
            OmegaError::io_error(path, &error).report("", Some(path));
            std::process::exit(1);
        }
    }
}
