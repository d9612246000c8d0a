use crate::ast::Program;
use crate::evaluator::RuntimeState;
use crate::parser::parse_program_with_diagnostics;
use crate::runner::advance_tick;
use crate::world::World;
use std::fs;
use std::io::{self, BufRead, Write};

/// What a REPL line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step(u64),
    Run,
    Show,
    List,
    Reset,
    Clear,
    Load(String),
    Help,
    Quit,
    /// Anything that is not a `:` command is Omega source to append.
    Source(String),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            return Command::Quit;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Command::Source(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("step" | "s"), None) => Command::Step(1),
            (Some("step" | "s"), Some(count)) => match count.parse() {
                Ok(count) => Command::Step(count),
                Err(_) => Command::Unknown(line.to_string()),
            },
            (Some("run" | "r"), None) => Command::Run,
            (Some("show"), None) => Command::Show,
            (Some("list" | "l"), None) => Command::List,
            (Some("reset"), None) => Command::Reset,
            (Some("clear"), None) => Command::Clear,
            (Some("load"), Some(path)) => Command::Load(path.to_string()),
            (Some("help" | "h"), None) => Command::Help,
            (Some("quit" | "q"), None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Upper bound for `:run`, since an IF with an ELSE never finishes.
const RUN_LIMIT: u64 = 1000;

/// How the program source changed.
enum Edit {
    /// Text added after the existing program; execution carries on.
    Append(String),
    /// A different program; execution starts over.
    Replace(String),
}

pub fn start() {
    println!("Omega Interpreter v0.1.0");
    println!("Type Omega statements to add them to the program, ':help' for commands");
    println!();

    drive(io::stdin().lock());
}

/// Runs REPL commands read from `input` until quit or end of input, and
/// returns the final world.
pub fn drive<R: BufRead>(mut input: R) -> World {
    let mut source = String::new();
    let mut world = World::new();
    let mut resumed: RuntimeState<'static> = RuntimeState::new();

    // Warnings before this offset were already shown.
    let mut fresh_from = 0;

    // The runtime borrows the program, so every edit rebuilds both.
    loop {
        let (program, diagnostics) = parse_program_with_diagnostics(&source);
        for diagnostic in diagnostics.iter().filter(|d| d.span.start >= fresh_from) {
            diagnostic.report(&source, None);
        }
        let mut state = resumed;

        match session(&mut input, &mut world, &program, &mut state, &source) {
            Some(Edit::Append(text)) => {
                fresh_from = source.len();
                source.push_str(&text);
                source.push('\n');
                resumed = state.resume();
            }
            Some(Edit::Replace(text)) => {
                fresh_from = 0;
                source = text;
                resumed = RuntimeState::new();
            }
            None => break,
        }
    }

    world
}

/// Handles commands against one parsed program. Returns the edit when the
/// program has to be rebuilt, `None` on quit.
fn session<'p, R: BufRead>(
    input: &mut R,
    world: &mut World,
    program: &'p Program,
    state: &mut RuntimeState<'p>,
    source: &str,
) -> Option<Edit> {
    loop {
        print!("> ");
        // A failed flush only delays the prompt.
        io::stdout().flush().ok();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                return None;
            }
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                return None;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::Step(count) => {
                for _ in 0..count {
                    if !advance_tick(world, program, state) {
                        println!("(program finished)");
                        break;
                    }
                }
                println!("{}", world);
            }
            Command::Run => {
                let mut ticks = 0;
                while ticks < RUN_LIMIT && !world.is_over() && advance_tick(world, program, state) {
                    ticks += 1;
                }
                println!("{}", world);
            }
            Command::Show => {
                println!("{}", world);
                let mut variables: Vec<_> = state.variables.iter().collect();
                variables.sort();
                for (name, value) in variables {
                    println!("  ${} = {}", name, value);
                }
            }
            Command::List => print!("{}", source),
            Command::Reset => {
                *world = World::new();
                state.reset();
                println!("World and program state reset.");
            }
            Command::Clear => {
                *world = World::new();
                return Some(Edit::Replace(String::new()));
            }
            Command::Load(path) => match fs::read_to_string(&path) {
                Ok(text) => {
                    *world = World::new();
                    println!("Loaded '{}'.", path);
                    return Some(Edit::Replace(text));
                }
                Err(error) => eprintln!("Error reading file '{}': {}", path, error),
            },
            Command::Help => print_help(),
            Command::Quit => {
                println!("Goodbye!");
                return None;
            }
            Command::Source(text) => return Some(Edit::Append(text)),
            Command::Unknown(text) => eprintln!("Unknown command '{}', try ':help'", text),
        }
    }
}

fn print_help() {
    println!(":step [n]   advance n ticks (default 1)");
    println!(":run        advance until the program finishes or a tank is destroyed");
    println!(":show       print the board and variables");
    println!(":list       print the program source");
    println!(":reset      restart the program and the world");
    println!(":clear      forget the program");
    println!(":load FILE  replace the program with a file");
    println!(":quit       leave");
}
