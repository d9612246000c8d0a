// Omega Language Interpreter Library
//
// Lexer, parser and single-step interpreter for Omega, a tiny line-oriented
// language that drives a tank around a grid against a scripted opponent.

// Public modules
pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod opponent;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod world;

// Re-export commonly used items
pub use ast::{Expr, MoveDirection, Program, Stmt, TurnDirection};
pub use error::{OmegaError, Span};
pub use evaluator::{step, Frame, RuntimeState};
pub use lexer::{tokenize, Lexer, Token, TokenType};
pub use parser::{parse_program, parse_program_with_diagnostics, parse_statement, Parser};
pub use world::{line_of_sight, Direction, LineOfSight, Tank, World};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{advance_tick, run};
