//! Finite automata: construction, simulation, determinization and minimization.
//!
//! An [Automaton] may be built by hand (see [automata] and [Automaton::from_parts]) or compiled from a
//! regular expression (see [regexp::compile]). The [operations] module turns automata into
//! deterministic and minimal ones, and [RunAutomaton] compiles a deterministic automaton into a table
//! for fast matching.

#![warn(clippy::all)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

mod automaton;
mod error;
mod run_automaton;
mod state_set;
mod symbol;

/// Constructors for basic automata.
pub mod automata;

/// Determinization, minimization and other transformations of automata.
pub mod operations;

/// Regular expression compiler.
pub mod regexp;

pub use {automaton::*, error::*, run_automaton::*, state_set::*, symbol::*};
