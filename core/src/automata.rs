//! Construction of basic automata.
//!
//! Every automaton built here numbers its states from 0, with state 0 as the initial state.
use crate::{automaton::Automaton, symbol::Symbol};

/// Returns a new (deterministic) automaton with the empty language: a single non-final state and no
/// transitions.
pub fn make_empty() -> Automaton<u32> {
    Automaton::new(0)
}

/// Returns a new (deterministic) automaton that accepts only the empty string.
pub fn make_empty_string() -> Automaton<u32> {
    let mut a = Automaton::new(0);
    a.set_final(0, true);
    a
}

/// Returns a new (deterministic) automaton that accepts exactly the given symbol.
pub fn make_symbol(symbol: Symbol) -> Automaton<u32> {
    let mut a = Automaton::new(0);
    a.add_transition(0, Some(symbol), 1);
    a.set_final(1, true);
    a
}

/// Appends the specified symbol to the specified state, returning the new state.
pub fn append_symbol(a: &mut Automaton<u32>, state: u32, symbol: Symbol) -> u32 {
    let new_state = a.next_state_id();
    a.add_transition(state, Some(symbol), new_state);
    new_state
}

/// Returns a new (deterministic) automaton that accepts exactly the given string: a chain of one state
/// per character plus the initial state.
pub fn make_string(s: &str) -> Automaton<u32> {
    let mut a = Automaton::new(0);
    let mut state = 0;

    for c in s.chars() {
        state = append_symbol(&mut a, state, c);
    }

    a.set_final(state, true);
    a
}
