//! Transformations and queries over automata. Inputs are taken by reference and never modified.

mod determinize;
mod epsilon;
mod isomorphism;
mod minimize;
mod reachability;

pub use {determinize::*, epsilon::*, isomorphism::*, minimize::*, reachability::*};
