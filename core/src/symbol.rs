//! Input symbols and the epsilon marker.

/// An input symbol. Symbols are single characters of the input string.
pub type Symbol = char;

/// Transition label: `Some(symbol)` consumes one input symbol, `None` ([EPSILON]) consumes nothing.
pub type Label = Option<Symbol>;

/// The label of an epsilon (lambda) transition. It is never a member of an alphabet.
pub const EPSILON: Label = None;
