use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Errors that can occur while building or transforming automata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AutomatonError {
    /// The automaton violates one of its structural invariants (initial state outside the state set,
    /// dangling transition endpoint, final state outside the state set, or a transition symbol outside
    /// the alphabet).
    MalformedAutomaton(String /* message */),

    /// The operation requires a deterministic automaton, but the automaton has an epsilon transition or
    /// more than one destination for some (state, symbol) pair.
    NotDeterministic(String /* message */),

    /// Determinizing the automaton would require more than the given amount of work.
    TooComplexToDeterminize(usize /* work limit */),

    /// A regular expression could not be parsed.
    UnterminatedExpression(String /* expression */, usize /* position */, String /* message */),
}

impl AutomatonError {
    /// Indicates whether this error reports a violated automaton invariant.
    pub fn is_malformed_automaton(&self) -> bool {
        matches!(self, Self::MalformedAutomaton(_))
    }
}

impl Display for AutomatonError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MalformedAutomaton(message) => write!(f, "Malformed automaton: {message}"),
            Self::NotDeterministic(message) => write!(f, "Automaton is not deterministic: {message}"),
            Self::TooComplexToDeterminize(work_limit) => {
                write!(f, "Determinizing this automaton would require more than {work_limit} work units")
            }
            Self::UnterminatedExpression(expression, position, message) => {
                write!(f, "Invalid regular expression {expression:?} at position {position}: {message}")
            }
        }
    }
}

impl Error for AutomatonError {}

/// A type alias for any kind of error. The error is boxed and must be `Send`, `Sync`, and `'static`.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A type alias for a `Result` with a [BoxError].
pub type BoxResult<T> = Result<T, BoxError>;
