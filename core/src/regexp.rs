//! Compiler from regular expressions in Kleene notation to finite automata.
//!
//! The syntax is deliberately small:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | any other character | the one-symbol language |
//! | `ε` or `λ` | the empty string |
//! | `(r)` | grouping |
//! | `r*` | Kleene star |
//! | `rs` or `r.s` | concatenation |
//! | `r+s` | union |
//!
//! Star binds tighter than concatenation, which binds tighter than union. Both binary operators are
//! left-associative. Every character that is not an operator, a parenthesis or an epsilon literal is a
//! symbol, whitespace included.
//!
//! Compilation happens in two steps: [to_postfix] rewrites the expression in postfix order using the
//! shunting-yard algorithm, then [from_postfix] evaluates the postfix tokens with a stack of automata
//! using the Thompson construction.
use {
    crate::{
        automaton::Automaton,
        error::AutomatonError,
        operations::{remove_epsilons, remove_unreachable},
        symbol::Symbol,
    },
    log::debug,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

mod postfix;
mod thompson;

pub use {postfix::*, thompson::*};

/// Union operator.
pub const UNION: char = '+';

/// Explicit concatenation operator. Concatenation may also be written by juxtaposition.
pub const CONCAT: char = '.';

/// Kleene star operator.
pub const STAR: char = '*';

/// Opens a group.
pub const OPEN_GROUP: char = '(';

/// Closes a group.
pub const CLOSE_GROUP: char = ')';

/// Literals standing for the empty string. The first one is used when printing.
pub const EPSILON_LITERALS: [char; 2] = ['ε', 'λ'];

/// Returns true if the character stands for the empty string.
#[inline]
pub fn is_epsilon_literal(c: char) -> bool {
    EPSILON_LITERALS.contains(&c)
}

/// A token of an expression in postfix order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// A single input symbol.
    Symbol(Symbol),

    /// The empty string.
    Epsilon,

    /// Binary union.
    Union,

    /// Binary concatenation.
    Concat,

    /// Unary Kleene star.
    Star,
}

impl Token {
    /// Number of operands the token pops when the postfix expression is evaluated.
    pub fn arity(&self) -> usize {
        match self {
            Self::Symbol(_) | Self::Epsilon => 0,
            Self::Star => 1,
            Self::Union | Self::Concat => 2,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let c = match self {
            Self::Symbol(c) => *c,
            Self::Epsilon => EPSILON_LITERALS[0],
            Self::Union => UNION,
            Self::Concat => CONCAT,
            Self::Star => STAR,
        };

        write!(f, "{c}")
    }
}

/// Renders postfix tokens as a reverse Polish notation string, e.g. `ab+*a.`.
pub fn format_postfix(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.to_string()).collect()
}

/// Compiles a regular expression into an automaton that may contain epsilon transitions.
///
/// States are numbered from 0 and unique across the whole construction. The alphabet is the set of
/// symbols that appear in the expression. The empty expression compiles to an automaton accepting
/// only the empty string.
///
/// # Errors
/// [AutomatonError::UnterminatedExpression] if the expression is not well formed.
pub fn compile(expression: &str) -> Result<Automaton<u32>, AutomatonError> {
    let tokens = to_postfix(expression)?;
    debug!("Compiling {expression:?} from postfix {:?}", format_postfix(&tokens));
    from_postfix(&tokens)
}

/// Compiles a regular expression into an automaton without epsilon transitions. States that are only
/// reachable through epsilon moves are dropped.
///
/// # Errors
/// [AutomatonError::UnterminatedExpression] if the expression is not well formed.
pub fn compile_without_epsilons(expression: &str) -> Result<Automaton<u32>, AutomatonError> {
    let a = compile(expression)?;
    Ok(remove_unreachable(&remove_epsilons(&a)))
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn test_compile_union_star() {
        let a = compile("(a+b)*a").unwrap();
        assert!(a.has_epsilon_transitions());
        assert_eq!(a.alphabet().iter().copied().collect::<Vec<_>>(), vec!['a', 'b']);

        for s in ["a", "bbbbaba", "aa", "ba"] {
            assert!(a.accepts(s), "{s:?} should be accepted");
        }

        for s in ["", "abbab", "b", "ab", "c"] {
            assert!(!a.accepts(s), "{s:?} should be rejected");
        }
    }

    #[test]
    fn test_compile_without_epsilons() {
        let raw = compile("a(b+ε)c*").unwrap();
        let a = compile_without_epsilons("a(b+ε)c*").unwrap();
        assert!(!a.has_epsilon_transitions());
        assert!(a.num_states() <= raw.num_states());

        for s in ["", "a", "ab", "ac", "abccc", "acc", "abb", "ba", "abcb"] {
            assert_eq!(raw.accepts(s), a.accepts(s), "mismatch on {s:?}");
        }
    }

    #[test]
    fn test_compile_empty() {
        let a = compile("").unwrap();
        assert!(a.accepts(""));
        assert!(!a.accepts("a"));
        assert!(a.alphabet().is_empty());
    }

    #[test]
    fn test_epsilon_literals() {
        assert!(is_epsilon_literal('ε'));
        assert!(is_epsilon_literal('λ'));
        assert!(!is_epsilon_literal('e'));

        for expression in ["ε", "λ", "(ε)*", "ε.λ"] {
            let a = compile(expression).unwrap();
            assert!(a.accepts(""), "{expression:?}");
            assert!(a.alphabet().is_empty(), "{expression:?}");
        }
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Symbol('x').to_string(), "x");
        assert_eq!(Token::Epsilon.to_string(), "ε");
        assert_eq!(Token::Star.arity(), 1);
        assert_eq!(Token::Concat.arity(), 2);
        assert_eq!(Token::Symbol('x').arity(), 0);
    }

    #[test]
    fn test_compile_error() {
        let e = compile("(ab").unwrap_err();
        assert!(matches!(e, AutomatonError::UnterminatedExpression(_, 0, _)));
    }
}
