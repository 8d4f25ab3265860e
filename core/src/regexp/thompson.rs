use {
    super::{format_postfix, Token},
    crate::{automata, automaton::Automaton, error::AutomatonError},
    log::{debug, error},
};

/// Evaluates postfix tokens with a stack of automata using the Thompson construction.
///
/// Every step copies its operands into an automaton of their own, or extends the left operand of a
/// concatenation in place, so the state numbers of the result are unique across the whole construction
/// and operands never share transitions. No tokens at all yield the automaton accepting only the empty
/// string.
///
/// # Errors
/// [AutomatonError::UnterminatedExpression] if an operator is missing operands or operands are left over,
/// i.e. the tokens do not form a single postfix expression. The expression in the error is the
/// postfix string.
pub fn from_postfix(tokens: &[Token]) -> Result<Automaton<u32>, AutomatonError> {
    if tokens.is_empty() {
        return Ok(automata::make_empty_string());
    }

    let mut stack: Vec<Automaton<u32>> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if stack.len() < token.arity() {
            return Err(malformed_postfix(tokens, position, "operator is missing an operand"));
        }

        let result = match token {
            Token::Symbol(c) => automata::make_symbol(*c),
            Token::Epsilon => automata::make_empty_string(),
            Token::Star => {
                let a = pop(&mut stack, tokens, position)?;
                star(&a)
            }
            Token::Union => {
                let b = pop(&mut stack, tokens, position)?;
                let a = pop(&mut stack, tokens, position)?;
                union(&a, &b)
            }
            Token::Concat => {
                let b = pop(&mut stack, tokens, position)?;
                let a = pop(&mut stack, tokens, position)?;
                concatenate(a, &b)
            }
        };

        stack.push(result);
    }

    let result = pop(&mut stack, tokens, tokens.len())?;
    if !stack.is_empty() {
        return Err(malformed_postfix(tokens, tokens.len(), "operands are left over"));
    }

    debug!(
        "Thompson construction built {} states and {} transitions",
        result.num_states(),
        result.num_transitions()
    );
    Ok(result)
}

fn pop(
    stack: &mut Vec<Automaton<u32>>,
    tokens: &[Token],
    position: usize,
) -> Result<Automaton<u32>, AutomatonError> {
    stack.pop().ok_or_else(|| malformed_postfix(tokens, position, "operator is missing an operand"))
}

fn malformed_postfix(tokens: &[Token], position: usize, message: &str) -> AutomatonError {
    let expression = format_postfix(tokens);
    error!("Invalid postfix expression {expression:?} at position {position}: {message}");
    AutomatonError::UnterminatedExpression(expression, position, message.to_string())
}

/// `a*`: a new initial state with epsilon moves to the initial state of `a` and to a new final state;
/// every final state of `a` moves back to the initial state of `a` and on to the new final state.
pub fn star(a: &Automaton<u32>) -> Automaton<u32> {
    let mut result = Automaton::<u32>::new(0);
    let copies = result.copy_states(a);
    let start = copies[a.initial_state()];
    let accept = result.next_state_id();

    result.set_final(accept, true);
    result.add_epsilon_transition(0, start);
    result.add_epsilon_transition(0, accept);

    for state in a.final_states() {
        result.add_epsilon_transition(copies[state], start);
        result.add_epsilon_transition(copies[state], accept);
    }

    result
}

/// `a+b`: a new initial state with epsilon moves to both operands, whose final states move to a new
/// final state.
pub fn union(a: &Automaton<u32>, b: &Automaton<u32>) -> Automaton<u32> {
    let mut result = Automaton::<u32>::new(0);
    let a_copies = result.copy_states(a);
    let b_copies = result.copy_states(b);
    let accept = result.next_state_id();

    result.set_final(accept, true);
    result.add_epsilon_transition(0, a_copies[a.initial_state()]);
    result.add_epsilon_transition(0, b_copies[b.initial_state()]);

    for state in a.final_states() {
        result.add_epsilon_transition(a_copies[state], accept);
    }

    for state in b.final_states() {
        result.add_epsilon_transition(b_copies[state], accept);
    }

    result
}

/// `ab`: starts at the initial state of `a`; every final state of `a` moves to the initial state of `b`,
/// and the final states of `b` are the final states of the result.
///
/// `a` is extended in place and keeps its state numbers; `b` is copied into it.
pub fn concatenate(mut a: Automaton<u32>, b: &Automaton<u32>) -> Automaton<u32> {
    let a_finals: Vec<u32> = a.final_states().iter().copied().collect();
    for state in &a_finals {
        a.set_final(*state, false);
    }

    let copies = a.copy_states(b);
    let b_start = copies[b.initial_state()];

    for state in a_finals {
        a.add_epsilon_transition(state, b_start);
    }

    for state in b.final_states() {
        a.set_final(copies[state], true);
    }

    a
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{regexp::to_postfix, symbol::EPSILON},
        pretty_assertions::assert_eq,
        std::collections::BTreeSet,
        test_log::test,
    };

    #[test]
    fn test_symbol_fragment() {
        let a = from_postfix(&[Token::Symbol('a')]).unwrap();
        assert_eq!(a, automata::make_symbol('a'));
    }

    #[test]
    fn test_star_fragment() {
        let a = star(&automata::make_symbol('a'));

        // 0 = new initial, 1 -a-> 2 copied, 3 = new final
        assert_eq!(a.num_states(), 4);
        assert_eq!(a.final_states().iter().copied().collect::<Vec<_>>(), vec![3]);
        let expected: BTreeSet<u32> = [1, 3].into_iter().collect();
        assert_eq!(a.targets(&0, EPSILON), Some(&expected));
        assert_eq!(a.targets(&2, EPSILON), Some(&expected));

        for s in ["", "a", "aaaa"] {
            assert!(a.accepts(s));
        }
    }

    #[test]
    fn test_union_fragment() {
        let a = union(&automata::make_symbol('a'), &automata::make_string("bc"));
        assert_eq!(a.num_states(), 7);
        assert_eq!(a.final_states().len(), 1);
        assert!(a.accepts("a"));
        assert!(a.accepts("bc"));
        assert!(!a.accepts("b"));
        assert!(!a.accepts(""));
    }

    #[test]
    fn test_concatenate_fragment() {
        let a = concatenate(automata::make_symbol('a'), &automata::make_symbol('b'));
        assert_eq!(a.num_states(), 4);
        assert!(a.accepts("ab"));
        assert!(!a.accepts("a"));
        assert!(!a.accepts("b"));
        assert!(!a.accepts("ba"));
        assert_eq!(a.final_states().len(), 1);
    }

    #[test]
    fn test_unique_state_numbers() {
        let a = from_postfix(&to_postfix("(a+b)*(c+ε)").unwrap()).unwrap();
        let max = a.states().iter().copied().max().unwrap();
        assert_eq!(max as usize + 1, a.num_states());
    }

    #[test]
    fn test_malformed_postfix() {
        let e = from_postfix(&[Token::Symbol('a'), Token::Union]).unwrap_err();
        assert_eq!(
            e,
            AutomatonError::UnterminatedExpression("a+".to_string(), 1, "operator is missing an operand".to_string())
        );

        let e = from_postfix(&[Token::Symbol('a'), Token::Symbol('b')]).unwrap_err();
        assert!(matches!(e, AutomatonError::UnterminatedExpression(_, 2, _)));
    }

    #[test]
    fn test_empty_postfix() {
        assert_eq!(from_postfix(&[]).unwrap(), automata::make_empty_string());
    }

    #[test]
    fn test_fragments_with_largest_state_number() {
        let mut a = Automaton::<u32>::new(0);
        a.add_transition(0, Some('a'), u32::MAX);
        a.set_final(u32::MAX, true);

        let starred = star(&a);
        assert_eq!(starred.num_states(), 4);
        assert_eq!(starred.final_states().len(), 1);
        for s in ["", "a", "aaa"] {
            assert!(starred.accepts(s), "{s:?}");
        }

        let either = union(&a, &automata::make_symbol('b'));
        assert_eq!(either.num_states(), 6);
        assert!(either.accepts("a"));
        assert!(either.accepts("b"));
        assert!(!either.accepts(""));
        assert!(!either.accepts("ab"));

        let both = concatenate(a.clone(), &automata::make_symbol('b'));
        assert_eq!(both.num_states(), 4);
        assert!(both.states().contains(&u32::MAX));
        assert!(!both.is_final(&u32::MAX));
        assert!(both.accepts("ab"));
        assert!(!both.accepts("a"));
        assert!(!both.accepts("b"));
    }
}
