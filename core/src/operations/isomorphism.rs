use {
    crate::{automaton::Automaton, error::AutomatonError, state_set::StateLabel},
    log::{error, trace},
    std::collections::{BTreeMap, VecDeque},
};

/// Looks for a structure-preserving bijection between the reachable parts of two deterministic
/// automata.
///
/// The mapping pairs the initial states, and then every pair of states reached on the same symbol.
/// Two automata are isomorphic when they have the same alphabet, paired states agree on finality,
/// and each pair either has a transition on a symbol in both automata (to states that are paired
/// with each other) or in neither. Unreachable states are ignored.
///
/// Returns the mapping from states of `a` to states of `b`, or `None` if the automata are not
/// isomorphic.
///
/// # Errors
/// [AutomatonError::NotDeterministic] if either automaton is not deterministic.
pub fn find_isomorphism<S: StateLabel, T: StateLabel>(
    a: &Automaton<S>,
    b: &Automaton<T>,
) -> Result<Option<BTreeMap<S, T>>, AutomatonError> {
    for check in [a.check_deterministic(), b.check_deterministic()] {
        if let Err(e) = check {
            error!("Isomorphism is only defined for deterministic automata: {e}");
            return Err(e);
        }
    }

    if a.alphabet() != b.alphabet() {
        trace!("Alphabets differ: {:?} vs {:?}", a.alphabet(), b.alphabet());
        return Ok(None);
    }

    let mut forward: BTreeMap<S, T> = BTreeMap::new();
    let mut reverse: BTreeMap<T, S> = BTreeMap::new();
    let mut queue: VecDeque<(&S, &T)> = VecDeque::new();

    forward.insert(a.initial_state().clone(), b.initial_state().clone());
    reverse.insert(b.initial_state().clone(), a.initial_state().clone());
    queue.push_back((a.initial_state(), b.initial_state()));

    while let Some((p, q)) = queue.pop_front() {
        if a.is_final(p) != b.is_final(q) {
            trace!("{p:?} and {q:?} disagree on finality");
            return Ok(None);
        }

        for &symbol in a.alphabet() {
            match (a.target(p, symbol), b.target(q, symbol)) {
                (None, None) => (),
                (Some(p_dest), Some(q_dest)) => match (forward.get(p_dest), reverse.get(q_dest)) {
                    (None, None) => {
                        forward.insert(p_dest.clone(), q_dest.clone());
                        reverse.insert(q_dest.clone(), p_dest.clone());
                        queue.push_back((p_dest, q_dest));
                    }
                    (Some(mapped_q), Some(mapped_p)) if mapped_q == q_dest && mapped_p == p_dest => (),
                    _ => {
                        trace!("{p_dest:?} and {q_dest:?} are already paired differently");
                        return Ok(None);
                    }
                },
                _ => {
                    trace!("{p:?} and {q:?} disagree on whether {symbol:?} is defined");
                    return Ok(None);
                }
            }
        }
    }

    Ok(Some(forward))
}

/// Returns true if the reachable parts of the two deterministic automata are isomorphic.
///
/// # Errors
/// [AutomatonError::NotDeterministic] if either automaton is not deterministic.
pub fn are_isomorphic<S: StateLabel, T: StateLabel>(
    a: &Automaton<S>,
    b: &Automaton<T>,
) -> Result<bool, AutomatonError> {
    Ok(find_isomorphism(a, b)?.is_some())
}

#[cfg(test)]
mod tests {
    use {super::*, crate::symbol::EPSILON, pretty_assertions::assert_eq, test_log::test};

    fn cycle<S: StateLabel>(names: [S; 3]) -> Automaton<S> {
        let mut a = Automaton::with_alphabet(names[0].clone(), ['a']);
        a.add_transition(names[0].clone(), Some('a'), names[1].clone());
        a.add_transition(names[1].clone(), Some('a'), names[2].clone());
        a.add_transition(names[2].clone(), Some('a'), names[0].clone());
        a.set_final(names[2].clone(), true);
        a
    }

    #[test]
    fn test_renamed_automata() {
        let a = cycle([0, 1, 2]);
        let b = cycle(["x", "y", "z"]);

        let mapping = find_isomorphism(&a, &b).unwrap().unwrap();
        assert_eq!(mapping.into_iter().collect::<Vec<_>>(), vec![(0, "x"), (1, "y"), (2, "z")]);
        assert!(are_isomorphic(&b, &a).unwrap());
    }

    #[test]
    fn test_ignores_unreachable() {
        let a = cycle([0, 1, 2]);
        let mut b = cycle([10, 11, 12]);
        b.add_transition(13, Some('a'), 10);
        b.set_final(13, true);
        assert!(are_isomorphic(&a, &b).unwrap());
    }

    #[test]
    fn test_differences() {
        let a = cycle([0, 1, 2]);

        let mut finals = cycle([0, 1, 2]);
        finals.set_final(1, true);
        assert_eq!(find_isomorphism(&a, &finals), Ok(None));

        let mut alphabet = cycle([0, 1, 2]);
        alphabet.add_symbol('b');
        assert_eq!(find_isomorphism(&a, &alphabet), Ok(None));

        // Same shape, but the last edge closes on the middle state.
        let mut shape = Automaton::with_alphabet(0, ['a']);
        shape.add_transition(0, Some('a'), 1);
        shape.add_transition(1, Some('a'), 2);
        shape.add_transition(2, Some('a'), 1);
        shape.set_final(2, true);
        assert_eq!(find_isomorphism(&a, &shape), Ok(None));

        let mut partial = Automaton::with_alphabet(0, ['a']);
        partial.add_transition(0, Some('a'), 1);
        partial.add_transition(1, Some('a'), 2);
        partial.set_final(2, true);
        assert_eq!(find_isomorphism(&a, &partial), Ok(None));
    }

    #[test]
    fn test_nondeterministic_input() {
        let a = cycle([0, 1, 2]);
        let mut b = cycle([0, 1, 2]);
        b.add_transition(0, EPSILON, 2);
        assert!(matches!(find_isomorphism(&a, &b), Err(AutomatonError::NotDeterministic(_))));
    }
}
