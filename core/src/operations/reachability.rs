use {
    crate::{automaton::Automaton, state_set::StateLabel},
    log::debug,
    std::collections::{BTreeSet, VecDeque},
};

/// Returns the states reachable from the initial state, following transitions on any label (epsilon
/// included).
pub fn reachable_states<S: StateLabel>(a: &Automaton<S>) -> BTreeSet<S> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited.insert(a.initial_state().clone());
    queue.push_back(a.initial_state());

    while let Some(state) = queue.pop_front() {
        for label in a.labels_from(state) {
            if let Some(dests) = a.targets(state, label) {
                for dest in dests {
                    if visited.insert(dest.clone()) {
                        queue.push_back(dest);
                    }
                }
            }
        }
    }

    visited
}

/// Returns a copy of the automaton restricted to the states reachable from its initial state.
///
/// The alphabet is kept as is, even if some symbols no longer label any transition.
pub fn remove_unreachable<S: StateLabel>(a: &Automaton<S>) -> Automaton<S> {
    let reachable = reachable_states(a);
    let mut result = Automaton::with_alphabet(a.initial_state().clone(), a.alphabet().iter().copied());

    for state in &reachable {
        result.add_state(state.clone());
        if a.is_final(state) {
            result.set_final(state.clone(), true);
        }
    }

    // Every destination of a reachable state is itself reachable.
    for (source, label, dest) in a.transitions() {
        if reachable.contains(source) {
            result.add_transition(source.clone(), label, dest.clone());
        }
    }

    if reachable.len() < a.num_states() {
        debug!("Removed {} unreachable states", a.num_states() - reachable.len());
    }

    result
}

/// Returns true if the automaton accepts no string at all: no final state is reachable.
pub fn is_empty<S: StateLabel>(a: &Automaton<S>) -> bool {
    reachable_states(a).iter().all(|state| !a.is_final(state))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{automata, symbol::EPSILON},
        pretty_assertions::assert_eq,
        test_log::test,
    };

    #[test]
    fn test_remove_unreachable() {
        // q0 -a-> q1 -ε-> q2 (final); q3 -a-> q0 and q3 final are unreachable.
        let mut a = Automaton::with_alphabet("q0", ['a', 'b']);
        a.add_transition("q0", Some('a'), "q1");
        a.add_transition("q1", EPSILON, "q2");
        a.add_transition("q3", Some('a'), "q0");
        a.set_final("q2", true);
        a.set_final("q3", true);

        let r = remove_unreachable(&a);
        assert_eq!(r.states().iter().copied().collect::<Vec<_>>(), vec!["q0", "q1", "q2"]);
        assert_eq!(r.final_states().iter().copied().collect::<Vec<_>>(), vec!["q2"]);
        assert_eq!(r.num_transitions(), 2);
        assert_eq!(r.alphabet(), a.alphabet());
        assert!(r.accepts("a"));

        assert_eq!(remove_unreachable(&r), r);
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&automata::make_empty()));
        assert!(!is_empty(&automata::make_empty_string()));
        assert!(!is_empty(&automata::make_string("abc")));

        // The only final state cannot be reached.
        let mut a = Automaton::new(0);
        a.add_transition(0, Some('a'), 1);
        a.add_transition(2, Some('a'), 3);
        a.set_final(3, true);
        assert!(is_empty(&a));
    }
}
