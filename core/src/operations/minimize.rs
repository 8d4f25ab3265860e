use {
    super::remove_unreachable,
    crate::{
        automaton::Automaton,
        error::AutomatonError,
        state_set::{StateLabel, StateSet},
        symbol::Symbol,
    },
    log::{debug, error, trace},
    std::collections::{BTreeMap, BTreeSet},
};

/// Minimizes the given deterministic automaton using Moore's partition refinement.
///
/// Unreachable states are dropped first. Missing transitions behave as if they led to an implicit,
/// non-final dead state. Each state of the result stands for one equivalence class and is labeled by
/// the set of original states in that class. There is a transition `[p] -c-> [q]` iff `p -c-> q`, a
/// class is final iff its members are, and the initial state is the class of the original initial
/// state.
///
/// An automaton with no reachable final state minimizes to a single non-final state looping to itself
/// on every symbol.
///
/// # Errors
/// [AutomatonError::NotDeterministic] if `a` has epsilon transitions or several destinations for the same
/// state and symbol.
pub fn minimize<S: StateLabel>(a: &Automaton<S>) -> Result<Automaton<StateSet<S>>, AutomatonError> {
    if let Err(e) = a.check_deterministic() {
        error!("Cannot minimize a nondeterministic automaton: {e}");
        return Err(e);
    }

    let a = remove_unreachable(a);
    let states: Vec<&S> = a.states().iter().collect();
    let index: BTreeMap<&S, usize> = states.iter().enumerate().map(|(i, state)| (*state, i)).collect();
    let alphabet: Vec<Symbol> = a.alphabet().iter().copied().collect();

    let n = states.len();
    let dead = n;

    let mut delta: Vec<Vec<usize>> = states
        .iter()
        .map(|state| alphabet.iter().map(|&symbol| a.target(state, symbol).map_or(dead, |dest| index[dest])).collect())
        .collect();

    if delta.iter().any(|row| row.contains(&dead)) {
        delta.push(vec![dead; alphabet.len()]);
    }

    let is_final = |i: usize| i < n && a.is_final(states[i]);
    let (mut class, mut num_classes) = number_classes((0..delta.len()).map(|i| vec![usize::from(is_final(i))]));

    loop {
        let (next, count) = number_classes((0..delta.len()).map(|i| {
            let mut signature = Vec::with_capacity(alphabet.len() + 1);
            signature.push(class[i]);
            signature.extend(delta[i].iter().map(|&dest| class[dest]));
            signature
        }));

        class = next;
        trace!("Refinement round: {num_classes} -> {count} classes");

        // Signatures start with the current class, so each round can only split classes.
        if count == num_classes {
            break;
        }

        num_classes = count;
    }

    // The implicit dead state does not count as a member.
    let mut members: Vec<BTreeSet<S>> = vec![BTreeSet::new(); num_classes];
    let mut representative: Vec<Option<usize>> = vec![None; num_classes];
    for (i, state) in states.iter().enumerate() {
        members[class[i]].insert((*state).clone());
        representative[class[i]].get_or_insert(i);
    }

    let labels: Vec<StateSet<S>> = members.into_iter().map(StateSet::new).collect();
    let initial = labels[class[index[a.initial_state()]]].clone();
    let mut result = Automaton::with_alphabet(initial, alphabet.iter().copied());

    for (c, rep) in representative.iter().enumerate() {
        let Some(rep) = *rep else {
            continue;
        };

        result.add_state(labels[c].clone());
        if is_final(rep) {
            result.set_final(labels[c].clone(), true);
        }

        for (k, &symbol) in alphabet.iter().enumerate() {
            let dest_class = class[delta[rep][k]];
            if representative[dest_class].is_some() {
                result.add_transition(labels[c].clone(), Some(symbol), labels[dest_class].clone());
            }
        }
    }

    debug!("Minimized {} reachable states into {} states", n, result.num_states());
    Ok(result)
}

/// Numbers distinct signatures in order of first appearance. Returns the class of every item and the
/// number of classes.
fn number_classes<I: Iterator<Item = Vec<usize>>>(signatures: I) -> (Vec<usize>, usize) {
    let mut ids: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    let class = signatures
        .map(|signature| {
            let next_id = ids.len();
            *ids.entry(signature).or_insert(next_id)
        })
        .collect();
    (class, ids.len())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{automata, operations::determinize, symbol::EPSILON},
        pretty_assertions::assert_eq,
        test_log::test,
    };

    fn label<const N: usize>(states: [&'static str; N]) -> StateSet<&'static str> {
        states.into_iter().collect()
    }

    #[test]
    fn test_alternating_cycle() {
        // q0 .. q5 in a cycle on both 0 and 1; odd states final.
        let names = ["q0", "q1", "q2", "q3", "q4", "q5"];
        let mut a = Automaton::with_alphabet("q0", ['0', '1']);
        for i in 0..6 {
            a.add_transition(names[i], Some('0'), names[(i + 1) % 6]);
            a.add_transition(names[i], Some('1'), names[(i + 1) % 6]);
            if i % 2 == 1 {
                a.set_final(names[i], true);
            }
        }

        let m = minimize(&a).unwrap();
        assert_eq!(m.num_states(), 2);

        let even = label(["q0", "q2", "q4"]);
        let odd = label(["q1", "q3", "q5"]);
        assert_eq!(m.initial_state(), &even);
        assert!(m.is_final(&odd));
        assert!(!m.is_final(&even));
        assert_eq!(m.target(&even, '0'), Some(&odd));
        assert_eq!(m.target(&odd, '1'), Some(&even));

        for s in ["", "0", "01", "011", "0110", "10101"] {
            assert_eq!(a.accepts(s), m.accepts(s), "mismatch on {s:?}");
        }
    }

    #[test]
    fn test_rejects_nondeterministic() {
        let mut a = Automaton::new(0);
        a.add_transition(0, Some('a'), 1);
        a.add_transition(0, Some('a'), 2);
        assert!(matches!(minimize(&a), Err(AutomatonError::NotDeterministic(_))));

        let mut b = Automaton::new(0);
        b.add_transition(0, EPSILON, 1);
        assert!(matches!(minimize(&b), Err(AutomatonError::NotDeterministic(_))));
    }

    #[test]
    fn test_no_final_states() {
        let mut a = Automaton::with_alphabet(0, ['a', 'b']);
        a.add_transition(0, Some('a'), 1);
        a.add_transition(1, Some('b'), 0);

        let m = minimize(&a).unwrap();
        assert_eq!(m.num_states(), 1);
        assert!(m.final_states().is_empty());

        let only = m.initial_state().clone();
        assert_eq!(only.len(), 2);
        assert_eq!(m.target(&only, 'a'), Some(&only));
        assert_eq!(m.target(&only, 'b'), Some(&only));
        assert!(!m.accepts("ab"));
    }

    #[test]
    fn test_everything_accepted() {
        let mut a = Automaton::with_alphabet(0, ['a', 'b']);
        for (source, dest) in [(0, 1), (1, 2), (2, 0)] {
            a.add_transition(source, Some('a'), dest);
            a.add_transition(source, Some('b'), source);
            a.set_final(source, true);
        }

        let m = minimize(&a).unwrap();
        assert_eq!(m.num_states(), 1);
        let only = m.initial_state().clone();
        assert!(m.is_final(&only));
        assert_eq!(m.num_transitions(), 2);
        assert!(m.accepts("abba"));
    }

    #[test]
    fn test_partial_automaton() {
        // "ab" with every other move undefined; nothing can be merged.
        let a = automata::make_string("ab");
        let m = minimize(&a).unwrap();
        assert_eq!(m.num_states(), 3);
        assert_eq!(m.num_transitions(), 2);
        assert!(m.accepts("ab"));
        assert!(!m.accepts("a"));
        assert!(!m.accepts("abb"));
    }

    #[test]
    fn test_merges_equivalent_states() {
        // Two separate paths for 'a' and 'b' to two separate final states.
        let mut a = Automaton::with_alphabet("s", ['a', 'b']);
        a.add_transition("s", Some('a'), "x");
        a.add_transition("s", Some('b'), "y");
        a.set_final("x", true);
        a.set_final("y", true);
        a.add_transition("z", Some('a'), "s");

        let m = minimize(&a).unwrap();
        assert_eq!(m.num_states(), 2);
        assert!(m.states().contains(&label(["x", "y"])));
        assert!(!m.states().iter().any(|state| state.contains(&"z")));
    }

    #[test]
    fn test_after_determinize() {
        // Strings over {a, b} ending in "ab".
        let mut nfa = Automaton::new(0);
        nfa.add_transition(0, Some('a'), 0);
        nfa.add_transition(0, Some('b'), 0);
        nfa.add_transition(0, Some('a'), 1);
        nfa.add_transition(1, Some('b'), 2);
        nfa.set_final(2, true);

        let dfa = determinize(&nfa);
        let m = minimize(&dfa).unwrap();
        assert_eq!(m.num_states(), 3);

        for s in ["", "a", "ab", "aab", "abb", "bab", "abab", "abba"] {
            assert_eq!(nfa.accepts(s), m.accepts(s), "mismatch on {s:?}");
        }
    }
}
