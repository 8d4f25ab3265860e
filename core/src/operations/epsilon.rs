use {
    crate::{automaton::Automaton, state_set::StateLabel},
    log::debug,
    std::collections::BTreeSet,
};

/// Returns an equivalent automaton without epsilon transitions, over the same states and alphabet.
///
/// Each state `s` gets a transition on symbol `c` to every state reachable from the epsilon closure of
/// `s` by `c` (and closed again). A state becomes final when its epsilon closure contains a final
/// state. The result may still be nondeterministic, and states that were only reachable through
/// epsilon moves may become unreachable; see [super::remove_unreachable].
pub fn remove_epsilons<S: StateLabel>(a: &Automaton<S>) -> Automaton<S> {
    if !a.has_epsilon_transitions() {
        return a.clone();
    }

    let mut result = Automaton::with_alphabet(a.initial_state().clone(), a.alphabet().iter().copied());

    for state in a.states() {
        result.add_state(state.clone());

        let mut single = BTreeSet::new();
        single.insert(state.clone());
        let closure = a.epsilon_closure(&single);

        if closure.iter().any(|s| a.is_final(s)) {
            result.set_final(state.clone(), true);
        }

        for &symbol in a.alphabet() {
            for dest in a.move_on_symbol(&closure, symbol) {
                result.add_transition(state.clone(), Some(symbol), dest);
            }
        }
    }

    debug!("Removed epsilon transitions: {} -> {} transitions", a.num_transitions(), result.num_transitions());
    result
}
