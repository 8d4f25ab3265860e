use {
    crate::{
        automaton::Automaton,
        error::AutomatonError,
        state_set::{StateLabel, StateSet},
    },
    log::{debug, trace},
    std::collections::{BTreeSet, VecDeque},
};

/// Default maximum effort that [determinize_with_limit] should spend before giving up and returning
/// [AutomatonError::TooComplexToDeterminize].
pub const DEFAULT_DETERMINIZE_WORK_LIMIT: usize = 10000;

/// Determinizes the given automaton using the subset (powerset) construction.
///
/// The result is deterministic, has no epsilon transitions and uses the same alphabet as `a`. Each of
/// its states is labeled by the set of states of `a` it stands for, so the labeling depends only on
/// the sets and not on the order in which they were discovered. Moves that lead nowhere go to a single
/// shared dead state, labeled by the empty set, which loops to itself on every symbol. The transition
/// function of the result is therefore total.
///
/// Worst case complexity: exponential in number of states.
pub fn determinize<S: StateLabel>(a: &Automaton<S>) -> Automaton<StateSet<S>> {
    let mut construction = SubsetConstruction::new(a);
    while construction.process_next().is_some() {}
    construction.finish()
}

/// Determinizes the given automaton, giving up once the construction has spent too much effort.
///
/// # Parameters
/// * `work_limit` Maximum amount of "work" that the powerset construction will spend before returning
///   [AutomatonError::TooComplexToDeterminize]. The effort is the total size of the state sets
///   processed so far, and the construction stops once it reaches ten times `work_limit`. Use
///   [DEFAULT_DETERMINIZE_WORK_LIMIT] as a decent default if you don't otherwise know what to specify.
///
/// # Errors
/// [AutomatonError::TooComplexToDeterminize] if determinizing requires more than `work_limit` "effort".
pub fn determinize_with_limit<S: StateLabel>(
    a: &Automaton<S>,
    work_limit: usize,
) -> Result<Automaton<StateSet<S>>, AutomatonError> {
    // Approximate conversion from a limit on the number of states to a limit on the effort.
    let effort_limit = work_limit.saturating_mul(10);
    let mut effort_spent = 0;
    let mut construction = SubsetConstruction::new(a);

    while let Some(work) = construction.process_next() {
        effort_spent += work;

        if effort_spent >= effort_limit {
            debug!("Giving up determinization after {effort_spent} work units (limit {effort_limit})");
            return Err(AutomatonError::TooComplexToDeterminize(work_limit));
        }
    }

    Ok(construction.finish())
}

/// State of an in-progress subset construction.
struct SubsetConstruction<'a, S> {
    nfa: &'a Automaton<S>,
    dfa: Automaton<StateSet<S>>,

    /// Discovered state sets whose outgoing transitions have not been computed yet.
    worklist: VecDeque<StateSet<S>>,

    has_dead_state: bool,
}

impl<'a, S: StateLabel> SubsetConstruction<'a, S> {
    fn new(nfa: &'a Automaton<S>) -> Self {
        let mut start = BTreeSet::new();
        start.insert(nfa.initial_state().clone());
        let initial = StateSet::new(nfa.epsilon_closure(&start));

        let mut dfa = Automaton::with_alphabet(initial.clone(), nfa.alphabet().iter().copied());
        if initial.iter().any(|state| nfa.is_final(state)) {
            dfa.set_final(initial.clone(), true);
        }

        trace!("Initial state set {initial}");
        let mut worklist = VecDeque::new();
        worklist.push_back(initial);

        Self {
            nfa,
            dfa,
            worklist,
            has_dead_state: false,
        }
    }

    /// Computes the outgoing transitions of the next discovered state set. Returns the size of that set,
    /// or `None` once every discovered set has been processed.
    fn process_next(&mut self) -> Option<usize> {
        let nfa = self.nfa;
        let current = self.worklist.pop_front()?;

        // Discovered sets are already epsilon-closed, and so is the result of a move.
        let source = current.as_set();

        for &symbol in nfa.alphabet() {
            let reached = nfa.move_on_symbol(source, symbol);

            let target = if reached.is_empty() {
                self.dead_state()
            } else {
                let target = StateSet::new(reached);

                if self.dfa.add_state(target.clone()) {
                    if target.iter().any(|state| nfa.is_final(state)) {
                        self.dfa.set_final(target.clone(), true);
                    }

                    trace!("Discovered state set {target} from {current} on {symbol:?}");
                    self.worklist.push_back(target.clone());
                }

                target
            };

            self.dfa.add_transition(current.clone(), Some(symbol), target);
        }

        Some(current.len())
    }

    /// Returns the label of the dead state, creating the state on first use.
    fn dead_state(&mut self) -> StateSet<S> {
        let dead = StateSet::empty();

        if !self.has_dead_state {
            trace!("Creating dead state");
            self.has_dead_state = true;
            self.dfa.add_state(dead.clone());

            for &symbol in self.nfa.alphabet() {
                self.dfa.add_transition(dead.clone(), Some(symbol), dead.clone());
            }
        }

        dead
    }

    fn finish(self) -> Automaton<StateSet<S>> {
        debug!(
            "Subset construction turned {} states into {} states (dead state: {})",
            self.nfa.num_states(),
            self.dfa.num_states(),
            self.has_dead_state
        );
        self.dfa
    }
}
