use {
    crate::{
        error::AutomatonError,
        state_set::StateLabel,
        symbol::{Label, Symbol, EPSILON},
    },
    log::error,
    std::collections::{BTreeMap, BTreeSet},
};

/// Represents a finite automaton, possibly nondeterministic and possibly with epsilon transitions.
///
/// An automaton has a single initial state, a set of states, an alphabet, a transition relation mapping
/// each (state, label) pair to a set of destination states, and a set of final (accepting) states. The
/// label of a transition is either a symbol of the alphabet or [EPSILON].
///
/// The following invariants always hold:
/// * the initial state is a member of the state set;
/// * every state mentioned by a transition is a member of the state set;
/// * every final state is a member of the state set;
/// * every non-epsilon transition symbol is a member of the alphabet.
///
/// [Automaton::from_parts] validates a complete description against those invariants. The incremental
/// methods ([Automaton::add_transition], [Automaton::set_final], ...) keep them by registering any state or
/// symbol they have not seen before, so construction algorithms can grow an automaton without
/// declaring its states up front. [Automaton::try_add_transition] is the strict variant that refuses
/// unknown states and symbols instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Automaton<S> {
    initial_state: S,
    states: BTreeSet<S>,
    alphabet: BTreeSet<Symbol>,
    /// source -> label -> destinations. Epsilon transitions use the `None` label.
    transitions: BTreeMap<S, BTreeMap<Label, BTreeSet<S>>>,
    final_states: BTreeSet<S>,
}

impl<S: StateLabel> Automaton<S> {
    /// Create an automaton holding only its (non-final) initial state and an empty alphabet.
    pub fn new(initial_state: S) -> Self {
        let mut states = BTreeSet::new();
        states.insert(initial_state.clone());

        Self {
            initial_state,
            states,
            alphabet: BTreeSet::new(),
            transitions: BTreeMap::new(),
            final_states: BTreeSet::new(),
        }
    }

    /// Create an automaton holding only its (non-final) initial state over the given alphabet.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(initial_state: S, alphabet: I) -> Self {
        let mut result = Self::new(initial_state);
        result.alphabet.extend(alphabet);
        result
    }

    /// Build an automaton from a complete description, checking every structural invariant.
    ///
    /// # Errors
    /// [AutomatonError::MalformedAutomaton] if the initial state or a final state is not in `states`,
    /// if a transition references a state not in `states`, or if a transition symbol is not in
    /// `alphabet`.
    pub fn from_parts<I1, I2, I3, I4>(
        initial_state: S,
        states: I1,
        alphabet: I2,
        transitions: I3,
        final_states: I4,
    ) -> Result<Self, AutomatonError>
    where
        I1: IntoIterator<Item = S>,
        I2: IntoIterator<Item = Symbol>,
        I3: IntoIterator<Item = (S, Label, S)>,
        I4: IntoIterator<Item = S>,
    {
        let states: BTreeSet<S> = states.into_iter().collect();

        if !states.contains(&initial_state) {
            error!("Initial state {initial_state:?} is not a member of the state set");
            return Err(AutomatonError::MalformedAutomaton(format!(
                "initial state {initial_state:?} is not a member of the state set"
            )));
        }

        let mut result = Self {
            initial_state,
            states,
            alphabet: alphabet.into_iter().collect(),
            transitions: BTreeMap::new(),
            final_states: BTreeSet::new(),
        };

        for state in final_states {
            if !result.states.contains(&state) {
                error!("Final state {state:?} is not a member of the state set");
                return Err(AutomatonError::MalformedAutomaton(format!(
                    "final state {state:?} is not a member of the state set"
                )));
            }

            result.final_states.insert(state);
        }

        for (source, label, dest) in transitions {
            if let Err(e) = result.try_add_transition(source, label, dest) {
                error!("{e}");
                return Err(e);
            }
        }

        Ok(result)
    }

    /// The initial state.
    #[inline]
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// All states, in ascending order.
    #[inline]
    pub fn states(&self) -> &BTreeSet<S> {
        &self.states
    }

    /// The input symbols, in ascending order. Never contains [EPSILON].
    #[inline]
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// The final (accepting) states.
    #[inline]
    pub fn final_states(&self) -> &BTreeSet<S> {
        &self.final_states
    }

    /// Returns true if this state is a final (accepting) state.
    pub fn is_final(&self, state: &S) -> bool {
        self.final_states.contains(state)
    }

    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of (source, label, destination) triples in the transition relation.
    pub fn num_transitions(&self) -> usize {
        self.transitions.values().flat_map(|by_label| by_label.values()).map(|dests| dests.len()).sum()
    }

    /// Add a state. Returns true if the state was not already present.
    pub fn add_state(&mut self, state: S) -> bool {
        self.states.insert(state)
    }

    /// Add a symbol to the alphabet. Returns true if the symbol was not already present.
    pub fn add_symbol(&mut self, symbol: Symbol) -> bool {
        self.alphabet.insert(symbol)
    }

    /// Set or clear this state as a final state, adding it to the state set if needed.
    pub fn set_final(&mut self, state: S, accept: bool) {
        if accept {
            self.final_states.insert(state.clone());
        } else {
            self.final_states.remove(&state);
        }

        self.states.insert(state);
    }

    /// Add a transition from `source` to `dest` on the given label ([EPSILON] for a lambda move).
    ///
    /// This is the permissive insertion used while an automaton is being assembled: unknown states and
    /// symbols are registered rather than rejected. Adding a transition that already exists is a no-op.
    ///
    /// Returns true if the transition was not already present.
    pub fn add_transition(&mut self, source: S, label: Label, dest: S) -> bool {
        if let Some(symbol) = label {
            self.alphabet.insert(symbol);
        }

        self.states.insert(source.clone());
        self.states.insert(dest.clone());
        self.transitions.entry(source).or_default().entry(label).or_default().insert(dest)
    }

    /// Add an epsilon transition from `source` to `dest`.
    #[inline]
    pub fn add_epsilon_transition(&mut self, source: S, dest: S) -> bool {
        self.add_transition(source, EPSILON, dest)
    }

    /// Strict variant of [Automaton::add_transition]: both states must already be members of the state
    /// set and the label must be [EPSILON] or a member of the alphabet. Nothing is modified on failure.
    ///
    /// Returns true if the transition was not already present.
    ///
    /// # Errors
    /// [AutomatonError::MalformedAutomaton] if a state or the symbol is unknown.
    pub fn try_add_transition(&mut self, source: S, label: Label, dest: S) -> Result<bool, AutomatonError> {
        if !self.states.contains(&source) {
            return Err(AutomatonError::MalformedAutomaton(format!(
                "transition source {source:?} is not a member of the state set"
            )));
        }

        if !self.states.contains(&dest) {
            return Err(AutomatonError::MalformedAutomaton(format!(
                "transition destination {dest:?} is not a member of the state set"
            )));
        }

        if let Some(symbol) = label {
            if !self.alphabet.contains(&symbol) {
                return Err(AutomatonError::MalformedAutomaton(format!(
                    "transition symbol {symbol:?} is not a member of the alphabet"
                )));
            }
        }

        Ok(self.add_transition(source, label, dest))
    }

    /// Returns the destinations of the transitions leaving `state` with the given label, if any.
    pub fn targets(&self, state: &S, label: Label) -> Option<&BTreeSet<S>> {
        self.transitions.get(state).and_then(|by_label| by_label.get(&label))
    }

    /// Returns the destination reached from `state` on `symbol` in a deterministic automaton.
    ///
    /// If the automaton is not deterministic, the smallest destination is returned.
    pub fn target(&self, state: &S, symbol: Symbol) -> Option<&S> {
        self.targets(state, Some(symbol)).and_then(|dests| dests.iter().next())
    }

    /// Iterate over all transitions as (source, label, destination) triples, ordered by source, then
    /// label (epsilon first), then destination.
    pub fn transitions(&self) -> impl Iterator<Item = (&S, Label, &S)> + '_ {
        self.transitions.iter().flat_map(|(source, by_label)| {
            by_label.iter().flat_map(move |(label, dests)| dests.iter().map(move |dest| (source, *label, dest)))
        })
    }

    /// Returns the labels of the transitions leaving `state`.
    pub fn labels_from(&self, state: &S) -> impl Iterator<Item = Label> + '_ {
        self.transitions.get(state).into_iter().flat_map(|by_label| by_label.keys().copied())
    }

    /// Returns true if any transition is labeled with [EPSILON].
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.values().any(|by_label| by_label.contains_key(&EPSILON))
    }

    /// Compute the epsilon closure of a set of states: the smallest superset closed under epsilon
    /// transitions. Cycles of epsilon transitions are handled by the visited set.
    pub fn epsilon_closure(&self, states: &BTreeSet<S>) -> BTreeSet<S> {
        let mut closure = states.clone();
        let mut stack: Vec<&S> = states.iter().collect();

        while let Some(state) = stack.pop() {
            if let Some(dests) = self.targets(state, EPSILON) {
                for dest in dests {
                    if closure.insert(dest.clone()) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// Get the states reachable from a set of states on the given symbol: the union over `s ∈ states`
    /// of the epsilon closure of `δ(s, symbol)`.
    ///
    /// Only the result is closed; `states` is used as given.
    pub fn move_on_symbol(&self, states: &BTreeSet<S>, symbol: Symbol) -> BTreeSet<S> {
        let mut reached = BTreeSet::new();

        for state in states {
            if let Some(dests) = self.targets(state, Some(symbol)) {
                reached.extend(dests.iter().cloned());
            }
        }

        self.epsilon_closure(&reached)
    }

    /// Returns true if the automaton accepts the given string.
    ///
    /// A character outside the alphabet rejects the string.
    pub fn accepts(&self, input: &str) -> bool {
        self.accepts_symbols(input.chars())
    }

    /// Returns true if the automaton accepts the given sequence of symbols.
    pub fn accepts_symbols<I: IntoIterator<Item = Symbol>>(&self, input: I) -> bool {
        let mut initial = BTreeSet::new();
        initial.insert(self.initial_state.clone());
        let mut current = self.epsilon_closure(&initial);

        for symbol in input {
            if !self.alphabet.contains(&symbol) {
                return false;
            }

            current = self.move_on_symbol(&current, symbol);
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.final_states.contains(state))
    }

    /// Returns true if the automaton has no epsilon transitions and at most one destination for every
    /// (state, symbol) pair.
    pub fn is_deterministic(&self) -> bool {
        self.check_deterministic().is_ok()
    }

    /// Like [Automaton::is_deterministic], but reports the first offending transition.
    ///
    /// # Errors
    /// [AutomatonError::NotDeterministic] naming the state and label that break determinism.
    pub fn check_deterministic(&self) -> Result<(), AutomatonError> {
        for (source, by_label) in &self.transitions {
            for (label, dests) in by_label {
                match label {
                    None if !dests.is_empty() => {
                        return Err(AutomatonError::NotDeterministic(format!(
                            "state {source:?} has an epsilon transition"
                        )));
                    }
                    Some(symbol) if dests.len() > 1 => {
                        return Err(AutomatonError::NotDeterministic(format!(
                            "state {source:?} has {} transitions on symbol {symbol:?}",
                            dests.len()
                        )));
                    }
                    _ => (),
                }
            }
        }

        Ok(())
    }
}

impl Automaton<u32> {
    /// Returns a state number not used by this automaton: one past the largest state, or the smallest
    /// unused number once the largest state is `u32::MAX`.
    pub fn next_state_id(&self) -> u32 {
        self.fresh_state_ids(1).into_iter().next().unwrap_or(u32::MAX)
    }

    /// Returns `count` distinct state numbers not used by this automaton, in ascending order. The
    /// numbers follow the largest state when they fit below `u32::MAX`, and fill the gaps between the
    /// existing states otherwise.
    fn fresh_state_ids(&self, count: usize) -> Vec<u32> {
        let start = self.states.last().map_or(0, |last| u64::from(*last) + 1);
        let end = start + count as u64;

        if end <= u64::from(u32::MAX) + 1 {
            return (start..end).map(|id| id as u32).collect();
        }

        (0..=u32::MAX).filter(|id| !self.states.contains(id)).take(count).collect()
    }

    /// Copies over all states, symbols and transitions from `other`, giving its states fresh numbers
    /// that do not clash with the states of this automaton. Returns the mapping from the states of
    /// `other` to their copies.
    ///
    /// The final states of `other` are not carried over; the caller decides which of the copied states
    /// accept.
    pub fn copy_states(&mut self, other: &Automaton<u32>) -> BTreeMap<u32, u32> {
        let ids = self.fresh_state_ids(other.num_states());
        let copies: BTreeMap<u32, u32> = other.states.iter().copied().zip(ids).collect();

        self.alphabet.extend(other.alphabet.iter().copied());
        self.states.extend(copies.values().copied());

        for (source, label, dest) in other.transitions() {
            self.add_transition(copies[source], label, copies[dest]);
        }

        copies
    }
}
