use {
    crate::{automaton::Automaton, error::AutomatonError, state_set::StateLabel, symbol::Symbol},
    bitvec::vec::BitVec,
    log::{debug, error},
    std::collections::BTreeMap,
};

/// Size of the direct lookup table for character classes. Characters below this value skip the binary
/// search.
const CLASSMAP_SIZE: usize = 128;

/// Deterministic automaton compiled into a dense transition table for fast repeated matching.
///
/// States are numbered from 0 to `size() - 1`; the initial state is always 0 and the remaining states
/// follow the order of the original state labels. Each symbol of the alphabet is a character class,
/// and the table holds one entry per (state, class) pair.
#[derive(Debug)]
pub struct RunAutomaton<S> {
    size: u32,

    accept: BitVec,

    /// Destination for each (state, class) pair, row-major by state.
    transitions: Vec<Option<u32>>,

    /// The alphabet in ascending order. The class of a symbol is its index.
    symbols: Vec<Symbol>,

    classmap: Vec<Option<u16>>,

    labels: Vec<S>,
}

impl<S: StateLabel> RunAutomaton<S> {
    /// Constructs a new `RunAutomaton` from a deterministic `Automaton`.
    ///
    /// # Errors
    /// [AutomatonError::NotDeterministic] if the given automaton is not deterministic.
    pub fn new(a: &Automaton<S>) -> Result<Self, AutomatonError> {
        if let Err(e) = a.check_deterministic() {
            error!("Cannot compile a nondeterministic automaton into a RunAutomaton: {e}");
            return Err(e);
        }

        let mut labels = Vec::with_capacity(a.num_states());
        labels.push(a.initial_state().clone());
        labels.extend(a.states().iter().filter(|state| *state != a.initial_state()).cloned());

        let numbers: BTreeMap<&S, u32> = labels.iter().enumerate().map(|(n, state)| (state, n as u32)).collect();
        let symbols: Vec<Symbol> = a.alphabet().iter().copied().collect();
        let size = labels.len() as u32;

        let mut transitions = vec![None; labels.len() * symbols.len()];
        let mut accept = bitvec::bitvec!(0; labels.len());

        for (n, state) in labels.iter().enumerate() {
            if a.is_final(state) {
                accept.set(n, true);
            }

            for (c, symbol) in symbols.iter().enumerate() {
                transitions[n * symbols.len() + c] = a.target(state, *symbol).map(|dest| numbers[dest]);
            }
        }

        // Set alphabet table for optimal run performance.
        let mut classmap = vec![None; CLASSMAP_SIZE];
        for (c, symbol) in symbols.iter().enumerate() {
            if (*symbol as usize) < CLASSMAP_SIZE {
                classmap[*symbol as usize] = Some(c as u16);
            }
        }

        debug!("Compiled a transition table of {} states by {} classes", size, symbols.len());

        Ok(Self {
            size,
            accept,
            transitions,
            symbols,
            classmap,
            labels,
        })
    }

    /// Returns number of states in automaton.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the initial state, which is always 0.
    #[inline]
    pub fn initial(&self) -> u32 {
        0
    }

    /// Indicates whether the given state is an accept state.
    pub fn is_accept(&self, state: u32) -> bool {
        self.accept.get(state as usize).map_or(false, |bit| *bit)
    }

    /// Returns the alphabet in ascending order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the label the given state had in the original automaton.
    pub fn label(&self, state: u32) -> Option<&S> {
        self.labels.get(state as usize)
    }

    /// Returns the character class of the given symbol, or `None` if it is not in the alphabet.
    pub fn get_char_class(&self, c: Symbol) -> Option<usize> {
        if (c as usize) < CLASSMAP_SIZE {
            self.classmap[c as usize].map(usize::from)
        } else {
            self.symbols.binary_search(&c).ok()
        }
    }

    /// Returns the state obtained by reading the given char from the given state. Returns `None` if the
    /// transition is undefined or the char is not in the alphabet.
    pub fn step(&self, state: u32, c: Symbol) -> Option<u32> {
        if state >= self.size {
            return None;
        }

        let class = self.get_char_class(c)?;
        self.transitions[state as usize * self.symbols.len() + class]
    }

    /// Returns true if the given string is accepted by this automaton.
    pub fn run(&self, input: &str) -> bool {
        let mut state = self.initial();

        for c in input.chars() {
            match self.step(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.is_accept(state)
    }
}

/// Two run automata are equal when their tables are, whatever the original state labels were.
impl<S, T> PartialEq<RunAutomaton<T>> for RunAutomaton<S> {
    fn eq(&self, other: &RunAutomaton<T>) -> bool {
        self.size == other.size
            && self.symbols == other.symbols
            && self.accept == other.accept
            && self.transitions == other.transitions
    }
}

impl<S> Eq for RunAutomaton<S> {}
