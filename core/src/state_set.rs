use std::{
    collections::{btree_set, BTreeSet},
    fmt::{Debug, Display, Formatter, Result as FmtResult},
};

/// Trait alias for types usable as automaton state identifiers.
///
/// States are opaque: the algorithms only compare, order and clone them. The ordering is what gives
/// derived automata (determinized and minimized) a canonical, reproducible labeling.
pub trait StateLabel: Clone + Debug + Ord {}
impl<T: Clone + Debug + Ord> StateLabel for T {}

/// An immutable set of states used as the identity of a derived state.
///
/// Determinized states are labeled by the set of original states they stand for; minimized states are
/// labeled by the members of their equivalence class. Two `StateSet`s are equal iff they hold the same
/// members, regardless of the order in which those members were inserted. The empty set labels the
/// dead state produced by subset construction.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateSet<S> {
    values: BTreeSet<S>,
}

impl<S: StateLabel> StateSet<S> {
    /// The empty set.
    pub fn empty() -> Self {
        Self {
            values: BTreeSet::new(),
        }
    }

    /// Freeze a set of states.
    pub fn new(values: BTreeSet<S>) -> Self {
        Self {
            values,
        }
    }

    /// Indicates whether the state is a member of this set.
    pub fn contains(&self, state: &S) -> bool {
        self.values.contains(state)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true for the empty set, the label of the dead state.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, S> {
        self.values.iter()
    }

    /// Borrow the members as a plain set.
    pub fn as_set(&self) -> &BTreeSet<S> {
        &self.values
    }
}

impl<S: StateLabel> From<BTreeSet<S>> for StateSet<S> {
    fn from(values: BTreeSet<S>) -> Self {
        Self::new(values)
    }
}

impl<S: StateLabel> FromIterator<S> for StateSet<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, S> IntoIterator for &'a StateSet<S> {
    type Item = &'a S;
    type IntoIter = btree_set::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<S: Debug> Debug for StateSet<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.values.iter()).finish()
    }
}

impl<S: Debug> Display for StateSet<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.values.is_empty() {
            return write!(f, "Empty");
        }

        write!(f, "{{")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value:?}")?;
        }
        write!(f, "}}")
    }
}
