//! Shape-preserving task collections.
//!
//! [`Batch`] is the closed union over the two shapes a batch can take: an
//! ordered sequence or a keyed mapping. The shape is decided once, when the
//! batch is built, and every transformation in this crate preserves it --
//! a sequence input always yields sequence outputs, and a mapping input
//! always yields mapping outputs with the same keys in the same order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A collection of per-task slots, either positional or keyed.
///
/// `Batch` is generic over the slot type `V`: the same shape carries task
/// futures on the way into a run and per-task errors or results on the way
/// out. Mappings are backed by [`IndexMap`], so a keyed batch has a stable
/// iteration order (insertion order) just like a sequence; every lockstep
/// operation in this crate relies on that shared slot order.
///
/// Serialization is untagged: a sequence serializes as an array and a
/// mapping as an object, so reported outcomes mirror the shape the caller
/// submitted.
///
/// # Examples
///
/// ```
/// use parallel_rollback::Batch;
///
/// let positional = Batch::sequence([1, 2, 3]);
/// assert_eq!(positional.len(), 3);
///
/// let keyed = Batch::mapping([("one", 1), ("two", 2)]);
/// assert!(keyed.is_mapping());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Batch<V> {
    /// Slots addressed by position.
    Sequence(Vec<V>),
    /// Slots addressed by key, kept in insertion order.
    Mapping(IndexMap<String, V>),
}

impl<V> Batch<V> {
    /// Builds a positional batch from anything iterable.
    pub fn sequence(slots: impl IntoIterator<Item = V>) -> Self {
        Self::Sequence(slots.into_iter().collect())
    }

    /// Builds a keyed batch from `(key, value)` pairs, preserving their
    /// order. A repeated key replaces the earlier value, as in [`IndexMap`].
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Number of slots in the batch.
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(slots) => slots.len(),
            Self::Mapping(entries) => entries.len(),
        }
    }

    /// Returns `true` if the batch has no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for the positional shape.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns `true` for the keyed shape.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Iterates the slot values in slot order, ignoring keys.
    pub fn values(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        match self {
            Self::Sequence(slots) => Box::new(slots.iter()),
            Self::Mapping(entries) => Box::new(entries.values()),
        }
    }

    /// Consumes the batch and iterates the slot values in slot order.
    pub fn into_values(self) -> Box<dyn Iterator<Item = V>>
    where
        V: 'static,
    {
        match self {
            Self::Sequence(slots) => Box::new(slots.into_iter()),
            Self::Mapping(entries) => Box::new(entries.into_values()),
        }
    }

    /// Transforms every slot, keeping the shape, order, and keys intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use parallel_rollback::Batch;
    ///
    /// let doubled = Batch::mapping([("a", 1), ("b", 2)]).map(|n| n * 2);
    /// assert_eq!(doubled, Batch::mapping([("a", 2), ("b", 4)]));
    /// ```
    pub fn map<W>(self, mut f: impl FnMut(V) -> W) -> Batch<W> {
        match self {
            Self::Sequence(slots) => Batch::Sequence(slots.into_iter().map(f).collect()),
            Self::Mapping(entries) => Batch::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, f(value)))
                    .collect(),
            ),
        }
    }

    /// Splits every slot into two, producing a pair of batches with the
    /// same shape, order, and keys as the original.
    pub fn unzip<A, B>(self, mut f: impl FnMut(V) -> (A, B)) -> (Batch<A>, Batch<B>) {
        match self {
            Self::Sequence(slots) => {
                let (left, right) = slots.into_iter().map(f).unzip();
                (Batch::Sequence(left), Batch::Sequence(right))
            }
            Self::Mapping(entries) => {
                let mut left = IndexMap::with_capacity(entries.len());
                let mut right = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let (a, b) = f(value);
                    left.insert(key.clone(), a);
                    right.insert(key, b);
                }
                (Batch::Mapping(left), Batch::Mapping(right))
            }
        }
    }
}

impl<V> From<Vec<V>> for Batch<V> {
    fn from(slots: Vec<V>) -> Self {
        Self::Sequence(slots)
    }
}

impl<V, const N: usize> From<[V; N]> for Batch<V> {
    fn from(slots: [V; N]) -> Self {
        Self::Sequence(slots.into())
    }
}

impl<V> From<IndexMap<String, V>> for Batch<V> {
    fn from(entries: IndexMap<String, V>) -> Self {
        Self::Mapping(entries)
    }
}

impl<V> FromIterator<V> for Batch<V> {
    fn from_iter<I: IntoIterator<Item = V>>(slots: I) -> Self {
        Self::sequence(slots)
    }
}

impl<V> FromIterator<(String, V)> for Batch<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(entries: I) -> Self {
        Self::mapping(entries)
    }
}
