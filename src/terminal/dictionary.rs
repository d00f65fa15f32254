//! Keyed lookup built by `to_dictionary*`.

use std::fmt;
use std::rc::Rc;

use crate::error::{SequenceError, SequenceResult};
use crate::sequence::Sequence;

type KeyEquality<K> = Rc<dyn Fn(&K, &K) -> bool>;

/// An insertion-ordered map whose keys are compared with a caller-supplied
/// equality.
///
/// Lookups scan the entries linearly.
pub struct Dictionary<K, V> {
    entries: Vec<(K, V)>,
    key_equality: KeyEquality<K>,
}

impl<K, V> Dictionary<K, V> {
    fn with_equality(key_equality: KeyEquality<K>) -> Self {
        Self {
            entries: Vec::new(),
            key_equality,
        }
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| (self.key_equality)(existing, key))
    }

    fn try_insert(&mut self, key: K, value: V, operation: &'static str) -> SequenceResult<()> {
        if self.position(&key).is_some() {
            return Err(SequenceError::DuplicateKey { operation });
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Returns the value stored under a key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    /// Returns `true` if some stored key equals `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl<K, V> IntoIterator for Dictionary<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<T: 'static> Sequence<T> {
    /// Builds a [`Dictionary`] keyed by `key_selector`, comparing keys with `==`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::DuplicateKey`] if two elements produce equal
    /// keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let people = Sequence::from(vec![("ann", 31), ("bob", 25)]);
    /// let by_name = people.to_dictionary(|(name, _)| *name).unwrap();
    /// assert_eq!(by_name.get(&"bob"), Some(&("bob", 25)));
    ///
    /// let by_age_parity = people.to_dictionary(|(_, age)| age % 2);
    /// assert!(by_age_parity.is_err());
    /// ```
    pub fn to_dictionary<K, F>(&self, key_selector: F) -> SequenceResult<Dictionary<K, T>>
    where
        K: PartialEq + 'static,
        F: Fn(&T) -> K,
    {
        self.to_dictionary_with(key_selector, |element| element, |left: &K, right: &K| {
            left == right
        })
    }

    /// Builds a [`Dictionary`] of projected values, comparing keys with `==`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::DuplicateKey`] if two elements produce equal
    /// keys.
    pub fn to_dictionary_element<K, V, F, G>(
        &self,
        key_selector: F,
        element_selector: G,
    ) -> SequenceResult<Dictionary<K, V>>
    where
        K: PartialEq + 'static,
        F: Fn(&T) -> K,
        G: Fn(T) -> V,
    {
        self.to_dictionary_with(key_selector, element_selector, |left: &K, right: &K| {
            left == right
        })
    }

    /// Builds a [`Dictionary`] of projected values under a custom key
    /// equality, which the dictionary keeps for later lookups.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::DuplicateKey`] if two elements produce keys
    /// that `key_equality` considers equal.
    pub fn to_dictionary_with<K, V, F, G, Q>(
        &self,
        key_selector: F,
        element_selector: G,
        key_equality: Q,
    ) -> SequenceResult<Dictionary<K, V>>
    where
        F: Fn(&T) -> K,
        G: Fn(T) -> V,
        Q: Fn(&K, &K) -> bool + 'static,
    {
        let mut dictionary = Dictionary::with_equality(Rc::new(key_equality));
        for element in self.iter() {
            let key = key_selector(&element);
            dictionary.try_insert(key, element_selector(element), "to_dictionary")?;
        }
        Ok(dictionary)
    }
}
