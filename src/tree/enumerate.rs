use crate::tree::node::{IntoNode, Node};

/// One step of an indexed build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enumerated<K, E> {
    /// Position in the sequence.
    pub i: usize,
    /// The item.
    pub el: E,
    /// Normalized position in `[0, 1]`; `0.5` for a single item.
    pub e: f64,
    /// Number of items.
    pub len: usize,
    /// Mapping key, or the index for plain sequences.
    pub key: K,
}

/// Normalized position of item `i` out of `len`.
pub fn normalized_position(i: usize, len: usize) -> f64 {
    if len <= 1 {
        0.5
    } else {
        i as f64 / (len - 1) as f64
    }
}

fn records<K, E>(items: Vec<(K, E)>) -> impl Iterator<Item = Enumerated<K, E>> {
    let len = items.len();
    items
        .into_iter()
        .enumerate()
        .map(move |(i, (key, el))| Enumerated {
            i,
            el,
            e: normalized_position(i, len),
            len,
            key,
        })
}

impl<T> Node<T> {
    /// Append `builder(record)` for every item of `items`.
    pub fn enumerate<I, R>(self, items: I, builder: impl FnMut(Enumerated<usize, I::Item>) -> R) -> Self
    where
        I: IntoIterator,
        R: IntoNode<T>,
    {
        let items: Vec<_> = items.into_iter().enumerate().collect();
        self.extend(records(items).map(builder))
    }

    /// Like [`Node::enumerate`] over key/value pairs, keeping each key in the record.
    pub fn enumerate_map<K, E, R>(
        self,
        items: impl IntoIterator<Item = (K, E)>,
        builder: impl FnMut(Enumerated<K, E>) -> R,
    ) -> Self
    where
        R: IntoNode<T>,
    {
        let items: Vec<_> = items.into_iter().collect();
        self.extend(records(items).map(builder))
    }

    /// New node built by [`Node::enumerate`].
    pub fn enumerated<I, R>(items: I, builder: impl FnMut(Enumerated<usize, I::Item>) -> R) -> Self
    where
        I: IntoIterator,
        R: IntoNode<T>,
    {
        Self::new().enumerate(items, builder)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/enumerate.rs"]
mod tests;
