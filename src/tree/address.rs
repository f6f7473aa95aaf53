/// Position inside nested children: one index, or one index per level.
///
/// Negative components count from the end of their scope. The empty nested address names the
/// root node itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Address {
    /// Index into the immediate children.
    Flat(isize),
    /// Ordered index sequence, outermost first.
    Nested(Vec<isize>),
}

impl Address {
    /// Address of the root node.
    pub fn root() -> Self {
        Self::Nested(Vec::new())
    }

    pub(crate) fn from_indices(indices: &[usize]) -> Self {
        Self::Nested(indices.iter().map(|&i| i as isize).collect())
    }

    /// Indices, outermost first. A flat address has one.
    pub fn components(&self) -> &[isize] {
        match self {
            Self::Flat(i) => std::slice::from_ref(i),
            Self::Nested(v) => v,
        }
    }

    /// True for the empty address.
    pub fn is_root(&self) -> bool {
        self.components().is_empty()
    }

    /// Number of levels this address descends.
    pub fn depth(&self) -> usize {
        self.components().len()
    }

    /// Innermost index.
    pub fn last(&self) -> Option<isize> {
        self.components().last().copied()
    }

    /// Address of the enclosing scope; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let comps = self.components();
        let (_, init) = comps.split_last()?;
        Some(Self::Nested(init.to_vec()))
    }

    /// Address of child `index` below this one.
    pub fn child(&self, index: isize) -> Self {
        let mut comps = self.components().to_vec();
        comps.push(index);
        Self::Nested(comps)
    }

    /// Underscore-joined components, used as a positional tag.
    pub fn utag(&self) -> Option<String> {
        if self.is_root() {
            return None;
        }
        Some(
            self.components()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("_"),
        )
    }
}

/// Resolve a possibly negative index against a scope of `len` elements.
pub(crate) fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (resolved < len).then_some(resolved)
}

/// Insertion position with list-insert clamping: out-of-range indices land at either end.
pub(crate) fn insert_position(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        (index as usize).min(len)
    }
}

impl From<isize> for Address {
    fn from(value: isize) -> Self {
        Self::Flat(value)
    }
}

impl From<i32> for Address {
    fn from(value: i32) -> Self {
        Self::Flat(value as isize)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self::Flat(value as isize)
    }
}

impl<const N: usize> From<[i32; N]> for Address {
    fn from(value: [i32; N]) -> Self {
        Self::Nested(value.iter().map(|&i| i as isize).collect())
    }
}

impl From<Vec<isize>> for Address {
    fn from(value: Vec<isize>) -> Self {
        Self::Nested(value)
    }
}

impl From<&[isize]> for Address {
    fn from(value: &[isize]) -> Self {
        Self::Nested(value.to_vec())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat(i) => write!(f, "{i}"),
            Self::Nested(v) => write!(f, "{v:?}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/address.rs"]
mod tests;
