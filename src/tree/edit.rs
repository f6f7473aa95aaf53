use std::time::Duration;

use crate::{
    foundation::core::Rng64,
    tree::address::{Address, insert_position, resolve_index},
    tree::node::{IntoNode, Node},
    tree::value::Payload,
};

/// What [`Node::split`] does with the element that matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// Drop it.
    #[default]
    Exclude,
    /// Open the following group with it.
    Prepend,
    /// Close the preceding group with it.
    Append,
}

/// Outcome of resolving an address.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Located {
    /// The walk root itself.
    Root,
    /// Child `index` of the node at `scope`.
    Child { scope: Vec<usize>, index: usize },
    /// The node at `node` holds a path; `rest` addresses its contours and points.
    Geometry { node: Vec<usize>, rest: Vec<isize> },
    Missing,
}

impl<T> Node<T> {
    /// Append `element`; `None` is a no-op.
    pub fn append(mut self, element: impl IntoNode<T>) -> Self {
        if let Some(node) = element.into_node() {
            self.children.push(node);
        }
        self
    }

    /// Append whatever `f` builds from the current node.
    pub fn append_with<E: IntoNode<T>>(self, f: impl FnOnce(&Self) -> E) -> Self {
        let element = f(&self);
        self.append(element)
    }

    /// Append each element in order; `None` elements are skipped.
    pub fn extend<I>(self, elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoNode<T>,
    {
        elements.into_iter().fold(self, Node::append)
    }

    /// Append the children of `other`, or `other` itself when it has none.
    pub fn extend_node(self, other: Node<T>) -> Self {
        if other.children.is_empty() {
            self.append(other)
        } else {
            self.extend(other.children)
        }
    }

    /// Insert `element` before the addressed position.
    ///
    /// All but the last component select the scope by child indexing; when one of them does not
    /// lead to a branch, the address is reinterpreted as a flat insert into the immediate
    /// children at the last component.
    pub fn insert(mut self, address: impl Into<Address>, element: impl IntoNode<T>) -> Self {
        let Some(node) = element.into_node() else {
            return self;
        };
        let address = address.into();
        let Some((last, init)) = address.components().split_last() else {
            self.children.push(node);
            return self;
        };
        let scope = match self.branch_path(init) {
            Some(path) => path,
            None => {
                tracing::debug!(%address, "unresolvable scope; inserting at top level");
                Vec::new()
            }
        };
        if let Some(target) = self.at_path_mut(&scope) {
            let at = insert_position(*last, target.children.len());
            target.children.insert(at, node);
        }
        self
    }

    /// Follow `components`, requiring each to land on a branch.
    fn branch_path(&self, components: &[isize]) -> Option<Vec<usize>> {
        let mut node = self;
        let mut path = Vec::with_capacity(components.len());
        for &c in components {
            let i = resolve_index(c, node.children.len())?;
            node = &node.children[i];
            if node.children.is_empty() {
                return None;
            }
            path.push(i);
        }
        Some(path)
    }

    pub(crate) fn locate(&self, address: &Address) -> Located {
        let comps = address.components();
        if comps.is_empty() {
            return Located::Root;
        }
        let mut node = self;
        let mut scope = Vec::new();
        for (k, &c) in comps.iter().enumerate() {
            if node.children.is_empty() && node.value.path().is_some_and(|p| !p.elements().is_empty())
            {
                return Located::Geometry {
                    node: scope,
                    rest: comps[k..].to_vec(),
                };
            }
            let Some(i) = resolve_index(c, node.children.len()) else {
                return Located::Missing;
            };
            if k + 1 == comps.len() {
                return Located::Child { scope, index: i };
            }
            let next = &node.children[i];
            if next.children.is_empty() && next.value.path().is_none_or(|p| p.elements().is_empty())
            {
                tracing::debug!(%address, "address descends into a leaf; reading it as flat");
                return match comps.last() {
                    Some(&last) => self.locate(&Address::Flat(last)),
                    None => Located::Missing,
                };
            }
            scope.push(i);
            node = next;
        }
        Located::Missing
    }

    /// Element at `address`. Geometry inside path leaves is read with
    /// [`Node::point_at`] instead.
    pub fn index(&self, address: impl Into<Address>) -> Option<&Node<T>> {
        match self.locate(&address.into()) {
            Located::Root => Some(self),
            Located::Child { scope, index } => self.at_path(&scope)?.children.get(index),
            Located::Geometry { .. } | Located::Missing => None,
        }
    }

    /// Mutable form of [`Node::index`].
    pub fn get_mut(&mut self, address: impl Into<Address>) -> Option<&mut Node<T>> {
        match self.locate(&address.into()) {
            Located::Root => Some(self),
            Located::Child { scope, index } => self.at_path_mut(&scope)?.children.get_mut(index),
            Located::Geometry { .. } | Located::Missing => None,
        }
    }

    /// Elements at each address, skipping the ones that do not resolve.
    pub fn indices<A: Into<Address>>(&self, addresses: impl IntoIterator<Item = A>) -> Vec<&Node<T>> {
        addresses
            .into_iter()
            .filter_map(|a| self.index(a))
            .collect()
    }

    /// Reverse the order of the immediate children, and of every descendant when `recursive`.
    pub(crate) fn reverse_children(mut self, recursive: bool) -> Self
    where
        T: Payload,
    {
        self.children.reverse();
        if recursive {
            self = self.map(|_, child| child.reverse(true));
        }
        self
    }

    /// Partition the immediate children into groups at every element matching `predicate`.
    ///
    /// Groups are containers of this node's kind and become the new children; the trailing group
    /// is always kept, even when empty.
    pub fn split(mut self, mut predicate: impl FnMut(&Node<T>) -> bool, mode: SplitMode) -> Self {
        let children = std::mem::take(&mut self.children);
        let mut groups = Vec::new();
        let mut current = self.blank_like();
        for child in children {
            if !predicate(&child) {
                current.children.push(child);
                continue;
            }
            match mode {
                SplitMode::Exclude => {
                    groups.push(std::mem::replace(&mut current, self.blank_like()));
                }
                SplitMode::Append => {
                    current.children.push(child);
                    groups.push(std::mem::replace(&mut current, self.blank_like()));
                }
                SplitMode::Prepend => {
                    groups.push(std::mem::replace(&mut current, self.blank_like()));
                    current.children.push(child);
                }
            }
        }
        groups.push(current);
        self.children = groups;
        self
    }

    /// [`Node::split`] at children whose scalar equals `value`.
    pub fn split_value(self, value: &T, mode: SplitMode) -> Self
    where
        T: PartialEq,
    {
        self.split(|child| child.scalar() == Some(value), mode)
    }

    /// Insert `f(gap_index)` between every pair of adjacent children.
    pub fn interpose_with(mut self, mut f: impl FnMut(usize) -> Node<T>) -> Self {
        let children = std::mem::take(&mut self.children);
        let mut out = Vec::with_capacity((children.len() * 2).saturating_sub(1));
        for (i, child) in children.into_iter().enumerate() {
            if i > 0 {
                out.push(f(i - 1));
            }
            out.push(child);
        }
        self.children = out;
        self
    }

    /// Shuffle the immediate children with a generator seeded from `seed`.
    pub fn shuffle(mut self, seed: u64) -> Self {
        Rng64::new(seed).shuffle(&mut self.children);
        self
    }

    /// Drop children and value.
    pub fn delete(mut self) -> Self {
        self.children.clear();
        self.clear_val();
        self
    }

    /// Chain-friendly empty result; same as [`Node::delete`].
    pub fn null(self) -> Self {
        self.delete()
    }

    /// Return the node unchanged.
    pub fn noop(self) -> Self {
        self
    }

    /// Pause the chain; pacing only.
    pub fn sleep(self, duration: Duration) -> Self {
        std::thread::sleep(duration);
        self
    }

    /// Push the current content one level down: the node becomes a branch around it.
    pub fn ups(mut self) -> Self {
        let mut outer = self.blank_like();
        outer.visible = self.visible;
        outer.alpha = self.alpha;
        self.visible = true;
        self.alpha = 1.0;
        outer.children.push(self);
        outer
    }

    /// Apply `if_true` or `if_false` depending on `condition`.
    pub fn cond(
        self,
        condition: bool,
        if_true: impl FnOnce(Self) -> Self,
        if_false: impl FnOnce(Self) -> Self,
    ) -> Self {
        if condition { if_true(self) } else { if_false(self) }
    }

    /// [`Node::cond`] with the condition computed from the node.
    pub fn cond_by(
        self,
        condition: impl FnOnce(&Self) -> bool,
        if_true: impl FnOnce(Self) -> Self,
        if_false: impl FnOnce(Self) -> Self,
    ) -> Self {
        let c = condition(&self);
        self.cond(c, if_true, if_false)
    }

    /// Apply `f` only when `condition` holds.
    pub fn when(self, condition: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if condition { f(self) } else { self }
    }
}

impl<T: Payload> Node<T> {
    /// Replace the addressed element with `f(index, element)`.
    ///
    /// On a path leaf the address edits geometry instead: `Flat(c)` hands contour `c` to `f` as a
    /// path leaf, `Nested([c, p])` hands point `p` of contour `c` as a one-point path leaf.
    pub fn index_with(
        mut self,
        address: impl Into<Address>,
        f: impl FnOnce(usize, Node<T>) -> Node<T>,
    ) -> Self {
        let address = address.into();
        match self.locate(&address) {
            Located::Root => f(0, self),
            Located::Child { scope, index } => {
                if let Some(slot) = self
                    .at_path_mut(&scope)
                    .and_then(|s| s.children.get_mut(index))
                {
                    let taken = std::mem::take(slot);
                    *slot = f(index, taken);
                }
                self
            }
            Located::Geometry { node, rest } => {
                if let Some(target) = self.at_path_mut(&node) {
                    target.edit_geometry(&rest, f);
                }
                self
            }
            Located::Missing => {
                tracing::debug!(%address, "address does not resolve; nothing replaced");
                self
            }
        }
    }

    /// [`Node::index_with`] for each address.
    pub fn indices_with<A: Into<Address>>(
        self,
        addresses: impl IntoIterator<Item = A>,
        mut f: impl FnMut(usize, Node<T>) -> Node<T>,
    ) -> Self {
        addresses
            .into_iter()
            .fold(self, |node, a| node.index_with(a, &mut f))
    }

    /// Reverse child order; on a node holding a path, reverse the path's winding instead.
    pub fn reverse(self, recursive: bool) -> Self {
        if self.has_value() && self.value.is_path_kind() {
            return self.reverse_winding();
        }
        self.reverse_children(recursive)
    }

    /// Insert a copy of `separator` between every pair of adjacent children.
    pub fn interpose(self, separator: Node<T>) -> Self {
        self.interpose_with(|_| separator.copy())
    }

    /// Replace the node with a branch of copies, one per layer function.
    pub fn layer<F>(self, layers: impl IntoIterator<Item = F>) -> Self
    where
        F: FnOnce(Node<T>) -> Node<T>,
    {
        let copies: Vec<Node<T>> = layers.into_iter().map(|f| f(self.copy())).collect();
        let mut out = self.reset_val();
        out.children = copies;
        out
    }

    /// [`Node::layer`] with `n` plain copies.
    pub fn layer_n(self, n: usize) -> Self {
        self.layer((0..n).map(|_| |node: Node<T>| node))
    }

    /// [`Node::layer`] applied at every value-bearing node of the subtree.
    pub fn layerv<F>(mut self, layers: &[F]) -> Self
    where
        F: Fn(Node<T>) -> Node<T>,
    {
        if self.has_value() {
            let copies: Vec<Node<T>> = layers.iter().map(|f| f(self.copy())).collect();
            self = self.reset_val().extend(copies);
            return self;
        }
        self.map(|_, child| child.layerv(layers))
    }
}

impl<T: std::fmt::Debug> Node<T> {
    /// Log the hierarchy at info level.
    pub fn print(self) -> Self {
        tracing::info!(target: "plait::tree", "{}", self.tree(true));
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/edit.rs"]
mod tests;
