use std::collections::BTreeSet;

use crate::{
    tree::address::Address,
    tree::node::Node,
    tree::value::Payload,
};

pub(crate) const WALK_DELETE_KEY: &str = "_walk_delete";

/// Where a traversal callback is being invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkPos {
    /// Branch, before its children.
    Enter,
    /// Childless node.
    Leaf,
    /// Branch, after its children.
    Exit,
}

/// Context handed to traversal callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkCtx {
    /// Distance from the walk root.
    pub depth: usize,
    /// Product of the alphas from the walk root down to this node.
    pub alpha: f64,
    /// Positional address relative to the walk root; `None` at the root.
    pub address: Option<Address>,
}

impl WalkCtx {
    /// Underscore-joined positional address.
    pub fn utag(&self) -> Option<String> {
        self.address.as_ref().and_then(Address::utag)
    }
}

/// Node selector used by [`Node::find`].
pub enum Matcher<'a, T> {
    /// Tag equality.
    Tag(String),
    /// Arbitrary predicate.
    Predicate(Box<dyn Fn(&Node<T>) -> bool + 'a>),
    /// Every listed data key must hold the given value.
    Data(Vec<(String, serde_json::Value)>),
}

impl<'a, T> Matcher<'a, T> {
    /// Match nodes tagged `tag`.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Match nodes for which `f` holds.
    pub fn predicate(f: impl Fn(&Node<T>) -> bool + 'a) -> Self {
        Self::Predicate(Box::new(f))
    }

    /// Match nodes whose data holds every pair.
    pub fn data<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        Self::Data(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether `node` is selected.
    pub fn matches(&self, node: &Node<T>) -> bool {
        match self {
            Self::Tag(tag) => node.get_tag() == Some(tag.as_str()),
            Self::Predicate(f) => f(node),
            Self::Data(pairs) => pairs.iter().all(|(k, v)| node.get_data(k) == Some(v)),
        }
    }
}

impl<T> From<&str> for Matcher<'_, T> {
    fn from(value: &str) -> Self {
        Self::tag(value)
    }
}

/// Narrows find results by match position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Limit {
    /// Keep only the match at this position.
    Index(usize),
    /// Keep the matches at these positions.
    Set(BTreeSet<usize>),
}

impl Limit {
    /// Whether match number `position` is kept.
    pub fn contains(&self, position: usize) -> bool {
        match self {
            Self::Index(i) => *i == position,
            Self::Set(set) => set.contains(&position),
        }
    }
}

impl From<usize> for Limit {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl<const N: usize> From<[usize; N]> for Limit {
    fn from(value: [usize; N]) -> Self {
        Self::Set(value.into_iter().collect())
    }
}

impl<T> Node<T> {
    /// Depth-first traversal with in-place mutation.
    ///
    /// Branches are seen at [`WalkPos::Enter`] and [`WalkPos::Exit`], childless nodes once at
    /// [`WalkPos::Leaf`]. A `Some` returned at a leaf replaces that leaf in its parent (or the
    /// root itself); returns at branch positions are ignored. Every visited child records its
    /// parent's address, see [`Node::parent`].
    pub fn walk<F>(&mut self, visible_only: bool, mut callback: F)
    where
        F: FnMut(&mut Node<T>, WalkPos, &WalkCtx) -> Option<Node<T>>,
    {
        if let Some(replacement) = self.walk_inner(&mut callback, visible_only, 1.0, &mut Vec::new())
        {
            *self = replacement;
        }
    }

    fn walk_inner<F>(
        &mut self,
        callback: &mut F,
        visible_only: bool,
        alpha: f64,
        indices: &mut Vec<usize>,
    ) -> Option<Node<T>>
    where
        F: FnMut(&mut Node<T>, WalkPos, &WalkCtx) -> Option<Node<T>>,
    {
        if visible_only && !self.visible {
            return None;
        }
        let ctx = WalkCtx {
            depth: indices.len(),
            alpha: alpha * self.alpha,
            address: (!indices.is_empty()).then(|| Address::from_indices(indices)),
        };
        if self.children.is_empty() {
            return callback(self, WalkPos::Leaf, &ctx);
        }

        callback(self, WalkPos::Enter, &ctx);
        let parent = Address::from_indices(indices);
        let mut i = 0;
        while i < self.children.len() {
            indices.push(i);
            let child = &mut self.children[i];
            child.parent = Some(parent.clone());
            if let Some(replacement) = child.walk_inner(callback, visible_only, ctx.alpha, indices)
            {
                self.children[i] = replacement;
            }
            indices.pop();
            i += 1;
        }
        callback(self, WalkPos::Exit, &ctx);
        None
    }

    /// Read-only twin of [`Node::walk`].
    pub fn visit<'a, F>(&'a self, visible_only: bool, mut callback: F)
    where
        F: FnMut(&'a Node<T>, WalkPos, &WalkCtx),
    {
        self.visit_inner(&mut callback, visible_only, 1.0, &mut Vec::new());
    }

    fn visit_inner<'a, F>(
        &'a self,
        callback: &mut F,
        visible_only: bool,
        alpha: f64,
        indices: &mut Vec<usize>,
    ) where
        F: FnMut(&'a Node<T>, WalkPos, &WalkCtx),
    {
        if visible_only && !self.visible {
            return;
        }
        let ctx = WalkCtx {
            depth: indices.len(),
            alpha: alpha * self.alpha,
            address: (!indices.is_empty()).then(|| Address::from_indices(indices)),
        };
        if self.children.is_empty() {
            callback(self, WalkPos::Leaf, &ctx);
            return;
        }
        callback(self, WalkPos::Enter, &ctx);
        for (i, child) in self.children.iter().enumerate() {
            indices.push(i);
            child.visit_inner(callback, visible_only, ctx.alpha, indices);
            indices.pop();
        }
        callback(self, WalkPos::Exit, &ctx);
    }

    /// Replace each immediate child with `f(index, child)`.
    pub fn map(mut self, mut f: impl FnMut(usize, Node<T>) -> Node<T>) -> Self {
        self.children = std::mem::take(&mut self.children)
            .into_iter()
            .enumerate()
            .map(|(i, child)| f(i, child))
            .collect();
        self
    }

    /// Keep the immediate children for which `f(index, child)` holds.
    pub fn filter(mut self, mut f: impl FnMut(usize, &Node<T>) -> bool) -> Self {
        let mut i = 0;
        self.children.retain(|child| {
            let keep = f(i, child);
            i += 1;
            keep
        });
        self
    }

    /// Replace every leaf with `f(leaf_index, leaf)`; branches are left alone.
    pub fn mapv(mut self, mut f: impl FnMut(usize, Node<T>) -> Node<T>) -> Self {
        let mut idx = 0;
        self.walk(false, |node, pos, _| {
            if pos != WalkPos::Leaf {
                return None;
            }
            let out = f(idx, std::mem::take(node));
            idx += 1;
            Some(out)
        });
        self
    }

    /// Remove every leaf for which `f(leaf_index, leaf)` is false.
    ///
    /// Leaves are marked during the descent and pruned when their owning branch is left, so a
    /// single traversal both decides and deletes.
    pub fn filterv(mut self, mut f: impl FnMut(usize, &Node<T>) -> bool) -> Self {
        let mut idx = 0;
        self.walk(false, |node, pos, _| {
            match pos {
                WalkPos::Leaf => {
                    if !f(idx, node) {
                        node.set_data(WALK_DELETE_KEY, true);
                    }
                    idx += 1;
                }
                WalkPos::Exit => node
                    .children
                    .retain(|child| !child.data.contains_key(WALK_DELETE_KEY)),
                WalkPos::Enter => {}
            }
            None
        });
        // A childless root has no owner to prune it.
        self.data.remove(WALK_DELETE_KEY);
        self
    }

    /// Replace the children with the flat depth-first list of leaves.
    pub fn collapse(mut self) -> Self {
        if self.children.is_empty() {
            return self;
        }
        let mut leaves = Vec::new();
        self.walk(false, |node, pos, _| {
            if pos == WalkPos::Leaf {
                let mut leaf = std::mem::take(node);
                leaf.parent = None;
                leaves.push(leaf);
            }
            None
        });
        self.children = leaves;
        self
    }

    /// Scalar values of the leaves, depth-first.
    pub fn sum(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.visit(false, |node, pos, _| {
            if pos == WalkPos::Leaf
                && let Some(v) = node.scalar()
            {
                out.push(v);
            }
        });
        out
    }

    /// Matches in traversal order: leaves when reached, branches once their subtree is done.
    pub fn find(&self, matcher: &Matcher<'_, T>, limit: Option<&Limit>) -> Vec<&Node<T>> {
        self.find_located(matcher, limit)
            .into_iter()
            .map(|(_, _, node)| node)
            .collect()
    }

    /// First narrowed match.
    pub fn find_first(&self, matcher: &Matcher<'_, T>) -> Option<&Node<T>> {
        self.find(matcher, Some(&Limit::Index(0))).into_iter().next()
    }

    /// Apply `f(match_position, node)` to each narrowed match instead of returning them.
    pub fn find_apply(
        mut self,
        matcher: &Matcher<'_, T>,
        limit: Option<&Limit>,
        mut f: impl FnMut(usize, &mut Node<T>),
    ) -> Self {
        let located: Vec<(usize, Vec<usize>)> = self
            .find_located(matcher, limit)
            .into_iter()
            .map(|(pos, path, _)| (pos, path))
            .collect();
        for (pos, path) in located {
            if let Some(node) = self.at_path_mut(&path) {
                f(pos, node);
            }
        }
        self
    }

    pub(crate) fn find_located(
        &self,
        matcher: &Matcher<'_, T>,
        limit: Option<&Limit>,
    ) -> Vec<(usize, Vec<usize>, &Node<T>)> {
        let mut matches = Vec::new();
        self.visit(false, |node, pos, ctx| {
            if pos != WalkPos::Enter && matcher.matches(node) {
                matches.push((positional(ctx), node));
            }
        });
        matches
            .into_iter()
            .enumerate()
            .filter(|(pos, _)| limit.is_none_or(|l| l.contains(*pos)))
            .map(|(pos, (path, node))| (pos, path, node))
            .collect()
    }
}

impl<T: Payload> Node<T> {
    /// Drop every leaf that has no value.
    pub fn unblank(self) -> Self {
        self.filterv(|_, node| node.has_value())
    }
}

/// Non-negative index path of a traversal context.
pub(crate) fn positional(ctx: &WalkCtx) -> Vec<usize> {
    ctx.address
        .as_ref()
        .map(|a| a.components().iter().map(|&c| c as usize).collect())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/tree/walk.rs"]
mod tests;
