use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    foundation::core::BezPath,
    foundation::error::{PlaitError, PlaitResult},
    tree::address::{Address, resolve_index},
    tree::value::{NoScalar, Payload, Value},
};

/// Style namespace used when no namespace is given.
pub const DEFAULT_NAMESPACE: &str = "_default";

/// Style key/value pairs of one namespace.
pub type Attrs = BTreeMap<String, serde_json::Value>;

/// A tree whose values can only be path recordings.
pub type PathNode = Node<NoScalar>;

/// Hybrid value-or-children tree node.
///
/// A node can be a leaf (value only), a branch (children only), or both. Fluent operations take
/// the node by value and hand it back, so calls compose left to right:
///
/// ```
/// use plait::Node;
///
/// let n: Node<i32> = Node::new()
///     .append(Node::leaf(1))
///     .append(Node::leaf(2))
///     .append(Node::leaf(3))
///     .reverse(false);
/// assert_eq!(n.sum(), vec![&3, &2, &1]);
/// ```
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound(serialize = "T: serde::Serialize", deserialize = "T: serde::Deserialize<'de>"))]
pub struct Node<T> {
    pub(crate) value: Value<T>,
    #[serde(default)]
    pub(crate) children: Vec<Node<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) data: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) attrs: BTreeMap<String, Attrs>,
    #[serde(default = "default_visible")]
    pub(crate) visible: bool,
    #[serde(default = "default_alpha")]
    pub(crate) alpha: f64,
    #[serde(skip)]
    pub(crate) parent: Option<Address>,
    #[serde(skip)]
    pub(crate) attr_namespace: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn default_alpha() -> f64 {
    1.0
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::from_value(Value::Empty)
    }
}

/// Anything that can be appended to a node. `None` appends nothing.
pub trait IntoNode<T> {
    /// Convert into a node, or `None` for nothing.
    fn into_node(self) -> Option<Node<T>>;
}

impl<T> IntoNode<T> for Node<T> {
    fn into_node(self) -> Option<Node<T>> {
        Some(self)
    }
}

impl<T> IntoNode<T> for Option<Node<T>> {
    fn into_node(self) -> Option<Node<T>> {
        self
    }
}

impl<T: Payload> IntoNode<T> for T {
    fn into_node(self) -> Option<Node<T>> {
        Some(Node::leaf(self))
    }
}

impl<T> Node<T> {
    /// Empty generic node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node holding `value`, with no children or metadata.
    pub fn from_value(value: Value<T>) -> Self {
        Self {
            value,
            children: Vec::new(),
            tag: None,
            data: BTreeMap::new(),
            attrs: BTreeMap::new(),
            visible: true,
            alpha: 1.0,
            parent: None,
            attr_namespace: None,
        }
    }

    /// Leaf holding `value`.
    pub fn leaf(value: T) -> Self {
        Self::from_value(Value::Scalar(Rc::new(value)))
    }

    /// Branch holding `children`, in order.
    pub fn branch<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoNode<T>,
    {
        Self::new().extend(children)
    }

    /// Path node with an empty recording.
    pub fn path() -> Self {
        Self::from_value(Value::Path(BezPath::new()))
    }

    /// Path leaf holding a recording.
    pub fn path_leaf(path: BezPath) -> Self {
        Self::from_value(Value::Path(path))
    }

    /// Empty container of the same kind as this node.
    pub(crate) fn blank_like(&self) -> Self {
        Self::from_value(self.value.blank())
    }

    /// Value slot.
    pub fn value(&self) -> &Value<T> {
        &self.value
    }

    /// Scalar payload, if any.
    pub fn scalar(&self) -> Option<&T> {
        self.value.scalar()
    }

    /// Replace the value with scalar `value`.
    pub fn update(mut self, value: T) -> Self {
        self.value = Value::Scalar(Rc::new(value));
        self
    }

    /// Replace the scalar with the result of `f`, which sees the current node.
    pub fn update_with(self, f: impl FnOnce(&Self) -> T) -> Self {
        let value = f(&self);
        self.update(value)
    }

    /// Drop the value, tag, data and attributes. Path nodes keep an empty recording.
    pub fn reset_val(mut self) -> Self {
        self.clear_val();
        self
    }

    pub(crate) fn clear_val(&mut self) {
        self.value = self.value.blank();
        self.data.clear();
        self.attrs.clear();
        self.tag = None;
    }

    /// Children, in order.
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// Mutable access to the children.
    pub fn children_mut(&mut self) -> &mut Vec<Node<T>> {
        &mut self.children
    }

    /// Take the children, dropping this node.
    pub fn into_children(self) -> Vec<Node<T>> {
        self.children
    }

    /// Child at `index`; negative indices count from the end.
    pub fn child(&self, index: isize) -> Option<&Node<T>> {
        let i = resolve_index(index, self.children.len())?;
        self.children.get(i)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the node has no children (it may still hold a value).
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Height of the subtree; a childless node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Tag, if set.
    pub fn get_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set the tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Data value under `key`.
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// All data entries.
    pub fn data_map(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.data
    }

    /// Set data `key` to `value`.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set `key` to a value computed from the key and the node.
    pub fn data_with<V>(mut self, key: impl Into<String>, f: impl FnOnce(&str, &Self) -> V) -> Self
    where
        V: Into<serde_json::Value>,
    {
        let key = key.into();
        let value = f(&key, &self).into();
        self.data.insert(key, value);
        self
    }

    /// In-place form of [`Node::data`].
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Remove data `key`, returning its value.
    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Style attributes, keyed by namespace.
    pub fn attrs(&self) -> &BTreeMap<String, Attrs> {
        &self.attrs
    }

    fn resolve_namespace(&self, namespace: Option<&str>) -> String {
        namespace
            .or(self.attr_namespace.as_deref())
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string()
    }

    /// Set style pairs in `namespace` (default namespace when `None`).
    ///
    /// With `recursive`, the same assignment is copied into every descendant at call time; cost is
    /// O(subtree size).
    pub fn attr<K, V>(
        mut self,
        namespace: Option<&str>,
        pairs: impl IntoIterator<Item = (K, V)>,
        recursive: bool,
    ) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        let namespace = self.resolve_namespace(namespace);
        let pairs: Vec<(String, serde_json::Value)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.set_attrs(&namespace, &pairs, recursive);
        self
    }

    pub(crate) fn set_attrs(
        &mut self,
        namespace: &str,
        pairs: &[(String, serde_json::Value)],
        recursive: bool,
    ) {
        let attrs = self.attrs.entry(namespace.to_string()).or_default();
        for (k, v) in pairs {
            attrs.insert(k.clone(), v.clone());
        }
        if recursive {
            for child in &mut self.children {
                child.set_attrs(namespace, pairs, true);
            }
        }
    }

    /// Read one style field.
    pub fn get_attr(&self, namespace: Option<&str>, field: &str) -> Option<&serde_json::Value> {
        let namespace = self.resolve_namespace(namespace);
        self.attrs.get(&namespace)?.get(field)
    }

    /// Style map of `namespace`, falling back to the default namespace.
    pub fn style(&self, namespace: &str) -> Option<&Attrs> {
        self.attrs
            .get(namespace)
            .or_else(|| self.attrs.get(DEFAULT_NAMESPACE))
    }

    /// Run `f` with `namespace` standing in for the default style namespace.
    pub fn lattr(mut self, namespace: impl Into<String>, f: impl FnOnce(Self) -> Self) -> Self {
        self.attr_namespace = Some(namespace.into());
        let mut out = f(self);
        out.attr_namespace = None;
        out
    }

    /// Set the visibility flag.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Visibility flag; `true` by default.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set the alpha. Walks multiply it into [`crate::WalkCtx::alpha`].
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Alpha; `1.0` by default.
    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    /// Address of the parent, as recorded by the last traversal from an ancestor.
    pub fn parent(&self) -> PlaitResult<&Address> {
        self.parent
            .as_ref()
            .ok_or_else(|| PlaitError::no_parent("no traversal has set a parent for this node"))
    }

    pub(crate) fn at_path(&self, path: &[usize]) -> Option<&Node<T>> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    pub(crate) fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node<T>> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// True when both nodes hold the very same scalar allocation.
    pub fn shares_value_with(&self, other: &Self) -> bool {
        self.value.shares_with(&other.value)
    }
}

impl<T: Payload> Node<T> {
    /// Truthiness: any children, or a present value.
    pub fn is_truthy(&self) -> bool {
        !self.children.is_empty() || self.value.is_present()
    }

    /// Value presence; for path nodes, at least one recorded command.
    pub fn has_value(&self) -> bool {
        self.value.is_present()
    }

    /// Independent deep copy.
    ///
    /// Data, attributes and children are always duplicated. A scalar whose
    /// [`Payload::duplicate`] returns `None` is shared with the original instead; use
    /// [`Node::try_copy`] to reject such payloads.
    pub fn copy(&self) -> Self {
        let (value, shared) = self.value.duplicate();
        if shared {
            tracing::debug!(tag = ?self.tag, "payload is not duplicable; copy shares it");
        }
        self.copy_with_value(value, self.children.iter().map(Node::copy).collect())
    }

    /// Deep copy that fails instead of sharing a non-duplicable payload.
    pub fn try_copy(&self) -> PlaitResult<Self> {
        let (value, shared) = self.value.duplicate();
        if shared {
            return Err(PlaitError::not_duplicable(format!(
                "payload of node {} cannot be duplicated",
                self.tag.as_deref().unwrap_or("<untagged>")
            )));
        }
        let children = self
            .children
            .iter()
            .map(Node::try_copy)
            .collect::<PlaitResult<Vec<_>>>()?;
        Ok(self.copy_with_value(value, children))
    }

    fn copy_with_value(&self, value: Value<T>, children: Vec<Node<T>>) -> Self {
        Self {
            value,
            children,
            tag: self.tag.clone(),
            data: self.data.clone(),
            attrs: self.attrs.clone(),
            visible: self.visible,
            alpha: self.alpha,
            parent: None,
            attr_namespace: None,
        }
    }
}

impl<T: fmt::Debug> Node<T> {
    /// Indented hierarchy listing; leaves are omitted when `values` is false.
    pub fn tree(&self, values: bool) -> String {
        use crate::tree::walk::WalkPos;

        let mut out = Vec::new();
        self.visit(false, |node, pos, ctx| {
            if pos == WalkPos::Exit || (pos == WalkPos::Leaf && !values) {
                return;
            }
            let mut tab = " |".repeat(ctx.depth);
            if pos == WalkPos::Leaf && !tab.is_empty() {
                tab.pop();
                tab.push('-');
            }
            out.push(format!("{tab} {node}"));
        });
        format!("\n{}", out.join("\n"))
    }
}

impl<T: fmt::Debug> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.value.is_path_kind() { "path" } else { "" };
        write!(f, "<®:{kind}:")?;
        if let Some(v) = self.value.summary() {
            write!(f, "({v})")?;
        }
        if !self.children.is_empty() {
            write!(f, "/{}...", self.children.len())?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " {{#{tag}}}")?;
        }
        if !self.data.is_empty() {
            let pairs = self
                .data
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            write!(f, " {{{pairs}}}")?;
        }
        write!(f, ">")
    }
}

impl<T> FromIterator<Node<T>> for Node<T> {
    fn from_iter<I: IntoIterator<Item = Node<T>>>(iter: I) -> Self {
        let mut node = Self::new();
        node.children.extend(iter);
        node
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/node.rs"]
mod tests;
