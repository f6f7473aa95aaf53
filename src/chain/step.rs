use std::{
    any::Any,
    ops::{Add, AddAssign, BitOr, Div},
    rc::Rc,
};

use crate::{
    foundation::error::{PlaitError, PlaitResult},
    tree::node::{IntoNode, Node},
};

/// What a step did to the node it was given.
pub enum Outcome<T> {
    /// The node was edited in place and stays the chain result.
    InPlace,
    /// A different node becomes the chain result.
    Replaced(Node<T>),
    /// A non-node value. Only steps flagged with [`Step::returning`] make it the result.
    Escaped(Box<dyn Any>),
}

type StepFn<T> = Rc<dyn Fn(&mut Node<T>) -> Outcome<T>>;

enum StepKind<T> {
    Ready(StepFn<T>),
    Deferred(Box<dyn FnOnce() -> Step<T>>),
}

/// A chainable transformation plus its metadata.
pub struct Step<T> {
    kind: StepKind<T>,
    returns: bool,
    label: Option<String>,
}

impl<T: 'static> Step<T> {
    /// Step from a closure that edits the node and reports what it did.
    pub fn new(f: impl Fn(&mut Node<T>) -> Outcome<T> + 'static) -> Self {
        Self {
            kind: StepKind::Ready(Rc::new(f)),
            returns: false,
            label: None,
        }
    }

    /// Step that only edits the node.
    pub fn mutate(f: impl Fn(&mut Node<T>) + 'static) -> Self {
        Self::new(move |node| {
            f(node);
            Outcome::InPlace
        })
    }

    /// Step built from a by-value node transformation.
    pub fn map(f: impl Fn(Node<T>) -> Node<T> + 'static) -> Self {
        Self::new(move |node| Outcome::Replaced(f(std::mem::take(node))))
    }

    /// Step whose return value becomes the chain result, leaving the node world.
    pub fn returning<R: Any>(f: impl Fn(&Node<T>) -> R + 'static) -> Self {
        let mut step = Self::new(move |node| Outcome::Escaped(Box::new(f(node))));
        step.returns = true;
        step
    }

    /// Step whose real transformation is produced on first application.
    pub fn deferred(make: impl FnOnce() -> Step<T> + 'static) -> Self {
        Self {
            kind: StepKind::Deferred(Box::new(make)),
            returns: false,
            label: None,
        }
    }

    /// Attach a label, shown in debug logs.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the outcome of this step is the chain result even when it is not a node.
    pub fn returns(&self) -> bool {
        self.returns
    }

    fn resolve(self) -> (StepFn<T>, bool, Option<String>) {
        match self.kind {
            StepKind::Ready(f) => (f, self.returns, self.label),
            StepKind::Deferred(make) => {
                let (f, returns, label) = make().resolve();
                (f, returns || self.returns, label.or(self.label))
            }
        }
    }

    /// Run the step on `node`.
    pub fn apply(self, mut node: Node<T>) -> Chained<T> {
        let (f, returns, label) = self.resolve();
        match f(&mut node) {
            Outcome::InPlace => Chained::Node(node),
            Outcome::Replaced(replacement) => Chained::Node(replacement),
            Outcome::Escaped(value) if returns => Chained::Escaped(value),
            Outcome::Escaped(_) => {
                tracing::debug!(step = ?label, "side value of a non-returning step dropped");
                Chained::Node(node)
            }
        }
    }
}

/// Inputs accepted by [`Node::chain`]: one step, several, or none.
pub trait IntoSteps<T> {
    /// Collect into an ordered list of steps.
    fn into_steps(self) -> Vec<Step<T>>;
}

impl<T> IntoSteps<T> for Step<T> {
    fn into_steps(self) -> Vec<Step<T>> {
        vec![self]
    }
}

impl<T> IntoSteps<T> for Option<Step<T>> {
    fn into_steps(self) -> Vec<Step<T>> {
        self.into_iter().collect()
    }
}

impl<T> IntoSteps<T> for Vec<Step<T>> {
    fn into_steps(self) -> Vec<Step<T>> {
        self
    }
}

impl<T, const N: usize> IntoSteps<T> for [Step<T>; N] {
    fn into_steps(self) -> Vec<Step<T>> {
        self.into_iter().collect()
    }
}

/// Result of a chain: still a node, or a value that left the node world.
pub enum Chained<T> {
    /// The chain result is a node.
    Node(Node<T>),
    /// The chain left the node world with this value.
    Escaped(Box<dyn Any>),
}

impl<T: 'static> Chained<T> {
    /// Apply more steps; an escaped chain stays escaped.
    pub fn chain(self, steps: impl IntoSteps<T>) -> Self {
        match self {
            Self::Node(node) => node.chain(steps),
            escaped @ Self::Escaped(_) => {
                tracing::debug!("chain already escaped; remaining steps skipped");
                escaped
            }
        }
    }
}

impl<T> Chained<T> {
    /// Take the node, or [`PlaitError::Escaped`] when the chain escaped.
    pub fn into_node(self) -> PlaitResult<Node<T>> {
        match self {
            Self::Node(node) => Ok(node),
            Self::Escaped(_) => Err(PlaitError::escaped(
                "a returning step produced a non-node value",
            )),
        }
    }

    /// The node, unless the chain escaped.
    pub fn node(&self) -> Option<&Node<T>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Escaped(_) => None,
        }
    }

    /// Whether the chain left the node world.
    pub fn is_escaped(&self) -> bool {
        matches!(self, Self::Escaped(_))
    }

    /// The escaped value, if the chain escaped with an `R`.
    pub fn escaped<R: Any>(self) -> Option<R> {
        match self {
            Self::Escaped(value) => value.downcast::<R>().ok().map(|b| *b),
            Self::Node(_) => None,
        }
    }
}

impl<T: 'static> Node<T> {
    /// Apply steps left to right. A step that escapes ends the sequence.
    pub fn chain(self, steps: impl IntoSteps<T>) -> Chained<T> {
        let mut current = Chained::Node(self);
        for step in steps.into_steps() {
            current = match current {
                Chained::Node(node) => step.apply(node),
                escaped @ Chained::Escaped(_) => return escaped,
            };
        }
        current
    }
}

impl<T: 'static> BitOr<Step<T>> for Node<T> {
    type Output = Chained<T>;

    fn bitor(self, step: Step<T>) -> Chained<T> {
        self.chain(step)
    }
}

impl<T: 'static> BitOr<Vec<Step<T>>> for Node<T> {
    type Output = Chained<T>;

    fn bitor(self, steps: Vec<Step<T>>) -> Chained<T> {
        self.chain(steps)
    }
}

impl<T: 'static> BitOr<Step<T>> for Chained<T> {
    type Output = Chained<T>;

    fn bitor(self, step: Step<T>) -> Chained<T> {
        self.chain(step)
    }
}

/// `a + b` nests both operands, in order, under a new container of `a`'s kind.
impl<T, E: IntoNode<T>> Add<E> for Node<T> {
    type Output = Node<T>;

    fn add(self, rhs: E) -> Node<T> {
        self.blank_like().append(self).append(rhs)
    }
}

/// `a += b` appends `b`.
impl<T, E: IntoNode<T>> AddAssign<E> for Node<T> {
    fn add_assign(&mut self, rhs: E) {
        if let Some(node) = rhs.into_node() {
            self.children.push(node);
        }
    }
}

/// `node / f` is [`Node::mapv`].
impl<T, F> Div<F> for Node<T>
where
    F: FnMut(usize, Node<T>) -> Node<T>,
{
    type Output = Node<T>;

    fn div(self, f: F) -> Node<T> {
        self.mapv(f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/step.rs"]
mod tests;
