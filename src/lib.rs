//! plait is a recursive value-or-children tree with a fluent, chainable API, plus its
//! specialization into vector-path composition nodes.
//!
//! # Model
//!
//! - [`Node`]: a leaf (one value), a branch (ordered children), or both. Every node carries an
//!   optional tag, free-form data, namespaced style attributes, a visibility flag and an alpha.
//! - [`Value`]: the value slot, one of empty, an arbitrary scalar, or a recorded [`BezPath`].
//! - [`PathNode`]: a tree whose values can only be path recordings.
//! - [`Step`]: a chainable transformation; [`Node::chain`] and `node | step` apply steps.
//!
//! # Conventions
//!
//! - Fluent operations take the node by value and return it (or a replacement), so long chains
//!   never need intermediate bindings.
//! - Structural edge cases are silent no-ops: empty sequences, absent values and malformed
//!   addresses never abort a chain. Only genuine shape contradictions (for example interpolating
//!   paths with different command counts) return a [`PlaitError`].
//! - Traversal is depth-first; branches are reported on entry and exit, leaves once.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod chain;
mod foundation;
mod path;
mod tree;

pub use chain::step::{Chained, IntoSteps, Outcome, Step};
pub use foundation::core::{Affine, BezPath, PathEl, Point, Rect, Rng64, Vec2};
pub use foundation::error::{PlaitError, PlaitResult};
pub use path::node::{FRAME_KEY, GLYPH_NAME_KEY, WORD_KEY};
pub use path::reverse::{close_open_subpaths, reverse_winding};
pub use tree::address::Address;
pub use tree::edit::SplitMode;
pub use tree::enumerate::{Enumerated, normalized_position};
pub use tree::node::{Attrs, DEFAULT_NAMESPACE, IntoNode, Node, PathNode};
pub use tree::value::{NoScalar, Opaque, Payload, Value};
pub use tree::walk::{Limit, Matcher, WalkCtx, WalkPos};
