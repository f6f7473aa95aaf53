use kurbo::Shape;

use crate::{
    foundation::core::{Affine, BezPath, PathEl, Point, Rect, lerp_point, union_rect},
    foundation::error::{PlaitError, PlaitResult},
    path::reverse::{self, Contour, contours, from_contours},
    tree::address::resolve_index,
    tree::edit::SplitMode,
    tree::node::Node,
    tree::value::{Payload, Value},
    tree::walk::{Matcher, WalkPos},
};

/// Data key holding the externally supplied glyph name.
pub const GLYPH_NAME_KEY: &str = "glyphName";
/// Data key holding the combined bounding box written by [`Node::pen`].
pub const FRAME_KEY: &str = "frame";
/// Data key holding the joined glyph names of a word built by [`Node::word_pens`].
pub const WORD_KEY: &str = "word";

impl<T> From<BezPath> for Node<T> {
    fn from(path: BezPath) -> Self {
        Node::path_leaf(path)
    }
}

impl<T> From<Rect> for Node<T> {
    fn from(rect: Rect) -> Self {
        Node::path().rect(rect)
    }
}

fn points_of(el: &PathEl) -> Vec<Point> {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
        PathEl::QuadTo(a, b) => vec![a, b],
        PathEl::CurveTo(a, b, c) => vec![a, b, c],
        PathEl::ClosePath => Vec::new(),
    }
}

fn with_points(el: &PathEl, pts: &mut impl Iterator<Item = Point>) -> PathEl {
    let mut next = |fallback: Point| pts.next().unwrap_or(fallback);
    match *el {
        PathEl::MoveTo(p) => PathEl::MoveTo(next(p)),
        PathEl::LineTo(p) => PathEl::LineTo(next(p)),
        PathEl::QuadTo(a, b) => {
            let a = next(a);
            PathEl::QuadTo(a, next(b))
        }
        PathEl::CurveTo(a, b, c) => {
            let a = next(a);
            let b = next(b);
            PathEl::CurveTo(a, b, next(c))
        }
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

fn contour_points(c: &Contour) -> Vec<Point> {
    let mut out = vec![c.start];
    for seg in &c.segments {
        out.extend(points_of(seg));
    }
    out
}

fn set_contour_point(c: &mut Contour, index: usize, point: Point) {
    let mut pts = contour_points(c);
    pts[index] = point;
    let mut iter = pts.into_iter();
    c.start = iter.next().unwrap_or(c.start);
    c.segments = c.segments.iter().map(|s| with_points(s, &mut iter)).collect();
}

fn path_bounds(path: &BezPath) -> Option<Rect> {
    (!path.elements().is_empty()).then(|| path.bounding_box())
}

impl<T> Node<T> {
    /// The recorded path, for path nodes.
    pub fn path_value(&self) -> Option<&BezPath> {
        self.value.path()
    }

    /// Draw into this node's recording, turning the node into a path node when needed.
    pub fn record(mut self, f: impl FnOnce(&mut BezPath)) -> Self {
        if !self.value.is_path_kind() {
            self.value = Value::Path(BezPath::new());
        }
        if let Some(path) = self.value.path_mut() {
            f(path);
        }
        self
    }

    /// Record a closed rectangle.
    pub fn rect(self, rect: Rect) -> Self {
        self.record(|p| {
            p.move_to((rect.x0, rect.y0));
            p.line_to((rect.x1, rect.y0));
            p.line_to((rect.x1, rect.y1));
            p.line_to((rect.x0, rect.y1));
            p.close_path();
        })
    }

    /// Number of sub-paths in this node's recording.
    pub fn contour_count(&self) -> usize {
        self.value.path().map(|p| contours(p).len()).unwrap_or(0)
    }

    /// All on- and off-curve points of this node's recording, in order.
    pub fn points(&self) -> Vec<Point> {
        self.value
            .path()
            .map(|p| p.elements().iter().flat_map(points_of).collect())
            .unwrap_or_default()
    }

    /// Point `point` of contour `contour`; negative indices count from the end.
    pub fn point_at(&self, contour: isize, point: isize) -> Option<Point> {
        let cs = contours(self.value.path()?);
        let c = cs.get(resolve_index(contour, cs.len())?)?;
        let pts = contour_points(c);
        pts.get(resolve_index(point, pts.len())?).copied()
    }

    /// Replace every point of this node's recording with `f(point_index, point)`.
    pub fn map_points(mut self, mut f: impl FnMut(usize, Point) -> Point) -> Self {
        if let Some(path) = self.value.path_mut() {
            let mapped: Vec<Point> = path
                .elements()
                .iter()
                .flat_map(points_of)
                .enumerate()
                .map(|(i, p)| f(i, p))
                .collect();
            let mut iter = mapped.into_iter();
            let els: Vec<PathEl> = path
                .elements()
                .iter()
                .map(|el| with_points(el, &mut iter))
                .collect();
            *path = BezPath::from_vec(els);
        }
        self
    }

    /// Apply `affine` to every path in the subtree.
    pub fn transform(mut self, affine: Affine) -> Self {
        self.walk(false, |node, _, _| {
            if let Some(path) = node.value.path_mut() {
                path.apply_affine(affine);
            }
            None
        });
        self
    }

    /// Union bounding box of every non-empty path in the subtree.
    pub fn bounds(&self) -> Option<Rect> {
        let mut acc = None;
        self.visit(false, |node, _, _| {
            if let Some(r) = node.value.path().and_then(path_bounds) {
                acc = union_rect(acc, r);
            }
        });
        acc
    }

    /// Bounding box recorded by [`Node::pen`].
    pub fn frame(&self) -> PlaitResult<Option<Rect>> {
        self.data
            .get(FRAME_KEY)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(PlaitError::from)
    }

    /// Glyph name stored under [`GLYPH_NAME_KEY`].
    pub fn glyph_name(&self) -> Option<&str> {
        self.data.get(GLYPH_NAME_KEY).and_then(|v| v.as_str())
    }

    /// Store a glyph name under [`GLYPH_NAME_KEY`].
    pub fn with_glyph_name(self, name: impl Into<String>) -> Self {
        self.data(GLYPH_NAME_KEY, name.into())
    }

    /// Every node whose glyph name is `name`, in traversal order.
    pub fn find_glyph(&self, name: &str) -> Vec<&Node<T>> {
        self.find(&Matcher::data([(GLYPH_NAME_KEY, name)]), None)
    }

    /// First node named `name`, in depth-first order.
    pub fn find_glyph_first(&self, name: &str) -> Option<&Node<T>> {
        self.find_first(&Matcher::data([(GLYPH_NAME_KEY, name)]))
    }
}

impl<T: Payload> Node<T> {
    /// Close every open sub-path, then reverse the recording's winding in place.
    pub(crate) fn reverse_winding(mut self) -> Self {
        if let Some(path) = self.value.path_mut() {
            let closed = reverse::close_open_subpaths(path);
            *path = reverse::reverse_winding(&closed);
        }
        self
    }

    /// Combine the subtree into one recording on this node.
    ///
    /// Leaf paths are concatenated in traversal order, style namespaces missing on this node are
    /// taken from the first leaf, and the union bounding box is stored as `frame` data. The
    /// children are dropped afterwards.
    pub fn pen(mut self) -> Self {
        if self.children.is_empty() {
            return self;
        }
        tracing::debug!(children = self.children.len(), "combining subtree into one pen");
        let frame = self.bounds();
        self = self.collapse();

        let mut combined = match std::mem::take(&mut self.value) {
            Value::Path(p) => p,
            _ => BezPath::new(),
        };
        for leaf in &self.children {
            if let Some(p) = leaf.value.path() {
                for el in p.elements() {
                    combined.push(*el);
                }
            }
        }
        if let Some(first) = self.children.first() {
            for (namespace, attrs) in &first.attrs {
                self.attrs
                    .entry(namespace.clone())
                    .or_insert_with(|| attrs.clone());
            }
        }
        if let Some(frame) = frame {
            match serde_json::to_value(frame) {
                Ok(v) => {
                    self.data.insert(FRAME_KEY.to_string(), v);
                }
                Err(e) => tracing::debug!(error = %e, "frame not recorded"),
            }
        }
        self.value = Value::Path(combined);
        self.children.clear();
        self
    }

    /// Wrap a recording in a node of this node's kind, for `pens`-style chains.
    pub fn pens(self) -> Self {
        if self.has_value() { self.ups() } else { self }
    }

    /// Linear interpolation towards `other`; `factor = 0` reproduces this path.
    ///
    /// Both recordings must have the same commands in the same order.
    #[tracing::instrument(skip(self, other))]
    pub fn interpolate(&self, factor: f64, other: &Node<T>) -> PlaitResult<Node<T>> {
        let (Some(a), Some(b)) = (self.value.path(), other.value.path()) else {
            return Err(PlaitError::shape_mismatch(
                "interpolation needs two path recordings",
            ));
        };
        let (ea, eb) = (a.elements(), b.elements());
        if ea.len() != eb.len() {
            return Err(PlaitError::shape_mismatch(format!(
                "cannot interpolate {} commands with {}",
                ea.len(),
                eb.len()
            )));
        }
        let mut out = Vec::with_capacity(ea.len());
        for (idx, (x, y)) in ea.iter().zip(eb).enumerate() {
            let el = match (*x, *y) {
                (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(lerp_point(p, q, factor)),
                (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(lerp_point(p, q, factor)),
                (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => PathEl::QuadTo(
                    lerp_point(p1, q1, factor),
                    lerp_point(p2, q2, factor),
                ),
                (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => PathEl::CurveTo(
                    lerp_point(p1, q1, factor),
                    lerp_point(p2, q2, factor),
                    lerp_point(p3, q3, factor),
                ),
                (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
                (x, y) => {
                    return Err(PlaitError::shape_mismatch(format!(
                        "command {idx} differs: {x:?} vs {y:?}"
                    )));
                }
            };
            out.push(el);
        }
        Ok(Node::path_leaf(BezPath::from_vec(out)))
    }

    /// Geometry edit behind [`Node::index_with`] on path leaves.
    pub(crate) fn edit_geometry(
        &mut self,
        components: &[isize],
        f: impl FnOnce(usize, Node<T>) -> Node<T>,
    ) {
        let Some(path) = self.value.path_mut() else {
            return;
        };
        let mut cs = contours(path);
        let Some(&first) = components.first() else {
            return;
        };
        let Some(ci) = resolve_index(first, cs.len()) else {
            tracing::debug!(contour = first, "contour index out of range");
            return;
        };
        match components.get(1) {
            None => {
                let leaf = Node::path_leaf(from_contours(&cs[ci..=ci]));
                let edited = f(ci, leaf);
                let replacement = edited
                    .value
                    .path()
                    .map(contours)
                    .unwrap_or_default();
                cs.splice(ci..=ci, replacement).for_each(drop);
            }
            Some(&p) => {
                let pts = contour_points(&cs[ci]);
                let Some(pi) = resolve_index(p, pts.len()) else {
                    tracing::debug!(contour = ci, point = p, "point index out of range");
                    return;
                };
                let mut single = BezPath::new();
                single.move_to(pts[pi]);
                let edited = f(pi, Node::path_leaf(single));
                if let Some(pt) = edited.points().first() {
                    set_contour_point(&mut cs[ci], pi, *pt);
                }
            }
        }
        *path = from_contours(&cs);
    }

    /// Group glyph leaves into words at `separator` matches and combine each word into one pen.
    ///
    /// A node of depth 2 is split directly; deeper trees are handled per child and collected in a
    /// new container.
    pub fn word_pens(self, mut separator: impl FnMut(&Node<T>) -> bool) -> Self {
        self.word_pens_inner(&mut separator)
    }

    /// [`Node::word_pens`] splitting at glyphs named `space`.
    pub fn word_pens_at_spaces(self) -> Self {
        self.word_pens(|n| n.glyph_name() == Some("space"))
    }

    fn word_pens_inner(self, separator: &mut dyn FnMut(&Node<T>) -> bool) -> Self {
        let depth = self.depth();
        if depth < 2 {
            return self;
        }
        if depth == 2 {
            return self.split(|n| separator(n), SplitMode::Exclude).map(|_, word| {
                let name = word
                    .children
                    .iter()
                    .map(|g| g.glyph_name().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("/");
                word.data(WORD_KEY, name.clone()).tag(name).pen()
            });
        }
        let mut out = self.blank_like();
        for child in self.children {
            out.children.push(child.word_pens_inner(separator));
        }
        out
    }

    /// Replace every glyph named `name` with `replacement(glyph)`, moved to the glyph's
    /// bounding-box origin.
    pub fn replace_glyph(
        mut self,
        name: &str,
        mut replacement: impl FnMut(&Node<T>) -> Node<T>,
    ) -> Self {
        let matcher = Matcher::data([(GLYPH_NAME_KEY, name)]);
        let mut located: Vec<Vec<usize>> = Vec::new();
        self.visit(false, |node, pos, ctx| {
            if pos != WalkPos::Enter && matcher.matches(node) {
                located.push(crate::tree::walk::positional(ctx));
            }
        });
        for path in located {
            if let Some(slot) = self.at_path_mut(&path) {
                let origin = slot.bounds().map(|r| r.origin()).unwrap_or(Point::ZERO);
                let fresh = replacement(&*slot).transform(Affine::translate(origin.to_vec2()));
                *slot = fresh;
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/node.rs"]
mod tests;
