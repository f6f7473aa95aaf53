//! Contour splitting and winding reversal for recorded paths.

use crate::foundation::core::{BezPath, PathEl, Point};

/// One sub-path: a start point, its segments and whether it is closed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Contour {
    pub start: Point,
    pub segments: Vec<PathEl>,
    pub closed: bool,
}

impl Contour {
    pub fn to_elements(&self, out: &mut Vec<PathEl>) {
        out.push(PathEl::MoveTo(self.start));
        out.extend(self.segments.iter().copied());
        if self.closed {
            out.push(PathEl::ClosePath);
        }
    }
}

/// End point of a drawing segment.
pub(crate) fn end_point(el: &PathEl) -> Option<Point> {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
            Some(p)
        }
        PathEl::ClosePath => None,
    }
}

/// Split a recording into sub-paths. Segments recorded before any move start at the origin.
pub(crate) fn contours(path: &BezPath) -> Vec<Contour> {
    let mut out: Vec<Contour> = Vec::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.push(Contour {
                start: p,
                segments: Vec::new(),
                closed: false,
            }),
            PathEl::ClosePath => {
                if let Some(c) = out.last_mut() {
                    c.closed = true;
                }
            }
            seg => {
                let reopen = out.last().is_none_or(|c| c.closed);
                if reopen {
                    // Drawing after a close continues from the closed contour's start.
                    let start = out.last().map(|c| c.start).unwrap_or(Point::ZERO);
                    out.push(Contour {
                        start,
                        segments: Vec::new(),
                        closed: false,
                    });
                }
                if let Some(c) = out.last_mut() {
                    c.segments.push(seg);
                }
            }
        }
    }
    out
}

pub(crate) fn from_contours(contours: &[Contour]) -> BezPath {
    let mut els = Vec::new();
    for c in contours {
        c.to_elements(&mut els);
    }
    BezPath::from_vec(els)
}

/// Mark every open sub-path closed.
pub fn close_open_subpaths(path: &BezPath) -> BezPath {
    let mut cs = contours(path);
    for c in &mut cs {
        c.closed = true;
    }
    from_contours(&cs)
}

fn reverse_contour(c: &Contour) -> Contour {
    let mut segments = c.segments.clone();
    if c.closed
        && let Some(end) = segments.last().and_then(end_point)
        && end != c.start
    {
        segments.push(PathEl::LineTo(c.start));
    }
    if segments.is_empty() {
        return c.clone();
    }

    let mut points = Vec::with_capacity(segments.len() + 1);
    points.push(c.start);
    points.extend(segments.iter().filter_map(end_point));

    let start = if c.closed { c.start } else { points[points.len() - 1] };
    let mut reversed = Vec::with_capacity(segments.len());
    for (k, seg) in segments.iter().enumerate().rev() {
        let prev = points[k];
        reversed.push(match *seg {
            PathEl::QuadTo(ctrl, _) => PathEl::QuadTo(ctrl, prev),
            PathEl::CurveTo(c1, c2, _) => PathEl::CurveTo(c2, c1, prev),
            _ => PathEl::LineTo(prev),
        });
    }
    if c.closed && reversed.last() == Some(&PathEl::LineTo(c.start)) {
        // Implied by the close.
        reversed.pop();
    }
    Contour {
        start,
        segments: reversed,
        closed: c.closed,
    }
}

/// Reverse the winding of every sub-path.
///
/// Closed sub-paths keep their start point; open ones start from their old end point.
pub fn reverse_winding(path: &BezPath) -> BezPath {
    let reversed: Vec<Contour> = contours(path).iter().map(reverse_contour).collect();
    from_contours(&reversed)
}

#[cfg(test)]
#[path = "../../tests/unit/path/reverse.rs"]
mod tests;
