pub use kurbo::{Affine, BezPath, PathEl, Point, Rect, Vec2};

/// Seeded SplitMix64 generator.
///
/// Every randomized tree operation builds its own generator from an explicit seed, so no random
/// state leaks between calls.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Generator seeded with `seed`. Equal seeds give equal sequences.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        // Multiply-shift keeps the bias negligible for tree-sized bounds.
        ((u128::from(self.next_u64()) * bound as u128) >> 64) as usize
    }

    /// Fisher-Yates shuffle driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Linear interpolation between two points, `t = 0` yields `a`.
pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    a.lerp(b, t)
}

/// Union of two optional rectangles.
pub fn union_rect(acc: Option<Rect>, next: Rect) -> Option<Rect> {
    Some(match acc {
        Some(r) => r.union(next),
        None => next,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
