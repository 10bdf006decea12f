//! Per-triangle setup: bounding box, edge-function constants and the
//! top-left fill-rule bias.
//!
//! The original hardware keeps a literal "row start" register per edge
//! weight and per attribute, incrementing them by `2*a`/`2*b`/`2*dx`/`2*dy`
//! each quad step and reseeding the four per-corner copies from the row
//! start on every transition. That incremental bookkeeping is behaviorally
//! identical to evaluating the same affine function directly at the
//! corner's absolute quad position - integer addition is associative under
//! 32-bit wraparound - so this port skips the row-start registers and
//! evaluates every edge weight and attribute in closed form from
//! [`Geometry`] and the requested `(px, py, kx, ky)`. See `interpolate` in
//! `lib.rs` for the attribute side of the same simplification.

use crate::TriangleInput;

/// Setup results for one triangle: edge-function constants, fill-rule
/// bias and the clamped bounding box in quad coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geometry {
    pub v0: (i32, i32),
    pub v1: (i32, i32),
    pub v2: (i32, i32),
    pub a01: i32,
    pub a12: i32,
    pub a20: i32,
    pub b01: i32,
    pub b12: i32,
    pub b20: i32,
    pub bias0: i32,
    pub bias1: i32,
    pub bias2: i32,
    /// Bounding box in quad coordinates, inclusive. `qx0 > qx1` (or the
    /// `y` equivalent) marks an empty box: the triangle is fully
    /// off-tile or degenerate.
    pub qx0: i32,
    pub qy0: i32,
    pub qx1: i32,
    pub qy1: i32,
}

/// An edge from `a` to `b` is top-left iff it is a strictly rightward
/// horizontal edge or any downward edge.
fn is_top_left(a: (i32, i32), b: (i32, i32)) -> bool {
    (a.1 == b.1 && b.0 > a.0) || (b.1 > a.1)
}

pub(crate) fn setup(tri: &TriangleInput, tile_dim: i32) -> Geometry {
    let (v0, v1, v2) = (tri.v0, tri.v1, tri.v2);

    let bminx = v0.0.min(v1.0).min(v2.0);
    let bminy = v0.1.min(v1.1).min(v2.1);
    let bmaxx = v0.0.max(v1.0).max(v2.0);
    let bmaxy = v0.1.max(v1.1).max(v2.1);

    let a01 = v0.1.wrapping_sub(v1.1);
    let a12 = v1.1.wrapping_sub(v2.1);
    let a20 = v2.1.wrapping_sub(v0.1);
    let b01 = v1.0.wrapping_sub(v0.0);
    let b12 = v2.0.wrapping_sub(v1.0);
    let b20 = v0.0.wrapping_sub(v2.0);

    let bias0 = if is_top_left(v1, v2) { 0 } else { -1 };
    let bias1 = if is_top_left(v2, v0) { 0 } else { -1 };
    let bias2 = if is_top_left(v0, v1) { 0 } else { -1 };

    let quad_max = (tile_dim >> 1) - 1;
    let qx0 = (bminx >> 1).max(0);
    let qy0 = (bminy >> 1).max(0);
    let qx1 = ((bmaxx + 1) >> 1).min(quad_max);
    let qy1 = ((bmaxy + 1) >> 1).min(quad_max);

    Geometry { v0, v1, v2, a01, a12, a20, b01, b12, b20, bias0, bias1, bias2, qx0, qy0, qx1, qy1 }
}

/// Barycentric weights `(w0, w1, w2)` at absolute pixel `(x, y)`.
pub(crate) fn edge_weights(geom: &Geometry, x: i32, y: i32) -> (i32, i32, i32) {
    let w0 = geom
        .a12
        .wrapping_mul(x.wrapping_sub(geom.v1.0))
        .wrapping_add(geom.b12.wrapping_mul(y.wrapping_sub(geom.v1.1)))
        .wrapping_add(geom.bias0);
    let w1 = geom
        .a20
        .wrapping_mul(x.wrapping_sub(geom.v2.0))
        .wrapping_add(geom.b20.wrapping_mul(y.wrapping_sub(geom.v2.1)))
        .wrapping_add(geom.bias1);
    let w2 = geom
        .a01
        .wrapping_mul(x.wrapping_sub(geom.v0.0))
        .wrapping_add(geom.b01.wrapping_mul(y.wrapping_sub(geom.v0.1)))
        .wrapping_add(geom.bias2);
    (w0, w1, w2)
}

/// A pixel is covered iff all three weights are non-negative, i.e. the
/// sign bit of their bitwise OR is clear.
pub(crate) fn is_covered(w0: i32, w1: i32, w2: i32) -> bool {
    (w0 | w1 | w2) >= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_triangle() -> TriangleInput {
        crate::tests::flat_red_triangle()
    }

    #[test]
    fn bounding_box_covers_the_whole_tile_for_s1() {
        let geom = setup(&flat_triangle(), 32);
        assert_eq!((geom.qx0, geom.qy0), (0, 0));
        assert_eq!((geom.qx1, geom.qy1), (15, 15));
    }

    #[test]
    fn apex_vertex_is_inside_its_own_triangle() {
        let geom = setup(&flat_triangle(), 32);
        // v2 = (16, 32) is the bottom apex; step one pixel up and in
        // from it and it must read as covered.
        let (w0, w1, w2) = edge_weights(&geom, 16, 31);
        assert!(is_covered(w0, w1, w2));
    }

    #[test]
    fn far_outside_corner_is_not_covered() {
        let geom = setup(&flat_triangle(), 32);
        let (w0, w1, w2) = edge_weights(&geom, 31, 31);
        assert!(!is_covered(w0, w1, w2));
    }

    #[test]
    fn horizontal_rightward_top_edge_is_top_left() {
        assert!(is_top_left((0, 0), (32, 0)));
        assert!(!is_top_left((32, 0), (0, 0)));
    }

    #[test]
    fn downward_edge_is_top_left() {
        assert!(is_top_left((32, 0), (16, 32)));
        assert!(!is_top_left((16, 32), (32, 0)));
    }
}
