use nalgebra::Vector2;

use crate::channel::{CellPolygon, Tolerances};
use crate::itinerary::EdgeId;

/// Reflect every vertex of `poly` except the endpoints of `edge` across the
/// line through `edge`.
///
/// Vertical edges (endpoint x coordinates close under `tol`) use
/// `x' = 2 x_edge - x`; all others use the slope/intercept point-reflection
/// formula. Applying the same reflection twice restores `poly` up to rounding.
pub fn reflect_about_edge(poly: &CellPolygon, edge: EdgeId, tol: Tolerances) -> CellPolygon {
    let i0 = edge.index();
    let i1 = i0 + 1;
    let (a, b) = poly.edge(edge);
    let mut out = *poly;
    if tol.is_close(a.x, b.x) {
        for (i, p) in out.v.iter_mut().enumerate() {
            if i == i0 || i == i1 {
                continue;
            }
            p.x = 2.0 * a.x - p.x;
        }
    } else {
        let m = (b.y - a.y) / (b.x - a.x);
        let c = (b.x * a.y - a.x * b.y) / (b.x - a.x);
        for (i, p) in out.v.iter_mut().enumerate() {
            if i == i0 || i == i1 {
                continue;
            }
            let d = (p.x + (p.y - c) * m) / (1.0 + m * m);
            *p = Vector2::new(2.0 * d - p.x, 2.0 * d * m - p.y + 2.0 * c);
        }
    }
    out
}
