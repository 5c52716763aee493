// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed cardinal spline.
//!
//! Knots carry a time and a tension. Each knot's velocity is the
//! Catmull-Rom central difference scaled by `2 * tension`, so tension 0.5
//! reproduces Catmull-Rom, 0 stops at the knot and 1 overshoots. Segments
//! are cubic Hermite curves parameterized by time, which keeps the curve C¹
//! across interior knots even when knots are unevenly spaced.

use crate::keyframe::Interpolation;

/// Smallest time span treated as non-degenerate
const SPAN_EPSILON: f32 = 1e-6;

/// One knot of a timed spline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineKnot {
    /// Knot time
    pub time: f32,
    /// Knot value
    pub value: [f32; 3],
    /// Curvature (0..1)
    pub tension: f32,
}

/// Velocity (value per second) at knot `i`
fn velocity(knots: &[SplineKnot], i: usize) -> [f32; 3] {
    let prev = &knots[i.saturating_sub(1)];
    let next = &knots[(i + 1).min(knots.len() - 1)];
    let dt = next.time - prev.time;
    if dt <= SPAN_EPSILON {
        return [0.0; 3];
    }
    let scale = 2.0 * knots[i].tension.clamp(0.0, 1.0) / dt;
    [
        (next.value[0] - prev.value[0]) * scale,
        (next.value[1] - prev.value[1]) * scale,
        (next.value[2] - prev.value[2]) * scale,
    ]
}

/// Sample knots (sorted by time) at `time`.
///
/// Times outside the knot range clamp to the first/last value. Returns
/// `None` when there are no knots.
pub fn sample(knots: &[SplineKnot], time: f32) -> Option<[f32; 3]> {
    let first = knots.first()?;
    let last = knots.last()?;
    if time <= first.time {
        return Some(first.value);
    }
    if time >= last.time {
        return Some(last.value);
    }

    let i = knots.iter().rposition(|k| k.time <= time)?;
    let (a, b) = (&knots[i], &knots[i + 1]);
    let span = b.time - a.time;
    if span <= SPAN_EPSILON {
        return Some(b.value);
    }

    let u = (time - a.time) / span;
    let va = velocity(knots, i);
    let vb = velocity(knots, i + 1);
    let m0 = [va[0] * span, va[1] * span, va[2] * span];
    let m1 = [vb[0] * span, vb[1] * span, vb[2] * span];
    Some(Interpolation::hermite_vec3(a.value, m0, b.value, m1, u))
}
