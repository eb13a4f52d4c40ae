//! Easing functions for animations
//!
//! Power curves are named by exponent: quad is `t²`, cubic `t³`, quart `t⁴`,
//! quint `t⁵`.

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value.
    ///
    /// Input is clamped to `[0, 1]`; every curve maps 0 to 0 and 1 to 1.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => ease_in(t, 2),
            Easing::EaseOutQuad => ease_out(t, 2),
            Easing::EaseInOutQuad => ease_in_out(t, 2),
            Easing::EaseInCubic => ease_in(t, 3),
            Easing::EaseOutCubic => ease_out(t, 3),
            Easing::EaseInOutCubic => ease_in_out(t, 3),
            Easing::EaseInQuart => ease_in(t, 4),
            Easing::EaseOutQuart => ease_out(t, 4),
            Easing::EaseInOutQuart => ease_in_out(t, 4),
            Easing::EaseInQuint => ease_in(t, 5),
            Easing::EaseOutQuint => ease_out(t, 5),
            Easing::EaseInOutQuint => ease_in_out(t, 5),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

#[inline]
fn ease_in(t: f32, power: i32) -> f32 {
    t.powi(power)
}

#[inline]
fn ease_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power)
}

#[inline]
fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

/// Cubic bezier easing (CSS `cubic-bezier()` semantics).
///
/// Newton-Raphson on the x curve, bisection when the slope flattens.
/// Computed in f64 to keep per-frame sampling free of f32 jitter.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = x;
    for _ in 0..24 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
