//! Analysis window tables
//!
//! Tables are computed once per analyzer and applied by element-wise
//! multiplication before each transform.

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Rectangular window (no windowing)
    Rectangular,
}

/// Generate window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f32> {
    if length < 2 {
        return vec![1.0; length];
    }

    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / denom;
            let w = match window_type {
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Rectangular => 1.0,
            };
            w as f32
        })
        .collect()
}

/// Amplitude correction factor: M / Σw[n]
///
/// Multiplying the table by this restores unit gain for a DC input.
pub fn window_correction_factor(window: &[f32]) -> f32 {
    let sum: f64 = window.iter().map(|&w| w as f64).sum();
    if sum > 0.0 {
        (window.len() as f64 / sum) as f32
    } else {
        1.0
    }
}

/// Window table, optionally normalized so the coefficients sum to its length
pub fn window_table(window_type: WindowType, length: usize, normalize: bool) -> Vec<f32> {
    let mut window = generate_window(window_type, length);
    if normalize {
        let factor = window_correction_factor(&window);
        for w in window.iter_mut() {
            *w *= factor;
        }
    }
    window
}

/// Multiply `signal` by `window` in place
#[inline]
pub fn apply_window_inplace(signal: &mut [f32], window: &[f32]) {
    for (s, &w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}
