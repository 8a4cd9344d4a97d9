// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-harmonic discrete Fourier transform.
//!
//! Extracts one frequency component from an analysis window rather than a
//! full spectrum: the sine/cosine correlation sums over one cycle, normalized
//! by the half-cycle count.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Correlate `window` against the selected harmonic of the cycle frequency.
///
/// The first `samples_per_cycle` window samples contribute. A single-sample
/// cycle at the fundamental is a preserved special case that reads two
/// consecutive samples directly as the rectangular pair instead of
/// transforming. All arithmetic stays in `f64`, so degenerate inputs produce
/// NaN components for the caller to coerce, never a fault.
#[must_use]
pub fn transform(window: &[f64], samples_per_cycle: usize, harmonic: u32) -> Complex64 {
    if samples_per_cycle == 1 {
        if harmonic == 1 {
            return Complex64::new(
                window.first().copied().unwrap_or(f64::NAN),
                window.get(1).copied().unwrap_or(f64::NAN),
            );
        }
        return Complex64::new(0.0, 0.0);
    }

    let half = (samples_per_cycle / 2) as f64;
    let mut re = 0.0;
    let mut im = 0.0;
    for (k, sample) in window.iter().take(samples_per_cycle).enumerate() {
        let angle = k as f64 * f64::from(harmonic) * PI / half;
        re += sample * angle.sin();
        im += sample * angle.cos();
    }

    Complex64::new(re / half, im / half)
}
