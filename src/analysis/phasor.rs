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

//! Phasor representation.
//!
//! A rotating-vector view of one sinusoidal quantity, stored as rectangular
//! components. Each phasor keeps two independent pairs: the working
//! (secondary-representation) pair fed by the transform, and a
//! primary-representation pair. Conversions never mix the two.

use std::f64::consts::SQRT_2;

use num_complex::Complex64;

/// A measured phasor with secondary- and primary-representation pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phasor {
    secondary: Complex64,
    primary: Complex64,
}

impl Phasor {
    /// Phasor with both pairs zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phasor whose working (secondary) pair is seeded from a transform
    /// result.
    #[must_use]
    pub fn from_rectangular(value: Complex64) -> Self {
        Self {
            secondary: value,
            primary: Complex64::new(0.0, 0.0),
        }
    }

    /// Rectangular components of the secondary-representation pair.
    #[must_use]
    pub fn secondary(&self) -> Complex64 {
        self.secondary
    }

    /// Rectangular components of the primary-representation pair.
    #[must_use]
    pub fn primary(&self) -> Complex64 {
        self.primary
    }

    /// RMS magnitude of the secondary pair.
    #[must_use]
    pub fn rms_secondary(&self) -> f64 {
        rms(self.secondary)
    }

    /// RMS magnitude of the primary pair.
    #[must_use]
    pub fn rms_primary(&self) -> f64 {
        rms(self.primary)
    }

    /// Phase angle of the secondary pair in radians.
    #[must_use]
    pub fn angle_secondary(&self) -> f64 {
        angle(self.secondary)
    }

    /// Phase angle of the primary pair in radians.
    #[must_use]
    pub fn angle_primary(&self) -> f64 {
        angle(self.primary)
    }

    /// Overwrite the secondary pair from an RMS magnitude and angle.
    pub fn set_secondary_polar(&mut self, rms: f64, angle: f64) {
        self.secondary = from_polar(rms, angle);
    }

    /// Overwrite the primary pair from an RMS magnitude and angle.
    pub fn set_primary_polar(&mut self, rms: f64, angle: f64) {
        self.primary = from_polar(rms, angle);
    }
}

fn rms(pair: Complex64) -> f64 {
    ((pair.re * pair.re + pair.im * pair.im) / 2.0).sqrt()
}

/// An all-zero pair reports angle 0 rather than whatever `atan2` picks for
/// signed zeros.
fn angle(pair: Complex64) -> f64 {
    if pair.re == 0.0 && pair.im == 0.0 {
        return 0.0;
    }
    pair.im.atan2(pair.re)
}

/// Rebuild rectangular components from an RMS magnitude, assuming a
/// sinusoidal waveform (peak = rms * sqrt(2)).
fn from_polar(rms: f64, angle: f64) -> Complex64 {
    Complex64::new(rms * SQRT_2 * angle.cos(), rms * SQRT_2 * angle.sin())
}
