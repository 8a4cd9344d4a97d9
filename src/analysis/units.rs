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

//! Skew correction and unit conversion.
//!
//! Adjusts a phasor's angle for per-channel sampling skew and scales its RMS
//! magnitude between primary- and secondary-referred representations,
//! including kilo-unit scaling on the primary side.

use std::f64::consts::PI;

use crate::recording::AnalogChannel;

/// Divisor mapping a microsecond skew into radians at the nominal frequency.
const SKEW_TIME_DIVISOR: f64 = 20_000.0;

/// A kilo-marked unit label only counts as kilo-scaled when the calibration
/// multiplier stays below this threshold.
const KILO_MULTIPLIER_THRESHOLD: f64 = 1.0;

const KILO_DIVISOR: f64 = 1000.0;

const PRIMARY_MARKER: char = 'p';
const KILO_MARKER: char = 'k';

/// Apply skew correction and primary/secondary scaling to an RMS/angle pair.
///
/// When `want_primary` is set, a secondary-referred channel is scaled up by
/// its transformation ratio and the result is expressed in kilo-units unless
/// the channel already carries a kilo-scaled label. The reverse direction
/// only divides primary-referred channels back by the ratio; there is no
/// matching kilo un-scaling on that path. NaN in either output is replaced
/// with 0.
#[must_use]
pub fn convert(rms: f64, angle: f64, channel: &AnalogChannel, want_primary: bool) -> (f64, f64) {
    let mut rms = rms;
    let mut angle = angle - (channel.skew_us * 2.0 * PI) / SKEW_TIME_DIVISOR;

    let already_primary = is_primary(channel);

    if want_primary {
        if !already_primary {
            rms *= channel.ratio;
        }
        if !has_kilo_unit(channel) {
            rms /= KILO_DIVISOR;
        }
    } else if already_primary {
        rms /= channel.ratio;
    }

    if rms.is_nan() {
        rms = 0.0;
    }
    if angle.is_nan() {
        angle = 0.0;
    }

    (rms, angle)
}

/// Whether the channel's stored values are already transformer-referred.
pub(crate) fn is_primary(channel: &AnalogChannel) -> bool {
    channel.ps.to_lowercase().contains(PRIMARY_MARKER)
}

/// Whether the channel's unit label denotes a genuinely kilo-scaled quantity.
pub(crate) fn has_kilo_unit(channel: &AnalogChannel) -> bool {
    channel.unit.to_lowercase().contains(KILO_MARKER)
        && channel.multiplier < KILO_MULTIPLIER_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(unit: &str, ps: &str, ratio: f64) -> AnalogChannel {
        AnalogChannel {
            unit: unit.to_string(),
            ps: ps.to_string(),
            ratio,
            ..Default::default()
        }
    }

    #[test]
    fn test_secondary_to_secondary_is_identity() {
        let ch = channel("V", "S", 1.0);
        let (rms, angle) = convert(57.7, 0.3, &ch, false);
        assert!((rms - 57.7).abs() < 1e-12);
        assert!((angle - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_secondary_to_primary_scales_ratio_and_kilo() {
        let ch = channel("V", "S", 100.0);
        let (rms, _) = convert(57.7, 0.0, &ch, true);
        assert!((rms - 57.7 * 100.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_kilo_label_skips_kilo_division() {
        let ch = AnalogChannel {
            multiplier: 0.01,
            ..channel("kV", "P", 100.0)
        };
        let (rms, _) = convert(57.7, 0.0, &ch, true);
        // Already primary and already kilo-scaled: untouched.
        assert!((rms - 57.7).abs() < 1e-12);
    }

    #[test]
    fn test_kilo_label_with_large_multiplier_still_divides() {
        let ch = AnalogChannel {
            multiplier: 2.0,
            ..channel("kV", "P", 100.0)
        };
        let (rms, _) = convert(57.7, 0.0, &ch, true);
        assert!((rms - 57.7 / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_primary_to_secondary_divides_ratio() {
        let ch = channel("A", "P", 40.0);
        let (rms, _) = convert(80.0, 0.0, &ch, false);
        assert!((rms - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_marker_matching_is_case_insensitive() {
        assert!(is_primary(&channel("V", "Pri", 1.0)));
        assert!(is_primary(&channel("V", "p", 1.0)));
        assert!(!is_primary(&channel("V", "S", 1.0)));
        let kv = AnalogChannel {
            multiplier: 0.5,
            ..channel("KV", "S", 1.0)
        };
        assert!(has_kilo_unit(&kv));
    }

    #[test]
    fn test_skew_shifts_angle() {
        let ch = AnalogChannel {
            skew_us: 10_000.0,
            ..channel("V", "S", 1.0)
        };
        let (_, angle) = convert(1.0, 0.0, &ch, false);
        assert!((angle + PI).abs() < 1e-12);
    }

    #[test]
    fn test_nan_coerced_to_zero() {
        let ch = channel("V", "S", f64::NAN);
        let (rms, angle) = convert(1.0, 0.0, &ch, true);
        assert_eq!(rms, 0.0);
        assert_eq!(angle, 0.0);

        let skewed = AnalogChannel {
            skew_us: f64::NAN,
            ..channel("V", "S", 1.0)
        };
        let (rms, angle) = convert(1.0, 0.0, &skewed, false);
        assert!((rms - 1.0).abs() < 1e-12);
        assert_eq!(angle, 0.0);
    }
}
