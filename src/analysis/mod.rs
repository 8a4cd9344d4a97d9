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

//! Cursor value and phasor computation.
//!
//! The [`ValueFormatter`] composes the analysis layers for one cursor
//! position: it resolves the cycle length from the rate table, extracts a
//! calibrated window per active channel, runs the single-harmonic transform,
//! and applies skew and unit conversion before formatting the result. Every
//! call is a pure function of the recording and the cursor index — no state
//! is carried between calls.

pub mod dft;
pub mod phasor;
pub mod rate;
pub mod units;
pub mod window;

pub use phasor::Phasor;
pub use rate::{cycle_length, CycleWindow, NOMINAL_POWER_FREQUENCY_HZ};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::recording::{AnalogChannel, Recording};

/// Decimal digits in the formatted RMS display string.
const RMS_DECIMAL_PLACES: usize = 3;

/// Decimal digits for the rounded instantaneous readout.
const INSTANTANEOUS_DECIMAL_PLACES: i32 = 2;

/// Unit prefix attached to primary-referred display values.
const KILO_PREFIX: &str = "k";

/// Per-channel readout for one cursor position.
///
/// Produced fresh on every query; owned entirely by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueResult {
    /// Channel name from the source recording.
    pub name: String,
    /// Position in the recording's analog channel list. Inactive channels
    /// are skipped in the output but still counted here.
    pub position: usize,
    /// RMS magnitude formatted with unit label, e.g. `"57.735kV"`.
    pub display: String,
    /// Calibrated instantaneous value at the cursor index.
    pub instantaneous: f64,
    /// Raw instantaneous sample at the cursor index.
    pub raw: f64,
}

impl ValueResult {
    /// Instantaneous value rounded to two decimals for cursor readout
    /// display.
    #[must_use]
    pub fn instantaneous_rounded(&self) -> f64 {
        let scale = 10f64.powi(INSTANTANEOUS_DECIMAL_PLACES);
        (self.instantaneous * scale).round() / scale
    }
}

/// Computes per-channel display values for cursor positions in a recording.
#[derive(Debug, Clone, Copy)]
pub struct ValueFormatter<'a> {
    recording: &'a Recording,
}

impl<'a> ValueFormatter<'a> {
    /// Create a formatter borrowing the recording read-only.
    #[must_use]
    pub fn new(recording: &'a Recording) -> Self {
        Self { recording }
    }

    /// Fundamental-frequency values for every active analog channel at
    /// `index`.
    #[must_use]
    pub fn values_at(&self, index: usize, want_primary: bool) -> Vec<ValueResult> {
        self.values_at_harmonic(index, want_primary, 1)
    }

    /// Values for the selected harmonic of the nominal frequency.
    ///
    /// Returns one entry per active channel in channel order. A cursor index
    /// beyond every rate segment has no computable cycle length and yields an
    /// empty set.
    #[must_use]
    pub fn values_at_harmonic(
        &self,
        index: usize,
        want_primary: bool,
        harmonic: u32,
    ) -> Vec<ValueResult> {
        let cycle = rate::cycle_length(&self.recording.segments, index);
        if cycle.samples_per_cycle == 0 {
            debug!("cursor index {index} is beyond every rate segment, nothing to compute");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(self.recording.analog.len());
        for (position, channel) in self.recording.analog.iter().enumerate() {
            if !channel.active {
                continue;
            }

            let window = window::extract(channel, cycle.start_index, cycle.samples_per_cycle);
            let component = dft::transform(&window, cycle.samples_per_cycle, harmonic);

            let mut phasor = Phasor::from_rectangular(component);
            let (rms, angle) = units::convert(
                phasor.rms_secondary(),
                phasor.angle_secondary(),
                channel,
                want_primary,
            );
            phasor.set_secondary_polar(rms, angle);

            results.push(build_result(channel, &phasor, position, index, want_primary));
        }

        results
    }
}

fn build_result(
    channel: &AnalogChannel,
    phasor: &Phasor,
    position: usize,
    index: usize,
    want_primary: bool,
) -> ValueResult {
    let rms = phasor.rms_secondary();
    let prefix = if want_primary { KILO_PREFIX } else { "" };
    let display = format!(
        "{rms:.prec$}{prefix}{unit}",
        prec = RMS_DECIMAL_PLACES,
        unit = channel.unit
    );

    // A raw sample of exactly zero skips calibration; zero doubles as the
    // missing-sample sentinel in the source data.
    let raw = channel.samples.get(index).copied();
    let instantaneous = match raw {
        Some(value) if value != 0.0 => channel.calibrated(value),
        _ => 0.0,
    };

    ValueResult {
        name: channel.name.clone(),
        position,
        display,
        instantaneous,
        raw: raw.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RateSegment, RecordingMeta};
    use std::f64::consts::{PI, SQRT_2};

    const RATE_HZ: f64 = 3000.0;
    const TOTAL_SAMPLES: usize = 600;

    /// Full-length sinusoid at the given harmonic of 50 Hz, peak amplitude
    /// `peak`, sampled at 3 kHz (60 samples per cycle).
    fn sinusoid(peak: f64, harmonic: u32) -> Vec<f64> {
        (0..TOTAL_SAMPLES)
            .map(|k| peak * (2.0 * PI * f64::from(harmonic) * k as f64 / 60.0).sin())
            .collect()
    }

    fn recording(channels: Vec<AnalogChannel>) -> Recording {
        Recording::new(
            channels,
            Vec::new(),
            vec![RateSegment {
                rate_hz: RATE_HZ,
                end_sample: TOTAL_SAMPLES,
            }],
            Vec::new(),
            RecordingMeta::default(),
        )
        .expect("valid test recording")
    }

    fn voltage_channel(name: &str, samples: Vec<f64>) -> AnalogChannel {
        AnalogChannel {
            name: name.to_string(),
            unit: "V".to_string(),
            samples,
            ..Default::default()
        }
    }

    #[test]
    fn test_formats_rms_of_sinusoid() {
        // Peak sqrt(2) makes the RMS exactly 1.
        let rec = recording(vec![voltage_channel("VA", sinusoid(SQRT_2, 1))]);
        let results = ValueFormatter::new(&rec).values_at(0, false);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display, "1.000V");
    }

    #[test]
    fn test_primary_display_gets_kilo_prefix() {
        let channel = AnalogChannel {
            ratio: 100.0,
            ..voltage_channel("VA", sinusoid(SQRT_2, 1))
        };
        let rec = recording(vec![channel]);
        let results = ValueFormatter::new(&rec).values_at(0, true);

        // 1 V secondary * 100 / 1000 = 0.1 kV.
        assert_eq!(results[0].display, "0.100kV");
    }

    #[test]
    fn test_skips_inactive_channels_but_keeps_positions() {
        let active = voltage_channel("VA", sinusoid(1.0, 1));
        let inactive = AnalogChannel {
            active: false,
            ..voltage_channel("VB", sinusoid(1.0, 1))
        };
        let last = voltage_channel("VC", sinusoid(1.0, 1));
        let rec = recording(vec![active, inactive, last]);

        let results = ValueFormatter::new(&rec).values_at(0, false);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "VA");
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].name, "VC");
        assert_eq!(results[1].position, 2);
    }

    #[test]
    fn test_index_beyond_segments_yields_empty() {
        let rec = recording(vec![voltage_channel("VA", sinusoid(1.0, 1))]);
        let results = ValueFormatter::new(&rec).values_at(TOTAL_SAMPLES + 100, false);
        assert!(results.is_empty());
    }

    #[test]
    fn test_instantaneous_value_uses_original_index() {
        let mut samples = vec![0.0; TOTAL_SAMPLES];
        samples[10] = 5.0;
        let channel = AnalogChannel {
            multiplier: 2.0,
            offset: 1.0,
            ..voltage_channel("VA", samples)
        };
        let rec = recording(vec![channel]);

        let results = ValueFormatter::new(&rec).values_at(10, false);
        assert!((results[0].instantaneous - 11.0).abs() < 1e-12);
        assert!((results[0].raw - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_raw_sample_skips_calibration_offset() {
        let channel = AnalogChannel {
            multiplier: 2.0,
            offset: 1.0,
            ..voltage_channel("VA", vec![0.0; TOTAL_SAMPLES])
        };
        let rec = recording(vec![channel]);

        let results = ValueFormatter::new(&rec).values_at(10, false);
        // The offset alone would give 1.0; the zero sentinel wins.
        assert_eq!(results[0].instantaneous, 0.0);
        assert_eq!(results[0].raw, 0.0);
    }

    #[test]
    fn test_nan_magnitude_formats_as_zero() {
        let channel = AnalogChannel {
            ratio: f64::NAN,
            ..voltage_channel("VA", sinusoid(1.0, 1))
        };
        let rec = recording(vec![channel]);

        let results = ValueFormatter::new(&rec).values_at(0, true);
        assert_eq!(results[0].display, "0.000kV");
    }

    #[test]
    fn test_harmonic_selection() {
        let rec = recording(vec![voltage_channel("VA", sinusoid(SQRT_2, 3))]);
        let formatter = ValueFormatter::new(&rec);

        let third = formatter.values_at_harmonic(0, false, 3);
        let fundamental = formatter.values_at(0, false);
        assert_eq!(third[0].display, "1.000V");
        assert_eq!(fundamental[0].display, "0.000V");
    }

    #[test]
    fn test_rounded_instantaneous() {
        let result = ValueResult {
            name: "VA".to_string(),
            position: 0,
            display: String::new(),
            instantaneous: 3.14159,
            raw: 0.0,
        };
        assert!((result.instantaneous_rounded() - 3.14).abs() < 1e-12);
    }
}
