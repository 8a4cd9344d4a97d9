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

//! Analysis window extraction.
//!
//! Pulls a bounded run of calibrated samples from one channel. The window is
//! one and a half cycles long so the transform still has enough points when
//! the per-cycle count is small.

use log::debug;

use crate::recording::AnalogChannel;

/// Extract `ceil(samples_per_cycle * 1.5)` calibrated samples starting at
/// `start_index`.
///
/// Reads past the end of the channel repeat the last sample instead of
/// failing; a channel with no samples at all yields a NaN window, which the
/// downstream NaN coercion turns into zero results.
#[must_use]
pub fn extract(channel: &AnalogChannel, start_index: usize, samples_per_cycle: usize) -> Vec<f64> {
    let length = samples_per_cycle + samples_per_cycle.div_ceil(2);
    let last = channel.samples.len().checked_sub(1);
    if last.is_none() {
        debug!("channel '{}' has no samples", channel.name);
    }

    let mut window = Vec::with_capacity(length);
    for j in 0..length {
        let raw = match last {
            Some(last) => channel.samples[(start_index + j).min(last)],
            None => f64::NAN,
        };
        window.push(channel.calibrated(raw));
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(samples: Vec<f64>) -> AnalogChannel {
        AnalogChannel {
            samples,
            multiplier: 2.0,
            offset: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_length_is_one_and_a_half_cycles() {
        let ch = channel(vec![0.0; 100]);
        assert_eq!(extract(&ch, 0, 4).len(), 6);
        assert_eq!(extract(&ch, 0, 5).len(), 8); // ceil(7.5)
        assert_eq!(extract(&ch, 0, 1).len(), 2);
    }

    #[test]
    fn test_applies_calibration() {
        let ch = channel(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let window = extract(&ch, 0, 4);
        assert_eq!(window, vec![3.0, 5.0, 7.0, 9.0, 11.0, 13.0]);
    }

    #[test]
    fn test_reads_past_end_repeat_last_sample() {
        let ch = channel(vec![1.0, 2.0, 3.0]);
        let window = extract(&ch, 1, 4);
        // Samples 1, 2 then the last sample repeated.
        assert_eq!(window, vec![5.0, 7.0, 7.0, 7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_empty_channel_yields_nan() {
        let ch = channel(Vec::new());
        let window = extract(&ch, 0, 2);
        assert_eq!(window.len(), 3);
        assert!(window.iter().all(|v| v.is_nan()));
    }
}
