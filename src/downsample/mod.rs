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

//! Display downsampling.
//!
//! Reduces channel traces to a renderable point count for the viewing
//! collaborator: Largest-Triangle-Three-Buckets for analog traces, which
//! keeps visually significant extremes, and a state-change keeper for
//! digital traces.

use log::warn;

/// Downsample an analog trace to `target_points` using
/// Largest-Triangle-Three-Buckets.
///
/// The first and last points are always kept; each interior bucket
/// contributes the point forming the largest triangle with the previously
/// kept point and the next bucket's average. Inputs already at or below the
/// target, or a target below 3, are returned unchanged.
#[must_use]
pub fn lttb(timestamps: &[f64], values: &[f64], target_points: usize) -> (Vec<f64>, Vec<f64>) {
    let n = trace_len(timestamps, values);
    if n <= target_points || target_points < 3 {
        return (timestamps[..n].to_vec(), values[..n].to_vec());
    }

    let mut out_t = Vec::with_capacity(target_points);
    let mut out_y = Vec::with_capacity(target_points);
    out_t.push(timestamps[0]);
    out_y.push(values[0]);

    let bucket_size = (n - 2) as f64 / (target_points - 2) as f64;

    for i in 0..target_points - 2 {
        let avg_start = ((i + 1) as f64 * bucket_size) as usize + 1;
        let avg_end = ((((i + 2) as f64) * bucket_size) as usize + 1).min(n);

        // Average point of the next bucket.
        let mut avg_x = 0.0;
        let mut avg_y = 0.0;
        let count = avg_end.saturating_sub(avg_start);
        if count > 0 {
            for j in avg_start..avg_end {
                avg_x += timestamps[j];
                avg_y += values[j];
            }
            avg_x /= count as f64;
            avg_y /= count as f64;
        }

        let range_start = (i as f64 * bucket_size) as usize + 1;
        let range_end = avg_start.min(n);

        let last_x = out_t[out_t.len() - 1];
        let last_y = out_y[out_y.len() - 1];

        let mut max_area = -1.0;
        let mut max_index = range_start;
        for j in range_start..range_end {
            let area = ((last_x - avg_x) * (values[j] - last_y)
                - (last_x - timestamps[j]) * (avg_y - last_y))
                .abs()
                * 0.5;
            if area > max_area {
                max_area = area;
                max_index = j;
            }
        }

        out_t.push(timestamps[max_index]);
        out_y.push(values[max_index]);
    }

    out_t.push(timestamps[n - 1]);
    out_y.push(values[n - 1]);

    (out_t, out_y)
}

/// Downsample a digital trace by keeping state changes.
///
/// The first and last points are always kept; an interior point survives when
/// it differs from either neighbor, so every edge of the trace is preserved
/// with the sample on each side.
#[must_use]
pub fn digital(timestamps: &[f64], states: &[i8]) -> (Vec<f64>, Vec<i8>) {
    let n = trace_len(timestamps, states);
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut out_t = vec![timestamps[0]];
    let mut out_y = vec![states[0]];

    for i in 1..n.saturating_sub(1) {
        if states[i] != states[i + 1] || states[i] != states[i - 1] {
            out_t.push(timestamps[i]);
            out_y.push(states[i]);
        }
    }

    out_t.push(timestamps[n - 1]);
    out_y.push(states[n - 1]);

    (out_t, out_y)
}

/// Usable trace length; a timestamp/value length mismatch truncates to the
/// shorter side.
fn trace_len<T>(timestamps: &[f64], values: &[T]) -> usize {
    if timestamps.len() != values.len() {
        warn!(
            "trace length mismatch: {} timestamps, {} values",
            timestamps.len(),
            values.len()
        );
    }
    timestamps.len().min(values.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_lttb_returns_short_input_unchanged() {
        let t = ramp(5);
        let y = vec![1.0, 2.0, 3.0, 2.0, 1.0];
        let (out_t, out_y) = lttb(&t, &y, 10);
        assert_eq!(out_t, t);
        assert_eq!(out_y, y);
    }

    #[test]
    fn test_lttb_ignores_tiny_targets() {
        let t = ramp(10);
        let y = ramp(10);
        let (out_t, _) = lttb(&t, &y, 2);
        assert_eq!(out_t.len(), 10);
    }

    #[test]
    fn test_lttb_hits_target_and_keeps_endpoints() {
        let t = ramp(1000);
        let y: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.1).sin()).collect();
        let (out_t, out_y) = lttb(&t, &y, 100);
        assert_eq!(out_t.len(), 100);
        assert_eq!(out_y.len(), 100);
        assert_eq!(out_t[0], 0.0);
        assert_eq!(out_t[99], 999.0);
    }

    #[test]
    fn test_lttb_keeps_spike() {
        let t = ramp(1000);
        let mut y = vec![0.0; 1000];
        y[437] = 100.0;
        let (_, out_y) = lttb(&t, &y, 50);
        assert!(out_y.contains(&100.0));
    }

    #[test]
    fn test_digital_keeps_transitions() {
        let states: Vec<i8> = vec![0, 0, 0, 1, 1, 1, 0, 0, 0];
        let t = ramp(states.len());
        let (out_t, out_y) = digital(&t, &states);
        assert_eq!(out_t, vec![0.0, 2.0, 3.0, 5.0, 6.0, 8.0]);
        assert_eq!(out_y, vec![0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_digital_constant_trace_keeps_endpoints_only() {
        let states: Vec<i8> = vec![1; 20];
        let t = ramp(20);
        let (out_t, out_y) = digital(&t, &states);
        assert_eq!(out_t, vec![0.0, 19.0]);
        assert_eq!(out_y, vec![1, 1]);
    }

    #[test]
    fn test_digital_empty_trace() {
        let (out_t, out_y) = digital(&[], &[]);
        assert!(out_t.is_empty());
        assert!(out_y.is_empty());
    }
}
