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

//! Sample-rate resolution.
//!
//! Maps a cursor sample index onto the rate-segment table to find the cycle
//! length in effect at that index, shifting the analysis start backward when
//! the cycle window would otherwise cross a rate boundary.

use crate::recording::RateSegment;

/// Nominal power-system frequency in Hz.
pub const NOMINAL_POWER_FREQUENCY_HZ: f64 = 50.0;

/// Cycle-length resolution for one cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    /// Samples spanning one cycle of the nominal power frequency at the rate
    /// in effect; `0` when the index falls beyond every segment, meaning no
    /// value is computable there.
    pub samples_per_cycle: usize,
    /// Analysis start index, moved back from the cursor index when the window
    /// must be kept inside a single rate segment.
    pub start_index: usize,
}

/// Resolve the cycle length and analysis start index for a cursor index.
///
/// Segments are scanned in order and the first whose bound exceeds `index`
/// wins. A computed cycle length of zero samples (rate below the nominal
/// frequency) is clamped to 1.
#[must_use]
pub fn cycle_length(segments: &[RateSegment], index: usize) -> CycleWindow {
    let mut samples_per_cycle = 0usize;
    let mut start_index = index;

    for segment in segments {
        if index < segment.end_sample {
            // Keep the window from running across the segment boundary.
            if segment.end_sample - index < samples_per_cycle {
                start_index = segment.end_sample - samples_per_cycle;
            }

            samples_per_cycle = (segment.rate_hz / NOMINAL_POWER_FREQUENCY_HZ) as usize;
            if samples_per_cycle == 0 {
                samples_per_cycle = 1;
            }
            break;
        }
    }

    CycleWindow {
        samples_per_cycle,
        start_index,
    }
}
