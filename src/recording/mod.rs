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

//! Parsed disturbance-recording data model.
//!
//! A [`Recording`] is produced once by an upstream file parser and read-only
//! afterwards: analog and digital channel tracks sharing one time base, a
//! multi-rate sample table, and record metadata. Construction validates the
//! rate-segment invariants so the analysis layer can rely on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sampling rate assumed for a segment that carries a non-positive rate.
const FALLBACK_RATE_HZ: f64 = 50.0;

const MICROSECONDS_PER_SECOND: f64 = 1e6;

/// Errors reported when a recording fails construction-time validation.
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("recording has no rate segments")]
    NoRateSegments,

    #[error("rate segment {index} ends at sample {end_sample}, not after the previous bound {previous}")]
    UnorderedSegments {
        index: usize,
        end_sample: usize,
        previous: usize,
    },

    #[error("rate segments end at sample {last_bound} but the recording has {total_samples} samples")]
    SegmentCoverage {
        last_bound: usize,
        total_samples: usize,
    },

    #[error("channel '{name}' has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// One analog signal track within a recording.
///
/// Raw samples are stored as recorded; the calibrated value of a sample is
/// `raw * multiplier + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalogChannel {
    /// Channel name from the source configuration.
    pub name: String,
    /// Unit label, e.g. `"V"`, `"kV"`, `"A"`.
    pub unit: String,
    /// Raw sample values, one per recorded instant.
    pub samples: Vec<f64>,
    /// Linear calibration multiplier.
    pub multiplier: f64,
    /// Linear calibration offset.
    pub offset: f64,
    /// Timing offset against the shared time base, in microseconds.
    pub skew_us: f64,
    /// Primary/secondary flag as recorded in the source configuration;
    /// contains `P`/`p` when stored values are transformer-referred.
    pub ps: String,
    /// PT/CT transformation ratio (primary over secondary).
    pub ratio: f64,
    /// Whether the channel participates in analysis.
    pub active: bool,
    /// Cursor marker, carried through for the viewing collaborator.
    pub cursor: Option<usize>,
    /// Second cursor marker, carried through unchanged.
    pub cursor_alt: Option<usize>,
}

impl Default for AnalogChannel {
    fn default() -> Self {
        Self {
            name: String::new(),
            unit: String::new(),
            samples: Vec::new(),
            multiplier: 1.0,
            offset: 0.0,
            skew_us: 0.0,
            ps: "S".to_string(),
            ratio: 1.0,
            active: true,
            cursor: None,
            cursor_alt: None,
        }
    }
}

impl AnalogChannel {
    /// Apply the channel's linear calibration to a raw sample value.
    #[must_use]
    pub fn calibrated(&self, raw: f64) -> f64 {
        raw * self.multiplier + self.offset
    }
}

/// One digital (status) signal track within a recording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigitalChannel {
    /// Channel name from the source configuration.
    pub name: String,
    /// 0/1 states, one per recorded instant.
    pub samples: Vec<i8>,
}

/// A sampling-rate segment: `rate_hz` applies to sample indices below
/// `end_sample`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSegment {
    /// Sampling rate in samples per second.
    pub rate_hz: f64,
    /// Exclusive upper sample-index bound for this rate.
    pub end_sample: usize,
}

/// Signal kind marker used by grouping selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "A")]
    Analog,
    #[serde(rename = "D")]
    Digital,
}

/// Free-form channel grouping selector, carried through for the viewing
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSelector {
    /// Whether the selector addresses analog or digital channels.
    pub kind: SignalKind,
    /// Phase marker, e.g. `"A"`, `"B"`, `"C"`, `"N"`.
    pub phase: String,
}

/// Record metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingMeta {
    /// Start time of the recording.
    pub start_time: DateTime<Utc>,
    /// Multiplier applied to raw timestamp values when no rate table is
    /// available; `0` is treated as `1`.
    pub time_multiplier: f64,
    /// Channel grouping selectors.
    pub selectors: Vec<GroupSelector>,
}

/// A single captured multi-channel disturbance record with one shared time
/// base.
///
/// Created once by the upstream parser and never mutated by the analysis
/// layer. [`Recording::new`] enforces the segment-table invariants; values
/// deserialized from elsewhere can be re-checked with [`Recording::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Analog channel tracks.
    pub analog: Vec<AnalogChannel>,
    /// Digital channel tracks.
    pub digital: Vec<DigitalChannel>,
    /// Ordered sampling-rate segments partitioning the sample-index range.
    pub segments: Vec<RateSegment>,
    /// Raw timestamp values, one per recorded instant. May be empty when the
    /// segment table fully describes the time base.
    pub timestamps: Vec<f64>,
    /// Record metadata.
    pub meta: RecordingMeta,
}

impl Recording {
    /// Build a validated recording.
    pub fn new(
        analog: Vec<AnalogChannel>,
        digital: Vec<DigitalChannel>,
        segments: Vec<RateSegment>,
        timestamps: Vec<f64>,
        meta: RecordingMeta,
    ) -> Result<Self, RecordingError> {
        let recording = Self {
            analog,
            digital,
            segments,
            timestamps,
            meta,
        };
        recording.validate()?;
        Ok(recording)
    }

    /// Check the segment-table and channel-length invariants.
    ///
    /// Segments must be non-empty with strictly increasing bounds, every
    /// channel must carry the shared sample count, and the final bound must
    /// equal that count.
    pub fn validate(&self) -> Result<(), RecordingError> {
        if self.segments.is_empty() {
            return Err(RecordingError::NoRateSegments);
        }

        let mut previous = 0usize;
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 && segment.end_sample <= previous {
                return Err(RecordingError::UnorderedSegments {
                    index,
                    end_sample: segment.end_sample,
                    previous,
                });
            }
            previous = segment.end_sample;
        }

        let total = self.total_samples();
        for channel in &self.analog {
            if channel.samples.len() != total {
                return Err(RecordingError::ChannelLengthMismatch {
                    name: channel.name.clone(),
                    expected: total,
                    actual: channel.samples.len(),
                });
            }
        }
        for channel in &self.digital {
            if channel.samples.len() != total {
                return Err(RecordingError::ChannelLengthMismatch {
                    name: channel.name.clone(),
                    expected: total,
                    actual: channel.samples.len(),
                });
            }
        }

        if total > 0 && previous != total {
            return Err(RecordingError::SegmentCoverage {
                last_bound: previous,
                total_samples: total,
            });
        }

        Ok(())
    }

    /// Number of recorded instants shared by every channel.
    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.analog
            .first()
            .map(|c| c.samples.len())
            .or_else(|| self.digital.first().map(|c| c.samples.len()))
            .unwrap_or(self.timestamps.len())
    }

    /// Per-sample time axis in microseconds, derived from the rate table.
    #[must_use]
    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(
            &self.segments,
            &self.timestamps,
            self.meta.time_multiplier,
            self.total_samples(),
        )
    }
}

/// Build a per-sample time axis in microseconds.
///
/// When `segments` is non-empty the axis is accumulated segment by segment as
/// `elapsed + (i - segment_start) / rate`; a non-positive rate falls back to
/// [`FALLBACK_RATE_HZ`], and indices past the last bound continue at the last
/// segment's rate. Otherwise the raw `timestamps` scaled by `time_multiplier`
/// are used (`0` treated as `1`).
#[must_use]
pub fn time_axis(
    segments: &[RateSegment],
    timestamps: &[f64],
    time_multiplier: f64,
    sample_len: usize,
) -> Vec<f64> {
    let mut result = vec![0.0; sample_len];

    if segments.is_empty() {
        let multiplier = if time_multiplier == 0.0 {
            1.0
        } else {
            time_multiplier
        };
        for (value, stamp) in result.iter_mut().zip(timestamps) {
            *value = stamp * multiplier;
        }
        return result;
    }

    let mut elapsed = 0.0;
    let mut segment_start = 0usize;
    for segment in segments {
        let end = segment.end_sample.min(sample_len);
        if end > segment_start {
            let rate = effective_rate(segment.rate_hz);
            for (i, value) in result[segment_start..end].iter_mut().enumerate() {
                *value = elapsed + i as f64 / rate * MICROSECONDS_PER_SECOND;
            }
            elapsed += (end - segment_start) as f64 / rate * MICROSECONDS_PER_SECOND;
            segment_start = end;
        }
        if segment_start >= sample_len {
            break;
        }
    }

    if segment_start < sample_len {
        // Bounds stop short of the data; keep ticking at the last known rate.
        let rate = segments
            .last()
            .map_or(FALLBACK_RATE_HZ, |s| effective_rate(s.rate_hz));
        for (i, value) in result[segment_start..].iter_mut().enumerate() {
            *value = elapsed + i as f64 / rate * MICROSECONDS_PER_SECOND;
        }
    }

    result
}

fn effective_rate(rate_hz: f64) -> f64 {
    if rate_hz <= 0.0 {
        FALLBACK_RATE_HZ
    } else {
        rate_hz
    }
}
