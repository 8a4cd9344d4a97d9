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

//! Analysis engine for power-system disturbance recordings.
//!
//! This library computes cursor readouts for COMTRADE-style fault records: an
//! upstream parser supplies a [`recording::Recording`] (channel sample
//! arrays, calibration constants, multi-rate sample table), and the engine
//! produces per-channel RMS magnitudes and phase angles via a
//! single-harmonic discrete Fourier transform, with skew correction and
//! primary/secondary unit conversion. The layers can be used independently
//! or composed together:
//!
//! - **Recording layer**: validated data model, time-axis derivation
//! - **Analysis layer**: cycle-length resolution, window extraction,
//!   single-harmonic DFT, phasors, unit conversion, value formatting
//! - **Downsample layer**: trace reduction for display
//!
//! Every analysis call is synchronous and side-effect free; the recording is
//! only ever read, so it can be shared across threads.
//!
//! # Quick Start
//!
//! ```
//! use comtrade_analysis::recording::{AnalogChannel, RateSegment, Recording, RecordingMeta};
//! use comtrade_analysis::ValueFormatter;
//!
//! let channel = AnalogChannel {
//!     name: "IA".to_string(),
//!     unit: "A".to_string(),
//!     samples: vec![0.0; 1200],
//!     ratio: 400.0,
//!     ..Default::default()
//! };
//! let recording = Recording::new(
//!     vec![channel],
//!     Vec::new(),
//!     vec![RateSegment { rate_hz: 3000.0, end_sample: 1200 }],
//!     Vec::new(),
//!     RecordingMeta::default(),
//! )
//! .expect("segment table covers the samples");
//!
//! let formatter = ValueFormatter::new(&recording);
//! for value in formatter.values_at(100, false) {
//!     println!("{}: {}", value.name, value.display);
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! The analysis primitives work without a full recording:
//!
//! ```
//! use comtrade_analysis::analysis::{cycle_length, dft, Phasor};
//! use comtrade_analysis::recording::RateSegment;
//!
//! let segments = [RateSegment { rate_hz: 3000.0, end_sample: 600 }];
//! let cycle = cycle_length(&segments, 100);
//! assert_eq!(cycle.samples_per_cycle, 60);
//!
//! let window = vec![0.0; 90];
//! let phasor = Phasor::from_rectangular(dft::transform(&window, 60, 1));
//! assert_eq!(phasor.angle_secondary(), 0.0);
//! ```

pub mod analysis;
pub mod downsample;
pub mod recording;

pub use analysis::{CycleWindow, Phasor, ValueFormatter, ValueResult};
pub use recording::{
    AnalogChannel, DigitalChannel, RateSegment, Recording, RecordingError, RecordingMeta,
};
