//! Core value types shared by sources, encoders and the pacing task.
//!
//! - [`RawFrame`] is one decoded picture handed from a source to an encoder
//! - [`SourceInfo`] is what a source reports when it is opened
//! - [`RateSetting`] and [`EffectiveRate`] turn the configured rate into the
//!   one rate the session runs at
//!
//! ## Usage Example
//!
//! ```rust
//! use drishti_stream::types::{RateSetting, SourceInfo};
//!
//! let info = SourceInfo { width: 640, height: 480, native_rate: 30.0, total_frames: 300 };
//!
//! let rate = RateSetting::Auto.resolve(&info).unwrap();
//! assert_eq!(rate.fps(), 30);
//! assert_eq!(rate.frames_per_tick(), 1.0);
//!
//! assert!(RateSetting::Fixed(60).resolve(&info).is_err());
//! ```

mod frame;
mod rate;

pub use frame::{RawFrame, SourceInfo};
pub use rate::{EffectiveRate, MAX_FPS, MIN_FPS, NTSC_TOLERANCE, RateSetting};
