//! Frame source implementations and wrappers
//!
//! A session reads from a stack of sources:
//!
//! ```text
//! Decimate (only when the effective rate is below native)
//!   └── LoopingSource (rewinds on end-of-stream)
//!         └── ImageSequenceSource (decodes files)
//! ```

pub mod decimate;
pub mod image_sequence;
pub mod looping;

pub use decimate::Decimate;
pub use image_sequence::ImageSequenceSource;
pub use looping::LoopingSource;
