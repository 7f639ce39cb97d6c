//! Synthetic program-guide generation.
//!
//! Live channels carry no real schedule, so the guide is synthesized from
//! fixed three-hour blocks anchored to the hour the run executes in.

pub mod error;
pub mod schedule;
pub mod xmltv;

pub use error::GuideError;
pub use schedule::{GUIDE_TZ, TimeBlock, generate_blocks};
pub use xmltv::GuideBuilder;
