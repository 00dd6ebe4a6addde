//! Petal Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the host's per-frame callback drives:
//! - `FrameClock` - clamped per-frame delta and elapsed time
//! - `RuntimeSystem` - trait for systems ticked once per rendered frame

mod clock;
mod system;

pub use clock::{FrameClock, DEFAULT_MAX_DELTA};
pub use system::RuntimeSystem;
