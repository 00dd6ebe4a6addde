//! Runtime system trait

use crate::FrameClock;
use petal_core::Result;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order, once per rendered frame.
/// Input handlers run between updates, never during one.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame with the already-advanced clock
    fn update(&mut self, clock: &FrameClock) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
