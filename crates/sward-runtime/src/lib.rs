//! Sward Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the host render loop drives once per frame:
//! - `GameClock` - elapsed/delta time tracking
//! - `RuntimeSystem` - trait for systems ticked by the frame loop
//! - `Runtime` - owns registered systems and ticks them in order

mod clock;
mod runner;
mod system;

pub use clock::GameClock;
pub use runner::Runtime;
pub use system::RuntimeSystem;
