pub mod logging;
pub mod scene;
pub mod timer;

pub use timer::{TimerHandle, TimerQueue};

// Re-exported so the scoped logging macros resolve for downstream crates
pub use tracing;
