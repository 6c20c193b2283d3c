//! Warm-restart learning rate scheduling for candle training loops.
//!
//! At the start of every epoch the scheduler computes a cosine-annealed
//! learning rate between `max_lr` and `min_lr`, restarting from `max_lr`
//! once the current period is exhausted. Each restart stretches the next
//! period by `factor` (SGDR, <https://arxiv.org/abs/1608.03983>).
//!
//! # Example
//!
//! ```
//! use warm_restart::{HyperParams, WarmRestartScheduler};
//!
//! # fn main() -> warm_restart::Result<()> {
//! let mut scheduler = WarmRestartScheduler::new(0.0, 0.1, 5.0, 2.0)?;
//! let mut optimizer = HyperParams::new().with(HyperParams::LEARNING_RATE, 0.1);
//! for epoch in 0..20 {
//!     let lr = scheduler.on_epoch_begin(epoch, &mut optimizer)?;
//!     assert!(lr <= 0.1);
//!     // ... run the epoch with `lr`
//! }
//! // Restarts at epochs 5 and 15.
//! assert_eq!(scheduler.restarts(), 2);
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod config;
pub mod error;
pub mod lr_scheduler;
pub mod sink;

// Re-export commonly used items
pub use callback::{EpochContext, TrainingCallback};
pub use config::{RestartPolicy, WarmRestartConfig};
pub use error::{Result, WarmRestartError};
pub use lr_scheduler::{cosine_annealing, WarmRestartScheduler};
pub use sink::{HyperParams, LearningRateSink};
