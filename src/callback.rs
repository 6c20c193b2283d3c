//! Hooks a training loop invokes around each epoch.
//!
//! The loop owns dispatch; callbacks only react to the events below.

use crate::sink::LearningRateSink;
use crate::Result;

/// Training progress handed to callbacks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochContext {
    /// Current epoch index, as numbered by the training loop
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
}

impl EpochContext {
    pub fn new(epoch: usize, max_epochs: usize) -> Self {
        Self { epoch, max_epochs }
    }
}

/// Trait for training callbacks
///
/// All methods have no-op defaults, so implementors only override the
/// events they care about.
pub trait TrainingCallback {
    /// Called before the first epoch
    fn on_train_begin(&mut self, _ctx: &EpochContext) -> Result<()> {
        Ok(())
    }

    /// Called before each epoch with the optimizer about to be used for it
    fn on_epoch_begin(
        &mut self,
        _ctx: &EpochContext,
        _optimizer: &mut dyn LearningRateSink,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after each epoch
    fn on_epoch_end(&mut self, _ctx: &EpochContext) -> Result<()> {
        Ok(())
    }

    /// Callback name for logging
    fn name(&self) -> &'static str {
        "TrainingCallback"
    }
}
