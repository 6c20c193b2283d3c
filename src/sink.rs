//! Learning rate sinks
//!
//! A sink is anything holding the scalar learning rate an optimizer steps
//! with. The scheduler only ever reads and overwrites that one value.

use candle_nn::{AdamW, Optimizer, SGD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Result, WarmRestartError};

/// Read/write access to an optimizer's learning rate
pub trait LearningRateSink {
    fn learning_rate(&self) -> Result<f64>;

    fn set_learning_rate(&mut self, lr: f64) -> Result<()>;
}

impl LearningRateSink for SGD {
    fn learning_rate(&self) -> Result<f64> {
        Ok(Optimizer::learning_rate(self))
    }

    fn set_learning_rate(&mut self, lr: f64) -> Result<()> {
        Optimizer::set_learning_rate(self, lr);
        Ok(())
    }
}

impl LearningRateSink for AdamW {
    fn learning_rate(&self) -> Result<f64> {
        Ok(Optimizer::learning_rate(self))
    }

    fn set_learning_rate(&mut self, lr: f64) -> Result<()> {
        Optimizer::set_learning_rate(self, lr);
        Ok(())
    }
}

/// Named optimizer hyperparameters, for hosts that expose optimizer state
/// as a bag of values rather than a typed optimizer.
///
/// The learning rate lives under [`HyperParams::LEARNING_RATE`]; reading or
/// writing it while that entry is absent fails with
/// [`WarmRestartError::MissingLearningRateAttribute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperParams {
    values: BTreeMap<String, f64>,
}

impl HyperParams {
    pub const LEARNING_RATE: &'static str = "lr";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }
}

impl LearningRateSink for HyperParams {
    fn learning_rate(&self) -> Result<f64> {
        self.get(Self::LEARNING_RATE)
            .ok_or(WarmRestartError::MissingLearningRateAttribute)
    }

    fn set_learning_rate(&mut self, lr: f64) -> Result<()> {
        let slot = self
            .values
            .get_mut(Self::LEARNING_RATE)
            .ok_or(WarmRestartError::MissingLearningRateAttribute)?;
        *slot = lr;
        Ok(())
    }
}
