use std::f64::consts::PI;
use tracing::{debug, info, warn};

use crate::callback::{EpochContext, TrainingCallback};
use crate::config::{RestartPolicy, WarmRestartConfig};
use crate::sink::LearningRateSink;
use crate::Result;

/// Half-cosine decay from `max_lr` (at `t = 0`) down to `min_lr` (at `t = period`).
pub fn cosine_annealing(min_lr: f64, max_lr: f64, t: f64, period: f64) -> f64 {
    min_lr + 0.5 * (max_lr - min_lr) * (1.0 + (t / period * PI).cos())
}

/// Cosine annealing with warm restarts (SGDR)
///
/// Called once at the start of every epoch. Within a period the rate decays
/// from `max_lr` toward `min_lr`; when the epoch reaches the end of the
/// period the schedule restarts at `max_lr` and the next period is
/// `factor` times longer.
#[derive(Debug, Clone)]
pub struct WarmRestartScheduler {
    min_lr: f64,
    max_lr: f64,
    period: f64,
    factor: f64,
    restart_policy: RestartPolicy,
    restart_origin: f64,
    restarts: usize,
    last_lr: Option<f64>,
}

impl WarmRestartScheduler {
    /// Fails with `InvalidConfiguration` when `factor < 1` or `period` is not
    /// a finite positive number.
    pub fn new(min_lr: f64, max_lr: f64, period: f64, factor: f64) -> Result<Self> {
        Self::from_config(WarmRestartConfig {
            min_lr,
            max_lr,
            period,
            factor,
            ..Default::default()
        })
    }

    pub fn from_config(config: WarmRestartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: WarmRestartConfig) -> Self {
        Self {
            min_lr: config.min_lr,
            max_lr: config.max_lr,
            period: config.period,
            factor: config.factor,
            restart_policy: config.restart_policy,
            restart_origin: 0.0,
            restarts: 0,
            last_lr: None,
        }
    }

    /// Compute the rate for `epoch` and write it into `optimizer`.
    ///
    /// Epochs are expected to arrive in increasing, contiguous order. The
    /// optimizer is probed before any state changes, so a sink without a
    /// learning rate leaves the schedule untouched.
    pub fn on_epoch_begin<S>(&mut self, epoch: usize, optimizer: &mut S) -> Result<f64>
    where
        S: LearningRateSink + ?Sized,
    {
        optimizer.learning_rate()?;

        let mut t = epoch as f64 - self.restart_origin;

        match self.restart_policy {
            RestartPolicy::Exact => {
                if t == self.period {
                    self.restart();
                    t = 0.0;
                }
            }
            RestartPolicy::CatchUp => {
                let mut crossed = 0usize;
                if self.factor == 1.0 {
                    // Constant period: every skipped cycle has the same length.
                    let cycles = (t / self.period).floor().max(0.0);
                    if cycles > 0.0 {
                        crossed = cycles as usize;
                        t -= cycles * self.period;
                        self.restart_constant(crossed);
                    }
                } else {
                    while t >= self.period {
                        t -= self.period;
                        self.restart();
                        crossed += 1;
                    }
                }
                if crossed > 1 {
                    warn!(epoch, crossed, "epoch skipped restart boundaries, caught up");
                }
            }
        }

        let new_lr = cosine_annealing(self.min_lr, self.max_lr, t, self.period);
        optimizer.set_learning_rate(new_lr)?;
        self.last_lr = Some(new_lr);

        debug!(epoch, t, period = self.period, lr = new_lr, "learning rate updated");
        Ok(new_lr)
    }

    fn restart(&mut self) {
        self.restart_origin += self.period;
        self.period *= self.factor;
        self.restarts += 1;
        info!(
            restart = self.restarts,
            origin = self.restart_origin,
            period = self.period,
            "warm restart"
        );
    }

    fn restart_constant(&mut self, cycles: usize) {
        self.restart_origin += cycles as f64 * self.period;
        self.restarts += cycles;
        info!(
            restart = self.restarts,
            origin = self.restart_origin,
            period = self.period,
            "warm restart"
        );
    }

    pub fn min_lr(&self) -> f64 {
        self.min_lr
    }

    pub fn max_lr(&self) -> f64 {
        self.max_lr
    }

    /// Length of the currently active period
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn restart_policy(&self) -> RestartPolicy {
        self.restart_policy
    }

    /// Epoch at which the current period began
    pub fn restart_origin(&self) -> f64 {
        self.restart_origin
    }

    /// Number of restarts applied so far
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Rate written by the most recent `on_epoch_begin`
    pub fn last_lr(&self) -> Option<f64> {
        self.last_lr
    }
}

impl Default for WarmRestartScheduler {
    fn default() -> Self {
        Self::with_config(WarmRestartConfig::default())
    }
}

impl TrainingCallback for WarmRestartScheduler {
    fn on_epoch_begin(
        &mut self,
        ctx: &EpochContext,
        optimizer: &mut dyn LearningRateSink,
    ) -> Result<()> {
        WarmRestartScheduler::on_epoch_begin(self, ctx.epoch, optimizer)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "WarmRestartScheduler"
    }
}
