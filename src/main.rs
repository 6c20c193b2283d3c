mod model;

use std::path::PathBuf;

use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap, SGD};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use model::{synthetic_line, LinearRegression};
use warm_restart::{
    EpochContext, LearningRateSink, Result, RestartPolicy, TrainingCallback, WarmRestartConfig,
    WarmRestartScheduler,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OptimizerKind {
    Sgd,
    Adamw,
}

/// Fit a noisy line while a warm-restart schedule drives the learning rate.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with a schedule configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    min_lr: Option<f64>,

    #[arg(long)]
    max_lr: Option<f64>,

    /// Length of the first period in epochs
    #[arg(long)]
    period: Option<f64>,

    /// Period growth multiplier applied at each restart
    #[arg(long)]
    factor: Option<f64>,

    /// Apply restarts whose boundary was skipped
    #[arg(long)]
    catch_up: bool,

    #[arg(long, default_value_t = 35)]
    epochs: usize,

    /// Epoch index to start from, as when resuming an interrupted run
    #[arg(long, default_value_t = 0)]
    start_epoch: usize,

    #[arg(long, value_enum, default_value_t = OptimizerKind::Sgd)]
    optimizer: OptimizerKind,

    #[arg(long, default_value_t = 256)]
    samples: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn schedule_config(&self) -> Result<WarmRestartConfig> {
        let mut config = match &self.config {
            Some(path) => WarmRestartConfig::read_json_file(path)?,
            None => WarmRestartConfig::default(),
        };
        if let Some(min_lr) = self.min_lr {
            config.min_lr = min_lr;
        }
        if let Some(max_lr) = self.max_lr {
            config.max_lr = max_lr;
        }
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(factor) = self.factor {
            config.factor = factor;
        }
        if self.catch_up {
            config.restart_policy = RestartPolicy::CatchUp;
        }
        config.validate()?;
        Ok(config)
    }
}

fn train<O>(
    optimizer: &mut O,
    scheduler: &mut WarmRestartScheduler,
    model: &LinearRegression,
    xs: &Tensor,
    ys: &Tensor,
    epochs: std::ops::Range<usize>,
) -> Result<()>
where
    O: Optimizer + LearningRateSink,
{
    let max_epochs = epochs.end;
    let callback: &mut dyn TrainingCallback = scheduler;
    callback.on_train_begin(&EpochContext::new(epochs.start, max_epochs))?;

    for epoch in epochs {
        let ctx = EpochContext::new(epoch, max_epochs);
        callback.on_epoch_begin(&ctx, optimizer)?;

        let preds = model.forward(xs)?;
        let loss = candle_nn::loss::mse(&preds, ys)?;
        optimizer.backward_step(&loss)?;

        info!(
            epoch,
            lr = <O as LearningRateSink>::learning_rate(optimizer)?,
            loss = loss.to_scalar::<f32>()?,
            "epoch finished"
        );
        callback.on_epoch_end(&ctx)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = args.schedule_config()?;
    info!(?config, optimizer = ?args.optimizer, "starting warm restart demo");

    let device = Device::Cpu;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let (xs, ys) = synthetic_line(&mut rng, args.samples, 3.0, 2.0, 0.1, &device)?;

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = LinearRegression::new(1, vb)?;

    let mut scheduler = WarmRestartScheduler::from_config(config.clone())?;
    let epochs = args.start_epoch..args.start_epoch + args.epochs;

    match args.optimizer {
        OptimizerKind::Sgd => {
            let mut sgd = SGD::new(varmap.all_vars(), config.max_lr)?;
            train(&mut sgd, &mut scheduler, &model, &xs, &ys, epochs)?;
        }
        OptimizerKind::Adamw => {
            let params = ParamsAdamW {
                lr: config.max_lr,
                ..Default::default()
            };
            let mut adamw = AdamW::new(varmap.all_vars(), params)?;
            train(&mut adamw, &mut scheduler, &model, &xs, &ys, epochs)?;
        }
    }

    info!(
        restarts = scheduler.restarts(),
        period = scheduler.period(),
        last_lr = ?scheduler.last_lr(),
        "training finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use warm_restart::WarmRestartError;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file creation should succeed");
        file.write_all(content.as_bytes()).expect("file write should succeed");
        file
    }

    #[test]
    fn test_flags_override_invalid_file_value() {
        let file = config_file(r#"{"factor": 0.5, "max_lr": 0.2}"#);
        let path = file.path().to_str().unwrap();
        let args =
            Args::try_parse_from(["warm_restart", "--config", path, "--factor", "2"]).unwrap();

        let config = args.schedule_config().unwrap();
        assert_eq!(config.factor, 2.0);
        assert_eq!(config.max_lr, 0.2);
    }

    #[test]
    fn test_invalid_file_value_without_override_fails() {
        let file = config_file(r#"{"factor": 0.5}"#);
        let path = file.path().to_str().unwrap();
        let args = Args::try_parse_from(["warm_restart", "--config", path]).unwrap();

        assert!(matches!(
            args.schedule_config(),
            Err(WarmRestartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_catch_up_flag() {
        let args = Args::try_parse_from(["warm_restart", "--catch-up", "--period", "3"]).unwrap();
        let config = args.schedule_config().unwrap();
        assert_eq!(config.restart_policy, RestartPolicy::CatchUp);
        assert_eq!(config.period, 3.0);
    }
}
