//! Linear regression fitted by the demo trainer.

use candle_core::{Device, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use rand::Rng;

pub struct LinearRegression {
    linear: Linear,
}

impl LinearRegression {
    pub fn new(num_features: usize, vb: VarBuilder) -> Result<Self> {
        let linear = candle_nn::linear(num_features, 1, vb.pp("linear"))?;
        Ok(Self { linear })
    }
}

impl Module for LinearRegression {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.linear.forward(xs)
    }
}

/// Samples `y = slope * x + intercept + noise` with `x` uniform in [-1, 1).
/// Returns tensors of shape (num_samples, 1).
pub fn synthetic_line<R: Rng>(
    rng: &mut R,
    num_samples: usize,
    slope: f32,
    intercept: f32,
    noise: f32,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let mut xs = Vec::with_capacity(num_samples);
    let mut ys = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let x: f32 = rng.gen_range(-1.0..1.0);
        let eps: f32 = if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        };
        xs.push(x);
        ys.push(slope * x + intercept + eps);
    }

    let xs = Tensor::from_vec(xs, (num_samples, 1), device)?;
    let ys = Tensor::from_vec(ys, (num_samples, 1), device)?;
    Ok((xs, ys))
}
