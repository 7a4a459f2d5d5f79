/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : BatchNorm2d (2D 批归一化) 层 - 等价于 PyTorch 的 nn.BatchNorm2d，仅前向
 *
 * 输入/输出形状均为 [batch, C, H, W]，沿通道维归一化：
 *   y = (x - mean) / sqrt(var + eps) * gamma + beta
 *
 * - 训练模式：mean/var 取当前 batch 在 (N, H, W) 上的统计量（有偏方差），
 *   并以 momentum 更新 running_mean / running_var（后者用无偏方差）
 * - 评估模式：直接使用 running_mean / running_var
 */

use ndarray::Axis;

use crate::errors::{NetError, Result};
use crate::nn::shape::check_feature_map;
use crate::nn::{Module, Placement};
use crate::tensor::Tensor;

pub const DEFAULT_EPS: f32 = 1e-5;
pub const DEFAULT_MOMENTUM: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct BatchNorm2d {
    num_features: usize,
    eps: f32,
    momentum: f32,
    /// 缩放参数 [C]，初始为1
    gamma: Tensor,
    /// 平移参数 [C]，初始为0
    beta: Tensor,
    running_mean: Vec<f32>,
    running_var: Vec<f32>,
    is_train_mode: bool,
}

impl BatchNorm2d {
    pub fn new(num_features: usize) -> Self {
        Self::with_options(num_features, DEFAULT_EPS, DEFAULT_MOMENTUM)
    }

    pub fn with_options(num_features: usize, eps: f32, momentum: f32) -> Self {
        Self {
            num_features,
            eps,
            momentum,
            gamma: Tensor::ones(&[num_features]),
            beta: Tensor::zeros(&[num_features]),
            running_mean: vec![0.; num_features],
            running_var: vec![1.; num_features],
            is_train_mode: true,
        }
    }

    /// 校验输入形状在当前模式下可以前向，返回每个通道参与统计的值的个数 N*H*W
    pub fn check_input(&self, input_shape: &[usize]) -> Result<usize> {
        let [n, c, h, w] = check_feature_map(input_shape, "BatchNorm2d")?;
        if c != self.num_features {
            return Err(NetError::ChannelMismatch {
                expected: self.num_features,
                got: c,
            });
        }

        let count = n * h * w;
        if self.is_train_mode && count <= 1 {
            return Err(NetError::shape(
                input_shape,
                "训练模式下每个通道须有多于1个值才能计算batch统计量",
            ));
        }
        Ok(count)
    }

    pub fn forward(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let count = self.check_input(x.shape())?;

        let gamma = self.gamma.to_vec();
        let beta = self.beta.to_vec();
        let mut out = x.view4()?.to_owned();
        for (ci, mut channel) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, var) = if self.is_train_mode {
                let mean = channel.sum() / count as f32;
                let var = channel.fold(0., |acc, &v| acc + (v - mean) * (v - mean)) / count as f32;
                let unbiased_var = var * count as f32 / (count - 1) as f32;
                self.running_mean[ci] =
                    (1. - self.momentum) * self.running_mean[ci] + self.momentum * mean;
                self.running_var[ci] =
                    (1. - self.momentum) * self.running_var[ci] + self.momentum * unbiased_var;
                (mean, var)
            } else {
                (self.running_mean[ci], self.running_var[ci])
            };

            let scale = gamma[ci] / (var + self.eps).sqrt();
            let shift = beta[ci] - mean * scale;
            channel.mapv_inplace(|v| v * scale + shift);
        }

        Ok(Tensor::from_array(out.into_dyn(), placement.device()))
    }

    pub const fn num_features(&self) -> usize {
        self.num_features
    }

    pub const fn eps(&self) -> f32 {
        self.eps
    }

    pub const fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn running_mean(&self) -> &[f32] {
        &self.running_mean
    }

    pub fn running_var(&self) -> &[f32] {
        &self.running_var
    }

    pub const fn set_train_mode(&mut self, train: bool) {
        self.is_train_mode = train;
    }

    pub const fn is_train_mode(&self) -> bool {
        self.is_train_mode
    }
}

impl Module for BatchNorm2d {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.gamma, &self.beta]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.gamma, &mut self.beta]
    }
}
