/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : Linear (全连接) 层，仅前向
 */

use rand::Rng;

use crate::errors::{NetError, Result};
use crate::nn::{Module, Placement};
use crate::tensor::Tensor;

/// Linear (全连接) 层
///
/// PyTorch 风格的全连接层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
#[derive(Debug, Clone)]
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Tensor,
    /// 偏置参数 [out_features]
    bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建新的 Linear 层，权重与偏置按 ±1/sqrt(in_features) 均匀初始化
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Result<Self> {
        Self::check_size(in_features, out_features)?;
        let bound = 1. / (in_features as f32).sqrt();
        Ok(Self {
            weights: Tensor::new_random_with_rng(-bound, bound, &[in_features, out_features], rng),
            bias: Tensor::new_random_with_rng(-bound, bound, &[out_features], rng),
            in_features,
            out_features,
        })
    }

    /// 校验`in_features→out_features`的全连接层能否构建：维度非零且权重个数不溢出
    pub fn check_size(in_features: usize, out_features: usize) -> Result<()> {
        if in_features == 0 || out_features == 0 {
            return Err(NetError::InvalidConfig(format!(
                "Linear 的输入/输出维度都须大于0：{in_features}→{out_features}"
            )));
        }
        if Tensor::checked_size(&[in_features, out_features]).is_none() {
            return Err(NetError::InvalidConfig(format!(
                "Linear({in_features}→{out_features}) 的权重个数溢出"
            )));
        }
        Ok(())
    }

    pub fn forward(&self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let x = x.view2()?;
        if x.ncols() != self.in_features {
            return Err(NetError::shape(
                x.shape(),
                format!(
                    "Linear 期望输入特征维度为{}，实际为{}",
                    self.in_features,
                    x.ncols()
                ),
            ));
        }

        let mut output = x.dot(&self.weights.view2()?);
        let bias = self.bias.view().into_dimensionality::<ndarray::Ix1>().map_err(|_| {
            NetError::shape(self.bias.shape(), "Linear 偏置须为1D")
        })?;
        output += &bias;
        Ok(Tensor::from_array(output.into_dyn(), placement.device()))
    }

    pub const fn in_features(&self) -> usize {
        self.in_features
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }

    pub const fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub const fn bias(&self) -> &Tensor {
        &self.bias
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weights, &mut self.bias]
    }
}
