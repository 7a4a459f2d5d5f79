/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : MaxPool2d (2D 最大池化) 层
 *
 * 设计决策：Batch-First 设计
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 *
 * 等价于 PyTorch 的 nn.MaxPool2d（填充位置视作 -inf，不参与取最大值）
 */

use super::pool::PoolGeometry;
use crate::errors::Result;
use crate::nn::Placement;
use crate::tensor::Tensor;

/// MaxPool2d 层，无可学习参数
#[derive(Debug, Clone)]
pub struct MaxPool2d {
    geometry: PoolGeometry,
}

impl MaxPool2d {
    /// 创建 `MaxPool2d` 层
    ///
    /// # 参数
    /// - `kernel_size`: 池化窗口大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)，若为 None 则默认等于 `kernel_size`
    /// - `padding`: 两侧对称填充 (pH, pW)，不得超过窗口的一半
    ///
    /// # 输出尺寸计算
    /// ```text
    /// H' = (H + 2*padding_h - kernel_h) / stride_h + 1
    /// W' = (W + 2*padding_w - kernel_w) / stride_w + 1
    /// ```
    pub fn new(
        kernel_size: (usize, usize),
        stride: Option<(usize, usize)>,
        padding: (usize, usize),
    ) -> Result<Self> {
        Ok(Self {
            geometry: PoolGeometry::new(kernel_size, stride, padding, "MaxPool2d")?,
        })
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.geometry.output_shape(input_shape, "MaxPool2d")
    }

    pub fn forward(&self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let output_shape = self.output_shape(x.shape())?;
        let output = self.geometry.pool(x.view4()?, &output_shape, |window| {
            window.fold(f32::NEG_INFINITY, f32::max)
        })?;
        Ok(Tensor::from_array(output.into_dyn(), placement.device()))
    }

    pub const fn kernel_size(&self) -> (usize, usize) {
        self.geometry.kernel_size
    }

    pub const fn stride(&self) -> (usize, usize) {
        self.geometry.stride
    }

    pub const fn padding(&self) -> (usize, usize) {
        self.geometry.padding
    }
}
