/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : AvgPool2d (2D 平均池化) 层
 *
 * 设计决策：Batch-First 设计
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 *
 * 等价于 PyTorch 的 nn.AvgPool2d（count_include_pad=True：除数恒为 kH*kW，填充位置按0计入）
 */

use super::pool::PoolGeometry;
use crate::errors::Result;
use crate::nn::Placement;
use crate::tensor::Tensor;

/// AvgPool2d 层，无可学习参数
#[derive(Debug, Clone)]
pub struct AvgPool2d {
    geometry: PoolGeometry,
}

impl AvgPool2d {
    /// 创建 AvgPool2d 层，参数含义同`MaxPool2d::new`
    pub fn new(
        kernel_size: (usize, usize),
        stride: Option<(usize, usize)>,
        padding: (usize, usize),
    ) -> Result<Self> {
        Ok(Self {
            geometry: PoolGeometry::new(kernel_size, stride, padding, "AvgPool2d")?,
        })
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.geometry.output_shape(input_shape, "AvgPool2d")
    }

    pub fn forward(&self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let output_shape = self.output_shape(x.shape())?;
        let (k_h, k_w) = self.geometry.kernel_size;
        let divisor = (k_h * k_w) as f32;
        let output = self.geometry.pool(x.view4()?, &output_shape, |window| {
            window.sum::<f32>() / divisor
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
