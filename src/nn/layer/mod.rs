/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : Layer 模块 - 卷积/归一化/池化/全连接等基础层，以及解码出的网络层的统一封装
 */

mod avg_pool2d;
mod batch_norm2d;
mod conv2d;
mod conv_block;
mod linear;
mod max_pool2d;
mod pool;

pub use avg_pool2d::AvgPool2d;
pub use batch_norm2d::{BatchNorm2d, DEFAULT_EPS, DEFAULT_MOMENTUM};
pub use conv2d::Conv2d;
pub use conv_block::ConvolutionBlock;
pub use linear::Linear;
pub use max_pool2d::MaxPool2d;

use enum_dispatch::enum_dispatch;

use super::{LayerSpec, Module, Placement, PoolKind};
use crate::errors::Result;
use crate::tensor::Tensor;

/// 由编码串解码、实例化出的网络层
#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum Layer {
    ConvBlock(ConvolutionBlock),
    MaxPool(MaxPool2d),
    AvgPool(AvgPool2d),
}

#[enum_dispatch(Layer)]
pub trait TraitLayer {
    /// 根据输入计算本层输出
    fn calc_output(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor>;

    /// 静态推断输出形状，不做数值计算
    fn infer_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>>;

    /// 按当前模式校验输入能否完成前向并返回输出形状。
    /// 比`infer_shape`多出依赖训练/评估模式的检查，前向之前调用可保证出错时不改动任何状态
    fn check_forward(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.infer_shape(input_shape)
    }

    /// 本层对应的层描述
    fn spec(&self) -> LayerSpec;

    /// 切换训练/评估模式，无状态的层忽略即可
    fn set_train_mode(&mut self, _train: bool) {}
}

impl TraitLayer for ConvolutionBlock {
    fn calc_output(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        self.forward(x, placement)
    }

    fn infer_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.output_shape(input_shape)
    }

    fn check_forward(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        let output_shape = self.output_shape(input_shape)?;
        self.bn().check_input(&output_shape)?;
        Ok(output_shape)
    }

    fn spec(&self) -> LayerSpec {
        LayerSpec::Conv {
            in_channels: self.in_channels(),
            out_channels: self.out_channels(),
        }
    }

    fn set_train_mode(&mut self, train: bool) {
        ConvolutionBlock::set_train_mode(self, train);
    }
}

impl TraitLayer for MaxPool2d {
    fn calc_output(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        self.forward(x, placement)
    }

    fn infer_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.output_shape(input_shape)
    }

    fn spec(&self) -> LayerSpec {
        LayerSpec::Pool {
            kind: PoolKind::Max,
        }
    }
}

impl TraitLayer for AvgPool2d {
    fn calc_output(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        self.forward(x, placement)
    }

    fn infer_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.output_shape(input_shape)
    }

    fn spec(&self) -> LayerSpec {
        LayerSpec::Pool {
            kind: PoolKind::Avg,
        }
    }
}

impl Module for Layer {
    fn parameters(&self) -> Vec<&Tensor> {
        match self {
            Layer::ConvBlock(block) => block.parameters(),
            Layer::MaxPool(_) | Layer::AvgPool(_) => Vec::new(),
        }
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        match self {
            Layer::ConvBlock(block) => block.parameters_mut(),
            Layer::MaxPool(_) | Layer::AvgPool(_) => Vec::new(),
        }
    }
}
