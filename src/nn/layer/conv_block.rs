/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 卷积块：SAME 填充 -> Conv2d -> BatchNorm2d -> ReLU
 *
 * 空间尺寸直到运行时才知道，所以 SAME 填充按每次输入重新计算。
 * 默认的`PaddingMode::Double`下，卷积自身还会再填充1像素，
 * 于是 3x3/步长1 时 H' = H + 2(显式) + 2(内置) - 3 + 1 = H + 2，W' 同理；
 * `PaddingMode::Same`下卷积不再自带填充，H' = H。
 */

use rand::Rng;

use super::{BatchNorm2d, Conv2d};
use crate::errors::{NetError, Result};
use crate::nn::shape::{check_feature_map, same_padding};
use crate::nn::{Module, PaddingMode, Placement};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct ConvolutionBlock {
    conv: Conv2d,
    bn: BatchNorm2d,
    filter_size: (usize, usize),
    conv_stride: (usize, usize),
}

impl ConvolutionBlock {
    /// 标准卷积块：3x3 核、步长1、双重填充
    pub fn new<R: Rng + ?Sized>(c_in: usize, c_out: usize, rng: &mut R) -> Result<Self> {
        Self::with_geometry(c_in, c_out, (3, 3), (1, 1), PaddingMode::Double, rng)
    }

    pub fn with_geometry<R: Rng + ?Sized>(
        c_in: usize,
        c_out: usize,
        filter_size: (usize, usize),
        conv_stride: (usize, usize),
        padding_mode: PaddingMode,
        rng: &mut R,
    ) -> Result<Self> {
        let conv = Conv2d::new(
            c_in,
            c_out,
            filter_size,
            conv_stride,
            padding_mode.conv_padding(),
            true,
            rng,
        )?;
        Ok(Self {
            conv,
            bn: BatchNorm2d::new(c_out),
            filter_size,
            conv_stride,
        })
    }

    /// 当前输入尺寸下的 SAME 填充：((top, bottom), (left, right))
    pub fn padding_for(&self, height: usize, width: usize) -> ((usize, usize), (usize, usize)) {
        (
            same_padding(height, self.filter_size.0, self.conv_stride.0),
            same_padding(width, self.filter_size.1, self.conv_stride.1),
        )
    }

    /// 校验输入为4D且通道数与`in_channels`一致，返回 (H, W)
    fn check_input(&self, input_shape: &[usize]) -> Result<(usize, usize)> {
        let [_, c, h, w] = check_feature_map(input_shape, "ConvolutionBlock")?;
        if c != self.in_channels() {
            return Err(NetError::ChannelMismatch {
                expected: self.in_channels(),
                got: c,
            });
        }
        Ok((h, w))
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        let (h, w) = self.check_input(input_shape)?;
        let ((top, bottom), (left, right)) = self.padding_for(h, w);
        let padded = [
            input_shape[0],
            input_shape[1],
            top + h + bottom,
            left + w + right,
        ];
        self.conv.output_shape(&padded)
    }

    pub fn forward(&mut self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let (h, w) = self.check_input(x.shape())?;
        let ((top, bottom), (left, right)) = self.padding_for(h, w);

        let padded = x.pad2d(top, bottom, left, right)?;
        let out = self.conv.forward(&padded, placement)?;
        let mut out = self.bn.forward(&out, placement)?;
        out.relu_mut();
        Ok(out)
    }

    pub const fn in_channels(&self) -> usize {
        self.conv.in_channels()
    }

    pub const fn out_channels(&self) -> usize {
        self.conv.out_channels()
    }

    pub const fn filter_size(&self) -> (usize, usize) {
        self.filter_size
    }

    pub const fn conv_stride(&self) -> (usize, usize) {
        self.conv_stride
    }

    pub const fn conv(&self) -> &Conv2d {
        &self.conv
    }

    pub const fn bn(&self) -> &BatchNorm2d {
        &self.bn
    }

    pub const fn set_train_mode(&mut self, train: bool) {
        self.bn.set_train_mode(train);
    }
}

impl Module for ConvolutionBlock {
    fn parameters(&self) -> Vec<&Tensor> {
        [self.conv.parameters(), self.bn.parameters()].concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.conv.parameters_mut();
        params.extend(self.bn.parameters_mut());
        params
    }
}
