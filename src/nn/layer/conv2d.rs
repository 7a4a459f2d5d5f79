/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格，仅前向
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 * W' = (W + 2*padding_w - kernel_w) / stride_w + 1
 *
 * 计算：output = conv2d(x, K) + b
 */

use ndarray::{Array4, ArrayView4};
use rand::Rng;
use rayon::prelude::*;

use crate::errors::{NetError, Result};
use crate::nn::shape::{check_feature_map, window_output_hw};
use crate::nn::{Module, Placement};
use crate::tensor::Tensor;

/// Conv2d (2D 卷积) 层
///
/// # 使用示例
/// ```ignore
/// let conv = Conv2d::new(3, 16, (3, 3), (1, 1), (1, 1), true, &mut rng)?;
/// let h = conv.forward(&x, &placement)?.relu();
/// ```
#[derive(Debug, Clone)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kernel_h, kernel_w]
    kernel: Tensor,
    /// 偏置参数 [out_channels]（可选）
    bias: Option<Tensor>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    /// 卷积自带的对称填充 (pH, pW)
    padding: (usize, usize),
}

impl Conv2d {
    /// 创建新的 Conv2d 层，参数按 ±1/sqrt(fan_in) 均匀初始化
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        use_bias: bool,
        rng: &mut R,
    ) -> Result<Self> {
        let (k_h, k_w) = kernel_size;
        if in_channels == 0 || out_channels == 0 || k_h == 0 || k_w == 0 {
            return Err(NetError::InvalidConfig(format!(
                "Conv2d 的通道数与卷积核尺寸都须大于0：{in_channels}→{out_channels}，核{k_h}x{k_w}"
            )));
        }
        if stride.0 == 0 || stride.1 == 0 {
            return Err(NetError::InvalidConfig(format!(
                "Conv2d 的步长须大于0，得到{stride:?}"
            )));
        }

        let kernel_shape = [out_channels, in_channels, k_h, k_w];
        if Tensor::checked_size(&kernel_shape).is_none() {
            return Err(NetError::InvalidConfig(format!(
                "Conv2d 的卷积核形状{kernel_shape:?}过大，参数个数溢出"
            )));
        }

        // 核元素个数已校验，fan_in 不会溢出
        let bound = 1. / ((in_channels * k_h * k_w) as f32).sqrt();
        let kernel = Tensor::new_random_with_rng(-bound, bound, &kernel_shape, rng);
        let bias =
            use_bias.then(|| Tensor::new_random_with_rng(-bound, bound, &[out_channels], rng));

        Ok(Self {
            kernel,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
        })
    }

    /// 推断输出形状（不做数值计算）
    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        let [n, c, _, _] = check_feature_map(input_shape, "Conv2d")?;
        if c != self.in_channels {
            return Err(NetError::ChannelMismatch {
                expected: self.in_channels,
                got: c,
            });
        }
        let (pad_h, pad_w) = self.padding;
        let (out_h, out_w) = window_output_hw(
            input_shape,
            self.kernel_size,
            self.stride,
            ((pad_h, pad_h), (pad_w, pad_w)),
            "Conv2d",
        )?;
        Ok(vec![n, self.out_channels, out_h, out_w])
    }

    /// 前向传播：计算 `conv2d(x, K) + b`
    pub fn forward(&self, x: &Tensor, placement: &Placement) -> Result<Tensor> {
        placement.check(x)?;
        let output_shape = self.output_shape(x.shape())?;

        let (pad_h, pad_w) = self.padding;
        let padded = x.pad2d(pad_h, pad_h, pad_w, pad_w)?;
        let output = self.convolve(padded.view4()?, &output_shape)?;
        Ok(Tensor::from_array(output.into_dyn(), placement.device()))
    }

    /// 对已填充的输入执行卷积运算（Rayon 在 batch 维度并行）
    fn convolve(&self, input: ArrayView4<f32>, output_shape: &[usize]) -> Result<Array4<f32>> {
        let kernel = self.kernel.view4()?;
        let bias = self.bias.as_ref().map(Tensor::to_vec);
        let (batch_size, in_c, _, _) = input.dim();
        let (out_c, out_h, out_w) = (output_shape[1], output_shape[2], output_shape[3]);
        let (k_h, k_w) = self.kernel_size;
        let (stride_h, stride_w) = self.stride;

        let single_sample_size = out_c * out_h * out_w;
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = Vec::with_capacity(single_sample_size);
                for oc in 0..out_c {
                    let b_oc = bias.as_ref().map_or(0., |bias| bias[oc]);
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let h_start = oh * stride_h;
                            let w_start = ow * stride_w;
                            let mut sum = b_oc;
                            for ic in 0..in_c {
                                for kh in 0..k_h {
                                    for kw in 0..k_w {
                                        sum += input[[b, ic, h_start + kh, w_start + kw]]
                                            * kernel[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                            sample_data.push(sum);
                        }
                    }
                }
                sample_data
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Array4::from_shape_vec((batch_size, out_c, out_h, out_w), all_data)
            .map_err(|e| NetError::shape(output_shape, e.to_string()))
    }

    pub const fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub const fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub const fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub const fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub const fn padding(&self) -> (usize, usize) {
        self.padding
    }

    pub const fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }
}

impl Module for Conv2d {
    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = vec![&self.kernel];
        params.extend(self.bias.as_ref());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = vec![&mut self.kernel];
        params.extend(self.bias.as_mut());
        params
    }
}
