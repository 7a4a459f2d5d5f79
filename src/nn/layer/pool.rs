/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : MaxPool2d / AvgPool2d 共用的窗口几何与遍历
 *
 * 输出尺寸：S' = floor((S + 2*padding - kernel) / stride) + 1
 * 与 PyTorch 一致，要求 padding ≤ kernel / 2，保证每个窗口至少覆盖一个真实像素
 */

use ndarray::{Array4, ArrayView4};
use rayon::prelude::*;

use crate::errors::{NetError, Result};
use crate::nn::shape::window_output_hw;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PoolGeometry {
    pub kernel_size: (usize, usize),
    pub stride: (usize, usize),
    pub padding: (usize, usize),
}

impl PoolGeometry {
    pub fn new(
        kernel_size: (usize, usize),
        stride: Option<(usize, usize)>,
        padding: (usize, usize),
        who: &str,
    ) -> Result<Self> {
        let stride = stride.unwrap_or(kernel_size); // 默认 stride = kernel_size
        if kernel_size.0 == 0 || kernel_size.1 == 0 || stride.0 == 0 || stride.1 == 0 {
            return Err(NetError::InvalidConfig(format!(
                "{who} 的池化窗口与步长都须大于0：核{kernel_size:?}，步长{stride:?}"
            )));
        }
        if padding.0 > kernel_size.0 / 2 || padding.1 > kernel_size.1 / 2 {
            return Err(NetError::InvalidConfig(format!(
                "{who} 的填充{padding:?}不能超过池化窗口{kernel_size:?}的一半"
            )));
        }
        Ok(Self {
            kernel_size,
            stride,
            padding,
        })
    }

    pub fn output_shape(&self, input_shape: &[usize], who: &str) -> Result<Vec<usize>> {
        let (pad_h, pad_w) = self.padding;
        let (out_h, out_w) = window_output_hw(
            input_shape,
            self.kernel_size,
            self.stride,
            ((pad_h, pad_h), (pad_w, pad_w)),
            who,
        )?;
        Ok(vec![input_shape[0], input_shape[1], out_h, out_w])
    }

    /// 对每个输出位置，把落在原图范围内的窗口元素交给`reduce`归约（填充位置不参与）。
    /// 按 (batch, channel) 平面用 Rayon 并行
    pub fn pool<F>(&self, x: ArrayView4<f32>, output_shape: &[usize], reduce: F) -> Result<Array4<f32>>
    where
        F: Fn(&mut dyn Iterator<Item = f32>) -> f32 + Sync,
    {
        let (n, c, h, w) = x.dim();
        let (out_h, out_w) = (output_shape[2], output_shape[3]);
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        let (p_h, p_w) = self.padding;

        let planes: Vec<Vec<f32>> = (0..n * c)
            .into_par_iter()
            .map(|plane| {
                let (b, ch) = (plane / c, plane % c);
                let mut data = Vec::with_capacity(out_h * out_w);
                for oh in 0..out_h {
                    // 窗口在填充后坐标系中起于 oh*s_h，换算回原图坐标需减去填充
                    let h_lo = (oh * s_h).saturating_sub(p_h);
                    let h_hi = (oh * s_h + k_h).saturating_sub(p_h).min(h);
                    for ow in 0..out_w {
                        let w_lo = (ow * s_w).saturating_sub(p_w);
                        let w_hi = (ow * s_w + k_w).saturating_sub(p_w).min(w);
                        let mut window = (h_lo..h_hi)
                            .flat_map(|hi| (w_lo..w_hi).map(move |wi| (hi, wi)))
                            .map(|(hi, wi)| x[[b, ch, hi, wi]]);
                        data.push(reduce(&mut window));
                    }
                }
                data
            })
            .collect();

        let all_data: Vec<f32> = planes.into_iter().flatten().collect();
        Array4::from_shape_vec((n, c, out_h, out_w), all_data)
            .map_err(|e| NetError::shape(output_shape, e.to_string()))
    }
}
