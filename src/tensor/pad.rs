/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 空间维度上的常数填充（对应 PyTorch 的 F.pad(x, (left, right, top, bottom))）
 */

use ndarray::{Array4, s};

use super::Tensor;
use crate::errors::Result;

impl Tensor {
    /// 对4D张量[batch, C, H, W]的最后两维做零填充，输出形状为
    /// [batch, C, top + H + bottom, left + W + right]
    pub fn pad2d(&self, top: usize, bottom: usize, left: usize, right: usize) -> Result<Tensor> {
        self.pad2d_with(top, bottom, left, right, 0.)
    }

    /// 同`pad2d`，但填充值为`value`
    pub fn pad2d_with(
        &self,
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
        value: f32,
    ) -> Result<Tensor> {
        let x = self.view4()?;
        let (n, c, h, w) = x.dim();
        if top == 0 && bottom == 0 && left == 0 && right == 0 {
            return Ok(self.clone());
        }

        let mut out = Array4::from_elem((n, c, top + h + bottom, left + w + right), value);
        out.slice_mut(s![.., .., top..top + h, left..left + w])
            .assign(&x);
        Ok(Tensor::from_array(out.into_dyn(), self.device()))
    }
}
