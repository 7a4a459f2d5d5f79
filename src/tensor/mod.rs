/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 张量。数据部分基于ndarray的动态维数组，额外携带一个设备（放置）标签
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::errors::{NetError, Result};
use crate::nn::Device;

mod ops;
mod pad;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 本库中卷积相关的张量一律采用 Batch-First 格式：[batch, C, H, W]。
///
/// 注：`device`只是一个不透明的放置标签，数据本身始终在主机内存中；
/// 各层在边界处据此检查输入是否位于当前放置上下文所指定的设备上。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
    device: Device,
}

impl Tensor {
    /// 创建一个位于默认设备（cpu）上的张量。
    /// `data`的长度必须和`shape`中所有元素的乘积相等（形状为`[]`时为标量，长度须为1），否则panic。
    /// 需要以错误而非panic处理的场景请用`try_new`。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }

    /// 同`new`，但数据长度与形状不符时返回`NetError::Shape`
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor> {
        let Some(expected) = Self::checked_size(shape) else {
            return Err(NetError::shape(shape, "形状所需的元素个数溢出"));
        };
        if data.len() != expected {
            return Err(NetError::shape(
                shape,
                format!("数据长度{}与形状所需的元素个数{}不一致", data.len(), expected),
            ));
        }
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .map_err(|e| NetError::shape(shape, e.to_string()))?;
        Ok(Tensor {
            data,
            device: Device::default(),
        })
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
            device: Device::default(),
        }
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Self::full(0., shape)
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Self::full(1., shape)
    }

    /// 用给定的随机数发生器创建一个随机张量，其值在[min, max]的闭区间。
    /// 传入同一种子的发生器可得到完全相同的张量。
    pub fn new_random_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    pub(crate) fn from_array(data: Array<f32, IxDyn>, device: &Device) -> Tensor {
        Tensor {
            data,
            device: device.clone(),
        }
    }
}
