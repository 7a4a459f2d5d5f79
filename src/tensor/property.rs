/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use std::ops::Index;

use ndarray::{ArrayView2, ArrayView4, ArrayViewD, Ix2, Ix4};

use super::Tensor;
use crate::errors::{NetError, Result};
use crate::nn::Device;

impl Tensor {
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    /// 以4D视图的形式访问数据，非4D时返回`NetError::Shape`
    pub fn view4(&self) -> Result<ArrayView4<'_, f32>> {
        self.data.view().into_dimensionality::<Ix4>().map_err(|_| {
            NetError::shape(
                self.shape(),
                format!("须为4D张量[batch, C, H, W]，实际为{}D", self.dimension()),
            )
        })
    }

    /// 以2D视图的形式访问数据，非2D时返回`NetError::Shape`
    pub fn view2(&self) -> Result<ArrayView2<'_, f32>> {
        self.data.view().into_dimensionality::<Ix2>().map_err(|_| {
            NetError::shape(
                self.shape(),
                format!("须为2D张量[batch, features]，实际为{}D", self.dimension()),
            )
        })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数，即`shape()`的元素个数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// 按行优先顺序拷贝出全部元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 拆出4D张量的各维度
    pub fn dims4(&self) -> Result<(usize, usize, usize, usize)> {
        let view = self.view4()?;
        Ok(view.dim())
    }
}

impl Index<[usize; 4]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 4]) -> &f32 {
        &self.data[&index[..]]
    }
}

impl Index<[usize; 2]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 2]) -> &f32 {
        &self.data[&index[..]]
    }
}
