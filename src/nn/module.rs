/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Module trait 定义
 */

use crate::tensor::Tensor;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - 参数的取值与更新规则由外部优化器负责，本库只定义其形状与连接方式
pub trait Module {
    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<&Tensor>;

    /// 获取所有可训练参数的可变引用（供外部优化器原地更新）
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// 获取可训练参数的标量总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }
}
