/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 解码与前向计算的统一错误类型
 *
 * 所有错误都在发生处立即向调用方传播，内部不做任何重试或强制转换
 * （例如不会把非数字 token 截断成 0）
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::nn::Device;

pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// 编码串中的某个 token 既不是合法整数也不是合法浮点数
    #[error("无法解码第{position}个token`{token}`：{reason}")]
    Decode {
        token: String,
        position: usize,
        reason: String,
    },

    /// 张量阶数/尺寸不满足要求（含空间尺寸塌缩）
    #[error("形状错误：{message}，实际形状为{got:?}")]
    Shape { got: Vec<usize>, message: String },

    /// 输入通道数与卷积块配置的输入通道数不一致
    #[error("通道数不匹配：期望{expected}，实际为{got}")]
    ChannelMismatch { expected: usize, got: usize },

    /// 张量所在设备与当前放置上下文不一致
    #[error("设备不一致：期望`{expected}`，实际为`{got}`")]
    DeviceMismatch { expected: Device, got: Device },

    // 数字比较用
    #[error("配置项{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: f64,
    },

    #[error("配置无效：{0}")]
    InvalidConfig(String),

    #[error("JSON（反）序列化失败：{0}")]
    Serialization(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn shape(got: &[usize], message: impl Into<String>) -> Self {
        Self::Shape {
            got: got.to_vec(),
            message: message.into(),
        }
    }
}
