/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 解码器配置。默认值即编码串约定的固定结构：
 *                 3→16 的主干块、3x3/步长1 的卷积块、2x2/步长2/填充1 的池化、10 类输出
 */

use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonOperator, NetError, Result};

/// 卷积块的填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddingMode {
    /// 先做 SAME 填充，卷积自身再填充1像素：每个块使空间尺寸 +2（兼容既有模型的形状）
    #[default]
    Double,
    /// 只做 SAME 填充，卷积自身不再填充：空间尺寸保持不变
    Same,
}

impl PaddingMode {
    /// 卷积算子自带的对称填充
    pub const fn conv_padding(&self) -> (usize, usize) {
        match self {
            Self::Double => (1, 1),
            Self::Same => (0, 0),
        }
    }
}

/// 分类头（全连接投影）的构建时机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadPolicy {
    /// 首次前向时按观测到的展平维度构建一次，之后维度不符即报`NetError::Shape`
    #[default]
    LazyOnce,
    /// 每次前向都按当次展平维度重新构建（之前的投影权重随之丢弃）
    PerCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub stem_in_channels: usize,
    pub stem_out_channels: usize,
    pub num_classes: usize,
    pub delimiter: char,
    pub conv_kernel: (usize, usize),
    pub conv_stride: (usize, usize),
    pub padding_mode: PaddingMode,
    pub pool_kernel: (usize, usize),
    pub pool_stride: (usize, usize),
    pub pool_padding: (usize, usize),
    /// 浮点 token 严格大于该值时为最大池化，否则为平均池化
    pub max_pool_threshold: f64,
    pub head_policy: HeadPolicy,
    /// 参数初始化的随机种子，None 时取系统熵
    pub seed: Option<u64>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            stem_in_channels: 3,
            stem_out_channels: 16,
            num_classes: 10,
            delimiter: '-',
            conv_kernel: (3, 3),
            conv_stride: (1, 1),
            padding_mode: PaddingMode::Double,
            pool_kernel: (2, 2),
            pool_stride: (2, 2),
            pool_padding: (1, 1),
            max_pool_threshold: 0.5,
            head_policy: HeadPolicy::LazyOnce,
            seed: None,
        }
    }
}

impl DecoderConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub const fn with_padding_mode(mut self, padding_mode: PaddingMode) -> Self {
        self.padding_mode = padding_mode;
        self
    }

    pub const fn with_head_policy(mut self, head_policy: HeadPolicy) -> Self {
        self.head_policy = head_policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("stem_in_channels", self.stem_in_channels),
            ("stem_out_channels", self.stem_out_channels),
            ("num_classes", self.num_classes),
            ("conv_kernel.0", self.conv_kernel.0),
            ("conv_kernel.1", self.conv_kernel.1),
            ("conv_stride.0", self.conv_stride.0),
            ("conv_stride.1", self.conv_stride.1),
            ("pool_kernel.0", self.pool_kernel.0),
            ("pool_kernel.1", self.pool_kernel.1),
            ("pool_stride.0", self.pool_stride.0),
            ("pool_stride.1", self.pool_stride.1),
        ];
        for (value_name, value) in positive {
            if value == 0 {
                return Err(NetError::ValueMustSatisfyComparison {
                    value_name: value_name.to_string(),
                    operator: ComparisonOperator::GreaterThan,
                    threshold: 0.,
                });
            }
        }
        if !self.max_pool_threshold.is_finite() {
            return Err(NetError::InvalidConfig(format!(
                "max_pool_threshold 须为有限数，得到{}",
                self.max_pool_threshold
            )));
        }
        // 池化字面量由分隔符切出，不可能为负，负阈值会让平均池化无法表达
        if self.max_pool_threshold < 0. {
            return Err(NetError::ValueMustSatisfyComparison {
                value_name: "max_pool_threshold".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 0.,
            });
        }
        if self.delimiter == '.' || self.delimiter.is_ascii_digit() {
            return Err(NetError::InvalidConfig(format!(
                "分隔符`{}`会与数字字面量冲突",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// 从 JSON 解析并校验，缺省字段取默认值
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
