/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 模型描述符（Model Descriptor）
 *                 由编码串构建出的模型的可序列化摘要，用于日志、调试输出与外部搜索程序记录
 */

use serde::{Deserialize, Serialize};

use super::{Device, LayerSpec};

/// 模型的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 构建模型所用的编码串
    pub encoding: String,
    pub device: Device,
    /// 所有层的描述，首个为主干卷积块
    pub layers: Vec<LayerDescriptor>,
    pub num_classes: usize,
    /// 分类头输入维度，首次前向之前未知
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_in_features: Option<usize>,
    /// 分类头参数量，尚未构建时为0
    pub head_param_count: usize,
}

/// 单层描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub index: usize,
    pub spec: LayerSpec,
    /// 可训练参数的标量个数
    pub param_count: usize,
    /// 给定输入形状时推断出的输出形状
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_shape: Option<Vec<usize>>,
}

impl ModelDescriptor {
    pub fn new(
        encoding: &str,
        device: &Device,
        num_classes: usize,
        head_in_features: Option<usize>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            encoding: encoding.to_string(),
            device: device.clone(),
            layers: Vec::new(),
            num_classes,
            head_in_features,
            head_param_count: 0,
        }
    }

    pub fn add_layer(&mut self, layer: LayerDescriptor) {
        self.layers.push(layer);
    }

    /// 获取总参数量（含分类头）
    pub fn total_params(&self) -> usize {
        self.layers.iter().map(|l| l.param_count).sum::<usize>() + self.head_param_count
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
