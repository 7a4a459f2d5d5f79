/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 设备（放置）标签与放置上下文
 *
 * 设备标签对本库是不透明的，只原样传递并在层边界处做一致性检查。
 * 模型构造时建立一次`Placement`，前向时输入只放置一次，之后每层只检查、不再重复放置。
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{NetError, Result};
use crate::tensor::Tensor;

/// 设备标签，如"cpu"、"cuda:0"、"default"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device(String);

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn cpu() -> Self {
        Self::new("cpu")
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Device {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// 放置上下文：一次前向计算过程中所有层共享的目标设备
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    device: &'a Device,
}

impl<'a> Placement<'a> {
    pub const fn new(device: &'a Device) -> Self {
        Self { device }
    }

    pub const fn device(&self) -> &'a Device {
        self.device
    }

    /// 层边界检查：输入必须已位于上下文设备上
    pub fn check(&self, x: &Tensor) -> Result<()> {
        if x.device() != self.device {
            return Err(NetError::DeviceMismatch {
                expected: self.device.clone(),
                got: x.device().clone(),
            });
        }
        Ok(())
    }

    /// 把张量放到上下文设备上（只应在计算入口处调用一次）
    pub fn place(&self, x: &Tensor) -> Tensor {
        x.to_device(self.device)
    }
}
