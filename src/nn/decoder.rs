/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 架构编码串的解码
 *
 * 编码串由分隔符（默认`-`）隔开的 token 组成：
 * - 整数字面量：卷积块，输出通道数即该整数，输入通道数取上一个卷积块的输出通道数
 * - 含小数点的浮点字面量：池化层，大于阈值（默认0.5）为最大池化，否则为平均池化
 * - 空 token（连续分隔符产生）直接跳过
 *
 * 解码是一次从左到右的折叠，唯一携带的状态是上一个卷积块的输出通道数；
 * 任一 token 非法时整体报错，不产生任何部分结果。
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DecoderConfig;
use crate::errors::{NetError, Result};

/// 池化种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Max,
    Avg,
}

/// 层描述：解码的产物，尚未实例化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerSpec {
    Conv {
        in_channels: usize,
        out_channels: usize,
    },
    Pool {
        kind: PoolKind,
    },
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conv {
                in_channels,
                out_channels,
            } => write!(f, "Conv({in_channels}→{out_channels})"),
            Self::Pool { kind: PoolKind::Max } => write!(f, "MaxPool"),
            Self::Pool { kind: PoolKind::Avg } => write!(f, "AvgPool"),
        }
    }
}

/// 单个 token 的解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// 卷积块的输出通道数
    Conv(usize),
    /// 池化层，携带原始浮点值
    Pool(f64),
}

/// 解析单个 token，空 token 返回`Ok(None)`。
/// `position`为该 token 在按分隔符切分后的序号（从0起），仅用于报错。
pub fn parse_token(token: &str, position: usize) -> Result<Option<Token>> {
    if token.is_empty() {
        return Ok(None);
    }

    let decode_err = |reason: String| NetError::Decode {
        token: token.to_string(),
        position,
        reason,
    };

    if token.contains('.') {
        let value: f64 = token
            .parse()
            .map_err(|e| decode_err(format!("不是合法的浮点数（{e}）")))?;
        if !value.is_finite() {
            return Err(decode_err("浮点数须为有限值".to_string()));
        }
        Ok(Some(Token::Pool(value)))
    } else {
        let value: usize = token
            .parse()
            .map_err(|e| decode_err(format!("不是合法的非负整数（{e}）")))?;
        if value == 0 {
            return Err(decode_err("卷积输出通道数须大于0".to_string()));
        }
        Ok(Some(Token::Conv(value)))
    }
}

/// 把编码串解码为层描述列表，首个元素恒为主干卷积块
/// `Conv(stem_in_channels→stem_out_channels)`
pub fn decode(encoding: &str, config: &DecoderConfig) -> Result<Vec<LayerSpec>> {
    let stem = LayerSpec::Conv {
        in_channels: config.stem_in_channels,
        out_channels: config.stem_out_channels,
    };

    let (specs, _) = encoding.split(config.delimiter).enumerate().try_fold(
        (vec![stem], config.stem_out_channels),
        |(mut specs, prev_channels), (position, raw)| {
            let next_channels = match parse_token(raw, position)? {
                None => prev_channels,
                Some(Token::Conv(out_channels)) => {
                    log::debug!("token#{position} `{raw}` -> Conv({prev_channels}→{out_channels})");
                    specs.push(LayerSpec::Conv {
                        in_channels: prev_channels,
                        out_channels,
                    });
                    out_channels
                }
                Some(Token::Pool(value)) => {
                    let kind = if value > config.max_pool_threshold {
                        PoolKind::Max
                    } else {
                        PoolKind::Avg
                    };
                    log::debug!("token#{position} `{raw}` -> {kind:?}Pool");
                    specs.push(LayerSpec::Pool { kind });
                    prev_channels
                }
            };
            Ok::<_, NetError>((specs, next_channels))
        },
    )?;

    Ok(specs)
}

/// 把层描述列表重新写成编码串（主干块不写出；池化层写作`0.9`/`0.1`）。
/// 对解码结果有 `decode(encode(decode(s))) == decode(s)`
pub fn encode(specs: &[LayerSpec], config: &DecoderConfig) -> String {
    let stem = LayerSpec::Conv {
        in_channels: config.stem_in_channels,
        out_channels: config.stem_out_channels,
    };
    let body = match specs.split_first() {
        Some((first, rest)) if *first == stem => rest,
        _ => specs,
    };

    let delimiter = config.delimiter.to_string();
    body.iter()
        .map(|spec| match spec {
            LayerSpec::Conv { out_channels, .. } => out_channels.to_string(),
            LayerSpec::Pool { kind } => pool_literal(*kind, config),
        })
        .collect::<Vec<_>>()
        .join(&delimiter)
}

/// 选一个能被解码回`kind`的池化字面量，阈值为默认值时即`0.9`/`0.1`
fn pool_literal(kind: PoolKind, config: &DecoderConfig) -> String {
    let threshold = config.max_pool_threshold;
    match kind {
        PoolKind::Max if threshold < 0.9 => "0.9".to_string(),
        PoolKind::Max => format!("{:.1}", threshold.floor() + 1.),
        PoolKind::Avg if threshold >= 0.1 => "0.1".to_string(),
        PoolKind::Avg => "0.0".to_string(),
    }
}
