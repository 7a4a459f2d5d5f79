/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 负责把架构编码串解码并构建为可执行的卷积网络
 */

mod config;
mod decoder;
mod descriptor;
mod device;
pub mod layer;
mod model;
mod module;
mod shape;

pub use config::{DecoderConfig, HeadPolicy, PaddingMode};
pub use decoder::{LayerSpec, PoolKind, Token, decode, encode, parse_token};
pub use descriptor::{LayerDescriptor, ModelDescriptor};
pub use device::{Device, Placement};
pub use layer::{ConvolutionBlock, Layer, TraitLayer};
pub use model::Model;
pub use module::Module;
pub use shape::{same_padding, window_output_size};

#[cfg(test)]
mod tests;
