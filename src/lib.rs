//! # Net Decoder
//!
//! 把形如`"32-0.9-64"`的架构编码串解码为可执行的卷积网络：
//! 整数 token 是卷积块（SAME 填充 + Conv2d + BatchNorm2d + ReLU）的输出通道数，
//! 含小数点的 token 是池化层（大于0.5为最大池化，否则为平均池化），
//! 网络前端恒有一个 3→16 的主干卷积块，末端是按展平维度惰性构建的 10 类分类头。
//!
//! ```ignore
//! use net_decoder::nn::Model;
//! use net_decoder::tensor::Tensor;
//!
//! let mut model = Model::new("32-0.9-64", "default")?;
//! let y = model.forward(&Tensor::zeros(&[1, 3, 32, 32]))?;
//! assert_eq!(y.shape(), &[1, 10]);
//! ```

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
