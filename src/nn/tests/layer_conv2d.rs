/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Conv2d layer 单元测试（Batch-First 设计，含 PyTorch 数值对照）
 */

use approx::assert_abs_diff_eq;

use super::{set_values, test_rng};
use crate::assert_err;
use crate::errors::NetError;
use crate::nn::layer::Conv2d;
use crate::nn::{Device, Module, Placement};
use crate::tensor::Tensor;

// ==================== PyTorch 参考常量 ====================

// 简单前向传播 (batch=1, C_in=1, H=4, W=4, C_out=2, kernel=2x2, stride=1, padding=0)
#[rustfmt::skip]
const PYTORCH_FWD_X: &[f32] = &[
    1.0, 2.0, 3.0, 4.0,
    5.0, 6.0, 7.0, 8.0,
    9.0, 10.0, 11.0, 12.0,
    13.0, 14.0, 15.0, 16.0,
];
#[rustfmt::skip]
const PYTORCH_FWD_KERNEL: &[f32] = &[
    1.0, 0.0, 0.0, 1.0,  // filter 0: 对角线
    0.0, 1.0, 1.0, 0.0,  // filter 1: 反对角线
];
const PYTORCH_FWD_BIAS: &[f32] = &[0.5, -0.5];
#[rustfmt::skip]
const PYTORCH_FWD_OUTPUT: &[f32] = &[
    7.5, 9.5, 11.5,
    15.5, 17.5, 19.5,
    23.5, 25.5, 27.5,
    6.5, 8.5, 10.5,
    14.5, 16.5, 18.5,
    22.5, 24.5, 26.5,
];

/// 构造一个参数取指定值的 Conv2d
fn conv_with_values(
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
    kernel: &[f32],
    bias: &[f32],
) -> Conv2d {
    let mut conv = Conv2d::new(
        in_channels,
        out_channels,
        kernel_size,
        stride,
        padding,
        true,
        &mut test_rng(),
    )
    .unwrap();
    let mut params = conv.parameters_mut();
    set_values(params[0], kernel);
    set_values(params[1], bias);
    conv
}

#[test]
fn test_conv2d_creation() {
    let conv = Conv2d::new(3, 16, (3, 3), (1, 1), (1, 1), true, &mut test_rng()).unwrap();
    assert_eq!(conv.kernel().shape(), &[16, 3, 3, 3]);
    assert_eq!(conv.bias().unwrap().shape(), &[16]);
    assert_eq!(conv.in_channels(), 3);
    assert_eq!(conv.out_channels(), 16);
    assert_eq!(conv.kernel_size(), (3, 3));
    assert_eq!(conv.stride(), (1, 1));
    assert_eq!(conv.padding(), (1, 1));
    assert_eq!(conv.num_params(), 16 * 3 * 9 + 16);

    // 初始化范围：±1/sqrt(fan_in)
    let bound = 1. / 27f32.sqrt();
    assert!(conv.kernel().to_vec().iter().all(|v| v.abs() <= bound));

    let no_bias = Conv2d::new(3, 16, (3, 3), (1, 1), (0, 0), false, &mut test_rng()).unwrap();
    assert!(no_bias.bias().is_none());
    assert_eq!(no_bias.num_params(), 16 * 3 * 9);
}

#[test]
fn test_conv2d_invalid_config() {
    let mut rng = test_rng();
    assert_err!(
        Conv2d::new(0, 16, (3, 3), (1, 1), (1, 1), true, &mut rng),
        NetError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(3, 16, (3, 0), (1, 1), (1, 1), true, &mut rng),
        NetError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(3, 16, (3, 3), (0, 1), (1, 1), true, &mut rng),
        NetError::InvalidConfig(_)
    );
    // 参数个数溢出时返回错误而不是 panic
    assert_err!(
        Conv2d::new(16, 1 << 62, (3, 3), (1, 1), (1, 1), true, &mut rng),
        NetError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(usize::MAX, 16, (3, 3), (1, 1), (1, 1), false, &mut rng),
        NetError::InvalidConfig(_)
    );
}

/// 测试 Conv2d 前向传播（与 PyTorch 对照）
#[test]
fn test_conv2d_forward_pytorch_comparison() -> Result<(), NetError> {
    let conv = conv_with_values(
        1,
        2,
        (2, 2),
        (1, 1),
        (0, 0),
        PYTORCH_FWD_KERNEL,
        PYTORCH_FWD_BIAS,
    );
    let device = Device::cpu();
    let x = Tensor::new(PYTORCH_FWD_X, &[1, 1, 4, 4]);

    let y = conv.forward(&x, &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 2, 3, 3]);
    for (got, expected) in y.to_vec().iter().zip(PYTORCH_FWD_OUTPUT) {
        assert_abs_diff_eq!(got, expected, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_conv2d_forward_with_padding() -> Result<(), NetError> {
    // 全1的 3x3 核，填充1：每个输出都覆盖整个 2x2 输入
    let conv = conv_with_values(1, 1, (3, 3), (1, 1), (1, 1), &[1.; 9], &[0.]);
    let device = Device::cpu();
    let y = conv.forward(&Tensor::ones(&[1, 1, 2, 2]), &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    assert_eq!(y.to_vec(), vec![4.; 4]);
    Ok(())
}

#[test]
fn test_conv2d_forward_multi_channel_batch() -> Result<(), NetError> {
    // 2 输入通道求和，batch 内各样本独立
    let conv = conv_with_values(2, 1, (2, 2), (1, 1), (0, 0), &[1.; 8], &[0.5]);
    #[rustfmt::skip]
    let x = Tensor::new(
        &[
            // batch 0: 通道0全1，通道1全2
            1., 1., 1., 1.,  2., 2., 2., 2.,
            // batch 1: 通道0全0，通道1全-1
            0., 0., 0., 0.,  -1., -1., -1., -1.,
        ],
        &[2, 2, 2, 2],
    );
    let device = Device::cpu();
    let y = conv.forward(&x, &Placement::new(&device))?;
    assert_eq!(y.shape(), &[2, 1, 1, 1]);
    assert_abs_diff_eq!(y[[0, 0, 0, 0]], 12.5, epsilon = 1e-6);
    assert_abs_diff_eq!(y[[1, 0, 0, 0]], -3.5, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_conv2d_stride() -> Result<(), NetError> {
    let conv = conv_with_values(1, 1, (2, 2), (2, 2), (0, 0), &[1.; 4], &[0.]);
    let device = Device::cpu();
    let y = conv.forward(&Tensor::new(PYTORCH_FWD_X, &[1, 1, 4, 4]), &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    assert_eq!(y.to_vec(), vec![14., 22., 46., 54.]);
    Ok(())
}

#[test]
fn test_conv2d_shape_errors() {
    let conv = Conv2d::new(3, 4, (3, 3), (1, 1), (0, 0), true, &mut test_rng()).unwrap();
    assert_eq!(conv.output_shape(&[2, 3, 8, 6]).unwrap(), vec![2, 4, 6, 4]);

    assert_err!(conv.output_shape(&[2, 1, 8, 8]), NetError::ChannelMismatch(3, 1));
    assert_err!(conv.output_shape(&[3, 8, 8]), NetError::Shape { .. });
    // 3x3 核在 2x2 输入上无法放下
    assert_err!(conv.output_shape(&[1, 3, 2, 2]), NetError::Shape { .. });

    let device = Device::cpu();
    let x = Tensor::zeros(&[1, 3, 2, 2]);
    assert_err!(conv.forward(&x, &Placement::new(&device)), NetError::Shape { .. });
}
