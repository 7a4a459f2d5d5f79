/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : AvgPool2d layer 单元测试（count_include_pad 语义）
 */

use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::errors::NetError;
use crate::nn::layer::AvgPool2d;
use crate::nn::{Device, Placement};
use crate::tensor::Tensor;

const TEST_X: &[f32] = &[
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
];
const TEST_OUTPUT: &[f32] = &[3.5, 5.5, 11.5, 13.5];
// kernel=2, stride=2, padding=1：除数恒为4，填充位置按0计入
#[rustfmt::skip]
const TEST_PADDED_OUTPUT: &[f32] = &[
    0.25, 1.25, 1.0,
    3.5, 8.5, 5.0,
    3.25, 7.25, 4.0,
];

#[test]
fn test_avg_pool2d_forward() -> Result<(), NetError> {
    let device = Device::cpu();
    let x = Tensor::new(TEST_X, &[1, 1, 4, 4]);
    let pool = AvgPool2d::new((2, 2), None, (0, 0))?;
    let y = pool.forward(&x, &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    for (g, e) in y.to_vec().iter().zip(TEST_OUTPUT) {
        assert_abs_diff_eq!(g, e, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_avg_pool2d_forward_with_padding() -> Result<(), NetError> {
    let device = Device::cpu();
    let x = Tensor::new(TEST_X, &[1, 1, 4, 4]);
    let pool = AvgPool2d::new((2, 2), Some((2, 2)), (1, 1))?;
    assert_eq!(pool.kernel_size(), (2, 2));
    assert_eq!(pool.padding(), (1, 1));

    let y = pool.forward(&x, &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 1, 3, 3]);
    for (g, e) in y.to_vec().iter().zip(TEST_PADDED_OUTPUT) {
        assert_abs_diff_eq!(g, e, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_avg_pool2d_channels_independent() -> Result<(), NetError> {
    let device = Device::cpu();
    let mut data = vec![1.; 16];
    data.extend([2.; 16]);
    let x = Tensor::new(&data, &[1, 2, 4, 4]);
    let pool = AvgPool2d::new((2, 2), None, (0, 0))?;
    let y = pool.forward(&x, &Placement::new(&device))?;
    assert_eq!(y.shape(), &[1, 2, 2, 2]);
    assert_eq!(y.to_vec(), [[1.; 4], [2.; 4]].concat());
    Ok(())
}

#[test]
fn test_avg_pool2d_errors() {
    assert_err!(AvgPool2d::new((2, 2), None, (1, 2)), NetError::InvalidConfig(_));
    let pool = AvgPool2d::new((3, 3), Some((1, 1)), (0, 0)).unwrap();
    assert_err!(pool.output_shape(&[1, 1, 2, 5]), NetError::Shape { .. });
    assert_eq!(pool.output_shape(&[1, 1, 3, 5]).unwrap(), vec![1, 1, 1, 3]);
}
