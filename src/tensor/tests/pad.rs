use crate::assert_err;
use crate::errors::NetError;
use crate::tensor::Tensor;

#[test]
fn test_pad2d() {
    let t = Tensor::new(&[1., 2., 3., 4.], &[1, 1, 2, 2]);
    let p = t.pad2d(1, 0, 0, 2).unwrap();
    assert_eq!(p.shape(), &[1, 1, 3, 4]);
    #[rustfmt::skip]
    assert_eq!(p.to_vec(), vec![
        0., 0., 0., 0.,
        1., 2., 0., 0.,
        3., 4., 0., 0.,
    ]);
}

#[test]
fn test_pad2d_with_value_multi_channel() {
    let t = Tensor::ones(&[2, 3, 1, 1]);
    let p = t.pad2d_with(1, 1, 1, 1, -1.).unwrap();
    assert_eq!(p.shape(), &[2, 3, 3, 3]);
    assert_eq!(p[[1, 2, 1, 1]], 1.);
    assert_eq!(p[[1, 2, 0, 0]], -1.);
    assert_eq!(p.to_vec().iter().filter(|&&v| v == 1.).count(), 6);
}

#[test]
fn test_pad2d_zero_is_identity() {
    let t = Tensor::new(&[1., 2., 3., 4.], &[1, 1, 2, 2]);
    let p = t.pad2d(0, 0, 0, 0).unwrap();
    assert_eq!(p.to_vec(), t.to_vec());
}

#[test]
fn test_pad2d_requires_4d() {
    assert_err!(Tensor::zeros(&[2, 2]).pad2d(1, 1, 1, 1), NetError::Shape { .. });
}
