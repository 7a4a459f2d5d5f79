use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assert_err;
use crate::errors::NetError;
use crate::nn::Device;
use crate::tensor::Tensor;

#[test]
fn test_new_tensor() {
    let t = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.size(), 6);
    assert_eq!(t.dimension(), 2);
    assert_eq!(t.device(), &Device::cpu());
    assert_eq!(t[[1, 2]], 6.);

    let scalar = Tensor::new(&[3.], &[]);
    assert_eq!(scalar.dimension(), 0);
    assert_eq!(scalar.size(), 1);
}

#[test]
fn test_try_new_length_mismatch() {
    assert_err!(
        Tensor::try_new(&[1., 2., 3.], &[2, 2]),
        NetError::Shape([2, 2], "数据长度3与形状所需的元素个数4不一致")
    );
}

#[test]
fn test_try_new_size_overflow() {
    assert_err!(
        Tensor::try_new(&[1.], &[usize::MAX, 2]),
        NetError::Shape { got, .. } if got == &[usize::MAX, 2]
    );
}

#[test]
#[should_panic(expected = "数据长度3与形状所需的元素个数4不一致")]
fn test_new_panics_on_length_mismatch() {
    let _ = Tensor::new(&[1., 2., 3.], &[2, 2]);
}

#[test]
fn test_full_zeros_ones() {
    assert_eq!(Tensor::full(2.5, &[2, 2]).to_vec(), vec![2.5; 4]);
    assert_eq!(Tensor::zeros(&[3]).to_vec(), vec![0.; 3]);
    assert_eq!(Tensor::ones(&[1, 2, 1, 1]).to_vec(), vec![1.; 2]);
}

#[test]
fn test_new_random_with_rng() {
    let a = Tensor::new_random_with_rng(-0.5, 0.5, &[4, 5], &mut StdRng::seed_from_u64(9));
    let b = Tensor::new_random_with_rng(-0.5, 0.5, &[4, 5], &mut StdRng::seed_from_u64(9));
    assert_eq!(a.shape(), &[4, 5]);
    assert_eq!(a.to_vec(), b.to_vec());
    assert!(a.to_vec().iter().all(|v| (-0.5..=0.5).contains(v)));
}
