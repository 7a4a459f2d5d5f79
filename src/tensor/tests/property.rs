use crate::assert_err;
use crate::errors::NetError;
use crate::tensor::Tensor;

#[test]
fn test_view4_and_view2() {
    let t = Tensor::zeros(&[2, 3, 4, 5]);
    assert_eq!(t.view4().unwrap().dim(), (2, 3, 4, 5));
    assert_eq!(t.dims4().unwrap(), (2, 3, 4, 5));
    assert_err!(t.view2(), NetError::Shape { .. });

    let m = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(m.view2().unwrap().dim(), (2, 2));
    assert_err!(m.view4(), NetError::Shape { got, .. } if got == &[2, 2]);
    assert_err!(m.dims4());
}

#[test]
fn test_index_and_is_same_shape() {
    let data: Vec<f32> = (0..24).map(|i| i as f32).collect();
    let t = Tensor::new(&data, &[1, 2, 3, 4]);
    assert_eq!(t[[0, 1, 2, 3]], 23.);
    assert_eq!(t[[0, 0, 1, 0]], 4.);

    assert!(t.is_same_shape(&Tensor::zeros(&[1, 2, 3, 4])));
    assert!(!t.is_same_shape(&Tensor::zeros(&[2, 3, 4])));
    assert_eq!(t.view().ndim(), 4);
}
