use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::tensor::Tensor;

mod layer_avg_pool2d;
mod layer_conv2d;

/// 固定种子的随机数生成器，保证参数初始化可复现
fn test_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// 按行优先顺序覆写张量的全部元素（用于把参数设为参考值）
fn set_values(t: &mut Tensor, values: &[f32]) {
    assert_eq!(t.size(), values.len(), "参考值个数与张量元素个数不一致");
    t.view_mut()
        .iter_mut()
        .zip(values)
        .for_each(|(p, &v)| *p = v);
}
