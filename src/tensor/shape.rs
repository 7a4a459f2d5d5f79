use ndarray::IxDyn;

use super::Tensor;
use crate::errors::{NetError, Result};

impl Tensor {
    /// 按形状计算元素个数；乘法溢出或数据字节数超过`isize::MAX`（无法分配）时返回 None
    pub fn checked_size(shape: &[usize]) -> Option<usize> {
        let size = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?;
        let bytes = size.checked_mul(size_of::<f32>())?;
        (bytes <= isize::MAX as usize).then_some(size)
    }

    /// 变形为`shape`，元素总数必须一致
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let new_total_elements: usize = shape.iter().product();
        if self.size() != new_total_elements {
            return Err(NetError::shape(
                self.shape(),
                format!(
                    "无法变形为{shape:?}：元素个数{}与{new_total_elements}不一致",
                    self.size()
                ),
            ));
        }
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .map_err(|e| NetError::shape(self.shape(), e.to_string()))?;
        Ok(Self::from_array(data, self.device()))
    }

    /// 保留首维（batch），把其余各维展平：[N, d1, d2, ...] -> [N, d1*d2*...]
    pub fn flatten_batch(&self) -> Result<Self> {
        let Some((&batch, rest)) = self.shape().split_first() else {
            return Err(NetError::shape(self.shape(), "标量无法按batch展平"));
        };
        let dim = rest.iter().product::<usize>();
        self.reshape(&[batch, dim])
    }
}
