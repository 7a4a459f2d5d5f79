use ndarray::ArrayViewMutD;

use super::Tensor;
use crate::nn::Device;

impl Tensor {
    /// 可变视图，供外部优化器原地改写参数
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.data.view_mut()
    }

    /// 逐元素ReLU：max(0, x)
    pub fn relu(&self) -> Tensor {
        Tensor::from_array(self.data.mapv(|x| x.max(0.)), self.device())
    }

    /// 原地ReLU
    pub fn relu_mut(&mut self) {
        self.data.mapv_inplace(|x| x.max(0.));
    }

    /// 把张量放置到`device`上（返回新张量，原张量不变）
    pub fn to_device(&self, device: &Device) -> Tensor {
        Tensor::from_array(self.data.clone(), device)
    }

    /// 同`to_device`，但消耗自身，不拷贝数据
    pub fn into_device(mut self, device: &Device) -> Tensor {
        self.device = device.clone();
        self
    }
}
