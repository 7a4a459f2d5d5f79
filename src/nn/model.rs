/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 由编码串构建的模型：主干卷积块 + 解码出的层序列 + 惰性构建的分类头
 *
 * 层序列在构造时一次性建好，此后结构冻结（参数仍可由外部优化器原地修改）。
 * 分类头的输入维度取决于层序列输出的空间尺寸，只有见到输入后才知道，
 * 故在前向时按展平维度构建：
 * - `HeadPolicy::LazyOnce`（默认）：首次前向构建，之后展平维度不符即报错
 * - `HeadPolicy::PerCall`：每次前向都重新构建
 */

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::decoder::decode;
use super::descriptor::{LayerDescriptor, ModelDescriptor};
use super::layer::{AvgPool2d, ConvolutionBlock, Layer, Linear, MaxPool2d, TraitLayer};
use super::{DecoderConfig, Device, HeadPolicy, LayerSpec, Module, Placement, PoolKind};
use crate::errors::{NetError, Result};
use crate::tensor::Tensor;

#[derive(Debug)]
pub struct Model {
    encoding: String,
    config: DecoderConfig,
    device: Device,
    specs: Vec<LayerSpec>,
    /// 首个元素恒为主干卷积块
    layers: Vec<Layer>,
    head: Option<Linear>,
    rng: StdRng,
    is_train_mode: bool,
}

impl Model {
    /// 按默认配置从编码串构建模型
    pub fn new(encoding: &str, device: impl Into<Device>) -> Result<Self> {
        Self::with_config(encoding, device, DecoderConfig::default())
    }

    pub fn with_config(
        encoding: &str,
        device: impl Into<Device>,
        config: DecoderConfig,
    ) -> Result<Self> {
        config.validate()?;
        let device = device.into();
        let specs = decode(encoding, &config)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layers = specs
            .iter()
            .map(|spec| instantiate(spec, &config, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "由编码`{encoding}`构建模型：{}层，设备`{device}`",
            layers.len()
        );

        Ok(Self {
            encoding: encoding.to_string(),
            config,
            device,
            specs,
            layers,
            head: None,
            rng,
            is_train_mode: true,
        })
    }

    /// 前向传播：层序列 -> 展平 -> 分类头 -> ReLU，输出 [batch, num_classes]
    pub fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        // 先静态走一遍形状，任何错误都在改动 BN 滑动统计量或分类头之前返回
        let output_shape = self
            .layers
            .iter()
            .try_fold(x.shape().to_vec(), |shape, layer| layer.check_forward(&shape))?;
        let dim = output_shape.iter().skip(1).product::<usize>();
        match (self.config.head_policy, &self.head) {
            (HeadPolicy::LazyOnce, Some(head)) => check_head_dim(head, output_shape[0], dim)?,
            _ => Linear::check_size(dim, self.config.num_classes)?,
        }

        let placement = Placement::new(&self.device);
        let mut x = placement.place(x);

        for (i, layer) in self.layers.iter_mut().enumerate() {
            x = layer.calc_output(&x, &placement)?;
            log::trace!("第{i}层 {} 输出形状{:?}", layer.spec(), x.shape());
        }

        let flat = x.flatten_batch()?;
        let head = prepare_head(
            &mut self.head,
            self.config.head_policy,
            flat.shape(),
            self.config.num_classes,
            &mut self.rng,
        )?;
        let mut out = head.forward(&flat, &placement)?;
        out.relu_mut();
        Ok(out)
    }

    /// 静态推断层序列（展平之前）的输出形状，空间尺寸塌缩时返回`NetError::Shape`
    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        self.layers
            .iter()
            .try_fold(input_shape.to_vec(), |shape, layer| layer.infer_shape(&shape))
    }

    /// 静态推断展平后的特征维度，即分类头的输入维度
    pub fn flattened_dim(&self, input_shape: &[usize]) -> Result<usize> {
        let shape = self.output_shape(input_shape)?;
        Ok(shape.iter().skip(1).product())
    }

    pub fn train(&mut self) {
        self.set_train_mode(true);
    }

    pub fn eval(&mut self) {
        self.set_train_mode(false);
    }

    fn set_train_mode(&mut self, train: bool) {
        self.is_train_mode = train;
        for layer in &mut self.layers {
            layer.set_train_mode(train);
        }
    }

    pub const fn is_train_mode(&self) -> bool {
        self.is_train_mode
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub const fn device(&self) -> &Device {
        &self.device
    }

    pub fn specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// 分类头，首次前向之前为 None
    pub const fn head(&self) -> Option<&Linear> {
        self.head.as_ref()
    }

    /// 生成可序列化的模型描述；给出`input_shape`时附带各层输出形状
    pub fn describe(&self, input_shape: Option<&[usize]>) -> Result<ModelDescriptor> {
        let mut descriptor = ModelDescriptor::new(
            &self.encoding,
            &self.device,
            self.config.num_classes,
            self.head.as_ref().map(Linear::in_features),
        );

        let mut shape = input_shape.map(<[usize]>::to_vec);
        for (index, layer) in self.layers.iter().enumerate() {
            shape = shape.map(|s| layer.infer_shape(&s)).transpose()?;
            descriptor.add_layer(LayerDescriptor {
                index,
                spec: layer.spec(),
                param_count: layer.num_params(),
                output_shape: shape.clone(),
            });
        }
        descriptor.head_param_count = self.head.as_ref().map_or(0, Module::num_params);
        Ok(descriptor)
    }
}

impl Module for Model {
    fn parameters(&self) -> Vec<&Tensor> {
        self.layers
            .iter()
            .flat_map(Module::parameters)
            .chain(self.head.iter().flat_map(Module::parameters))
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers
            .iter_mut()
            .flat_map(Module::parameters_mut)
            .chain(self.head.iter_mut().flat_map(Module::parameters_mut))
            .collect()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model(`{}`, 设备: {})", self.encoding, self.device)?;
        for (i, spec) in self.specs.iter().enumerate() {
            writeln!(f, "  [{i}] {spec}")?;
        }
        match &self.head {
            Some(head) => write!(f, "  head: Linear({}→{})", head.in_features(), head.out_features()),
            None => write!(f, "  head: Linear(?→{})", self.config.num_classes),
        }
    }
}

/// 按层描述实例化一个网络层
fn instantiate(spec: &LayerSpec, config: &DecoderConfig, rng: &mut StdRng) -> Result<Layer> {
    let layer: Layer = match *spec {
        LayerSpec::Conv {
            in_channels,
            out_channels,
        } => ConvolutionBlock::with_geometry(
            in_channels,
            out_channels,
            config.conv_kernel,
            config.conv_stride,
            config.padding_mode,
            rng,
        )?
        .into(),
        LayerSpec::Pool {
            kind: PoolKind::Max,
        } => MaxPool2d::new(
            config.pool_kernel,
            Some(config.pool_stride),
            config.pool_padding,
        )?
        .into(),
        LayerSpec::Pool {
            kind: PoolKind::Avg,
        } => AvgPool2d::new(
            config.pool_kernel,
            Some(config.pool_stride),
            config.pool_padding,
        )?
        .into(),
    };
    Ok(layer)
}

/// 按策略准备分类头，`flat_shape`为展平后的 [batch, dim]
fn prepare_head<'h>(
    head: &'h mut Option<Linear>,
    policy: HeadPolicy,
    flat_shape: &[usize],
    num_classes: usize,
    rng: &mut StdRng,
) -> Result<&'h Linear> {
    let dim = flat_shape[1];
    match (policy, head.take()) {
        (HeadPolicy::LazyOnce, Some(existing)) => {
            let checked = check_head_dim(&existing, flat_shape[0], dim);
            let head = head.insert(existing);
            checked?;
            Ok(head)
        }
        (policy, previous) => {
            if previous.is_some() {
                log::warn!("分类头按{policy:?}策略重建，原有投影权重被丢弃");
            }
            log::debug!("构建分类头 Linear({dim}→{num_classes})");
            Ok(head.insert(Linear::new(dim, num_classes, rng)?))
        }
    }
}

/// `HeadPolicy::LazyOnce`下已建好的分类头只接受与首次前向相同的展平维度
fn check_head_dim(head: &Linear, batch: usize, dim: usize) -> Result<()> {
    if head.in_features() == dim {
        return Ok(());
    }
    Err(NetError::shape(
        &[batch, dim],
        format!(
            "展平维度{dim}与首次前向时确定的分类头输入维度{}不一致",
            head.in_features()
        ),
    ))
}
