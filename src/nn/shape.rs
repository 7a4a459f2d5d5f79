/*
 * 空间尺寸算术：窗口类算子（卷积、池化）的输出尺寸与 TensorFlow 风格的 SAME 填充
 *
 * # 示例
 * ```
 * use net_decoder::nn::{same_padding, window_output_size};
 *
 * // 3x3 核、步长 1：总填充 2，前后各 1
 * assert_eq!(same_padding(32, 3, 1), (1, 1));
 *
 * // 2x2 池化、步长 2、两侧各填充 1：floor((5 + 2 - 2) / 2) + 1 = 3
 * assert_eq!(window_output_size(5, 2, 2, 1, 1), Some(3));
 * ```
 */

use crate::errors::{NetError, Result};

/// TensorFlow 风格的 SAME 填充，返回 (前侧填充, 后侧填充)。
///
/// 总填充量按步长分两种情况：
/// ```text
/// size % stride == 0  ->  max(kernel - stride, 0)
/// 否则                 ->  max(kernel - size % stride, 0)
/// ```
/// 之后前侧取 total / 2，余下的放后侧（奇数时后侧多 1）。
/// `stride`必须大于 0（由配置校验保证）。
pub const fn same_padding(size: usize, kernel: usize, stride: usize) -> (usize, usize) {
    let total = if size % stride == 0 {
        kernel.saturating_sub(stride)
    } else {
        kernel.saturating_sub(size % stride)
    };
    let before = total / 2;
    (before, total - before)
}

/// 窗口类算子沿某一空间轴的输出尺寸：
/// ```text
/// floor((size + pad_before + pad_after - kernel) / stride) + 1
/// ```
/// 填充后的尺寸仍小于窗口时返回 None（即尺寸塌缩）
pub const fn window_output_size(
    size: usize,
    kernel: usize,
    stride: usize,
    pad_before: usize,
    pad_after: usize,
) -> Option<usize> {
    match (size + pad_before + pad_after).checked_sub(kernel) {
        Some(rest) if stride > 0 => Some(rest / stride + 1),
        _ => None,
    }
}

/// 检查4D输入[batch, C, H, W]的通道与空间维都非零，返回其各维度
pub(crate) fn check_feature_map(shape: &[usize], who: &str) -> Result<[usize; 4]> {
    let &[n, c, h, w] = shape else {
        return Err(NetError::shape(
            shape,
            format!("{who}输入须为4D[batch, C, H, W]，实际为{}D", shape.len()),
        ));
    };
    if c == 0 || h == 0 || w == 0 {
        return Err(NetError::shape(
            shape,
            format!("{who}输入的通道数与空间尺寸都须大于0"),
        ));
    }
    Ok([n, c, h, w])
}

/// 计算窗口类算子的输出空间尺寸 (H', W')，塌缩时返回`NetError::Shape`
pub(crate) fn window_output_hw(
    shape: &[usize],
    kernel: (usize, usize),
    stride: (usize, usize),
    padding: ((usize, usize), (usize, usize)),
    who: &str,
) -> Result<(usize, usize)> {
    let [_, _, h, w] = check_feature_map(shape, who)?;
    let ((pt, pb), (pl, pr)) = padding;
    let out_h = window_output_size(h, kernel.0, stride.0, pt, pb);
    let out_w = window_output_size(w, kernel.1, stride.1, pl, pr);
    match (out_h, out_w) {
        (Some(out_h), Some(out_w)) => Ok((out_h, out_w)),
        _ => Err(NetError::shape(
            shape,
            format!(
                "{who}输出尺寸塌缩：输入{h}x{w}，核{}x{}，步长{stride:?}，填充{padding:?}",
                kernel.0, kernel.1
            ),
        )),
    }
}
