//! 脉冲响应数据模型
//!
//! 解码器的产物、声道选择策略的输入输出、编码器的输入。
//! 通过受检构造函数 [`ImpulseResponse::new`] 保证所有声道的采样率、位深、
//! 采样格式和样本数一致。

use crate::error::{AudioError, AudioResult};

/// 样本数值格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SampleFormat {
    /// 定点整数PCM
    Int,
    /// IEEE浮点
    Float,
}

impl SampleFormat {
    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::Int => "int",
            SampleFormat::Float => "float",
        }
    }
}

/// 声道角色（按位置约定：前两个为立体声对，第三个为附加单声道）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ChannelRole {
    Left,
    Right,
    Auxiliary,
}

impl ChannelRole {
    /// 按声道在容器中的位置映射角色
    ///
    /// 位置 0 → Left，1 → Right，其余 → Auxiliary。
    #[inline]
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => ChannelRole::Left,
            1 => ChannelRole::Right,
            _ => ChannelRole::Auxiliary,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ChannelRole::Left => "L",
            ChannelRole::Right => "R",
            ChannelRole::Auxiliary => "Aux",
        }
    }
}

/// 单声道样本序列
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 整数样本（按位深符号扩展到i32）
    Int(Vec<i32>),
    /// 32位浮点样本
    Float(Vec<f32>),
}

impl Samples {
    /// 样本数（= 帧数）
    pub fn len(&self) -> usize {
        match self {
            Samples::Int(v) => v.len(),
            Samples::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 对应的样本格式
    pub fn format(&self) -> SampleFormat {
        match self {
            Samples::Int(_) => SampleFormat::Int,
            Samples::Float(_) => SampleFormat::Float,
        }
    }

    pub fn as_int(&self) -> Option<&[i32]> {
        match self {
            Samples::Int(v) => Some(v),
            Samples::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f32]> {
        match self {
            Samples::Float(v) => Some(v),
            Samples::Int(_) => None,
        }
    }
}

/// 一个音频声道
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    role: ChannelRole,
    samples: Samples,
}

impl Channel {
    pub fn new(role: ChannelRole, samples: Samples) -> Self {
        Self { role, samples }
    }

    pub fn role(&self) -> ChannelRole {
        self.role
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }
}

/// 声道布局描述（用于展示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ChannelLayout {
    Mono,
    Stereo,
    StereoWithAuxiliary,
}

impl ChannelLayout {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelLayout::Mono => "mono",
            ChannelLayout::Stereo => "stereo",
            ChannelLayout::StereoWithAuxiliary => "stereo + aux",
        }
    }
}

/// 解码后的脉冲响应
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    sample_rate: u32,
    bit_depth: u16,
    sample_format: SampleFormat,
    channels: Vec<Channel>,
}

impl ImpulseResponse {
    /// 创建脉冲响应并校验不变量
    ///
    /// # 错误
    ///
    /// * `AudioError::InvalidInput` - 采样率为0、没有声道、声道样本数或格式不一致、
    ///   整数样本超出位深范围
    pub fn new(
        sample_rate: u32,
        bit_depth: u16,
        sample_format: SampleFormat,
        channels: Vec<Channel>,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidInput("采样率不能为0".to_string()));
        }
        if bit_depth == 0 || bit_depth > 32 {
            return Err(AudioError::InvalidInput(format!(
                "位深超出范围: {bit_depth}位"
            )));
        }
        let Some(first) = channels.first() else {
            return Err(AudioError::InvalidInput("至少需要一个声道".to_string()));
        };

        let frame_count = first.samples.len();
        for (index, channel) in channels.iter().enumerate() {
            if channel.samples.len() != frame_count {
                return Err(AudioError::InvalidInput(format!(
                    "声道{index}样本数({})与声道0({frame_count})不一致",
                    channel.samples.len()
                )));
            }
            if channel.samples.format() != sample_format {
                return Err(AudioError::InvalidInput(format!(
                    "声道{index}采样格式({})与声明格式({})不一致",
                    channel.samples.format().name(),
                    sample_format.name()
                )));
            }
            if let Samples::Int(values) = &channel.samples {
                let (min, max) = int_range(bit_depth);
                if let Some(v) = values.iter().find(|&&v| (v as i64) < min || (v as i64) > max) {
                    return Err(AudioError::InvalidInput(format!(
                        "声道{index}样本值{v}超出{bit_depth}位范围"
                    )));
                }
            }
        }

        Ok(Self {
            sample_rate,
            bit_depth,
            sample_format,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 帧数（每个声道的样本数）
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.samples.len())
    }

    /// 时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// 声道角色列表（按顺序）
    pub fn roles(&self) -> Vec<ChannelRole> {
        self.channels.iter().map(|c| c.role).collect()
    }

    /// 声道布局描述
    pub fn layout(&self) -> ChannelLayout {
        let has_aux = self
            .channels
            .iter()
            .any(|c| c.role == ChannelRole::Auxiliary);
        match (self.channels.len(), has_aux) {
            (1, _) => ChannelLayout::Mono,
            (_, true) => ChannelLayout::StereoWithAuxiliary,
            _ => ChannelLayout::Stereo,
        }
    }

    /// 保留满足条件的声道，产生新值（不修改原值）
    pub(crate) fn retain_channels<F>(&self, keep: F) -> Self
    where
        F: Fn(&Channel) -> bool,
    {
        Self {
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            sample_format: self.sample_format,
            channels: self.channels.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// 拆分为声道列表
    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }
}

/// 有符号整数位深的取值范围
#[inline]
pub(crate) fn int_range(bit_depth: u16) -> (i64, i64) {
    let half = 1i64 << (bit_depth - 1);
    (-half, half - 1)
}
