//! WAV编码器
//!
//! 将 [`ImpulseResponse`] 序列化为规范的 RIFF/WAVE 字节流：
//! 44字节头（16字节 fmt 块）+ 按帧交错的小端样本。

use crate::core::{ImpulseResponse, SampleFormat, Samples};
use crate::error::{self, AudioError, AudioResult};

/// WAV格式标签：整数PCM
pub const WAVE_FORMAT_PCM: u16 = 1;
/// WAV格式标签：IEEE浮点
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;

/// 规范WAV头部长度
pub const WAV_HEADER_LEN: usize = 44;

/// 编码器可输出的最大声道数
pub const MAX_OUTPUT_CHANNELS: usize = 3;

/// 浮点样本的输出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatEncoding {
    /// 拒绝浮点数据（只输出整数PCM）
    #[default]
    Reject,
    /// 原样写出32位IEEE浮点（格式标签3）
    IeeeFloat,
    /// 量化为指定位深的整数PCM
    Quantize(u16),
}

/// 实际写出的样本编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WavSpec {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavSpec {
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// 每秒字节数；超出 u32 时为 None
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(self.block_align() as u32)
    }
}

/// WAV编码器
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder {
    float_encoding: FloatEncoding,
}

impl WavEncoder {
    /// 创建只输出整数PCM的编码器
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定浮点样本的处理方式
    pub fn with_float_encoding(float_encoding: FloatEncoding) -> Self {
        Self { float_encoding }
    }

    pub fn float_encoding(&self) -> FloatEncoding {
        self.float_encoding
    }

    /// 计算给定输入的输出编码参数
    ///
    /// # 错误
    ///
    /// * `AudioError::UnsupportedChannelCount` - 声道数为0或超过3
    /// * `AudioError::UnsupportedBitDepth` - 位深无法用目标格式表达
    /// * `AudioError::InvalidInput` - 字节率超出 fmt 块的32位字段
    pub fn output_spec(&self, response: &ImpulseResponse) -> AudioResult<WavSpec> {
        let channels = response.channel_count();
        if channels == 0 || channels > MAX_OUTPUT_CHANNELS {
            return Err(AudioError::UnsupportedChannelCount(channels as u16));
        }

        let (format_tag, bits_per_sample) = match response.sample_format() {
            SampleFormat::Int => {
                let bits = response.bit_depth();
                if !matches!(bits, 16 | 24 | 32) {
                    return Err(error::unsupported_bit_depth(
                        "整数PCM输出",
                        format!("{bits}位（仅支持 16/24/32）"),
                    ));
                }
                (WAVE_FORMAT_PCM, bits)
            }
            SampleFormat::Float => match self.float_encoding {
                FloatEncoding::Reject => {
                    return Err(error::unsupported_bit_depth(
                        "浮点数据无法用整数PCM表达",
                        format!("{}位浮点", response.bit_depth()),
                    ));
                }
                FloatEncoding::IeeeFloat => (WAVE_FORMAT_IEEE_FLOAT, 32),
                FloatEncoding::Quantize(bits @ (16 | 24 | 32)) => (WAVE_FORMAT_PCM, bits),
                FloatEncoding::Quantize(bits) => {
                    return Err(error::unsupported_bit_depth(
                        "量化目标位深",
                        format!("{bits}位（仅支持 16/24/32）"),
                    ));
                }
            },
        };

        let spec = WavSpec {
            format_tag,
            channels: channels as u16,
            sample_rate: response.sample_rate(),
            bits_per_sample,
        };
        checked_byte_rate(&spec)?;
        Ok(spec)
    }

    /// 编码为完整的WAV字节流
    ///
    /// # 错误
    ///
    /// * `AudioError::EmptyInput` - 帧数为0
    /// * `AudioError::InvalidInput` - 数据超出RIFF 32位长度字段
    /// * 以及 [`output_spec`](Self::output_spec) 的错误
    pub fn encode(&self, response: &ImpulseResponse) -> AudioResult<Vec<u8>> {
        let spec = self.output_spec(response)?;
        let byte_rate = checked_byte_rate(&spec)?;

        let frames = response.frame_count();
        if frames == 0 {
            return Err(AudioError::EmptyInput);
        }

        let data_len = frames
            .checked_mul(spec.block_align() as usize)
            .and_then(|len| u32::try_from(len).ok())
            .filter(|len| len.checked_add(37).is_some())
            .ok_or_else(|| {
                AudioError::InvalidInput(format!("数据量超出WAV 4GB上限: {frames} 帧"))
            })?;

        // RIFF 要求块按偶数字节对齐，奇数长度的数据块后补一个填充字节
        let pad = (data_len % 2) as usize;
        let riff_size = 36 + data_len + pad as u32;

        let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize + pad);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&riff_size.to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&spec.format_tag.to_le_bytes());
        out.extend_from_slice(&spec.channels.to_le_bytes());
        out.extend_from_slice(&spec.sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&spec.block_align().to_le_bytes());
        out.extend_from_slice(&spec.bits_per_sample.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());

        let width = spec.bytes_per_sample();
        let channels = response.channels();
        for frame in 0..frames {
            for channel in channels {
                match channel.samples() {
                    Samples::Int(values) => write_int(&mut out, values[frame], width),
                    Samples::Float(values) if spec.format_tag == WAVE_FORMAT_IEEE_FLOAT => {
                        out.extend_from_slice(&values[frame].to_le_bytes())
                    }
                    Samples::Float(values) => {
                        write_int(&mut out, quantize(values[frame], spec.bits_per_sample), width)
                    }
                }
            }
        }
        out.resize(out.len() + pad, 0);

        log::debug!(
            "编码完成 / encoded: {} ch, {} Hz, {}-bit tag {}, {} frames, {} bytes",
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.format_tag,
            frames,
            out.len()
        );
        Ok(out)
    }
}

fn checked_byte_rate(spec: &WavSpec) -> AudioResult<u32> {
    spec.byte_rate().ok_or_else(|| {
        AudioError::InvalidInput(format!(
            "字节率超出WAV 32位字段: {} Hz × {} 字节/帧",
            spec.sample_rate,
            spec.block_align()
        ))
    })
}

/// 按宽度写出整数样本的低位字节（小端）
#[inline]
fn write_int(out: &mut Vec<u8>, value: i32, width: usize) {
    out.extend_from_slice(&value.to_le_bytes()[..width]);
}

/// 浮点样本量化：截断到 [-1, 1]，按正满幅缩放后四舍五入
#[inline]
fn quantize(sample: f32, bits: u16) -> i32 {
    let full_scale = ((1i64 << (bits - 1)) - 1) as f64;
    let clamped = if sample.is_nan() {
        0.0
    } else {
        (sample as f64).clamp(-1.0, 1.0)
    };
    (clamped * full_scale).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, ChannelRole};

    fn int_response(bits: u16, channels: Vec<Vec<i32>>) -> ImpulseResponse {
        let channels = channels
            .into_iter()
            .enumerate()
            .map(|(i, s)| Channel::new(ChannelRole::for_position(i), Samples::Int(s)))
            .collect();
        ImpulseResponse::new(44100, bits, SampleFormat::Int, channels).unwrap()
    }

    fn float_response(channels: Vec<Vec<f32>>) -> ImpulseResponse {
        let channels = channels
            .into_iter()
            .enumerate()
            .map(|(i, s)| Channel::new(ChannelRole::for_position(i), Samples::Float(s)))
            .collect();
        ImpulseResponse::new(48000, 32, SampleFormat::Float, channels).unwrap()
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_canonical_header_stereo_16bit() {
        let ir = int_response(16, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
        let wav = WavEncoder::new().encode(&ir).unwrap();

        assert_eq!(wav.len(), 44 + 16);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 16);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), WAVE_FORMAT_PCM);
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u32_at(&wav, 24), 44100);
        assert_eq!(u32_at(&wav, 28), 44100 * 4);
        assert_eq!(u16_at(&wav, 32), 4);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 16);

        let expected: Vec<u8> = [1i16, 5, 2, 6, 3, 7, 4, 8]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        assert_eq!(&wav[44..], &expected[..]);
    }

    #[test]
    fn test_24bit_mono_padding() {
        let ir = int_response(24, vec![vec![-1, 0x123456, -8_388_608]]);
        let wav = WavEncoder::new().encode(&ir).unwrap();

        assert_eq!(u32_at(&wav, 40), 9);
        assert_eq!(u32_at(&wav, 4), 36 + 9 + 1);
        assert_eq!(wav.len(), 44 + 10);
        assert_eq!(
            &wav[44..53],
            &[0xff, 0xff, 0xff, 0x56, 0x34, 0x12, 0x00, 0x00, 0x80]
        );
        assert_eq!(wav[53], 0);
    }

    #[test]
    fn test_byte_rate_overflow_rejected() {
        let channels = vec![
            Channel::new(ChannelRole::Left, Samples::Int(vec![1])),
            Channel::new(ChannelRole::Right, Samples::Int(vec![5])),
        ];
        let ir = ImpulseResponse::new(0x8000_0000, 16, SampleFormat::Int, channels).unwrap();

        assert!(matches!(
            WavEncoder::new().output_spec(&ir),
            Err(AudioError::InvalidInput(_))
        ));
        assert!(matches!(
            WavEncoder::new().encode(&ir),
            Err(AudioError::InvalidInput(_))
        ));

        let spec = WavSpec {
            format_tag: WAVE_FORMAT_PCM,
            channels: 2,
            sample_rate: u32::MAX / 4,
            bits_per_sample: 16,
        };
        assert_eq!(spec.byte_rate(), Some(u32::MAX / 4 * 4));
    }

    #[test]
    fn test_float_rejected_by_default() {
        let ir = float_response(vec![vec![0.5, -0.5]]);
        assert!(matches!(
            WavEncoder::new().encode(&ir),
            Err(AudioError::UnsupportedBitDepth(_))
        ));
    }

    #[test]
    fn test_float_ieee_output() {
        let ir = float_response(vec![vec![0.5, -0.5], vec![0.25, 1.0]]);
        let wav = WavEncoder::with_float_encoding(FloatEncoding::IeeeFloat)
            .encode(&ir)
            .unwrap();
        assert_eq!(u16_at(&wav, 20), WAVE_FORMAT_IEEE_FLOAT);
        assert_eq!(u16_at(&wav, 34), 32);
        assert_eq!(u16_at(&wav, 32), 8);
        let first = f32::from_le_bytes(wav[44..48].try_into().unwrap());
        let second = f32::from_le_bytes(wav[48..52].try_into().unwrap());
        assert_eq!((first, second), (0.5, 0.25));
    }

    #[test]
    fn test_float_quantize() {
        let ir = float_response(vec![vec![1.0, -1.0, 0.5, 2.0, f32::NAN]]);
        let wav = WavEncoder::with_float_encoding(FloatEncoding::Quantize(16))
            .encode(&ir)
            .unwrap();
        assert_eq!(u16_at(&wav, 20), WAVE_FORMAT_PCM);
        let samples: Vec<i16> = wav[44..54]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(samples, vec![32767, -32767, 16384, 32767, 0]);

        let bad = WavEncoder::with_float_encoding(FloatEncoding::Quantize(12)).encode(&ir);
        assert!(matches!(bad, Err(AudioError::UnsupportedBitDepth(_))));
    }

    #[test]
    fn test_empty_input() {
        let ir = int_response(16, vec![vec![], vec![]]);
        assert!(matches!(
            WavEncoder::new().encode(&ir),
            Err(AudioError::EmptyInput)
        ));
    }

    #[test]
    fn test_unsupported_int_depth() {
        let ir = int_response(20, vec![vec![1, 2]]);
        assert!(matches!(
            WavEncoder::new().encode(&ir),
            Err(AudioError::UnsupportedBitDepth(_))
        ));
    }
}
