//! WIR文件解码器
//!
//! 将 .wir 字节缓冲区解析为 [`ImpulseResponse`]。纯函数：不做I/O、无共享状态，
//! 任何字段异常都直接报错，不猜测、不回退到默认值。

use super::wir_layout::{self, RawHeader};
use crate::core::{Channel, ChannelRole, ImpulseResponse, SampleFormat, Samples};
use crate::error::{self, AudioError, AudioResult};

/// 校验后的 .wir 头部信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WirHeader {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 声道数（1-3）
    pub channels: u16,
    /// 采样格式
    pub sample_format: SampleFormat,
    /// 有效位深（由块对齐推导）
    pub bit_depth: u16,
    /// 每帧字节数
    pub block_align: u16,
    /// 帧数
    pub frame_count: usize,
}

impl WirHeader {
    /// 每样本字节数
    pub fn bytes_per_sample(&self) -> usize {
        (self.bit_depth / 8) as usize
    }

    /// 时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// 数据区字节数
    pub fn data_len(&self) -> usize {
        self.frame_count * self.block_align as usize
    }
}

/// WIR解码器
///
/// 支持 16/24/32 位整数PCM 与 32 位浮点，1-3 声道交错存储。
#[derive(Debug, Clone, Copy, Default)]
pub struct WirDecoder;

impl WirDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 仅解析并校验头部（不解码样本）
    ///
    /// # 错误
    ///
    /// * `AudioError::MalformedHeader` - 尺寸不足、标签不匹配、采样率为0、块对齐不一致
    /// * `AudioError::UnsupportedChannelCount` - 声道数为0或超过3
    /// * `AudioError::UnsupportedBitDepth` - 格式标签或位深无法表达
    /// * `AudioError::TruncatedData` - 声明长度超出缓冲区或存在不完整帧
    pub fn probe(&self, bytes: &[u8]) -> AudioResult<WirHeader> {
        let raw = RawHeader::read(bytes)?;

        if raw.channels == 0 || raw.channels > wir_layout::MAX_CHANNELS {
            return Err(AudioError::UnsupportedChannelCount(raw.channels));
        }

        if raw.sample_rate == 0 {
            return Err(error::malformed_header("采样率不能为0", raw.sample_rate));
        }

        let sample_format = match raw.format_tag {
            wir_layout::FORMAT_TAG_PCM => SampleFormat::Int,
            wir_layout::FORMAT_TAG_IEEE_FLOAT => SampleFormat::Float,
            other => {
                return Err(error::unsupported_bit_depth(
                    "未知的格式标签",
                    format!("0x{other:04x}（仅支持 1=PCM, 3=IEEE float）"),
                ));
            }
        };

        if raw.block_align == 0 || raw.block_align % raw.channels != 0 {
            return Err(error::malformed_header(
                "块对齐与声道数不一致",
                format!("block_align={}, channels={}", raw.block_align, raw.channels),
            ));
        }
        let width = raw.block_align / raw.channels;
        let bit_depth = resolve_bit_depth(sample_format, width, raw.bits_per_sample)?;

        let expected_byte_rate = raw.sample_rate as u64 * raw.block_align as u64;
        if raw.byte_rate as u64 != expected_byte_rate {
            log::debug!(
                "字节率字段不一致（忽略）/ inconsistent byte rate ignored: {} != {expected_byte_rate}",
                raw.byte_rate
            );
        }
        log::trace!("格式块大小 / fmt block size: {}", raw.fmt_size);

        let declared_len = raw.declared_len();
        if declared_len < wir_layout::HEADER_LEN {
            return Err(error::malformed_header(
                "声明的文件长度小于头部长度",
                format!("{declared_len} < {}", wir_layout::HEADER_LEN),
            ));
        }
        if declared_len > bytes.len() {
            return Err(AudioError::TruncatedData {
                declared: declared_len,
                available: bytes.len(),
            });
        }
        if declared_len < bytes.len() {
            log::debug!(
                "忽略声明长度之后的 {} 字节 / ignoring trailing bytes",
                bytes.len() - declared_len
            );
        }

        let data_len = declared_len - wir_layout::HEADER_LEN;
        let block_align = raw.block_align as usize;
        if data_len % block_align != 0 {
            // 最后一帧不完整：声明需要补齐到整帧
            let declared = wir_layout::HEADER_LEN + data_len.div_ceil(block_align) * block_align;
            return Err(AudioError::TruncatedData {
                declared,
                available: declared_len,
            });
        }

        Ok(WirHeader {
            sample_rate: raw.sample_rate,
            channels: raw.channels,
            sample_format,
            bit_depth,
            block_align: raw.block_align,
            frame_count: data_len / block_align,
        })
    }

    /// 解码完整的 .wir 缓冲区
    ///
    /// 声道按位置标记角色：前两个为 Left/Right，第三个为 Auxiliary。
    pub fn decode(&self, bytes: &[u8]) -> AudioResult<ImpulseResponse> {
        self.decode_with_header(bytes).map(|(_, response)| response)
    }

    /// 解码并同时返回校验后的头部
    pub fn decode_with_header(&self, bytes: &[u8]) -> AudioResult<(WirHeader, ImpulseResponse)> {
        let header = self.probe(bytes)?;
        let data = &bytes[wir_layout::HEADER_LEN..wir_layout::HEADER_LEN + header.data_len()];

        log::debug!(
            "解码 / decoding: {} ch, {} Hz, {}-bit {}, {} frames",
            header.channels,
            header.sample_rate,
            header.bit_depth,
            header.sample_format.name(),
            header.frame_count
        );

        let channel_count = header.channels as usize;
        let width = header.bytes_per_sample();
        let block_align = header.block_align as usize;

        let channels = (0..channel_count)
            .map(|index| {
                let offset = index * width;
                let frames = data.chunks_exact(block_align).map(|f| &f[offset..offset + width]);
                let samples = match header.sample_format {
                    SampleFormat::Float => Samples::Float(frames.map(read_f32).collect()),
                    SampleFormat::Int => Samples::Int(match width {
                        2 => frames.map(read_i16).collect(),
                        3 => frames.map(read_i24).collect(),
                        _ => frames.map(read_i32).collect(),
                    }),
                };
                Channel::new(ChannelRole::for_position(index), samples)
            })
            .collect();

        let response = ImpulseResponse::new(
            header.sample_rate,
            header.bit_depth,
            header.sample_format,
            channels,
        )?;
        Ok((header, response))
    }
}

/// 由样本宽度与声明位深确定有效位深
///
/// 整数PCM：声明位深必须等于宽度×8，且为16/24/32。
/// 浮点：宽度必须为4字节；旧版写入器在位深字段存放非标准值，仅记录日志。
fn resolve_bit_depth(format: SampleFormat, width: u16, declared_bits: u16) -> AudioResult<u16> {
    if !(2..=4).contains(&width) {
        return Err(error::unsupported_bit_depth(
            "样本宽度",
            format!("{width}字节（仅支持 2/3/4 字节）"),
        ));
    }
    let bits = width * 8;
    match format {
        SampleFormat::Int => {
            if declared_bits != bits {
                return Err(error::unsupported_bit_depth(
                    "位深字段与块对齐不一致",
                    format!("声明 {declared_bits} 位，块对齐推导 {bits} 位"),
                ));
            }
            if !matches!(bits, 16 | 24 | 32) {
                return Err(error::unsupported_bit_depth(
                    "整数PCM位深",
                    format!("{bits}位（仅支持 16/24/32）"),
                ));
            }
        }
        SampleFormat::Float => {
            if bits != 32 {
                return Err(error::unsupported_bit_depth(
                    "浮点位深",
                    format!("{bits}位（仅支持32位浮点）"),
                ));
            }
            if declared_bits != bits {
                log::debug!(
                    "浮点文件位深字段为非标准值 {declared_bits}，按块对齐使用 32 位 / non-standard bits field"
                );
            }
        }
    }
    Ok(bits)
}

#[inline]
fn read_i16(b: &[u8]) -> i32 {
    i16::from_le_bytes([b[0], b[1]]) as i32
}

#[inline]
fn read_i24(b: &[u8]) -> i32 {
    // 放到高24位再算术右移完成符号扩展
    i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8
}

#[inline]
fn read_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
fn read_f32(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
