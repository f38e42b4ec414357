//! .wir 容器布局表
//!
//! 所有字节偏移集中于此，布局修正只需改动本文件。
//! 布局来自对样本文件的实测（参考 freeverb3 的 WirHeader 描述）：
//! 头部与WAV的 fmt 块同构，全部为小端序，40字节之后为交错帧数据。
//!
//! ```text
//!  0: "wvIR"            魔数
//!  4: u32               文件大小 - 8
//!  8: "ver1fmt "        版本标签
//! 16: u32               格式块大小
//! 20: u16               格式标签（1 = 整数PCM，3 = IEEE浮点）
//! 22: u16               声道数
//! 24: u32               采样率
//! 28: u32               字节率
//! 32: u16               块对齐（每帧字节数）
//! 34: u16               位深
//! 36: "data"            数据标签
//! 40: ...               交错帧
//! ```

use crate::error::{self, AudioError, AudioResult};

pub const MAGIC: &[u8; 4] = b"wvIR";
pub const VERSION: &[u8; 8] = b"ver1fmt ";
pub const DATA_TAG: &[u8; 4] = b"data";

pub const MAGIC_OFFSET: usize = 0;
pub const RIFF_SIZE_OFFSET: usize = 4;
pub const VERSION_OFFSET: usize = 8;
pub const FMT_SIZE_OFFSET: usize = 16;
pub const FORMAT_TAG_OFFSET: usize = 20;
pub const CHANNELS_OFFSET: usize = 22;
pub const SAMPLE_RATE_OFFSET: usize = 24;
pub const BYTE_RATE_OFFSET: usize = 28;
pub const BLOCK_ALIGN_OFFSET: usize = 32;
pub const BITS_OFFSET: usize = 34;
pub const DATA_TAG_OFFSET: usize = 36;

/// 头部总长度（数据起始偏移）
pub const HEADER_LEN: usize = 40;

/// RIFF 大小字段不计入的前缀长度（魔数 + 大小字段）
pub const RIFF_PREFIX_LEN: usize = 8;

/// 格式标签：整数PCM
pub const FORMAT_TAG_PCM: u16 = 1;
/// 格式标签：IEEE浮点
pub const FORMAT_TAG_IEEE_FLOAT: u16 = 3;

/// 支持的最大声道数（立体声对 + 一个附加声道）
pub const MAX_CHANNELS: u16 = 3;

/// 已解析的原始头部字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    pub riff_size: u32,
    pub fmt_size: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl RawHeader {
    /// 从缓冲区读取头部字段并校验标签
    ///
    /// 只检查尺寸与三个标签，数值字段的语义校验由解码器负责。
    pub fn read(bytes: &[u8]) -> AudioResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(error::malformed_header(
                "缓冲区短于头部长度",
                format!("{} < {HEADER_LEN} 字节", bytes.len()),
            ));
        }

        check_tag(bytes, MAGIC_OFFSET, MAGIC, "魔数不匹配")?;
        check_tag(bytes, VERSION_OFFSET, VERSION, "版本标签不匹配")?;
        check_tag(bytes, DATA_TAG_OFFSET, DATA_TAG, "数据标签不匹配")?;

        Ok(Self {
            riff_size: read_u32(bytes, RIFF_SIZE_OFFSET),
            fmt_size: read_u32(bytes, FMT_SIZE_OFFSET),
            format_tag: read_u16(bytes, FORMAT_TAG_OFFSET),
            channels: read_u16(bytes, CHANNELS_OFFSET),
            sample_rate: read_u32(bytes, SAMPLE_RATE_OFFSET),
            byte_rate: read_u32(bytes, BYTE_RATE_OFFSET),
            block_align: read_u16(bytes, BLOCK_ALIGN_OFFSET),
            bits_per_sample: read_u16(bytes, BITS_OFFSET),
        })
    }

    /// 头部声明的文件总长度
    pub fn declared_len(&self) -> usize {
        (self.riff_size as usize).saturating_add(RIFF_PREFIX_LEN)
    }
}

fn check_tag(bytes: &[u8], offset: usize, expected: &[u8], context: &str) -> AudioResult<()> {
    let found = &bytes[offset..offset + expected.len()];
    if found != expected {
        return Err(AudioError::MalformedHeader(format!(
            "{context}: 期望 {:?}，实际 {:?}",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}

// 越界由 `RawHeader::read` 开头的 HEADER_LEN 长度检查排除
#[inline]
fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
