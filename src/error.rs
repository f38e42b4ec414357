//! 统一错误处理框架
//!
//! 核心转换（解码/声道选择/编码）的错误类型与工具层的I/O、校验错误统一在
//! [`AudioError`] 中，批量处理通过 [`ErrorCategory`] 做分类统计。

use std::fmt;
use std::io;

use thiserror::Error;

/// 音频转换相关的统一错误类型
#[derive(Debug, Error)]
pub enum AudioError {
    /// 头部尺寸/魔数/标签不匹配
    #[error("文件头损坏 / Malformed header: {0}")]
    MalformedHeader(String),

    /// 编码器无法表达的采样格式或位深
    #[error("不支持的位深 / Unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// 声明的数据长度超出缓冲区，或存在不完整的帧
    #[error("数据被截断 / Truncated data: 声明 {declared} 字节，实际可用 {available} 字节")]
    TruncatedData { declared: usize, available: usize },

    /// 声道数不在 1..=3 范围内
    #[error("不支持的声道数 / Unsupported channel count: {0}（仅支持1-3声道）")]
    UnsupportedChannelCount(u16),

    /// 没有任何样本帧可编码
    #[error("没有可编码的样本 / Empty input: 帧数为0")]
    EmptyInput,

    /// 调用方提供的参数或数据模型不合法
    #[error("输入验证失败 / Invalid input: {0}")]
    InvalidInput(String),

    /// 文件I/O错误
    #[error("文件I/O错误 / I/O error: {0}")]
    IoError(#[from] io::Error),

    /// 输出回读校验失败
    #[error("输出校验失败 / Verification failed: {0}")]
    VerificationFailed(String),

    /// 线程池等资源不可用
    #[error("资源访问错误 / Resource error: {0}")]
    ResourceError(String),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        AudioError::VerificationFailed(format!("WAV回读错误: {err}"))
    }
}

/// 音频处理操作的标准Result类型
pub type AudioResult<T> = Result<T, AudioError>;

// ==================== 错误构造Helper函数 ====================

/// 创建文件头错误的helper函数
#[inline]
pub fn malformed_header<E: fmt::Display>(context: &str, detail: E) -> AudioError {
    AudioError::MalformedHeader(format!("{context}: {detail}"))
}

/// 创建位深错误的helper函数
#[inline]
pub fn unsupported_bit_depth<E: fmt::Display>(context: &str, detail: E) -> AudioError {
    AudioError::UnsupportedBitDepth(format!("{context}: {detail}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, serde::Serialize)]
pub enum ErrorCategory {
    /// 格式相关错误（文件头损坏、位深/声道数不支持）
    Format,
    /// 数据相关错误（截断、空数据）
    Data,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 输出回读校验失败
    Verification,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从AudioError提取错误类别
    pub fn from_audio_error(e: &AudioError) -> Self {
        match e {
            AudioError::MalformedHeader(_)
            | AudioError::UnsupportedBitDepth(_)
            | AudioError::UnsupportedChannelCount(_) => Self::Format,
            AudioError::TruncatedData { .. } | AudioError::EmptyInput => Self::Data,
            AudioError::IoError(_) => Self::Io,
            AudioError::VerificationFailed(_) => Self::Verification,
            AudioError::InvalidInput(_) | AudioError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误 / Format",
            Self::Data => "数据错误 / Data",
            Self::Io => "I/O错误 / I/O",
            Self::Verification => "校验错误 / Verification",
            Self::Other => "其他错误 / Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::MalformedHeader("x".into())),
            ErrorCategory::Format
        );
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::UnsupportedChannelCount(4)),
            ErrorCategory::Format
        );
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::TruncatedData {
                declared: 10,
                available: 4
            }),
            ErrorCategory::Data
        );
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::EmptyInput),
            ErrorCategory::Data
        );
        let io = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::from(io)),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_display_contains_detail() {
        let err = malformed_header("魔数不匹配", "b\"RIFF\"");
        let text = err.to_string();
        assert!(text.contains("Malformed header"));
        assert!(text.contains("RIFF"));

        let err = AudioError::TruncatedData {
            declared: 120,
            available: 64,
        };
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn test_io_error_source_preserved() {
        let err = AudioError::from(io::Error::other("disk"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
