//! wir2wav - 脉冲响应格式转换工具
//!
//! 将 .wir 脉冲响应文件转换为规范的 PCM .wav 文件。
//!
//! ## 核心流程
//! - [`WirDecoder`]：解析 .wir 头部与交错样本，得到 [`ImpulseResponse`]
//! - [`ChannelPolicy`]：丢弃立体声对之后的附加单声道
//! - [`WavEncoder`]：输出 RIFF/WAVE（16字节 fmt 块）
//!
//! 核心层是纯内存的字节到字节转换，文件扫描、路径推导与命令行在 `tools` 中。

pub mod audio;
pub mod core;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use audio::{FloatEncoding, WavEncoder, WavSpec, WirDecoder, WirHeader};
pub use core::{Channel, ChannelPolicy, ChannelRole, ImpulseResponse, SampleFormat, Samples};
pub use error::{AudioError, AudioResult};
pub use processing::{Conversion, ConversionOptions, ConversionPipeline, convert_wir_to_wav};
