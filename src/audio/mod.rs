//! 音频格式模块
//!
//! .wir 容器解码与规范WAV编码。所有 .wir 字节布局知识都封装在 `wir_layout` 中。

mod wir_layout;

pub mod wav_encoder;
pub mod wir_decoder;

pub use wav_encoder::{FloatEncoding, WavEncoder, WavSpec};
pub use wir_decoder::{WirDecoder, WirHeader};
