//! 转换流程编排
//!
//! 解码 → 声道选择 → 编码，本身不含业务规则。

pub mod pipeline;

pub use pipeline::{Conversion, ConversionOptions, ConversionPipeline, convert_wir_to_wav};
