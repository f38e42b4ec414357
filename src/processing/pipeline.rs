//! 转换流水线
//!
//! 解码 → 声道选择 → 编码，纯内存操作，无共享可变状态，
//! 多个文件可在独立线程上并行转换。

use crate::audio::{FloatEncoding, WavEncoder, WavSpec, WirDecoder, WirHeader};
use crate::core::{ChannelPolicy, ChannelRole, ImpulseResponse};
use crate::error::AudioResult;

/// 转换选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// 声道选择策略
    pub channel_policy: ChannelPolicy,
    /// 浮点样本的输出方式
    pub float_encoding: FloatEncoding,
}

/// 单次转换的结果
#[derive(Debug, Clone)]
pub struct Conversion {
    /// 源文件头部信息
    pub source: WirHeader,
    /// 输出WAV的编码参数
    pub output: WavSpec,
    /// 保留的声道角色（按输出顺序）
    pub retained: Vec<ChannelRole>,
    /// 被丢弃的声道角色
    pub dropped: Vec<ChannelRole>,
    /// WAV字节流
    pub wav: Vec<u8>,
}

/// 转换流水线
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionPipeline {
    decoder: WirDecoder,
    policy: ChannelPolicy,
    encoder: WavEncoder,
}

impl ConversionPipeline {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            decoder: WirDecoder::new(),
            policy: options.channel_policy,
            encoder: WavEncoder::with_float_encoding(options.float_encoding),
        }
    }

    /// 完整转换：遇到第一个错误即中止
    pub fn convert(&self, wir_bytes: &[u8]) -> AudioResult<Conversion> {
        let (source, response) = self.decoder.decode_with_header(wir_bytes)?;
        self.encode_response(source, &response)
    }

    /// 对已解码的脉冲响应执行声道选择与编码
    pub fn encode_response(
        &self,
        source: WirHeader,
        response: &ImpulseResponse,
    ) -> AudioResult<Conversion> {
        let selection = self.policy.apply(response);
        log::debug!(
            "声道选择 / channel selection: {} -> {}",
            response.layout().name(),
            selection.response.layout().name()
        );
        let output = self.encoder.output_spec(&selection.response)?;
        let wav = self.encoder.encode(&selection.response)?;

        Ok(Conversion {
            source,
            output,
            retained: selection.response.roles(),
            dropped: selection.dropped,
            wav,
        })
    }
}

/// 使用默认选项（丢弃附加声道、只输出整数PCM）转换
pub fn convert_wir_to_wav(wir_bytes: &[u8]) -> AudioResult<Vec<u8>> {
    ConversionPipeline::default()
        .convert(wir_bytes)
        .map(|conversion| conversion.wav)
}
