//! 核心数据模型与声道选择策略

pub mod channel_policy;
pub mod impulse_response;

// 重新导出公共接口
pub use channel_policy::{ChannelPolicy, SelectionOutcome};
pub use impulse_response::{
    Channel, ChannelLayout, ChannelRole, ImpulseResponse, SampleFormat, Samples,
};
