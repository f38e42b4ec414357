//! 声道选择策略
//!
//! 决定哪些声道进入输出：默认丢弃立体声对之后的附加单声道。

use super::impulse_response::{ChannelRole, ImpulseResponse};

/// 声道选择策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPolicy {
    /// 3声道且第三声道为附加声道时丢弃之，其余原样通过
    #[default]
    DropAuxiliary,
    /// 保留全部声道
    KeepAll,
}

/// 策略执行结果
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// 选择后的脉冲响应
    pub response: ImpulseResponse,
    /// 被丢弃的声道角色（按原顺序）
    pub dropped: Vec<ChannelRole>,
}

impl ChannelPolicy {
    /// 应用策略（全函数：对已通过解码校验的输入永不失败）
    pub fn apply(&self, response: &ImpulseResponse) -> SelectionOutcome {
        let drops_aux = *self == ChannelPolicy::DropAuxiliary
            && response.channel_count() == 3
            && response.channels()[2].role() == ChannelRole::Auxiliary;

        if !drops_aux {
            return SelectionOutcome {
                response: response.clone(),
                dropped: Vec::new(),
            };
        }

        log::debug!("丢弃附加声道 / dropping auxiliary channel");
        SelectionOutcome {
            response: response.retain_channels(|c| c.role() != ChannelRole::Auxiliary),
            dropped: vec![ChannelRole::Auxiliary],
        }
    }
}
