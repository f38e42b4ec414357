//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 文件扫描常量
pub mod scan {
    /// 输入文件扩展名（大小写不敏感）
    pub const INPUT_EXTENSION: &str = "wir";

    /// 输出文件扩展名
    pub const OUTPUT_EXTENSION: &str = "wav";
}

/// 默认配置值
pub mod defaults {
    /// 默认多文件并行并发度
    ///
    /// 单个脉冲响应文件很小，4并发度足以占满磁盘I/O
    pub const PARALLEL_FILES_DEGREE: usize = 4;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 限制最大并发度为16，避免过度并发导致的上下文切换和内存占用
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}

/// 量化输出允许的位深
pub const PCM_BIT_DEPTHS: &[u16] = &[16, 24, 32];
