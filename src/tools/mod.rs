//! 工具模块集合
//!
//! 包含CLI、文件扫描、文件处理、批处理和格式化输出，支持main.rs的流程控制。

pub mod batch_state;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod parallel_processor;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use batch_state::{BatchStatsSnapshot, ParallelBatchStats, SerialBatchStats};
pub use cli::{AppConfig, parse_args, parse_args_from, show_completion_info, show_startup_info};
pub use formatter::{show_batch_summary, write_json_report};
pub use parallel_processor::process_batch_parallel;
pub use processor::{
    BatchResult, FileOutcome, FileReport, process_batch_serial, process_wir_file, verify_wav,
};
pub use scanner::{scan_wir_files, show_scan_results};
