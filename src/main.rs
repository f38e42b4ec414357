//! wir2wav - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成 .wir → .wav 转换任务。

use anyhow::Context;
use std::path::PathBuf;
use std::process;
use wir2wav::{
    error::{AudioError, ErrorCategory},
    tools::{self, AppConfig, BatchResult},
};

/// 错误退出码定义
mod exit_codes {
    /// 通用错误（I/O等）
    pub const GENERAL_ERROR: i32 = 1;
    /// 格式错误（文件头损坏、位深/声道数不支持）
    pub const FORMAT_ERROR: i32 = 2;
    /// 数据错误（截断、空数据）
    pub const DATA_ERROR: i32 = 3;
    /// 输出校验失败
    pub const VERIFICATION_ERROR: i32 = 4;
    /// 资源/并发错误
    pub const RESOURCE_ERROR: i32 = 5;
}

fn exit_code_for(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Format => exit_codes::FORMAT_ERROR,
        ErrorCategory::Data => exit_codes::DATA_ERROR,
        ErrorCategory::Verification => exit_codes::VERIFICATION_ERROR,
        ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
    }
}

/// 获取错误建议文本
fn get_error_suggestion(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Format => {
            "文件不是受支持的 .wir（1-3声道，16/24/32位整数或32位浮点） / File is not a supported .wir (1-3 channels, 16/24/32-bit int or 32-bit float)"
        }
        ErrorCategory::Data => {
            "文件可能被截断或不含样本，请重新获取原文件 / File may be truncated or empty, obtain a fresh copy"
        }
        ErrorCategory::Io => {
            "检查文件路径是否正确，文件是否存在且可读写 / Check the path exists and is readable/writable"
        }
        ErrorCategory::Verification => {
            "输出文件回读失败，请检查磁盘空间与权限 / Output read-back failed, check disk space and permissions"
        }
        ErrorCategory::Other => "请检查输入文件和参数设置 / Please check input files and options",
    }
}

/// 致命错误处理：打印错误与建议后退出
fn handle_error(error: anyhow::Error) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error:#}");

    let exit_code = match error.downcast_ref::<AudioError>() {
        Some(AudioError::ResourceError(_)) => exit_codes::RESOURCE_ERROR,
        Some(audio_error) => {
            let category = ErrorCategory::from_audio_error(audio_error);
            eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));
            exit_code_for(category)
        }
        None => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 初始化日志：默认 warn，--verbose 时 debug，可由 RUST_LOG 覆盖
fn init_logging(config: &AppConfig) {
    let default_level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// 收集待转换文件：目录递归扫描，单文件直接使用
fn collect_input_files(config: &AppConfig) -> Result<Vec<PathBuf>, AudioError> {
    if config.is_batch_mode() {
        let files = tools::scan_wir_files(&config.input_path)?;
        tools::show_scan_results(config, &files);
        Ok(files)
    } else if config.input_path.is_file() {
        Ok(vec![config.input_path.clone()])
    } else {
        Err(AudioError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("文件或目录不存在: {}", config.input_path.display()),
        )))
    }
}

/// 根据并发配置选择串行或并行处理
fn process_files(config: &AppConfig, files: &[PathBuf]) -> BatchResult {
    let Some(requested) = config.parallel_files else {
        return tools::process_batch_serial(files, config);
    };

    let degree = tools::utils::effective_parallel_degree(requested, Some(files.len()));
    if degree == 1 {
        if config.verbose && !config.json {
            println!("[INFO] 并发度为1，使用串行模式 / Parallelism=1, using serial mode");
        }
        return tools::process_batch_serial(files, config);
    }

    tools::process_batch_parallel(files, config, degree).unwrap_or_else(|e| {
        eprintln!("[WARNING] 并行处理失败 / Parallel processing failed: {e}，回退到串行模式 / fallback to serial");
        tools::process_batch_serial(files, config)
    })
}

/// 应用程序主逻辑，返回退出码
fn run(config: &AppConfig) -> anyhow::Result<i32> {
    tools::show_startup_info(config);

    let files = collect_input_files(config)
        .with_context(|| format!("无法读取输入 / Cannot read input: {}", config.input_path.display()))?;
    if files.is_empty() {
        return Ok(0);
    }

    let batch = process_files(config, &files);

    if config.json {
        let report = tools::write_json_report(config, &batch).context("JSON报告序列化失败")?;
        println!("{report}");
    } else {
        tools::show_batch_summary(config, &batch);
        if let Some(category) = batch.stats.first_failure {
            eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));
        }
    }

    tools::show_completion_info(config);
    Ok(batch.stats.first_failure.map_or(0, exit_code_for))
}

fn main() {
    let config = tools::parse_args();
    init_logging(&config);

    match run(&config) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(error) => handle_error(error),
    }
}
