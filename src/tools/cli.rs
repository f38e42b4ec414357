//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::{PCM_BIT_DEPTHS, defaults};
use crate::{ChannelPolicy, ConversionOptions, FloatEncoding};
use clap::{Arg, ArgAction, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件路径（单文件模式）或扫描目录（批量模式，递归）
    pub input_path: PathBuf,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 转换选项（声道策略 + 浮点输出方式）
    pub conversion: ConversionOptions,

    /// 写出后用hound回读校验
    pub verify: bool,

    /// 只解码描述，不写文件
    pub dry_run: bool,

    /// 多文件并行度（None = 串行）
    pub parallel_files: Option<usize>,

    /// 以JSON输出批量汇总
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            verbose: false,
            conversion: ConversionOptions {
                channel_policy: ChannelPolicy::DropAuxiliary,
                float_encoding: FloatEncoding::IeeeFloat,
            },
            verify: false,
            dry_run: false,
            parallel_files: Some(defaults::PARALLEL_FILES_DEGREE),
            json: false,
        }
    }
}

impl AppConfig {
    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }
}

fn build_command() -> Command {
    Command::new("wir2wav")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("INPUT")
                .help(".wir文件或目录路径（目录将被递归扫描）。默认为当前工作目录")
                .required(false)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-aux")
                .long("keep-aux")
                .help("保留立体声对之后的附加单声道")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pcm-bits")
                .long("pcm-bits")
                .help("将浮点数据量化为指定位深的整数PCM (16/24/32)")
                .value_name("BITS")
                .value_parser(value_parser!(u16).range(16..=32)),
        )
        .arg(
            Arg::new("strict-pcm")
                .long("strict-pcm")
                .help("拒绝浮点数据（只输出整数PCM）")
                .action(ArgAction::SetTrue)
                .conflicts_with("pcm-bits"),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("写出后回读WAV并校验格式与帧数")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("只解码并显示文件信息，不写出WAV")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("parallel-files")
                .long("parallel-files")
                .short('j')
                .help("多文件并行度（1-16，默认4）")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .help("禁用多文件并行，逐个处理")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("以JSON格式输出批量汇总")
                .action(ArgAction::SetTrue),
        )
}

/// 从给定参数解析配置（便于测试）
pub fn parse_args_from<I, T>(args: I) -> Result<AppConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = build_command();
    let matches = command.try_get_matches_from_mut(args)?;

    let float_encoding = match matches.get_one::<u16>("pcm-bits") {
        Some(&bits) if PCM_BIT_DEPTHS.contains(&bits) => FloatEncoding::Quantize(bits),
        Some(&bits) => {
            return Err(command.error(
                clap::error::ErrorKind::InvalidValue,
                format!("--pcm-bits 仅支持 16/24/32，实际: {bits}"),
            ));
        }
        None if matches.get_flag("strict-pcm") => FloatEncoding::Reject,
        None => FloatEncoding::IeeeFloat,
    };

    let channel_policy = if matches.get_flag("keep-aux") {
        ChannelPolicy::KeepAll
    } else {
        ChannelPolicy::DropAuxiliary
    };

    let parallel_files = if matches.get_flag("serial") {
        None
    } else {
        Some(
            matches
                .get_one::<usize>("parallel-files")
                .copied()
                .unwrap_or(defaults::PARALLEL_FILES_DEGREE),
        )
    };

    Ok(AppConfig {
        input_path: matches
            .get_one::<PathBuf>("INPUT")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        verbose: matches.get_flag("verbose"),
        conversion: ConversionOptions {
            channel_policy,
            float_encoding,
        },
        verify: matches.get_flag("verify"),
        dry_run: matches.get_flag("dry-run"),
        parallel_files,
        json: matches.get_flag("json"),
    })
}

/// 解析命令行参数并创建配置（参数错误时由clap输出用法并退出）
pub fn parse_args() -> AppConfig {
    parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    if config.json {
        return;
    }
    println!("wir2wav v{VERSION} - {DESCRIPTION}");
    if config.verbose {
        println!(
            "[INFO] 声道策略 / Channel policy: {:?}, 浮点输出 / Float output: {:?}",
            config.conversion.channel_policy, config.conversion.float_encoding
        );
        if config.dry_run {
            println!("[INFO] 预演模式，不写出文件 / Dry run, nothing will be written");
        }
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose && !config.json {
        println!("[OK] 所有任务处理完成 / All tasks completed");
    }
}
