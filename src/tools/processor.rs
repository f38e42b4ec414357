//! 文件处理模块
//!
//! 负责单个 .wir 文件的读取、转换、写出与回读校验，以及串行批处理。

use super::batch_state::{BatchStatsSnapshot, SerialBatchStats};
use super::cli::AppConfig;
use super::{formatter, utils};
use crate::audio::wav_encoder::WAVE_FORMAT_IEEE_FLOAT;
use crate::{AudioError, AudioResult, ChannelRole, ConversionPipeline, WavSpec, WirHeader};
use std::io::Read;
use std::path::{Path, PathBuf};

/// 单文件转换报告
#[derive(Debug, Clone)]
pub struct FileReport {
    /// 输入 .wir 路径
    pub input: PathBuf,
    /// 写出的 .wav 路径（预演模式为 None）
    pub output: Option<PathBuf>,
    /// 源文件头部信息
    pub source: WirHeader,
    /// 输出编码参数
    pub output_spec: WavSpec,
    /// 保留的声道
    pub retained: Vec<ChannelRole>,
    /// 丢弃的声道
    pub dropped: Vec<ChannelRole>,
    /// 输出字节数
    pub wav_bytes: usize,
    /// 是否通过回读校验
    pub verified: bool,
}

/// 批处理中单个文件的结果（带原始索引）
#[derive(Debug)]
pub struct FileOutcome {
    pub index: usize,
    pub path: PathBuf,
    pub result: AudioResult<FileReport>,
}

/// 批处理结果
#[derive(Debug)]
pub struct BatchResult {
    /// 按输入顺序排列的结果
    pub outcomes: Vec<FileOutcome>,
    /// 统计快照
    pub stats: BatchStatsSnapshot,
}

/// 转换单个 .wir 文件
///
/// 读取整个文件 → 内存转换 → 写到同目录同名 .wav（预演模式跳过写出）。
/// `verify` 开启时用hound回读输出并核对格式与帧数。
pub fn process_wir_file(path: &Path, config: &AppConfig) -> AudioResult<FileReport> {
    let bytes = std::fs::read(path)?;
    let conversion = ConversionPipeline::new(config.conversion).convert(&bytes)?;
    log::debug!(
        "{} -> {} ch",
        formatter::describe_header(path, &conversion.source),
        conversion.output.channels
    );
    let frames = conversion.source.frame_count;

    let output = if config.dry_run {
        None
    } else {
        let out_path = utils::wav_output_path(path);
        std::fs::write(&out_path, &conversion.wav)?;
        log::debug!("写出 / wrote {}", out_path.display());
        Some(out_path)
    };

    if config.verify {
        match &output {
            Some(out_path) => {
                verify_wav(hound::WavReader::open(out_path)?, &conversion.output, frames)?
            }
            None => verify_wav(
                hound::WavReader::new(std::io::Cursor::new(&conversion.wav[..]))?,
                &conversion.output,
                frames,
            )?,
        }
    }

    Ok(FileReport {
        input: path.to_path_buf(),
        output,
        source: conversion.source,
        output_spec: conversion.output,
        retained: conversion.retained,
        dropped: conversion.dropped,
        wav_bytes: conversion.wav.len(),
        verified: config.verify,
    })
}

/// 用hound回读WAV并核对编码参数、帧数与样本可读性
pub fn verify_wav<R: Read>(
    mut reader: hound::WavReader<R>,
    expected: &WavSpec,
    frames: usize,
) -> AudioResult<()> {
    let spec = reader.spec();
    let expected_format = if expected.format_tag == WAVE_FORMAT_IEEE_FLOAT {
        hound::SampleFormat::Float
    } else {
        hound::SampleFormat::Int
    };

    if spec.channels != expected.channels
        || spec.sample_rate != expected.sample_rate
        || spec.bits_per_sample != expected.bits_per_sample
        || spec.sample_format != expected_format
    {
        return Err(AudioError::VerificationFailed(format!(
            "格式不一致: 读回 {}ch/{}Hz/{}bit/{:?}，期望 {}ch/{}Hz/{}bit/{:?}",
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format,
            expected.channels,
            expected.sample_rate,
            expected.bits_per_sample,
            expected_format
        )));
    }

    if reader.duration() as usize != frames {
        return Err(AudioError::VerificationFailed(format!(
            "帧数不一致: 读回 {}，期望 {frames}",
            reader.duration()
        )));
    }

    let samples_read = match expected_format {
        hound::SampleFormat::Float => count_samples(reader.samples::<f32>())?,
        hound::SampleFormat::Int => count_samples(reader.samples::<i32>())?,
    };
    let expected_samples = frames * expected.channels as usize;
    if samples_read != expected_samples {
        return Err(AudioError::VerificationFailed(format!(
            "样本数不一致: 读回 {samples_read}，期望 {expected_samples}"
        )));
    }

    Ok(())
}

fn count_samples<S, I>(samples: I) -> AudioResult<usize>
where
    I: Iterator<Item = hound::Result<S>>,
{
    let mut count = 0;
    for sample in samples {
        sample?;
        count += 1;
    }
    Ok(count)
}

/// 串行批量处理
pub fn process_batch_serial(files: &[PathBuf], config: &AppConfig) -> BatchResult {
    let mut stats = SerialBatchStats::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for (index, path) in files.iter().enumerate() {
        let filename = utils::extract_filename_lossy(path);
        if config.verbose && !config.json {
            println!(
                "[PROCESSING] [{}/{}] 处理 / Processing: {filename}",
                index + 1,
                files.len()
            );
        }

        let result = process_wir_file(path, config);
        match &result {
            Ok(report) => {
                stats.record_success();
                if !config.json {
                    println!("   [OK] {}", formatter::describe_report(report));
                }
            }
            Err(e) => {
                stats.record_failure(e, filename.clone());
                if !config.json {
                    println!("   [FAIL] {filename} - {e}");
                }
            }
        }

        outcomes.push(FileOutcome {
            index,
            path: path.clone(),
            result,
        });
    }

    BatchResult {
        outcomes,
        stats: stats.snapshot(),
    }
}

/// 按输入顺序汇总已排序的结果
pub fn summarize(outcomes: &[FileOutcome]) -> BatchStatsSnapshot {
    let mut stats = SerialBatchStats::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(_) => {
                stats.record_success();
            }
            Err(e) => {
                stats.record_failure(e, utils::extract_filename_lossy(&outcome.path));
            }
        }
    }
    stats.snapshot()
}
