//! 输出格式化模块
//!
//! 单文件描述行、批量汇总表（comfy-table）与JSON报告。

use super::batch_state::{BatchStatsSnapshot, ErrorStats};
use super::cli::AppConfig;
use super::processor::{BatchResult, FileReport};
use super::utils;
use crate::ChannelRole;
use crate::WirHeader;
use crate::audio::wav_encoder::WAVE_FORMAT_IEEE_FLOAT;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 声道角色列表的显示文本，如 "L + R + Aux"
pub fn roles_label(roles: &[ChannelRole]) -> String {
    roles
        .iter()
        .map(|r| r.short_name())
        .collect::<Vec<_>>()
        .join(" + ")
}

/// 描述 .wir 文件，如 `WIR[hall.wir, 3 channels [L + R + Aux], 48000 Hz, 1.500 secs]`
pub fn describe_header(path: &Path, header: &WirHeader) -> String {
    let roles: Vec<ChannelRole> = (0..header.channels as usize)
        .map(ChannelRole::for_position)
        .collect();
    format!(
        "WIR[{}, {} channels [{}], {} Hz, {}-bit {}, {:.3} secs]",
        utils::extract_filename_lossy(path),
        header.channels,
        roles_label(&roles),
        header.sample_rate,
        header.bit_depth,
        header.sample_format.name(),
        header.duration_seconds()
    )
}

/// 单文件转换结果的描述行
pub fn describe_report(report: &FileReport) -> String {
    let target = match &report.output {
        Some(path) => utils::extract_filename_lossy(path),
        None => "(dry run)".to_string(),
    };
    let mut line = format!(
        "{} -> {target} ({} ch [{}], {})",
        describe_header(&report.input, &report.source),
        report.output_spec.channels,
        roles_label(&report.retained),
        output_encoding_label(report)
    );
    if !report.dropped.is_empty() {
        line.push_str(&format!(", 丢弃 / dropped: {}", roles_label(&report.dropped)));
    }
    if report.verified {
        line.push_str(", verified");
    }
    line
}

fn output_encoding_label(report: &FileReport) -> String {
    let kind = if report.output_spec.format_tag == WAVE_FORMAT_IEEE_FLOAT {
        "float"
    } else {
        "PCM"
    };
    format!("{}-bit {kind}", report.output_spec.bits_per_sample)
}

/// 构建批量汇总表
pub fn build_summary_table(batch: &BatchResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File / 文件",
        "Rate (Hz)",
        "In ch",
        "Out ch",
        "Output / 输出",
        "Duration (s)",
        "Status / 状态",
    ]);

    for outcome in &batch.outcomes {
        let name = utils::extract_filename_lossy(&outcome.path);
        match &outcome.result {
            Ok(report) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(report.source.sample_rate).set_alignment(CellAlignment::Right),
                    Cell::new(report.source.channels).set_alignment(CellAlignment::Right),
                    Cell::new(report.output_spec.channels).set_alignment(CellAlignment::Right),
                    Cell::new(output_encoding_label(report)),
                    Cell::new(format!("{:.3}", report.source.duration_seconds()))
                        .set_alignment(CellAlignment::Right),
                    Cell::new("OK"),
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("FAIL: {e}")),
                ]);
            }
        }
    }

    table
}

/// 控制台批量汇总
pub fn show_batch_summary(config: &AppConfig, batch: &BatchResult) {
    let stats = &batch.stats;
    if config.verbose && !batch.outcomes.is_empty() {
        println!();
        println!("{}", build_summary_table(batch));
    }

    println!();
    println!("批量处理完成 / Batch finished:");
    println!(
        "   成功 / Converted: {} / {}",
        stats.converted,
        stats.total()
    );
    if stats.failed > 0 {
        println!("   失败 / Failed: {}", stats.failed);
        for (category, files) in &stats.error_stats {
            println!("      {category}: {}", files.join(", "));
        }
    }
}

/// JSON报告中的单文件条目
#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub input: String,
    pub output: Option<String>,
    pub status: &'static str,
    pub source: Option<WirHeader>,
    pub output_channels: Option<u16>,
    pub output_bits: Option<u16>,
    pub output_format_tag: Option<u16>,
    pub dropped: Vec<ChannelRole>,
    pub verified: bool,
    pub error: Option<String>,
}

/// JSON批量报告
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub tool: String,
    pub generated_at: String,
    pub input: String,
    pub dry_run: bool,
    pub converted: usize,
    pub failed: usize,
    pub error_stats: ErrorStats,
    pub files: Vec<FileEntry>,
}

/// 生成JSON报告结构
pub fn build_batch_report(config: &AppConfig, batch: &BatchResult) -> BatchReport {
    let files = batch
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(report) => FileEntry {
                input: outcome.path.display().to_string(),
                output: report.output.as_ref().map(|p| p.display().to_string()),
                status: "ok",
                source: Some(report.source),
                output_channels: Some(report.output_spec.channels),
                output_bits: Some(report.output_spec.bits_per_sample),
                output_format_tag: Some(report.output_spec.format_tag),
                dropped: report.dropped.clone(),
                verified: report.verified,
                error: None,
            },
            Err(e) => FileEntry {
                input: outcome.path.display().to_string(),
                output: None,
                status: "failed",
                source: None,
                output_channels: None,
                output_bits: None,
                output_format_tag: None,
                dropped: Vec::new(),
                verified: false,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let BatchStatsSnapshot {
        converted,
        failed,
        error_stats,
        ..
    } = batch.stats.clone();

    BatchReport {
        tool: format!("wir2wav v{VERSION}"),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        input: config.input_path.display().to_string(),
        dry_run: config.dry_run,
        converted,
        failed,
        error_stats,
        files,
    }
}

/// 以JSON输出批量报告
pub fn write_json_report(config: &AppConfig, batch: &BatchResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build_batch_report(config, batch))
}
