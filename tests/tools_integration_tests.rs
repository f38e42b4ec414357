//! 工具层集成测试
//!
//! 测试CLI、目录扫描、单文件处理、串行/并行批处理与JSON报告的集成功能。


use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wir2wav::error::ErrorCategory;
use wir2wav::tools::{self, AppConfig};
use wir2wav::{AudioError, ChannelPolicy, ChannelRole, ConversionOptions, FloatEncoding};
use wir_test_fixtures::{WirBuilder, hall_ir, log};

fn base_config(input: &Path) -> AppConfig {
    AppConfig {
        input_path: input.to_path_buf(),
        json: true,
        ..AppConfig::default()
    }
}

/// 构造一个包含合法/损坏/非.wir文件的目录树
fn populate_ir_library(dir: &Path) -> Vec<PathBuf> {
    let mut files = vec![
        hall_ir(480).write_to(dir, "Hall.wir"),
        WirBuilder::int16(44100, 2, &[1, -1, 2, -2]).write_to(dir, "rooms/Small Room.WIR"),
        WirBuilder::int24(48000, 1, &[-5, 5, 0]).write_to(dir, "rooms/plates/Plate.wir"),
    ];
    std::fs::write(dir.join("notes.txt"), "not an impulse").unwrap();
    std::fs::write(dir.join("rooms/ignored.wav"), [0u8; 8]).unwrap();
    files.sort();
    files
}

// ============================================================================
// CLI配置测试
// ============================================================================

#[test]
fn test_batch_mode_detection() {
    let dir = TempDir::new().unwrap();
    let file = WirBuilder::int16(48000, 1, &[1]).write_to(dir.path(), "a.wir");

    assert!(base_config(dir.path()).is_batch_mode(), "目录路径应该被识别为批量模式");
    assert!(!base_config(&file).is_batch_mode(), "文件路径应该被识别为单文件模式");
    log("批量/单文件模式识别正确", "batch/single mode detection ok");
}

#[test]
fn test_parse_args_builds_conversion_options() {
    let config = tools::parse_args_from(["wir2wav", "irs", "-j", "8", "--keep-aux", "--json"])
        .unwrap();
    assert_eq!(config.parallel_files, Some(8));
    assert_eq!(
        config.conversion,
        ConversionOptions {
            channel_policy: ChannelPolicy::KeepAll,
            float_encoding: FloatEncoding::IeeeFloat,
        }
    );
    assert!(config.json);
}

// ============================================================================
// 扫描测试
// ============================================================================

#[test]
fn test_scan_is_recursive_sorted_and_filtered() {
    log("测试递归扫描", "Testing recursive scan");

    let dir = TempDir::new().unwrap();
    let expected = populate_ir_library(dir.path());

    let found = tools::scan_wir_files(dir.path()).unwrap();
    assert_eq!(found, expected);
    assert!(found.iter().all(|p| tools::utils::has_wir_extension(p)));
}

#[test]
fn test_scan_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    assert!(matches!(
        tools::scan_wir_files(&missing),
        Err(AudioError::IoError(_))
    ));

    let file = WirBuilder::int16(48000, 1, &[1]).write_to(dir.path(), "a.wir");
    assert!(matches!(
        tools::scan_wir_files(&file),
        Err(AudioError::InvalidInput(_))
    ));

    let empty = TempDir::new().unwrap();
    assert!(tools::scan_wir_files(empty.path()).unwrap().is_empty());
}

// ============================================================================
// 单文件处理测试
// ============================================================================

#[test]
fn test_process_file_writes_sibling_wav() {
    log("测试单文件转换写出", "Testing single-file conversion");

    let dir = TempDir::new().unwrap();
    let input = hall_ir(960).write_to(dir.path(), "Hall.wir");
    let config = AppConfig {
        verify: true,
        ..base_config(&input)
    };

    let report = tools::process_wir_file(&input, &config).unwrap();
    let output = dir.path().join("Hall.wav");
    assert_eq!(report.output.as_deref(), Some(output.as_path()));
    assert!(report.verified);
    assert_eq!(report.retained, vec![ChannelRole::Left, ChannelRole::Right]);
    assert_eq!(report.dropped, vec![ChannelRole::Auxiliary]);
    assert_eq!(report.output_spec.channels, 2);
    assert_eq!(std::fs::metadata(&output).unwrap().len() as usize, report.wav_bytes);

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 48000);
    assert_eq!(reader.duration(), 960);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = WirBuilder::int16(48000, 2, &[1, 2, 3, 4]).write_to(dir.path(), "a.wir");
    let config = AppConfig {
        dry_run: true,
        verify: true,
        ..base_config(&input)
    };

    let report = tools::process_wir_file(&input, &config).unwrap();
    assert!(report.output.is_none());
    assert!(report.verified);
    assert!(!dir.path().join("a.wav").exists());
}

#[test]
fn test_strict_pcm_rejects_float_file() {
    let dir = TempDir::new().unwrap();
    let input = hall_ir(16).write_to(dir.path(), "Hall.wir");
    let config = AppConfig {
        conversion: ConversionOptions {
            channel_policy: ChannelPolicy::DropAuxiliary,
            float_encoding: FloatEncoding::Reject,
        },
        ..base_config(&input)
    };

    match tools::process_wir_file(&input, &config) {
        Err(AudioError::UnsupportedBitDepth(_)) => {}
        other => panic!("期望 UnsupportedBitDepth, 实际 {other:?}"),
    }
    assert!(!dir.path().join("Hall.wav").exists(), "失败时不应写出文件");
}

#[test]
fn test_verify_detects_mismatch() {
    let wav = wir2wav::convert_wir_to_wav(&WirBuilder::int16(48000, 2, &[1, 2, 3, 4]).build())
        .unwrap();
    let reader = hound::WavReader::new(std::io::Cursor::new(&wav[..])).unwrap();
    let expected = wir2wav::WavSpec {
        format_tag: 1,
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 16,
    };

    match tools::verify_wav(reader, &expected, 3) {
        Err(AudioError::VerificationFailed(_)) => {}
        other => panic!("帧数不一致应校验失败: {other:?}"),
    }
}

// ============================================================================
// 批处理测试
// ============================================================================

#[test]
fn test_serial_and_parallel_batches_agree() {
    log("测试串行与并行批处理结果一致", "Testing serial vs parallel batches");

    let dir = TempDir::new().unwrap();
    let mut files = populate_ir_library(dir.path());
    let broken = WirBuilder::int16(48000, 2, &[1, 2, 3, 4])
        .with_riff_size_delta(64)
        .write_to(dir.path(), "broken.wir");
    files.insert(1, broken);

    let config = AppConfig {
        dry_run: true,
        ..base_config(dir.path())
    };

    let serial = tools::process_batch_serial(&files, &config);
    let parallel = tools::process_batch_parallel(&files, &config, 3).unwrap();

    assert_eq!(serial.stats, parallel.stats);
    assert_eq!(serial.stats.converted, 3);
    assert_eq!(serial.stats.failed, 1);
    assert_eq!(serial.stats.first_failure, Some(ErrorCategory::Data));
    assert_eq!(
        serial.stats.error_stats[ErrorCategory::Data.display_name()],
        vec!["broken.wir".to_string()]
    );

    let order: Vec<&PathBuf> = parallel.outcomes.iter().map(|o| &o.path).collect();
    assert_eq!(order, files.iter().collect::<Vec<_>>(), "并行结果应保持输入顺序");
    assert!(parallel.outcomes.iter().enumerate().all(|(i, o)| o.index == i));
}

#[test]
fn test_json_report() {
    log("测试JSON报告", "Testing JSON report");

    let dir = TempDir::new().unwrap();
    let good = WirBuilder::int16(48000, 3, &[1, 5, 9]).write_to(dir.path(), "good.wir");
    let bad = WirBuilder::int16(48000, 4, &[1, 2, 3, 4]).write_to(dir.path(), "quad.wir");
    let config = base_config(dir.path());

    let batch = tools::process_batch_serial(&[good, bad], &config);
    let json = tools::write_json_report(&config, &batch).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["converted"], 1);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["dry_run"], false);
    let files = value["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "ok");
    assert_eq!(files[0]["output_channels"], 2);
    assert_eq!(files[0]["dropped"][0], "Auxiliary");
    assert_eq!(files[0]["source"]["channels"], 3);
    assert_eq!(files[1]["status"], "failed");
    assert!(files[1]["error"].as_str().unwrap().contains("4"));

    assert!(dir.path().join("good.wav").exists());
    assert!(!dir.path().join("quad.wav").exists());
}
