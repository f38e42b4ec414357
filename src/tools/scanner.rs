//! 文件扫描模块
//!
//! 递归扫描目录中的 .wir 文件。

use super::cli::AppConfig;
use super::utils;
use crate::{AudioError, AudioResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 递归扫描目录中的 .wir 文件（按路径排序）
///
/// 无法读取的目录项会被跳过并给出警告，不会中止整个扫描。
pub fn scan_wir_files(dir_path: &Path) -> AudioResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(AudioError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(AudioError::InvalidInput(format!(
            "路径不是目录: {}",
            dir_path.display()
        )));
    }

    let mut wir_files = Vec::new();
    for entry in WalkDir::new(dir_path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("跳过无法访问的目录项 / skipping unreadable entry: {e}");
                continue;
            }
        };

        if entry.file_type().is_file() && utils::has_wir_extension(entry.path()) {
            wir_files.push(entry.into_path());
        }
    }

    wir_files.sort();
    log::debug!(
        "扫描完成 / scan finished: {} 个文件 in {}",
        wir_files.len(),
        dir_path.display()
    );

    Ok(wir_files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, wir_files: &[PathBuf]) {
    if config.json {
        return;
    }

    if wir_files.is_empty() {
        println!(
            "[WARNING] 在目录 {} 中没有找到 .wir 文件 / No .wir files found",
            config.input_path.display()
        );
        return;
    }

    println!("扫描目录 / Scanning: {}", config.input_path.display());
    println!("找到 {} 个 .wir 文件 / Found {} .wir files", wir_files.len(), wir_files.len());

    if config.verbose {
        for (i, file) in wir_files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}
