//! 工具函数模块
//!
//! 提供文件路径处理、并发度计算等通用工具函数。

use super::constants::{parallel_limits, scan};
use std::path::{Path, PathBuf};

/// 提取文件名（返回String，用于日志显示）
#[inline]
pub fn extract_filename_lossy(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// 推导输出路径：同目录，扩展名替换为 .wav
#[inline]
pub fn wav_output_path(input: &Path) -> PathBuf {
    input.with_extension(scan::OUTPUT_EXTENSION)
}

/// 判断路径是否为 .wir 文件（扩展名大小写不敏感）
#[inline]
pub fn has_wir_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(scan::INPUT_EXTENSION))
}

/// 计算实际并发度：限制在 [MIN, MAX] 内，且不超过任务数
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    let clamped = requested.clamp(
        parallel_limits::MIN_PARALLEL_DEGREE,
        parallel_limits::MAX_PARALLEL_DEGREE,
    );
    match task_count {
        Some(n) => clamped.min(n.max(1)),
        None => clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_output_path() {
        assert_eq!(
            wav_output_path(Path::new("irs/hall/Large Hall.wir")),
            PathBuf::from("irs/hall/Large Hall.wav")
        );
        assert_eq!(
            wav_output_path(Path::new("plate.v2.WIR")),
            PathBuf::from("plate.v2.wav")
        );
    }

    #[test]
    fn test_has_wir_extension() {
        assert!(has_wir_extension(Path::new("a.wir")));
        assert!(has_wir_extension(Path::new("dir/b.WIR")));
        assert!(!has_wir_extension(Path::new("c.wav")));
        assert!(!has_wir_extension(Path::new("wir")));
    }

    #[test]
    fn test_effective_parallel_degree() {
        assert_eq!(effective_parallel_degree(0, None), 1);
        assert_eq!(effective_parallel_degree(64, None), 16);
        assert_eq!(effective_parallel_degree(8, Some(3)), 3);
        assert_eq!(effective_parallel_degree(4, Some(0)), 1);
    }
}
