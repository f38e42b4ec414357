//! 批处理状态管理模块
//!
//! 统一的转换统计，支持串行和并行两种模式。失败文件按错误类别归档，
//! 供汇总表和退出码使用。

use crate::error::{AudioError, ErrorCategory};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 错误类别 -> 失败文件名列表
pub type ErrorStats = BTreeMap<String, Vec<String>>;

/// 批处理统计快照
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BatchStatsSnapshot {
    /// 成功转换的文件数
    pub converted: usize,
    /// 失败的文件数
    pub failed: usize,
    /// 第一个失败的错误类别（用于退出码）
    pub first_failure: Option<ErrorCategory>,
    /// 错误分类统计（类别显示名 -> 失败文件列表）
    pub error_stats: ErrorStats,
}

impl BatchStatsSnapshot {
    pub fn total(&self) -> usize {
        self.converted + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// 串行批处理统计（单线程）
#[derive(Debug, Default)]
pub struct SerialBatchStats {
    snapshot: BatchStatsSnapshot,
}

impl SerialBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功转换
    #[inline]
    pub fn record_success(&mut self) -> usize {
        self.snapshot.converted += 1;
        self.snapshot.converted
    }

    /// 记录一次失败并归档错误类别
    pub fn record_failure(&mut self, error: &AudioError, filename: String) -> usize {
        let category = ErrorCategory::from_audio_error(error);
        self.snapshot.failed += 1;
        self.snapshot.first_failure.get_or_insert(category);
        self.snapshot
            .error_stats
            .entry(category.display_name().to_string())
            .or_default()
            .push(filename);
        self.snapshot.failed
    }

    pub fn snapshot(&self) -> BatchStatsSnapshot {
        self.snapshot.clone()
    }
}

/// 并行批处理进度计数（多线程安全）
///
/// 只做原子计数用于实时进度；最终汇总按输入顺序交给 [`SerialBatchStats`]，
/// 保证首个失败与文件列表顺序确定。克隆共享同一状态。
#[derive(Debug, Clone, Default)]
pub struct ParallelBatchStats {
    converted: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

impl ParallelBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功转换（线程安全），返回当前成功数
    #[inline]
    pub fn record_success(&self) -> usize {
        self.converted.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 记录一次失败（线程安全），返回当前失败数
    #[inline]
    pub fn record_failure(&self) -> usize {
        self.failed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 已完成数（成功 + 失败）
    pub fn completed(&self) -> usize {
        self.converted.load(Ordering::Relaxed) + self.failed.load(Ordering::Relaxed)
    }

    pub fn counts(&self) -> (usize, usize) {
        (
            self.converted.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}
