//! 多文件并行处理模块
//!
//! 使用rayon实现文件级并行转换，按输入索引重排保证输出顺序一致

use super::batch_state::ParallelBatchStats;
use super::cli::AppConfig;
use super::processor::{BatchResult, FileOutcome, process_wir_file, summarize};
use super::{formatter, utils};
use crate::AudioError;
use rayon::prelude::*;
use std::path::PathBuf;

/// 多文件并行转换
///
/// - 自定义rayon线程池精确控制并发度
/// - 每个工作线程独占自己的输入/输出缓冲区，无共享可变状态
/// - 结果按原始索引排序，汇总与串行模式一致
///
/// 线程池创建失败时返回 `ResourceError`，由调用方决定是否回退串行。
pub fn process_batch_parallel(
    files: &[PathBuf],
    config: &AppConfig,
    parallel_degree: usize,
) -> Result<BatchResult, AudioError> {
    if !config.json {
        println!("[INFO] 启用多文件并行处理 / Parallel conversion: {parallel_degree} 并发度");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_degree)
        .thread_name(|i| format!("wir-worker-{i}"))
        .build()
        .map_err(|e| AudioError::ResourceError(format!("线程池创建失败: {e}")))?;

    let progress = ParallelBatchStats::new();
    let total = files.len();

    let mut outcomes: Vec<FileOutcome> = pool.install(|| {
        files
            .par_iter()
            .enumerate()
            .map(|(index, path)| {
                let result = process_wir_file(path, config);

                match &result {
                    Ok(_) => {
                        progress.record_success();
                    }
                    Err(e) => {
                        progress.record_failure();
                        log::debug!("转换失败 / failed: {} - {e}", path.display());
                    }
                }
                if config.verbose && !config.json {
                    println!(
                        "   [{}/{total}] {}",
                        progress.completed(),
                        utils::extract_filename_lossy(path)
                    );
                }

                FileOutcome {
                    index,
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    });

    // 按原始顺序排序结果（保证输出顺序）
    outcomes.sort_by_key(|o| o.index);

    if !config.json {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(report) => println!("   [OK] {}", formatter::describe_report(report)),
                Err(e) => println!(
                    "   [FAIL] {} - {e}",
                    utils::extract_filename_lossy(&outcome.path)
                ),
            }
        }
    }

    let stats = summarize(&outcomes);
    debug_assert_eq!(
        (stats.converted, stats.failed),
        progress.counts(),
        "并行计数与汇总不一致"
    );

    Ok(BatchResult { outcomes, stats })
}
