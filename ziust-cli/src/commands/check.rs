//! The `ziust check` command.
//! `ziust check` 命令。

use std::fs;
use std::num::NonZeroUsize;
use std::thread;

use ziust_parser::{ParseOptions, parse_with};
use ziust_syntax::SyntaxTree;

use crate::output;

/// Parse the files on a bounded pool of threads, then report in argument order.
/// 在有限的线程上解析文件，然后按参数顺序报告。
pub fn run(files: &[String], options: &ParseOptions, quiet: bool) -> Result<(), String> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    tracing::info!(files = files.len(), workers, "checking");

    let results = check_all(files, options, workers);

    let mut errors = 0;
    let mut failed = 0;
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(tree) => {
                let count = tree.diagnostics().iter().filter(|d| d.is_error()).count();
                if count > 0 {
                    errors += count;
                    failed += 1;
                }
                if !quiet {
                    output::diagnostics(tree.source(), file, tree.diagnostics());
                }
            }
            Err(e) => {
                failed += 1;
                if !quiet {
                    output::error(&e);
                }
            }
        }
    }

    if failed > 0 {
        if !quiet && errors > 0 {
            output::error(&format!("{} syntax error(s) found", errors));
        }
        return Err(format!("{} of {} file(s) failed", failed, files.len()));
    }

    if !quiet {
        output::success(&format!("OK - {} file(s) parsed without errors", files.len()));
    }
    Ok(())
}

/// Each worker takes one contiguous share of the files.
fn check_all(
    files: &[String],
    options: &ParseOptions,
    workers: usize,
) -> Vec<Result<SyntaxTree, String>> {
    let share = share_size(files.len(), workers);
    thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(share)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|file| check_file(file, options))
                        .collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|(chunk, handle)| {
                handle.join().unwrap_or_else(|_| {
                    chunk
                        .iter()
                        .map(|_| Err("parser thread panicked".to_string()))
                        .collect()
                })
            })
            .collect()
    })
}

fn share_size(files: usize, workers: usize) -> usize {
    files.div_ceil(workers.max(1)).max(1)
}

fn check_file(file: &str, options: &ParseOptions) -> Result<SyntaxTree, String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))?;
    let options = options.clone().source_name(file);
    let tree = parse_with(&source, &options).map_err(|e| format!("{file}: {e}"))?;
    tracing::debug!(file, diagnostics = tree.diagnostics().len(), "checked");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_never_exceed_workers() {
        for (files, workers, threads) in [(40, 3, 3), (5, 8, 5), (8, 8, 8), (1, 1, 1), (9, 4, 3)] {
            let share = share_size(files, workers);
            assert_eq!(files.div_ceil(share), threads, "{files} files on {workers} workers");
        }
        assert_eq!(share_size(0, 4), 1);
        assert_eq!(share_size(3, 0), 3);
    }

    #[test]
    fn test_results_keep_argument_order() {
        let files: Vec<String> = (0..40).map(|i| format!("missing-{i}.zs")).collect();
        let results = check_all(&files, &ParseOptions::new(), 3);
        assert_eq!(results.len(), files.len());
        for (file, result) in files.iter().zip(&results) {
            let Err(message) = result else {
                panic!("{file} should not exist");
            };
            assert!(message.contains(&format!("'{file}'")), "{message}");
        }
    }
}
