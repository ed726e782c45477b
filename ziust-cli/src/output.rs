//! Output formatting utilities.
//! 输出格式化工具。
//!
//! These functions provide colored terminal output for the CLI.
//! 这些函数为 CLI 提供彩色终端输出。

use ziust_diagnostic::{Diagnostic, emit};

/// Print a success message in green.
/// 以绿色打印成功消息。
pub fn success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

/// Print a warning message in yellow.
/// 以黄色打印警告消息。
pub fn warning(msg: &str) {
    eprintln!("\x1b[33mwarning:\x1b[0m {msg}");
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("\x1b[31merror:\x1b[0m {msg}");
}

/// Render diagnostics for one file to stderr.
/// 将一个文件的诊断输出到标准错误。
pub fn diagnostics(source: &str, file: &str, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        if let Err(e) = emit(source, file, diag) {
            warning(&format!("cannot render diagnostic: {e}"));
        }
    }
}
