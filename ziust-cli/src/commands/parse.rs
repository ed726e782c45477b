//! The `ziust parse` command.
//! `ziust parse` 命令。

use std::fs;

use clap::ValueEnum;
use ziust_parser::{ParseOptions, parse_with};

use crate::output;

/// How to print the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// S-expression. / S 表达式。
    Sexp,
    /// JSON, one object per node. / JSON。
    Json,
}

/// Print the syntax tree of a file, then its diagnostics.
/// 打印文件的语法树及其诊断。
pub fn run(file: &str, format: Format, options: &ParseOptions) -> Result<(), String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))?;

    let options = options.clone().source_name(file);
    let tree = parse_with(&source, &options).map_err(|e| format!("{file}: {e}"))?;

    match format {
        Format::Sexp => println!("{}", tree.to_sexp()),
        Format::Json => {
            let json = serde_json::to_string_pretty(&tree)
                .map_err(|e| format!("cannot serialize tree: {e}"))?;
            println!("{json}");
        }
    }

    output::diagnostics(&source, file, tree.diagnostics());
    Ok(())
}
