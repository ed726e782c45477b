//! The `ziust tokens` command.
//! `ziust tokens` 命令。

use std::fs;

use ziust_lexer::Lexer;

use crate::output;

/// List the tokens of a file, one per line.
/// 逐行列出文件的 token。
pub fn run(file: &str, trivia: bool) -> Result<(), String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))?;

    let (tokens, diagnostics) = Lexer::new(&source).tokenize();
    for token in tokens.iter().filter(|t| trivia || !t.kind.is_trivia()) {
        println!(
            "{:>5}..{:<5} {:<16} {:?}",
            usize::from(token.span.start),
            usize::from(token.span.end),
            token.kind.to_string(),
            token.text(&source)
        );
    }

    output::diagnostics(&source, file, &diagnostics);
    Ok(())
}
