//! Ziust CLI - command line front end for the Ziust parser.
//! Ziust CLI - Ziust 解析器的命令行界面。

mod commands;
mod output;

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ziust_parser::ParseOptions;

use crate::commands::parse::Format;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "ziust")]
#[command(author, version, about = "Ziust - lexer and error-tolerant parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (-v info, -vv debug, -vvv trace). / 输出更多日志。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Give up a parse after this many rule evaluations. / 解析步数上限。
    #[arg(long, global = true)]
    max_steps: Option<u64>,

    /// Give up a parse after this many milliseconds. / 解析超时（毫秒）。
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree of a file. / 打印文件的语法树。
    Parse {
        /// The file to parse. / 要解析的文件。
        file: String,

        /// Output format. / 输出格式。
        #[arg(long, value_enum, default_value_t = Format::Sexp)]
        format: Format,
    },

    /// Parse files and report diagnostics. / 解析文件并报告诊断。
    Check {
        /// The files to check. / 要检查的文件。
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List the tokens of a file. / 列出文件的 token。
    Tokens {
        /// The file to tokenize. / 要进行词法分析的文件。
        file: String,

        /// Include whitespace and comments. / 包含空白与注释。
        #[arg(long)]
        trivia: bool,
    },

    /// Print the grammar rules. / 打印语法规则。
    Grammar,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new();
        if let Some(steps) = self.max_steps {
            options = options.max_steps(steps);
        }
        if let Some(ms) = self.timeout_ms {
            options = options.deadline(Duration::from_millis(ms));
        }
        options
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = cli.parse_options();

    let result = match &cli.command {
        Commands::Parse { file, format } => commands::parse::run(file, *format, &options),
        Commands::Check { files } => commands::check::run(files, &options, cli.quiet),
        Commands::Tokens { file, trivia } => commands::tokens::run(file, *trivia),
        Commands::Grammar => commands::grammar::run(),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
