use crate::config::parse_provider;
use clap::{Parser, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Detects the language of a source snippet, runs it with the matching toolchain and suggests fixes
#[derive(Parser, Debug)]
#[command(
    name = "polyrun",
    about = "Detect, compile and run a source snippet of unknown language",
    version,
    author,
    long_about = "polyrun guesses which language a snippet is written in (Java, Python, \
                  JavaScript, R, Kotlin or MicroPython), runs it with the installed toolchain \
                  and, when it fails, asks a language model for a corrected version.\n\n\
                  Examples:\n  \
                  polyrun hello.txt\n  \
                  polyrun snippet.src --format json\n  \
                  polyrun broken.src --backend ollama --model qwen2.5-coder:7b\n  \
                  polyrun slow.src --timeout 5 --no-recovery"
)]
pub struct CliArgs {
    #[arg(value_name = "FILE", help = "Source file; its whole contents are the snippet")]
    pub file: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help = "Per-process timeout in seconds (default: POLYRUN_EXEC_TIMEOUT or 30)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "Model provider used for repair suggestions"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (provider-specific, e.g. 'qwen2.5-coder:7b' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(long, help = "Never ask the model for a repair suggestion")]
    pub no_recovery: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only errors are logged"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
