use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chat2html_core::{ConvertConfig, ConvertError, convert_export, write_output};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "chat2html",
    version,
    about = "Convert a Google Chat JSON export into a single HTML page"
)]
struct Cli {
    /// Directory containing messages.json and the exported attachments
    directory: PathBuf,

    /// Output file (defaults to $CHAT2HTML_OUTPUT, then ./chat_history.html)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Page title (defaults to $CHAT2HTML_TITLE, then "Chat History")
    #[arg(long)]
    title: Option<String>,

    /// Print the conversion summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chat2html_core=warn,chat2html=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> chat2html_core::Result<()> {
    let config = ConvertConfig::resolve(cli.directory, cli.output, cli.title);
    let conversion = convert_export(&config)?;
    write_output(&config.output_path, &conversion.html)?;

    info!(
        messages = conversion.summary.messages,
        attachments = conversion.summary.attachments,
        embedded = conversion.summary.embedded,
        warnings = conversion.summary.warnings.len(),
        "conversion finished"
    );

    if cli.summary_json {
        let json = serde_json::to_string_pretty(&conversion.summary)
            .map_err(|err| ConvertError::Serialization(err.to_string()))?;
        println!("{json}");
    } else {
        println!(
            "Successfully converted chat history to: {}",
            display_path(&config.output_path).display()
        );
    }

    Ok(())
}

fn display_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
