use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scenepack::element::Element;

/// Compile a list of scene elements into a three.js scene JSON file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write the scene JSON to disk. Without this flag the tool only prints
    /// a reminder, matching the compiler's write-gate semantics.
    #[clap(short, long)]
    write: bool,

    /// JSON file holding an array of serialized elements.
    elements: PathBuf,

    /// Output path (`.json` is appended when missing).
    output: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> scenepack::Result<String> {
    let raw = fs::read_to_string(&args.elements)?;
    let elements: Vec<Element> = serde_json::from_str(&raw)?;
    scenepack::export(args.write, &args.output, elements)
}
