//! `dplc` - compile a DPL source file into a datapack tree.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dplc_drv::Severity;

/// DPL to Minecraft datapack compiler.
#[derive(Debug, Parser)]
#[command(name = "dplc", version, about)]
struct Cli {
    /// DPL source file to compile.
    input: PathBuf,

    /// Directory to write the generated datapack into.
    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Print the symbol index as JSON on stdout instead of writing
    /// files.
    #[arg(long)]
    emit_symbols: bool,

    /// Suppress warnings and info diagnostics.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::from(2)
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;

    let output = dplc_drv::compile(&source);

    for diagnostic in &output.diagnostics {
        if cli.quiet && diagnostic.severity != Severity::Error {
            continue;
        }
        eprintln!(
            "{}:{}:{}: {}: {}",
            cli.input.display(),
            diagnostic.line,
            diagnostic.col,
            diagnostic.severity,
            diagnostic.message
        );
    }

    if cli.emit_symbols {
        let symbols: serde_json::Value = output
            .symbols
            .iter()
            .map(|(ns, pack)| {
                (
                    ns.clone(),
                    serde_json::json!({
                        "title": pack.title,
                        "variables": pack.variables.iter().collect::<Vec<_>>(),
                        "functions": pack.functions.iter().collect::<Vec<_>>(),
                        "items": pack.items.iter().collect::<Vec<_>>(),
                    }),
                )
            })
            .collect::<serde_json::Map<String, serde_json::Value>>()
            .into();
        println!("{}", serde_json::to_string_pretty(&symbols)?);
    }

    if output.has_errors() {
        eprintln!(
            "compilation failed with {} error(s)",
            output
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count()
        );
        return Ok(ExitCode::FAILURE);
    }

    if !cli.emit_symbols {
        dplc_drv::write_files(&output.files, &cli.output)
            .context("failed to write datapack")?;
        if !cli.quiet {
            eprintln!(
                "wrote {} files to '{}'",
                output.files.len(),
                cli.output.display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
