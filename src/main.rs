use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use thiserror::Error;
use tracing::{info, warn, Level};

use construct_align::compute_result;
use construct_align::types::{AlignmentResult, GAP};

/// Upload rules carried over from the original submission front end.
const MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Error)]
enum InputError {
    #[error("{0}: only .py files are accepted")]
    NotPython(PathBuf),
    #[error("{path}: {size} bytes exceeds the 1 MiB limit")]
    TooLarge { path: PathBuf, size: u64 },
}

/// Validate and read one submission. Decoding is lossy; the core tolerates
/// arbitrary text.
fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.extension().map_or(true, |ext| ext != "py") {
        warn!(path = %path.display(), "rejected: not a python file");
        return Err(InputError::NotPython(path.to_path_buf()).into());
    }
    let size = std::fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len();
    if size > MAX_FILE_SIZE {
        warn!(path = %path.display(), size, "rejected: file too large");
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            size,
        }
        .into());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn colored_column(left: &str, right: &str) -> (String, String) {
    if left == right {
        (left.to_string(), right.to_string())
    } else if left == GAP {
        (left.dimmed().to_string(), right.green().to_string())
    } else if right == GAP {
        (left.red().to_string(), right.dimmed().to_string())
    } else {
        (left.red().to_string(), right.green().to_string())
    }
}

/// One line per alignment column, gaps included, for `--debug` output.
fn column_dump(result: &AlignmentResult) -> Vec<String> {
    result
        .aligned_seq1
        .iter()
        .zip(result.aligned_seq2.iter())
        .map(|(left, right)| format!("{left:<18} {right}"))
        .collect()
}

fn print_report(cli: &Cli, result: &AlignmentResult) {
    let mut row1 = Vec::with_capacity(result.aligned_seq1.len());
    let mut row2 = Vec::with_capacity(result.aligned_seq2.len());
    for (left, right) in result.aligned_seq1.iter().zip(result.aligned_seq2.iter()) {
        let (left, right) = colored_column(left, right);
        row1.push(left);
        row2.push(right);
    }
    println!("{}: {}", cli.file1.display(), row1.join(" "));
    println!("{}: {}", cli.file2.display(), row2.join(" "));
    println!("similarity:      {}", result.similarity);
    println!("needleman score: {}", result.needleman_score);
    println!("norm score:      {}", result.norm_score);
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    debug: bool,
    /// Emit the result record as JSON instead of the colored report.
    #[arg(long)]
    json: bool,
    file1: PathBuf,
    file2: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let file1_content = read_source(&cli.file1)?;
    let file2_content = read_source(&cli.file2)?;
    let result = compute_result(&file1_content, &file2_content);
    info!(
        similarity = result.similarity,
        score = result.needleman_score,
        "alignment finished"
    );

    if cli.debug {
        for line in column_dump(&result) {
            println!("{line}");
        }
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&cli, &result);
    }
    Ok(())
}
