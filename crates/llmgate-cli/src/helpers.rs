//! Shared CLI helpers — stdin input and result printing.

use std::io::Read;
use std::time::Duration;

use colored::Colorize;

use llmgate_providers::{EmbedPath, Embeddings};

/// How many leading values of each vector are printed.
const VECTOR_PREVIEW: usize = 4;

/// Read the whole of stdin, trimmed.
pub fn read_stdin() -> std::io::Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Print a model reply to stdout.
pub fn print_response(provider: &str, response: &str) {
    println!();
    println!("{}", format!("⚡ {provider}").cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

pub fn print_latency(latency: Duration) {
    println!("{}", format!("latency: {:.2}s", latency.as_secs_f64()).dimmed());
}

/// Print the shape of an embedding matrix and a short preview of each row.
pub fn print_embeddings(model: &str, embeddings: &Embeddings) {
    let (rows, dim) = embeddings.shape();
    let path = match embeddings.path() {
        EmbedPath::Single => "single",
        EmbedPath::Batch => "batch",
    };

    println!();
    println!(
        "{}  {}",
        format!("⚡ {model}").cyan().bold(),
        format!("{rows} × {dim} ({path})").dimmed()
    );
    for row in embeddings.as_rows() {
        println!("  {}", vector_preview(row));
    }
    println!();
}

/// `[a, b, c, d, …]` with at most [`VECTOR_PREVIEW`] values.
fn vector_preview(vector: &[f32]) -> String {
    let head: Vec<String> = vector
        .iter()
        .take(VECTOR_PREVIEW)
        .map(|v| format!("{v:.4}"))
        .collect();
    if vector.len() > VECTOR_PREVIEW {
        format!("[{}, …]", head.join(", "))
    } else {
        format!("[{}]", head.join(", "))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
