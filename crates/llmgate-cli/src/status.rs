//! `llmgate status` — show the active provider and configuration gaps.
//!
//! - Shows the config path and the active provider
//! - Lists, for every provider, which chat and embedding keys are unset
//! - Lists the optional env vars each provider also reads

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use llmgate_core::config::{env_var, get_config_path, load_config, ConfigKey};
use llmgate_providers::{find_by_name, ProviderSpec, PROVIDERS};

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "⚡ llmgate Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    let active = config.active_provider();
    match find_by_name(&active) {
        Ok(spec) => println!("  {:<18} {}", "Provider:".bold(), spec.display_name),
        Err(e) => println!("  {:<18} {}", "Provider:".bold(), e.to_string().red()),
    }

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let marker = if spec.name == active { "▸" } else { " " };
        println!(
            "  {} {:<14} chat: {}  embeddings: {}",
            marker,
            spec.display_name,
            describe(spec, &spec.missing_chat_keys(&config)),
            describe(spec, &spec.missing_embedding_keys(&config)),
        );
        let optional = optional_vars(spec);
        if !optional.is_empty() {
            println!("  {:<16} optional: {}", "", optional.join(", ").dimmed());
        }
    }
    println!();

    Ok(())
}

/// `✓` when nothing is missing, otherwise the env vars to set.
fn describe(spec: &ProviderSpec, missing: &[ConfigKey]) -> String {
    if missing.is_empty() {
        return "✓".green().to_string();
    }
    missing_vars(spec, missing).join(", ").dimmed().to_string()
}

fn missing_vars(spec: &ProviderSpec, missing: &[ConfigKey]) -> Vec<String> {
    missing.iter().map(|k| env_var(spec.name, *k)).collect()
}

/// Optional chat keys, then optional embedding keys, without repeats.
fn optional_vars(spec: &ProviderSpec) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for key in spec.chat.optional.iter().chain(spec.embedding.optional) {
        let var = env_var(spec.name, *key);
        if !vars.contains(&var) {
            vars.push(var);
        }
    }
    vars
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
