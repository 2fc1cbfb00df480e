//! `llmgate init` — write a default configuration file.
//!
//! Creates `~/.llmgate/config.json` (or the `--config` path) with every
//! provider section present and empty. An existing file is left alone.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use llmgate_core::config::{get_config_path, save_config, Config};

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    println!();
    if write_default(&path)? {
        println!("  {} created config at {}", "✓".green(), path.display());
        println!();
        println!(
            "{}",
            "  Set modelProvider and the provider's keys, or export them as env vars.".green()
        );
    } else {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    }
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
///
/// Returns whether a file was written.
fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_default_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llmgate").join("config.json");

        assert!(write_default(&path).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"modelProvider\": \"azure_openai\""));

        std::fs::write(&path, "{}").unwrap();
        assert!(!write_default(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
