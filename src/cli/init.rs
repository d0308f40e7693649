//! Init command - write an example blamerank.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use blamerank::config::EXAMPLE_CONFIG;

pub fn run(path: &Path, force: bool) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join("blamerank.toml");
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nNext: {}",
        style("blamerank report . --eslint").bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_example_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();
        let written = std::fs::read_to_string(dir.path().join("blamerank.toml")).unwrap();
        assert_eq!(written, EXAMPLE_CONFIG);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blamerank.toml"), "# mine\n").unwrap();
        assert!(run(dir.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(dir.path().join("blamerank.toml")).unwrap(), "# mine\n");

        run(dir.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("blamerank.toml")).unwrap(), EXAMPLE_CONFIG);
    }

    #[test]
    fn test_init_missing_path() {
        assert!(run(Path::new("/definitely/not/here"), false).is_err());
    }
}
