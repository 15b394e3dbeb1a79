use std::fs;
use std::path::Path;

use clap::Args;
use edgeglow_core::{EdgeEffectConfig, GlowTheme};

use crate::error::{CliError, Result};

/// Config flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// JSON file with `EdgeEffectConfig` fields; missing fields keep defaults.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Override the theme ("light" or "dark").
    #[arg(long, value_parser = parse_theme)]
    pub theme: Option<GlowTheme>,

    /// Route pulls through the slow pull-decay fade.
    #[arg(long = "pull-decay")]
    pub pull_decay: bool,
}

impl ConfigArgs {
    /// Resolve the effective config: file, else environment, then flags.
    pub fn resolve(&self) -> Result<EdgeEffectConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => EdgeEffectConfig::from_env(),
        };
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if self.pull_decay {
            config.pull_decay = true;
        }
        Ok(config.validated())
    }
}

pub fn load_config_file(path: &Path) -> Result<EdgeEffectConfig> {
    if !path.exists() {
        return Err(CliError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    let config: EdgeEffectConfig = serde_json::from_str(&text)?;
    Ok(config.validated())
}

pub fn parse_theme(raw: &str) -> std::result::Result<GlowTheme, String> {
    GlowTheme::from_str_opt(raw).ok_or_else(|| format!("unknown theme `{raw}` (light|dark)"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use edgeglow_core::GlowTheme;

    use super::{ConfigArgs, load_config_file, parse_theme};
    use crate::error::CliError;

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"theme": "dark", "recede_ms": 900, "pull_decay": true}}"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.theme, GlowTheme::Dark);
        assert_eq!(config.recede_ms, 900);
        assert!(config.pull_decay);
        assert_eq!(config.absorb_ms, 250);
    }

    #[test]
    fn config_file_values_are_validated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_scale": 40.0, "recede_ms": 999999}}"#).unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.max_scale, 4.0);
        assert_eq!(config.recede_ms, 10_000);
    }

    #[test]
    fn malformed_config_file_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            load_config_file(file.path()),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let path = PathBuf::from("/tmp/edgeglow/does-not-exist.json");
        match load_config_file(&path) {
            Err(CliError::MissingPath { path: p }) => assert_eq!(p, path),
            other => panic!("expected MissingPath, got {other:?}"),
        }
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glow.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let args = ConfigArgs {
            config: Some(path),
            theme: Some(GlowTheme::Light),
            pull_decay: true,
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.theme, GlowTheme::Light);
        assert!(config.pull_decay);
    }

    #[test]
    fn theme_parser_accepts_aliases() {
        assert_eq!(parse_theme("Night"), Ok(GlowTheme::Dark));
        assert!(parse_theme("sepia").is_err());
    }
}
