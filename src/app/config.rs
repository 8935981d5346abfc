use crate::app::cli::Cli;
use crate::app::models::ScanConfig;
use anyhow::{Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "scan.toml";

/// Raw file shape. `Option` fields keep "absent" distinct from "empty" so the
/// resolver can treat a missing safelist as an empty set while a missing
/// content list is still a hard error.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ScanConfigFile {
    content: Option<Vec<String>>,
    safelist: Option<Vec<String>>,
}

/// Rejected configuration states. Raised once at load time; there is no
/// fallback scan scope, so nothing recovers from these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`content` is missing or empty: there is nothing to scan")]
    EmptyContent,
    #[error("invalid glob pattern {pattern:?} in `content`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("invalid class name {0:?} in `safelist`")]
    InvalidClassName(String),
}

/// Find the configuration file: an explicit path wins, then `./scan.toml`,
/// then the per-user fallback under `~/.config`.
pub fn locate_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let fallback = home
        .join(".config")
        .join("scan_config")
        .join(CONFIG_FILE_NAME);
    if fallback.exists() {
        return Ok(fallback);
    }

    anyhow::bail!(
        "No configuration found: expected {:?} in the current directory or {:?}",
        CONFIG_FILE_NAME,
        fallback
    )
}

pub fn resolve_config(path: &Path, cli: &Cli) -> Result<ScanConfig> {
    let text =
        fs::read_to_string(path).context(format!("Failed to read config at {:?}", path))?;

    resolve_from_str(&text, cli.content.clone(), cli.safelist.clone())
}

/// Parse, merge and validate in one pass. The returned record is final;
/// nothing mutates it afterwards.
pub fn resolve_from_str(
    text: &str,
    extra_content: Option<Vec<String>>,
    extra_safelist: Option<Vec<String>>,
) -> Result<ScanConfig> {
    let parsed: ScanConfigFile =
        toml::from_str(text).context("Failed to parse scan configuration")?;

    let content = merge_vecs(parsed.content, extra_content);
    let safelist = merge_vecs(parsed.safelist, extra_safelist);

    Ok(validate(content, safelist)?)
}

/// Validation runs on the merged record, so patterns supplied on the command
/// line count towards the non-empty `content` requirement.
fn validate(content: Vec<String>, safelist: Vec<String>) -> Result<ScanConfig, ConfigError> {
    if content.is_empty() {
        return Err(ConfigError::EmptyContent);
    }
    for pattern in &content {
        // Compiling is the syntax check; the compiled glob itself is only
        // needed later, by the checker.
        Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
    }

    let mut classes = BTreeSet::new();
    for class in safelist {
        if !is_valid_class_name(&class) {
            return Err(ConfigError::InvalidClassName(class));
        }
        classes.insert(class);
    }

    Ok(ScanConfig {
        content,
        safelist: classes,
    })
}

/// A class-name token is anything non-empty without whitespace or control
/// characters. Variant prefixes (`lg:`) and fraction utilities (`w-1/2`)
/// pass untouched.
fn is_valid_class_name(class: &str) -> bool {
    !class.is_empty() && !class.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn merge_vecs(file_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = file_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<ScanConfig> {
        resolve_from_str(text, None, None)
    }

    #[test]
    fn example_config_loads_in_order() {
        let config = load(
            r#"
            content = ["./public/**/*.{html,js}", "./template.html"]
            safelist = ["lg:w-1/2"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.content,
            vec!["./public/**/*.{html,js}", "./template.html"]
        );
        assert_eq!(config.safelist.len(), 1);
        assert!(config.safelist.contains("lg:w-1/2"));
    }

    #[test]
    fn empty_content_is_rejected() {
        let err = load("content = []").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::EmptyContent)
        ));
    }

    #[test]
    fn missing_content_is_rejected() {
        let err = load(r#"safelist = ["mx-auto"]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::EmptyContent)
        ));
    }

    #[test]
    fn omitted_safelist_is_empty() {
        let config = load(r#"content = ["src/**"]"#).unwrap();
        assert!(config.safelist.is_empty());
    }

    #[test]
    fn duplicate_safelist_entries_collapse() {
        let config = load("content = [\"src/**\"]\nsafelist = [\"a\", \"a\"]").unwrap();
        assert_eq!(config.safelist.len(), 1);
        assert!(config.safelist.contains("a"));
    }

    #[test]
    fn invalid_glob_names_the_pattern() {
        let err = load(r#"content = ["src/[oops"]"#).unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "src/[oops"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn whitespace_in_class_name_is_rejected() {
        let err = load("content = [\"src/**\"]\nsafelist = [\"two words\"]").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidClassName(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        // A typo like `safelst` must not silently void the safelist.
        assert!(load("content = [\"src/**\"]\nsafelst = []").is_err());
    }

    #[test]
    fn cli_extras_merge_after_file_values() {
        let config = resolve_from_str(
            r#"content = ["a/**"]"#,
            Some(vec!["b/**".to_string(), "a/**".to_string()]),
            Some(vec!["mx-auto".to_string()]),
        )
        .unwrap();

        assert_eq!(config.content, vec!["a/**", "b/**"]);
        assert!(config.safelist.contains("mx-auto"));
    }

    #[test]
    fn cli_content_alone_satisfies_the_invariant() {
        let config =
            resolve_from_str("", Some(vec!["src/**/*.html".to_string()]), None).unwrap();
        assert_eq!(config.content, vec!["src/**/*.html"]);
    }

    #[test]
    fn round_trip_preserves_the_record() {
        let config = load(
            "content = [\"./public/**/*.{html,js}\", \"./template.html\"]\n\
             safelist = [\"lg:w-1/2\", \"dark:bg-gray-800\"]",
        )
        .unwrap();

        let rendered = toml::to_string_pretty(&config).unwrap();
        let reloaded = load(&rendered).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "content = [\"./template.html\"]").unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            content: None,
            safelist: None,
            check: false,
        };
        let config = resolve_config(&path, &cli).unwrap();
        assert_eq!(config.content, vec!["./template.html"]);
    }

    #[test]
    fn explicit_path_wins_config_discovery() {
        let chosen = locate_config_file(Some(Path::new("/somewhere/else.toml"))).unwrap();
        assert_eq!(chosen, PathBuf::from("/somewhere/else.toml"));
    }
}
