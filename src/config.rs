use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".i18nrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Dictionary file (`.json`, `.js` or `.ts`) mapping keys to display text.
    #[serde(default = "default_dictionary")]
    pub dictionary: String,
    /// Only keys under this prefix are used; empty means all keys.
    #[serde(default)]
    pub match_path: String,
    #[serde(default)]
    pub skip_unmatched: bool,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_template_callee")]
    pub template_callee: String,
    #[serde(default = "default_script_callee")]
    pub script_callee: String,
    #[serde(default = "default_log_receivers")]
    pub log_receivers: Vec<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_dictionary() -> String {
    "./src/locales/zh-CN.json".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**", "**/locales/**"]
        .map(String::from)
        .to_vec()
}

fn default_extensions() -> Vec<String> {
    ["vue", "js", "jsx", "ts", "tsx", "mjs", "cjs", "html"]
        .map(String::from)
        .to_vec()
}

fn default_template_callee() -> String {
    "$t".to_string()
}

fn default_script_callee() -> String {
    "i18n.t".to_string()
}

fn default_log_receivers() -> Vec<String> {
    vec!["console".to_string()]
}

fn default_log_file() -> String {
    "i18n-unmatched.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            match_path: String::new(),
            skip_unmatched: false,
            includes: default_includes(),
            ignores: default_ignores(),
            extensions: default_extensions(),
            template_callee: default_template_callee(),
            script_callee: default_script_callee(),
            log_receivers: default_log_receivers(),
            log_file: default_log_file(),
        }
    }
}

/// `i18n.t`, `$t`, `this.$t`: identifiers joined by dots.
fn is_valid_callee(callee: &str) -> bool {
    !callee.is_empty()
        && callee.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores` or `includes`,
    /// callees that are not dotted identifiers, and an empty extension list.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without `*` or `?` are literal paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for (field, callee) in [
            ("templateCallee", &self.template_callee),
            ("scriptCallee", &self.script_callee),
        ] {
            if !is_valid_callee(callee) {
                bail!("Invalid call name in '{}': \"{}\"", field, callee);
            }
        }

        if self.extensions.is_empty() {
            bail!("'extensions' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory holding the config file; relative paths in it resolve here.
    pub root: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.root.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "config loaded");
            Ok(ConfigLoadResult {
                config,
                root: path.parent().map(Path::to_path_buf),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: None,
        }),
    }
}
