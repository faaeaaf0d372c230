use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use libpack_lib::{Config, Layout};

use crate::error::{PackError, Result};
use crate::packaging::Compressor;

pub const DEFAULT_INCLUDE_DIRECTORY: &str = "include";
pub const DEFAULT_INCLUDE_PREFIX: &str = "include";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "package";
pub const DEFAULT_ARCHIVE_NAME: &str = "%stem%.zip";

const ENV_PREFIX: &str = "LIBPACK_";

/// Fully resolved packaging settings. Every path the packager touches is named here.
#[derive(Debug, Clone)]
pub struct PackageSettings {
    pub include_directory: PathBuf,
    pub include_prefix: String,
    pub output_directory: PathBuf,
    pub archive_name: String,
    pub library_file_name: String,
    pub debug_library_path: PathBuf,
    pub release_library_path: PathBuf,
    pub layout: Layout,
    pub exclude: Vec<String>,
    pub compressor: Compressor,
}

impl PackageSettings {
    /// Settings with the conventional defaults for everything but the three library inputs.
    pub fn new(
        library_file_name: impl Into<String>,
        debug_library_path: impl Into<PathBuf>,
        release_library_path: impl Into<PathBuf>,
    ) -> Self {
        PackageSettings {
            include_directory: PathBuf::from(DEFAULT_INCLUDE_DIRECTORY),
            include_prefix: DEFAULT_INCLUDE_PREFIX.to_string(),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            library_file_name: library_file_name.into(),
            debug_library_path: debug_library_path.into(),
            release_library_path: release_library_path.into(),
            layout: Layout::Combined,
            exclude: Vec::new(),
            compressor: Compressor::Deflate,
        }
    }

    /// Resolves a merged [`Config`], filling defaults and rejecting missing inputs.
    pub fn resolve(config: &Config) -> Result<Self> {
        fn required(value: &Option<String>, name: &'static str) -> Result<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(PackError::MissingSetting(name))
        }

        let library_file_name = required(&config.library_file_name, "library_file_name")?;
        validate_library_file_name(&library_file_name)?;

        let mut settings = PackageSettings::new(
            library_file_name,
            required(&config.debug_library_path, "debug_library_path")?,
            required(&config.release_library_path, "release_library_path")?,
        );

        if let Some(dir) = &config.include_directory {
            settings.include_directory = PathBuf::from(dir);
        }
        if let Some(prefix) = &config.include_prefix {
            settings.include_prefix = prefix.trim_matches('/').to_string();
        }
        if let Some(dir) = &config.output_directory {
            settings.output_directory = PathBuf::from(dir);
        }
        if let Some(name) = &config.archive_name {
            settings.archive_name = name.clone();
        }
        settings.layout = config.layout.unwrap_or_default();
        settings.exclude = config.exclude.clone().unwrap_or_default();
        settings.compressor = if config.compress.unwrap_or(true) {
            Compressor::Deflate
        } else {
            Compressor::Stored
        };

        Ok(settings)
    }
}

/// The library name becomes a single path segment under `<variant>/lib/`.
pub fn validate_library_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(PackError::InvalidLibraryName(name.to_string()));
    }
    Ok(())
}

/// Reads environment variables prefixed with LIBPACK_
pub fn read_env() -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = std::env::vars().collect();
    config_from_vars(&vars)
}

pub fn config_from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Config> {
    macro_rules! get_env {
        ($key:expr) => {
            vars.get(&format!("{}{}", ENV_PREFIX, $key)).cloned()
        };
    }

    fn truthy(v: String) -> bool {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
    }

    let layout = get_env!("LAYOUT")
        .map(|v| {
            v.parse::<Layout>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_PREFIX}LAYOUT"))
        })
        .transpose()?;

    Ok(Config {
        config: get_env!("CONFIG"),
        include_directory: get_env!("INCLUDE_DIRECTORY"),
        include_prefix: get_env!("INCLUDE_PREFIX"),
        output_directory: get_env!("OUTPUT_DIRECTORY"),
        archive_name: get_env!("ARCHIVE_NAME"),
        library_file_name: get_env!("LIBRARY_FILE_NAME"),
        debug_library_path: get_env!("DEBUG_LIBRARY_PATH"),
        release_library_path: get_env!("RELEASE_LIBRARY_PATH"),
        layout,
        exclude: get_env!("EXCLUDE").map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        compress: get_env!("COMPRESS").map(truthy),
        dry: get_env!("DRY").map(truthy),
    })
}

/// Reads YAML or JSON config from file
pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
    let lower = path.to_lowercase();
    let cfg = if lower.ends_with(".json") {
        serde_json::from_str(&content).with_context(|| format!("parsing JSON config {path}"))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parsing YAML config {path}"))?
    };
    Ok(cfg)
}

/// Merge configs by priority: env < file < cli
pub fn merge_configs(env: Config, file: Config, cli: Config) -> Config {
    fn pick<T: Clone>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
        cli.or(file).or(env)
    }

    Config {
        config: pick(env.config, file.config, cli.config),
        include_directory: pick(env.include_directory, file.include_directory, cli.include_directory),
        include_prefix: pick(env.include_prefix, file.include_prefix, cli.include_prefix),
        output_directory: pick(env.output_directory, file.output_directory, cli.output_directory),
        archive_name: pick(env.archive_name, file.archive_name, cli.archive_name),
        library_file_name: pick(env.library_file_name, file.library_file_name, cli.library_file_name),
        debug_library_path: pick(
            env.debug_library_path,
            file.debug_library_path,
            cli.debug_library_path,
        ),
        release_library_path: pick(
            env.release_library_path,
            file.release_library_path,
            cli.release_library_path,
        ),
        layout: pick(env.layout, file.layout, cli.layout),
        exclude: pick(env.exclude, file.exclude, cli.exclude),
        compress: pick(env.compress, file.compress, cli.compress),
        dry: pick(env.dry, file.dry, cli.dry),
    }
}
