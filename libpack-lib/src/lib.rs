use serde::{Deserialize, Serialize};

/// Layered packaging configuration.
///
/// Every field is optional so that environment, config file and CLI layers can
/// be merged field by field before being resolved into concrete settings.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub config: Option<String>,
    pub include_directory: Option<String>,
    pub include_prefix: Option<String>,
    pub output_directory: Option<String>,
    pub archive_name: Option<String>,
    pub library_file_name: Option<String>,
    pub debug_library_path: Option<String>,
    pub release_library_path: Option<String>,
    pub layout: Option<Layout>,
    pub exclude: Option<Vec<String>>,
    pub compress: Option<bool>,
    pub dry: Option<bool>,
}

/// How build variants are distributed over output archives.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One archive holding the header tree and both library variants.
    #[default]
    Combined,
    /// One archive per variant, each with its own copy of the header tree.
    Split,
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(Layout::Combined),
            "split" => Ok(Layout::Split),
            other => Err(format!("unknown layout '{other}' (expected combined|split)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_parses_case_insensitively() {
        assert_eq!("Split".parse::<Layout>(), Ok(Layout::Split));
        assert_eq!(" combined ".parse::<Layout>(), Ok(Layout::Combined));
        assert!("both".parse::<Layout>().is_err());
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let cfg: Config = serde_json::from_str(r#"{"library_file_name":"app.lib"}"#).unwrap();
        assert_eq!(cfg.library_file_name.as_deref(), Some("app.lib"));
        assert!(cfg.include_directory.is_none());
        assert!(cfg.layout.is_none());
    }
}
