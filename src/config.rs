use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::classifier::{ContainerClassifier, DEFAULT_CMDLINE_KEYWORDS, DEFAULT_GROUP_KEYWORDS};
use crate::report::{PercentBasis, ReportOptions};
use crate::system::inspector::DEFAULT_CMDLINE_MAX_BYTES;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub report: ReportConfig,
    pub classifier: ClassifierConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub deadline_ms: u64,
    pub cmdline_max_bytes: usize,
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            deadline_ms: 2000,
            cmdline_max_bytes: DEFAULT_CMDLINE_MAX_BYTES,
            log_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub pretty: bool,
    pub system_percent_basis: String,
    pub container_percent_basis: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            pretty: true,
            system_percent_basis: "rss".to_string(),
            container_percent_basis: "vsz".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub cmdline_keywords: Vec<String>,
    pub cgroup_keywords: Vec<String>,
    pub use_cgroups: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            cmdline_keywords: DEFAULT_CMDLINE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            cgroup_keywords: DEFAULT_GROUP_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            use_cgroups: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub interval_ms: u64,
    pub output_dir: PathBuf,
    pub system_file: String,
    pub container_file: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            interval_ms: 5000,
            output_dir: PathBuf::from("."),
            system_file: "sysinfo.json".to_string(),
            container_file: "continfo.json".to_string(),
        }
    }
}

impl Config {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            cmdline_max_bytes: self.general.cmdline_max_bytes,
            deadline: Duration::from_millis(self.general.deadline_ms),
            system_basis: PercentBasis::from_str_config(&self.report.system_percent_basis)
                .unwrap_or(PercentBasis::Rss),
            container_basis: PercentBasis::from_str_config(&self.report.container_percent_basis)
                .unwrap_or(PercentBasis::Vsz),
            read_control_groups: self.classifier.use_cgroups,
        }
    }

    pub fn classifier(&self) -> ContainerClassifier {
        ContainerClassifier::new(
            self.classifier.cmdline_keywords.clone(),
            self.classifier.cgroup_keywords.clone(),
        )
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procsnap").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.deadline_ms, 2000);
        assert_eq!(config.general.cmdline_max_bytes, 512);
        assert!(config.report.pretty);
        assert_eq!(config.report.system_percent_basis, "rss");
        assert_eq!(config.classifier.cmdline_keywords.len(), 4);
        assert_eq!(config.watch.system_file, "sysinfo.json");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
cmdline_max_bytes = 128
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.cmdline_max_bytes, 128);
        // Other fields should be defaults
        assert_eq!(config.general.deadline_ms, 2000);
        assert_eq!(config.watch.interval_ms, 5000);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
deadline_ms = 500
cmdline_max_bytes = 1024
log_format = "json"

[report]
pretty = false
system_percent_basis = "vsz"
container_percent_basis = "rss"

[classifier]
cmdline_keywords = ["podman"]
cgroup_keywords = ["libpod"]
use_cgroups = false

[watch]
interval_ms = 1000
output_dir = "/run/procsnap"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let options = config.report_options();
        assert_eq!(options.deadline, Duration::from_millis(500));
        assert_eq!(options.cmdline_max_bytes, 1024);
        assert_eq!(options.system_basis, PercentBasis::Vsz);
        assert_eq!(options.container_basis, PercentBasis::Rss);
        assert!(!options.read_control_groups);
        assert!(!config.report.pretty);
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.watch.output_dir, PathBuf::from("/run/procsnap"));

        let classifier = config.classifier();
        assert!(classifier.is_container("podman run alpine", None));
        assert!(!classifier.is_container("dockerd", None));
        assert!(classifier.is_container("sh", Some("/machine.slice/libpod-1.scope")));
    }

    #[test]
    fn unknown_basis_falls_back_to_defaults() {
        let toml_str = r#"
[report]
system_percent_basis = "pss"
container_percent_basis = ""
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let options = config.report_options();
        assert_eq!(options.system_basis, PercentBasis::Rss);
        assert_eq!(options.container_basis, PercentBasis::Vsz);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.deadline_ms, 2000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("procsnap_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.deadline_ms, 2000);
        let _ = std::fs::remove_file(&temp);
    }
}
