use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Result store file (defaults to ~/.config/ata-points/results.json)
    #[serde(default)]
    pub results_path: Option<PathBuf>,

    /// Tournament calendar file (defaults to ~/.config/ata-points/tournaments.yaml)
    #[serde(default)]
    pub calendar_path: Option<PathBuf>,

    /// Last day of the season; required for projection unless given on the command line
    #[serde(default)]
    pub season_end: Option<NaiveDate>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    pub fn results_path(&self) -> PathBuf {
        self.results_path
            .clone()
            .unwrap_or_else(crate::results::get_results_path)
    }

    pub fn calendar_path(&self) -> PathBuf {
        self.calendar_path
            .clone()
            .unwrap_or_else(crate::calendar::get_calendar_path)
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::CapRule;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
results_path: "/tmp/results.json"
calendar_path: "/tmp/tournaments.yaml"
season_end: "2026-06-30"
scoring:
  caps:
    c:
      keep: 1
      cap: 3
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.results_path(), PathBuf::from("/tmp/results.json"));
        assert_eq!(config.calendar_path(), PathBuf::from("/tmp/tournaments.yaml"));
        assert_eq!(config.season_end, NaiveDate::from_ymd_opt(2026, 6, 30));
        assert_eq!(config.scoring().caps.c, CapRule::new(1, Some(3)));
    }

    #[test]
    fn test_default_paths_in_config_dir() {
        let config = Config::default();
        assert!(config.results_path().ends_with("ata-points/results.json"));
        assert!(config.calendar_path().ends_with("ata-points/tournaments.yaml"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }
}
