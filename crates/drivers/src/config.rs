#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub window_width: usize,
    pub window_height: usize,
    pub advance_after_decision: bool,
    pub seed: Option<u64>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            advance_after_decision: true,
            seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// `VOC_VERIFIER_SEED`, `VOC_VERIFIER_LOG` and
    /// `VOC_VERIFIER_NO_AUTO_ADVANCE` override the defaults.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        if let Some(seed) = lookup("VOC_VERIFIER_SEED") {
            self.seed = Some(parse_seed(&seed)?);
        }
        if let Some(filter) = lookup("VOC_VERIFIER_LOG") {
            if !filter.trim().is_empty() {
                self.log_filter = filter;
            }
        }
        if let Some(flag) = lookup("VOC_VERIFIER_NO_AUTO_ADVANCE") {
            self.advance_after_decision = matches!(flag.trim(), "" | "0" | "false");
        }
        Ok(self)
    }
}

pub fn parse_seed(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid seed: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_wide_window() {
        let config = AppConfig::default();
        assert_eq!((config.window_width, config.window_height), (1280, 720));
        assert!(config.advance_after_decision);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::default()
            .with_env_overrides(|key| match key {
                "VOC_VERIFIER_SEED" => Some("17".to_string()),
                "VOC_VERIFIER_LOG" => Some("debug".to_string()),
                "VOC_VERIFIER_NO_AUTO_ADVANCE" => Some("1".to_string()),
                _ => None,
            })
            .expect("overrides");

        assert_eq!(config.seed, Some(17));
        assert_eq!(config.log_filter, "debug");
        assert!(!config.advance_after_decision);
    }

    #[test]
    fn bad_seed_is_rejected() {
        let result = AppConfig::default().with_env_overrides(|key| {
            (key == "VOC_VERIFIER_SEED").then(|| "abc".to_string())
        });
        assert!(result.is_err());
    }
}
