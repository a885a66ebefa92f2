/// Process-level settings loaded from environment variables.
///
/// Everything here is optional; the scoring parameters themselves live in the
/// TOML file this points at (see `strategy::ScoringConfig`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the scoring config file.
    pub scoring_config_path: String,
}

impl Config {
    pub const DEFAULT_SCORING_CONFIG_PATH: &'static str = "config/scoring.toml";

    /// Load configuration from the environment. Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            scoring_config_path: optional_env("SCORING_CONFIG_PATH")
                .unwrap_or_else(|| Self::DEFAULT_SCORING_CONFIG_PATH.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scoring_config_path: Self::DEFAULT_SCORING_CONFIG_PATH.to_string(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
