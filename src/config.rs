use serde::{Deserialize, Deserializer};

use crate::services::vectorizer::Weighting;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON movie catalog (`movie_id`, `title`, `tags` per entry)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Precomputed similarity artifact. When unset the matrix is built from the catalog tags.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub similarity_path: Option<String>,

    /// Term weighting used when building the matrix at startup
    #[serde(default)]
    pub weighting: Weighting,

    /// Vocabulary cap for startup vectorization, 0 keeps every term
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Drop English stop words before vectorizing
    #[serde(default = "default_stop_words")]
    pub stop_words: bool,

    #[serde(default = "default_min_recommendations")]
    pub min_recommendations: usize,

    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Count used when a request omits one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,
}

/// An empty variable (`SIMILARITY_PATH=`) counts as unset
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_movies_path() -> String {
    "models/movies.json".to_string()
}

fn default_max_features() -> usize {
    5000
}

fn default_stop_words() -> bool {
    true
}

fn default_min_recommendations() -> usize {
    3
}

fn default_max_recommendations() -> usize {
    10
}

fn default_recommendations() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            movies_path: default_movies_path(),
            similarity_path: None,
            weighting: Weighting::default(),
            max_features: default_max_features(),
            stop_words: default_stop_words(),
            min_recommendations: default_min_recommendations(),
            max_recommendations: default_max_recommendations(),
            default_recommendations: default_recommendations(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the recommendation count bounds are usable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_recommendations == 0 {
            anyhow::bail!("MIN_RECOMMENDATIONS must be at least 1");
        }
        if self.min_recommendations > self.max_recommendations {
            anyhow::bail!(
                "MIN_RECOMMENDATIONS ({}) exceeds MAX_RECOMMENDATIONS ({})",
                self.min_recommendations,
                self.max_recommendations
            );
        }
        if !(self.min_recommendations..=self.max_recommendations)
            .contains(&self.default_recommendations)
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS ({}) must lie within {}..={}",
                self.default_recommendations,
                self.min_recommendations,
                self.max_recommendations
            );
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
