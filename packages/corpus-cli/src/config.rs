use anyhow::{bail, Context, Result};
use clap::Args;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use topic_corpus::{canonicalize, CorpusConfig, PolitenessConfig, DEFAULT_BASE_URL};

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub user_agent: Option<String>,
    pub concurrency: usize,
    pub min_delay_ms: u64,
    pub jitter_ms: u64,
}

/// Flags overriding the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Base URL topics are appended to
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding one cache folder per seed topic
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// User agent sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Documents fetched at once while materializing
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Fixed delay before each request, in milliseconds
    #[arg(long, global = true)]
    pub min_delay_ms: Option<u64>,

    /// Upper bound of the random delay added on top, in milliseconds
    #[arg(long, global = true)]
    pub jitter_ms: Option<u64>,
}

impl CliConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        let defaults = PolitenessConfig::default();

        let config = Self {
            base_url: env::var("WIKICORPUS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            cache_dir: env::var("WIKICORPUS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("corpora")),
            user_agent: env::var("WIKICORPUS_USER_AGENT").ok(),
            concurrency: env::var("WIKICORPUS_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("WIKICORPUS_CONCURRENCY must be a positive number")?,
            min_delay_ms: env::var("WIKICORPUS_MIN_DELAY_MS")
                .unwrap_or_else(|_| defaults.min_delay_ms.to_string())
                .parse()
                .context("WIKICORPUS_MIN_DELAY_MS must be a number of milliseconds")?,
            jitter_ms: env::var("WIKICORPUS_JITTER_MS")
                .unwrap_or_else(|_| defaults.jitter_ms.to_string())
                .parse()
                .context("WIKICORPUS_JITTER_MS must be a number of milliseconds")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(cache_dir) = overrides.cache_dir {
            self.cache_dir = cache_dir;
        }
        if overrides.user_agent.is_some() {
            self.user_agent = overrides.user_agent;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(min_delay_ms) = overrides.min_delay_ms {
            self.min_delay_ms = min_delay_ms;
        }
        if let Some(jitter_ms) = overrides.jitter_ms {
            self.jitter_ms = jitter_ms;
        }
        self.validate()?;
        Ok(self)
    }

    /// The random part of the request delay is mandatory against the live site.
    fn validate(&self) -> Result<()> {
        if self.jitter_ms == 0 {
            bail!("jitter must be at least 1 ms; requests are never sent without a random delay");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        Ok(())
    }

    /// Library configuration for a corpus.
    pub fn corpus_config(&self) -> CorpusConfig {
        let mut config = CorpusConfig::new()
            .with_base_url(&self.base_url)
            .with_max_concurrent_fetches(self.concurrency)
            .with_politeness(PolitenessConfig {
                min_delay_ms: self.min_delay_ms,
                jitter_ms: self.jitter_ms,
                ..PolitenessConfig::default()
            });
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config
    }

    /// Cache folder for a seed topic, named after its canonical form.
    pub fn cache_dir_for(&self, topic_text: &str) -> PathBuf {
        self.cache_dir.join(canonicalize(topic_text).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from("corpora"),
            user_agent: None,
            concurrency: 1,
            min_delay_ms: 500,
            jitter_ms: 1000,
        }
    }

    #[test]
    fn test_overrides_win() {
        let config = config()
            .with_overrides(Overrides {
                base_url: Some("http://localhost:8080/wiki/".to_string()),
                concurrency: Some(4),
                jitter_ms: Some(250),
                ..Overrides::default()
            })
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/wiki/");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.jitter_ms, 250);
        assert_eq!(config.min_delay_ms, 500);
    }

    #[test]
    fn test_zero_jitter_rejected() {
        let err = config()
            .with_overrides(Overrides {
                jitter_ms: Some(0),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("jitter"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(config()
            .with_overrides(Overrides {
                concurrency: Some(0),
                ..Overrides::default()
            })
            .is_err());
    }

    #[test]
    fn test_corpus_config() {
        let corpus = config().corpus_config();
        assert_eq!(corpus.base_url, DEFAULT_BASE_URL);
        assert_eq!(corpus.politeness.min_delay_ms, 500);
        assert_eq!(corpus.politeness.requests_per_second, Some(1));
    }

    #[test]
    fn test_cache_dir_is_per_topic() {
        assert_eq!(
            config().cache_dir_for("data mining"),
            PathBuf::from("corpora/Data_Mining")
        );
    }
}
