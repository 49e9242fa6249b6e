#[cfg(feature = "config")]
use clap::Args;
use scorebook_github::reqwest::GithubConfig;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Default number of index write attempts (no retry).
pub const DEFAULT_INDEX_WRITE_ATTEMPTS: u32 = 1;

/// How failures to read the index, other than "not found", are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndexReadPolicy {
    /// Treat the failure like a missing index and start a new one.
    #[default]
    Lenient,
    /// Abort the upload.
    Strict,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Repository the files and index are written to.
    #[cfg_attr(feature = "config", command(flatten))]
    pub github: GithubConfig,

    /// Handling of index read failures other than "not found"
    #[cfg_attr(
        feature = "config",
        arg(long, env = "INDEX_READ_POLICY", value_enum, default_value = "lenient")
    )]
    #[serde(default)]
    pub index_read_policy: IndexReadPolicy,

    /// Index writes attempted before a concurrency conflict fails the upload
    #[cfg_attr(
        feature = "config",
        arg(long, env = "INDEX_WRITE_ATTEMPTS", default_value_t = DEFAULT_INDEX_WRITE_ATTEMPTS)
    )]
    #[serde(default = "default_index_write_attempts")]
    pub index_write_attempts: u32,
}

fn default_index_write_attempts() -> u32 {
    DEFAULT_INDEX_WRITE_ATTEMPTS
}

impl ServiceConfig {
    /// Creates a configuration with the default index policies.
    pub fn new(github: GithubConfig) -> Self {
        Self {
            github,
            index_read_policy: IndexReadPolicy::default(),
            index_write_attempts: DEFAULT_INDEX_WRITE_ATTEMPTS,
        }
    }

    /// Sets the index read policy.
    pub fn with_index_read_policy(mut self, policy: IndexReadPolicy) -> Self {
        self.index_read_policy = policy;
        self
    }

    /// Sets the number of index write attempts.
    pub fn with_index_write_attempts(mut self, attempts: u32) -> Self {
        self.index_write_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::new(GithubConfig::new("t", "o", "r"));
        assert_eq!(config.index_read_policy, IndexReadPolicy::Lenient);
        assert_eq!(config.index_write_attempts, 1);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("strict".parse::<IndexReadPolicy>().unwrap(), IndexReadPolicy::Strict);
        assert_eq!(IndexReadPolicy::Lenient.to_string(), "lenient");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ServiceConfig = serde_json::from_value(serde_json::json!({
            "github": { "token": "t", "owner": "o", "repo": "r" }
        }))
        .unwrap();

        assert_eq!(config.github.branch, "main");
        assert_eq!(config.index_read_policy, IndexReadPolicy::Lenient);
        assert_eq!(config.index_write_attempts, 1);
    }
}
