use crate::context::StepSettings;
use analysis_api_client_instrumented::prelude::{AccessToken, Url};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Settings read from a TOML file. Every field is optional so that a file only needs to hold what
/// differs from the defaults or is not passed on the command line.
///
/// ```toml
/// coreapi_url = "http://localhost:32000/"
/// access_token = "..."
/// component_analysis_timeout_s = 600
/// poll_interval_s = 10
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    pub coreapi_url: Option<String>,
    pub access_token: Option<String>,
    pub component_analysis_timeout_s: Option<u64>,
    pub poll_interval_s: Option<u64>,
    pub service_wait_timeout_s: Option<u64>,
    pub http_timeout_s: Option<u64>,
}

/// Fully resolved configuration for a step run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub coreapi_url: Url,
    pub access_token: Option<AccessToken>,
    pub http_timeout: Duration,
    pub step_settings: StepSettings,
}

impl HarnessConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Layer `overrides` on top of this config. Values set in `overrides` win.
    pub fn merge(self, overrides: HarnessConfig) -> Self {
        Self {
            coreapi_url: overrides.coreapi_url.or(self.coreapi_url),
            access_token: overrides.access_token.or(self.access_token),
            component_analysis_timeout_s: overrides
                .component_analysis_timeout_s
                .or(self.component_analysis_timeout_s),
            poll_interval_s: overrides.poll_interval_s.or(self.poll_interval_s),
            service_wait_timeout_s: overrides
                .service_wait_timeout_s
                .or(self.service_wait_timeout_s),
            http_timeout_s: overrides.http_timeout_s.or(self.http_timeout_s),
        }
    }

    pub fn resolve(self) -> anyhow::Result<ResolvedConfig> {
        let coreapi_url = self
            .coreapi_url
            .context("No core API URL configured, set `coreapi_url` or `--coreapi-url`")?;
        let coreapi_url = Url::parse(&with_trailing_slash(coreapi_url))
            .context("Invalid core API URL")?;

        let defaults = StepSettings::default();
        let step_settings = StepSettings {
            component_analysis_timeout: self
                .component_analysis_timeout_s
                .map(Duration::from_secs)
                .unwrap_or(defaults.component_analysis_timeout),
            poll_interval: self
                .poll_interval_s
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            service_wait_timeout: self
                .service_wait_timeout_s
                .map(Duration::from_secs)
                .unwrap_or(defaults.service_wait_timeout),
        };
        if step_settings.poll_interval.is_zero() {
            anyhow::bail!("The polling interval must be at least one second");
        }

        Ok(ResolvedConfig {
            coreapi_url,
            access_token: self.access_token.filter(|t| !t.is_empty()).map(AccessToken::new),
            http_timeout: Duration::from_secs(self.http_timeout_s.unwrap_or(30)),
            step_settings,
        })
    }
}

// Paths are joined onto the base URL, which drops the last path segment unless the URL ends
// with a slash.
fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn load_and_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "coreapi_url = \"http://core.test/base\"\ncomponent_analysis_timeout_s = 120\npoll_interval_s = 5"
        )
        .unwrap();

        let config = HarnessConfig::load(file.path()).unwrap().merge(HarnessConfig {
            poll_interval_s: Some(2),
            access_token: Some("t0k".to_string()),
            ..Default::default()
        });
        let resolved = config.resolve().unwrap();

        assert_eq!("http://core.test/base/", resolved.coreapi_url.as_str());
        assert_eq!(Some(AccessToken::new("t0k")), resolved.access_token);
        assert_eq!(Duration::from_secs(120), resolved.step_settings.component_analysis_timeout);
        assert_eq!(Duration::from_secs(2), resolved.step_settings.poll_interval);
        assert_eq!(Duration::from_secs(60), resolved.step_settings.service_wait_timeout);
        assert_eq!(Duration::from_secs(30), resolved.http_timeout);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "core_url = \"http://core.test/\"").unwrap();

        assert!(HarnessConfig::load(file.path()).is_err());
    }

    #[test]
    fn url_is_required() {
        assert!(HarnessConfig::default().resolve().is_err());
    }

    #[test]
    fn empty_token_means_no_token() {
        let resolved = HarnessConfig {
            coreapi_url: Some("http://core.test/".to_string()),
            access_token: Some(String::new()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(None, resolved.access_token);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = HarnessConfig {
            coreapi_url: Some("http://core.test/".to_string()),
            poll_interval_s: Some(0),
            ..Default::default()
        };

        assert!(config.resolve().is_err());
    }
}
