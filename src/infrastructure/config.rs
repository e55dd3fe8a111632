use crate::application::normalizer::ValuePolicy;
use crate::domain::chart::{RenderTarget, RenderTargets};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    /// Origin of the speed tester, e.g. `http://localhost:10000`
    pub base_url: String,
    /// Overrides the page's `data-site-root`
    pub site_root: Option<String>,
    pub page_snapshot: PathBuf,
    pub output_dir: PathBuf,
    pub value_policy: ValuePolicy,
    pub request_timeout_secs: u64,
    pub targets: TargetsConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:10000".to_string(),
            site_root: None,
            page_snapshot: PathBuf::from("index.html"),
            output_dir: PathBuf::from("charts"),
            value_policy: ValuePolicy::default(),
            request_timeout_secs: 15,
            targets: TargetsConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TargetsConfig {
    pub hour: String,
    pub day: String,
    pub month: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        let targets = RenderTargets::default();
        Self {
            hour: targets.hour.to_string(),
            day: targets.day.to_string(),
            month: targets.month.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn render_targets(&self) -> RenderTargets {
        RenderTargets {
            hour: RenderTarget::new(&self.targets.hour),
            day: RenderTarget::new(&self.targets.day),
            month: RenderTarget::new(&self.targets.month),
        }
    }

    /// Site root for the history endpoints: configuration first, then the page
    pub fn resolve_site_root(&self, page_site_root: Option<&str>) -> String {
        self.site_root
            .as_deref()
            .or(page_site_root)
            .unwrap_or_default()
            .to_string()
    }
}

/// Load `config/dashboard.toml` (optional) overlaid with `DASHBOARD_*` environment variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> DashboardConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply_to_missing_keys() {
        let config = from_toml(r#"base_url = "http://pi.local:10000""#);

        assert_eq!(config.base_url, "http://pi.local:10000");
        assert_eq!(config.value_policy, ValuePolicy::Tolerant);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.render_targets(), RenderTargets::default());
    }

    #[test]
    fn test_full_config() {
        let config = from_toml(
            r#"
            site_root = "/speed"
            page_snapshot = "/srv/speed/index.html"
            output_dir = "/srv/speed/charts"
            value_policy = "strict"

            [targets]
            hour = "day-chart"
            day = "month-chart"
            month = "year-chart"
            "#,
        );

        assert_eq!(config.value_policy, ValuePolicy::Strict);
        assert_eq!(config.page_snapshot, PathBuf::from("/srv/speed/index.html"));
        assert_eq!(config.render_targets().month, RenderTarget::new("year-chart"));
        assert_eq!(config.resolve_site_root(Some("/page")), "/speed");
    }

    #[test]
    fn test_site_root_falls_back_to_page() {
        let config = DashboardConfig::default();

        assert_eq!(config.resolve_site_root(Some("/page")), "/page");
        assert_eq!(config.resolve_site_root(None), "");
    }
}
