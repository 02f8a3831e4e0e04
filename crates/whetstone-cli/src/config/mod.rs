pub mod tracing;
pub use tracing::TracingConfig;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Configuration for [`tracing-subscriber`].
    pub tracing: TracingConfig,

    /// Population, tier and milestone tables.
    pub ranking: whetstone::Config,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn empty_config() {
        let config = toml::from_str::<Config>("").unwrap();

        assert!(config.tracing.enable, "tracing should be enabled by default");
        assert!(config.tracing.stderr.enable, "stderr output should be enabled by default");
        assert!(!config.tracing.files.enable, "log files should be opt-in");
        assert!(config.ranking.tiers.is_none());
    }

    #[test]
    fn full_config() {
        let config = toml::from_str::<Config>(
            r#"
            [tracing]
            enable = true

            [tracing.stderr]
            enable = false
            ansi = false

            [tracing.files]
            enable = true
            directory = "./logs"

            [ranking.population]
            reference = 8232000000
            buckets = [{ bucket = "region:japan", size = 124000000 }]

            [[ranking.tiers]]
            name = "Blunt"
            min-tgi = 0.0
            rank = 8232000000

            [[ranking.milestones]]
            name = "Vatican City"
            population = 800
            glyph = "🇻🇦"
            "#,
        )
        .unwrap();

        assert!(!config.tracing.stderr.enable, "stderr output should be disabled");
        assert!(config.tracing.files.enable, "log files should be enabled");
        assert_eq!(config.tracing.files.directory, Path::new("./logs"));
        assert_eq!(config.ranking.population.buckets.len(), 1);
        assert_eq!(config.ranking.tiers.map(|tiers| tiers.len()), Some(1));
        assert_eq!(config.ranking.milestones.map(|milestones| milestones.len()), Some(1));
    }

    #[test]
    fn rejects_unknown_sections() {
        assert!(toml::from_str::<Config>("[server]\nport = 80").is_err());
        assert!(toml::from_str::<Config>("[tracing]\njournald = true").is_err());
    }
}
