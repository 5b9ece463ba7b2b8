use crate::api::endpoint;
use crate::model::MeterType;
use config::{Config, ConfigError, Environment, Source};
use serde::Deserialize;
use std::fmt;

const ENV_PREFIX: &str = "IOMETER";

#[derive(Clone, Deserialize)]
pub struct Settings {
    pub id: String,
    pub alias: String,
    pub enabled: bool,
    pub base_url: String,
    pub jwt: String,
    pub meter_type: MeterType,
}

impl Settings {
    /// Human-readable name, the component id unless an alias is set.
    pub fn alias(&self) -> &str {
        if self.alias.is_empty() {
            &self.id
        } else {
            &self.alias
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("id", &self.id)
            .field("alias", &self.alias)
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("jwt", &"<redacted>")
            .field("meter_type", &self.meter_type)
            .finish()
    }
}

/// Read settings from `IOMETER_*` environment variables.
pub fn read_settings() -> Result<Settings, ConfigError> {
    read_settings_from(Environment::with_prefix(ENV_PREFIX))
}

pub fn read_settings_from<S>(source: S) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let mut settings = Config::default();
    settings
        .merge(source)?
        .set_default("id", "meter0")?
        .set_default("alias", "")?
        .set_default("enabled", true)?
        .set_default("base_url", endpoint::READING)?
        .set_default("meter_type", "grid")?;

    settings.try_into()
}

#[cfg(test)]
mod test {
    use super::read_settings_from;
    use crate::api::endpoint;
    use crate::model::MeterType;
    use config::Environment;

    #[test]
    fn defaults() {
        std::env::set_var("IOMETER_TEST_DEFAULTS_JWT", "abc.def.ghi");
        let settings =
            read_settings_from(Environment::with_prefix("IOMETER_TEST_DEFAULTS")).unwrap();

        assert_eq!("meter0", settings.id);
        assert_eq!("meter0", settings.alias());
        assert!(settings.enabled);
        assert_eq!(endpoint::READING, settings.base_url);
        assert_eq!("abc.def.ghi", settings.jwt);
        assert_eq!(MeterType::Grid, settings.meter_type);
    }

    #[test]
    fn overrides() {
        std::env::set_var("IOMETER_TEST_OVERRIDES_JWT", "token");
        std::env::set_var("IOMETER_TEST_OVERRIDES_ID", "meter7");
        std::env::set_var("IOMETER_TEST_OVERRIDES_ALIAS", "Basement");
        std::env::set_var("IOMETER_TEST_OVERRIDES_ENABLED", "false");
        std::env::set_var("IOMETER_TEST_OVERRIDES_BASE_URL", "http://localhost:9000/r");
        std::env::set_var("IOMETER_TEST_OVERRIDES_METER_TYPE", "production");
        let settings =
            read_settings_from(Environment::with_prefix("IOMETER_TEST_OVERRIDES")).unwrap();

        assert_eq!("meter7", settings.id);
        assert_eq!("Basement", settings.alias());
        assert!(!settings.enabled);
        assert_eq!("http://localhost:9000/r", settings.base_url);
        assert_eq!(MeterType::Production, settings.meter_type);
    }

    #[test]
    fn jwt_is_required() {
        assert!(read_settings_from(Environment::with_prefix("IOMETER_TEST_MISSING")).is_err());
    }

    #[test]
    fn debug_redacts_jwt() {
        std::env::set_var("IOMETER_TEST_DEBUG_JWT", "very-secret");
        let settings = read_settings_from(Environment::with_prefix("IOMETER_TEST_DEBUG")).unwrap();
        assert!(!format!("{:?}", settings).contains("very-secret"));
    }
}
