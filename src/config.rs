use camino::Utf8PathBuf;

use crate::domain::RegionCode;
use crate::error::RarebirdError;

pub const DEFAULT_API_KEY: &str = "YOUR_API_KEY_HERE";
pub const DEFAULT_REGION: &str = "US-NY";
pub const DEFAULT_DAYS_BACK: u32 = 14;
pub const DEFAULT_OUTPUT: &str = "data/sightings.json";
pub const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub region: RegionCode,
    pub days_back: u32,
    pub output_path: Utf8PathBuf,
    pub base_url: String,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub region: Option<String>,
    pub days_back: Option<u32>,
    pub output_path: Option<Utf8PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn from_env() -> Result<Settings, RarebirdError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, RarebirdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("EBIRD_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let region: RegionCode = read("EBIRD_REGION")
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
            .parse()?;
        let days_back = match read("DAYS_BACK") {
            Some(value) => parse_days_back(&value)?,
            None => DEFAULT_DAYS_BACK,
        };
        let output_path = read("RAREBIRD_OUTPUT")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT));
        let base_url = read("EBIRD_BASE_URL")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Settings {
            api_key,
            region,
            days_back,
            output_path,
            base_url,
        })
    }

    pub fn apply_overrides(
        mut settings: Settings,
        overrides: SettingsOverrides,
    ) -> Result<Settings, RarebirdError> {
        if let Some(region) = overrides.region {
            settings.region = region.parse::<RegionCode>()?;
        }
        if let Some(days_back) = overrides.days_back {
            settings.days_back = days_back;
        }
        if let Some(path) = overrides.output_path {
            settings.output_path = path;
        }
        Ok(settings)
    }
}

fn parse_days_back(value: &str) -> Result<u32, RarebirdError> {
    value
        .parse::<u32>()
        .map_err(|err| RarebirdError::ConfigParse(format!("DAYS_BACK={value}: {err}")))
}
