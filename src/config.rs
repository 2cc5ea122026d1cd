use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::{env, fmt, path::PathBuf, str::FromStr};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/health.json";

/// Timezone used to truncate provider timestamps to a calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// Millis outside chrono's range collapse to the epoch.
    pub fn date_of(&self, millis: i64) -> NaiveDate {
        let instant = DateTime::from_timestamp_millis(millis).unwrap_or_default();
        match self {
            Zone::Local => instant.with_timezone(&Local).date_naive(),
            Zone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    pub fn date_key(&self, millis: i64) -> String {
        self.date_of(millis).format("%Y-%m-%d").to_string()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now().timestamp_millis())
    }
}

impl FromStr for Zone {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(Zone::Local),
            "utc" | "z" => Ok(Zone::utc()),
            other => other
                .parse::<FixedOffset>()
                .map(Zone::Fixed)
                .map_err(|_| ConfigError(format!("invalid timezone '{value}'"))),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub zone: Zone,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = env::var("HEALTH_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let zone = match env::var("HEALTH_TZ") {
            Ok(value) => value.parse()?,
            Err(_) => Zone::Local,
        };

        Ok(Self {
            port,
            data_path,
            zone,
        })
    }
}
