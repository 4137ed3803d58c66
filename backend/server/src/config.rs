use std::{env, fmt::Display, fs::read_to_string, path::Path, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

pub const SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";

pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_key: String,
    pub request_timeout: Duration,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Secret {0} not found in secrets directory or environment")]
    MissingSecret(&'static str),
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let secrets_dir: String = try_load("SECRETS_DIR", "/run/secrets")?;

        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            supabase_url: try_load("SUPABASE_URL", "http://localhost:54321")?,
            supabase_key: read_secret(&secrets_dir, SERVICE_KEY)?,
            request_timeout: Duration::from_millis(try_load("REQUEST_TIMEOUT_MS", "10000")?),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        })
}

/// Docker secret file first, then an environment variable of the same name.
fn read_secret(secrets_dir: &str, secret_name: &'static str) -> Result<String, ConfigError> {
    let path = Path::new(secrets_dir).join(secret_name);

    match read_to_string(&path) {
        Ok(secret) => Ok(secret.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");

            var(secret_name)
                .map(|secret| secret.trim().to_string())
                .ok_or(ConfigError::MissingSecret(secret_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_secret_from_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SERVICE_KEY), "  service-key\n").unwrap();

        let secret = read_secret(dir.path().to_str().unwrap(), SERVICE_KEY).unwrap();

        assert_eq!(secret, "service-key");
    }

    #[test]
    fn test_missing_secret() {
        let dir = tempfile::tempdir().unwrap();

        let result = read_secret(dir.path().to_str().unwrap(), "SAPOPEDIA_TEST_UNSET_SECRET");

        assert!(matches!(
            result,
            Err(ConfigError::MissingSecret("SAPOPEDIA_TEST_UNSET_SECRET"))
        ));
    }

    #[test]
    fn test_default_values() {
        let port: u16 = try_load("SAPOPEDIA_TEST_UNSET_PORT", "1111").unwrap();
        assert_eq!(port, 1111);

        let invalid = try_load::<u16>("SAPOPEDIA_TEST_UNSET_PORT", "not-a-port");
        assert!(matches!(
            invalid,
            Err(ConfigError::Invalid {
                key: "SAPOPEDIA_TEST_UNSET_PORT",
                ..
            })
        ));
    }
}
