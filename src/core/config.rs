use std::env;
use std::time::Duration;

use url::Url;

use crate::ai::TransportConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion_endpoint: Url,
    pub completion_api_key: Option<String>,
    pub completion_model: Option<String>,
    pub accept_invalid_certs: bool,
    pub request_timeout: Option<Duration>,
    pub default_temperature: Option<f64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env::var("COMPLETION_ENDPOINT_URL")
            .map_err(|e| format!("COMPLETION_ENDPOINT_URL: {}", e))?;

        Ok(Self {
            completion_endpoint: Url::parse(&endpoint)
                .map_err(|e| format!("COMPLETION_ENDPOINT_URL: {}", e))?,
            completion_api_key: non_empty_var("COMPLETION_API_KEY"),
            completion_model: non_empty_var("COMPLETION_MODEL"),
            accept_invalid_certs: non_empty_var("COMPLETION_ACCEPT_INVALID_CERTS")
                .map(|v| parse_flag(&v))
                .transpose()
                .map_err(|e| format!("COMPLETION_ACCEPT_INVALID_CERTS: {}", e))?
                .unwrap_or(false),
            request_timeout: non_empty_var("COMPLETION_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>().map(Duration::from_secs))
                .transpose()
                .map_err(|e| format!("COMPLETION_TIMEOUT_SECS: {}", e))?,
            default_temperature: non_empty_var("DEFAULT_TEMPERATURE")
                .map(|v| parse_temperature(&v))
                .transpose()
                .map_err(|e| format!("DEFAULT_TEMPERATURE: {}", e))?,
        })
    }

    #[must_use]
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            accept_invalid_certs: self.accept_invalid_certs,
            timeout: self.request_timeout,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

fn parse_temperature(raw: &str) -> Result<f64, String> {
    let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("expected a finite number, got '{}'", raw.trim()))
    }
}
