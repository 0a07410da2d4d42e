use serde::{Deserialize, Serialize};

use crate::capability::{ParameterDataType, ParameterDescriptor};
use crate::error::PluginError;

/// Canonical parameter names, as announced by the definition endpoint.
pub const API_SCHEME: &str = "VOYRA_API_SCHEME";
pub const API_HOST: &str = "VOYRA_API_HOST";
pub const API_PORT: &str = "VOYRA_API_PORT";
pub const API_PATH: &str = "VOYRA_API_PATH";
pub const API_USERNAME: &str = "VOYRA_API_USERNAME";
pub const API_PASSWORD: &str = "VOYRA_API_PASSWORD";

/// The single schema table consulted by both the definition endpoint and the
/// resolver, so parameter names exist in exactly one place.
pub const CONFIG_SCHEMA: &[ParameterDescriptor] = &[
    ParameterDescriptor::required(API_SCHEME, ParameterDataType::String),
    ParameterDescriptor::required(API_HOST, ParameterDataType::String),
    ParameterDescriptor::required(API_PORT, ParameterDataType::Long),
    ParameterDescriptor::required(API_PATH, ParameterDataType::String),
    ParameterDescriptor::required(API_USERNAME, ParameterDataType::String),
    ParameterDescriptor::required(API_PASSWORD, ParameterDataType::String),
];

/// One name/value pair as sent alongside every inbound call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    pub value: String,
}

/// Connection parameters for the backend, resolved fresh per inbound call and
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub username: String,
    pub password: String,
}

impl Configuration {
    /// Resolves a configuration from an unordered set of parameters.
    ///
    /// Parameter names are matched by suffix so that a deployment may carry
    /// its own prefix; unknown names are ignored for forward compatibility.
    /// A port value that does not parse is a hard error for the call.
    pub fn from_parameters<'a, I>(parameters: I) -> Result<Self, PluginError>
    where
        I: IntoIterator<Item = &'a ParameterValue>,
    {
        let mut config = Configuration::default();
        for parameter in parameters {
            match parameter.name.as_str() {
                name if name.ends_with("_API_SCHEME") => config.scheme = parameter.value.clone(),
                name if name.ends_with("_API_HOST") => config.host = parameter.value.clone(),
                name if name.ends_with("_API_PORT") => {
                    config.port = parameter.value.parse().map_err(|_| {
                        PluginError::Configuration(format!(
                            "{} is not a valid port: '{}'",
                            parameter.name, parameter.value
                        ))
                    })?;
                }
                name if name.ends_with("_API_PATH") => config.base_path = parameter.value.clone(),
                name if name.ends_with("_API_USERNAME") => {
                    config.username = parameter.value.clone();
                }
                name if name.ends_with("_API_PASSWORD") => {
                    config.password = parameter.value.clone();
                }
                _ => {}
            }
        }
        Ok(config)
    }

    /// Base URL of the backend, `scheme://host:port/path`.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme, self.host, self.port, self.base_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, value: &str) -> ParameterValue {
        ParameterValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_resolves_all_recognized_parameters() {
        let parameters = vec![
            param(API_SCHEME, "https"),
            param(API_HOST, "api.example.com"),
            param(API_PORT, "443"),
            param(API_PATH, "/api/1"),
            param(API_USERNAME, "user"),
            param(API_PASSWORD, "secret"),
        ];

        let config = Configuration::from_parameters(&parameters).unwrap();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.host, "api.example.com");
        assert_eq!(config.port, 443);
        assert_eq!(config.base_path, "/api/1");
        assert_eq!(config.base_url(), "https://api.example.com:443/api/1");
    }

    #[test]
    fn test_foreign_prefix_matches_by_suffix() {
        let parameters = vec![param("ACME_API_HOST", "acme.example.com")];
        let config = Configuration::from_parameters(&parameters).unwrap();
        assert_eq!(config.host, "acme.example.com");
    }

    #[test]
    fn test_unknown_parameters_are_ignored() {
        let parameters = vec![param("SOMETHING_ELSE", "whatever"), param(API_HOST, "h")];
        let config = Configuration::from_parameters(&parameters).unwrap();
        assert_eq!(config.host, "h");
    }

    #[test]
    fn test_bad_port_is_a_configuration_error() {
        let parameters = vec![param(API_PORT, "not-a-number")];
        let err = Configuration::from_parameters(&parameters).unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
    }

    #[test]
    fn test_negative_port_is_a_configuration_error() {
        let parameters = vec![param(API_PORT, "-1")];
        let err = Configuration::from_parameters(&parameters).unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
    }
}
