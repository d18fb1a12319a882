//! Sink configuration: connection and behavior settings, supplied externally
//! through the embedding service's config file or through `BLOB_SINK_*`
//! environment variables.

use std::{env, fmt, str::FromStr};

use serde::Deserialize;

const ENV_PREFIX: &str = "BLOB_SINK_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting `{0}`")]
    Missing(&'static str),

    #[error("Invalid value `{value}` for setting `{name}`")]
    Invalid { name: &'static str, value: String },
}

/// Transport scheme used to reach the storage endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointProtocol {
    #[default]
    Https,
    Http,
}

impl fmt::Display for EndpointProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "https"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl FromStr for EndpointProtocol {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "https" => Ok(Self::Https),
            "http" => Ok(Self::Http),
            other => Err(other.to_string()),
        }
    }
}

/// Connection and behavior settings for a single sink instance.
///
/// Constructed once at process start and never mutated. The container name is
/// passed to the remote service as-is and must already be lowercase; no
/// normalization happens here.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Transport scheme for the storage endpoint.
    #[serde(default)]
    pub default_endpoints_protocol: EndpointProtocol,
    /// Storage account name.
    pub account_name: String,
    /// Storage account access key.
    pub account_key: String,
    /// Target container. Must be lowercase.
    pub container_name: String,
    /// Target blob name.
    pub blob_name: String,
    /// Create the container at startup when it does not exist.
    #[serde(default)]
    pub auto_create_container: bool,
    /// Grant anonymous container-wide read access at startup.
    #[serde(default)]
    pub public_permission: bool,
    /// Write to an append blob instead of overwriting a block blob.
    #[serde(default)]
    pub append_only: bool,
    /// Recreate the append blob at startup, discarding prior content.
    #[serde(default)]
    pub overwrite_existing_append: bool,
}

impl Config {
    /// Loads the configuration from `BLOB_SINK_*` environment variables.
    ///
    /// Account, key, container and blob names are required; the remaining
    /// settings fall back to their defaults (https, all flags off).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is absent or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            default_endpoints_protocol: optional_var("DEFAULT_ENDPOINTS_PROTOCOL")?
                .unwrap_or_default(),
            account_name: required_var("ACCOUNT_NAME")?,
            account_key: required_var("ACCOUNT_KEY")?,
            container_name: required_var("CONTAINER_NAME")?,
            blob_name: required_var("BLOB_NAME")?,
            auto_create_container: optional_var("AUTO_CREATE_CONTAINER")?.unwrap_or_default(),
            public_permission: optional_var("PUBLIC_PERMISSION")?.unwrap_or_default(),
            append_only: optional_var("APPEND_ONLY")?.unwrap_or_default(),
            overwrite_existing_append: optional_var("OVERWRITE_EXISTING_APPEND")?
                .unwrap_or_default(),
        })
    }

    /// The blob service endpoint derived from the protocol and account name.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}://{}.blob.core.windows.net",
            self.default_endpoints_protocol, self.account_name
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "default_endpoints_protocol",
                &self.default_endpoints_protocol,
            )
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("container_name", &self.container_name)
            .field("blob_name", &self.blob_name)
            .field("auto_create_container", &self.auto_create_container)
            .field("public_permission", &self.public_permission)
            .field("append_only", &self.append_only)
            .field("overwrite_existing_append", &self.overwrite_existing_append)
            .finish()
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(format!("{ENV_PREFIX}{name}")).map_err(|_| ConfigError::Missing(name))
}

fn optional_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(format!("{ENV_PREFIX}{name}")) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            default_endpoints_protocol: EndpointProtocol::default(),
            account_name: "acct".to_string(),
            account_key: "s3cr3t".to_string(),
            container_name: "logs".to_string(),
            blob_name: "out.txt".to_string(),
            auto_create_container: false,
            public_permission: false,
            append_only: false,
            overwrite_existing_append: false,
        }
    }

    #[test]
    fn renders_endpoint_from_protocol_and_account() {
        let mut config = base_config();
        assert_eq!(config.endpoint(), "https://acct.blob.core.windows.net");

        config.default_endpoints_protocol = EndpointProtocol::Http;
        assert_eq!(config.endpoint(), "http://acct.blob.core.windows.net");
    }

    #[test]
    fn debug_redacts_account_key() {
        let rendered = format!("{:?}", base_config());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn config_errors_name_the_setting() {
        insta::assert_snapshot!(
            ConfigError::Missing("ACCOUNT_KEY"),
            @"Missing required setting `ACCOUNT_KEY`"
        );
        insta::assert_snapshot!(
            ConfigError::Invalid {
                name: "APPEND_ONLY",
                value: "yep".to_string(),
            },
            @"Invalid value `yep` for setting `APPEND_ONLY`"
        );
    }

    #[test]
    fn loads_from_env() {
        // single test to keep env mutation serialized
        for (name, value) in [
            ("ACCOUNT_NAME", "acct"),
            ("ACCOUNT_KEY", "key"),
            ("CONTAINER_NAME", "logs"),
            ("BLOB_NAME", "out.txt"),
            ("DEFAULT_ENDPOINTS_PROTOCOL", "http"),
            ("APPEND_ONLY", "true"),
        ] {
            env::set_var(format!("{ENV_PREFIX}{name}"), value);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.account_name, "acct");
        assert_eq!(
            config.default_endpoints_protocol,
            EndpointProtocol::Http
        );
        assert!(config.append_only);
        assert!(!config.auto_create_container);
        assert!(!config.overwrite_existing_append);

        env::set_var(format!("{ENV_PREFIX}AUTO_CREATE_CONTAINER"), "not-a-bool");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid { name, .. }) if name == "AUTO_CREATE_CONTAINER"
        ));
        env::remove_var(format!("{ENV_PREFIX}AUTO_CREATE_CONTAINER"));

        env::remove_var(format!("{ENV_PREFIX}ACCOUNT_KEY"));
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("ACCOUNT_KEY"))
        ));
    }
}
