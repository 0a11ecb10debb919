use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is neither valid YAML nor valid JSON: {yaml_err} / {json_err}")]
    Parse {
        path: String,
        yaml_err: String,
        json_err: String,
    },

    #[error("invalid environment override {key}={value}: {reason}")]
    InvalidEnvOverride {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
