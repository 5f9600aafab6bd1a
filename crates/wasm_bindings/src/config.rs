//! Configuration of the contract message encoders

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use evmwasm_core::string_encoding::{self, Bech32Codec, ACCOUNT_HRP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::CallEvmEncoder;

/// Name of the configuration file inside the base directory
pub const FILENAME: &str = "evmwasm-config.toml";

/// Errors of reading, writing or applying the configuration
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Error while reading config: {0}")]
    ReadError(config::ConfigError),
    #[error("Error while deserializing config: {0}")]
    DeserializationError(config::ConfigError),
    #[error("Error while writing config: {0}")]
    WriteError(std::io::Error),
    #[error("Error while serializing to toml: {0}")]
    TomlError(toml::ser::Error),
    #[error("Invalid account address prefix: {0}")]
    InvalidHrp(string_encoding::DecodeError),
}

/// Result of reading or writing the configuration
pub type Result<T> = std::result::Result<T, Error>;

/// Chain parameters the encoders depend on. Missing keys take their
/// default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Human-readable part of the chain's bech32 account addresses
    pub account_hrp: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_hrp: ACCOUNT_HRP.to_string(),
        }
    }
}

impl Config {
    /// Try to read the config from a file. Returns the default config if
    /// none exists.
    pub fn read(base_dir: impl AsRef<Path>) -> Result<Self> {
        let file_path = Self::file_path(base_dir.as_ref());
        if !file_path.exists() {
            return Ok(Self::default());
        }
        let config = config::Config::builder()
            .add_source(config::File::from(file_path.as_path()))
            .build()
            .map_err(Error::ReadError)?;
        config
            .try_deserialize()
            .map_err(|e: config::ConfigError| Error::DeserializationError(e))
    }

    /// Write configuration to a file.
    pub fn write(&self, base_dir: impl AsRef<Path>) -> Result<()> {
        let base_dir = base_dir.as_ref();
        create_dir_all(base_dir).map_err(Error::WriteError)?;
        let mut file =
            File::create(Self::file_path(base_dir)).map_err(Error::WriteError)?;
        let toml = toml::ser::to_string(&self).map_err(Error::TomlError)?;
        file.write_all(toml.as_bytes()).map_err(Error::WriteError)
    }

    /// Get the file path to the config
    pub fn file_path(base_dir: impl AsRef<Path>) -> PathBuf {
        base_dir.as_ref().join(FILENAME)
    }

    /// The account address codec for the configured prefix.
    pub fn codec(&self) -> Result<Bech32Codec> {
        Bech32Codec::parse(&self.account_hrp).map_err(Error::InvalidHrp)
    }

    /// A `call_evm` encoder for the configured prefix.
    pub fn encoder(&self) -> Result<CallEvmEncoder<Bech32Codec>> {
        self.codec().map(CallEvmEncoder::new)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_missing_file_gives_default() {
        let base_dir = tempfile::tempdir().unwrap();
        let config = Config::read(base_dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.codec().unwrap(), Bech32Codec::default());
    }

    #[test]
    fn test_write_then_read() {
        let base_dir = tempfile::tempdir().unwrap();
        let nested = base_dir.path().join("chain");
        let config = Config {
            account_hrp: "sei".to_string(),
        };
        config.write(&nested).unwrap();
        assert!(Config::file_path(&nested).exists());
        assert_eq!(Config::read(&nested).unwrap(), config);
    }

    #[test]
    fn test_read_hand_written_file() {
        let base_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            Config::file_path(base_dir.path()),
            "account_hrp = \"osmo\"\n",
        )
        .unwrap();
        let config = Config::read(base_dir.path()).unwrap();
        assert_eq!(config.account_hrp, "osmo");
        assert_eq!(config.encoder().unwrap().codec().hrp().as_str(), "osmo");
    }

    #[test]
    fn test_read_malformed_file() {
        let base_dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::file_path(base_dir.path()), "account_hrp = [")
            .unwrap();
        assert_matches!(Config::read(base_dir.path()), Err(Error::ReadError(_)));
    }

    #[test]
    fn test_invalid_hrp() {
        let config = Config {
            account_hrp: "".to_string(),
        };
        assert_matches!(config.codec(), Err(Error::InvalidHrp(_)));
        assert_matches!(config.encoder(), Err(Error::InvalidHrp(_)));
    }
}
