//! Standard string encoding for native account addresses.
//!
//! Account addresses of the calling VM are encoded with
//! [bech32](https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki),
//! a human-readable part followed by a base32 encoding with a limited
//! character set and a checksum. Only the BIP-173 bech32 checksum is
//! accepted; bech32m strings fail to decode.

use bech32::primitives::decode::{CheckedHrpstring, CheckedHrpstringError};
use bech32::Bech32;
pub use bech32::Hrp;
use thiserror::Error;

/// Default human-readable part of account addresses.
pub const ACCOUNT_HRP: &str = "cosmos";

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Empty address string is not allowed")]
    Empty,
    #[error("Error decoding from Bech32: {0}")]
    DecodeBech32(CheckedHrpstringError),
    #[error("Invalid Bech32 human-readable part: {0}")]
    InvalidHrp(String),
    #[error("Unexpected Bech32 human-readable part {0}, expected {1}")]
    UnexpectedHrp(String, String),
    #[error("Invalid address encoding: {0}")]
    InvalidInnerEncoding(String),
}

/// Encoder and decoder of bech32 strings under a fixed human-readable part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bech32Codec {
    hrp: Hrp,
}

impl Default for Bech32Codec {
    fn default() -> Self {
        Self::parse(ACCOUNT_HRP)
            .expect("The default human-readable part should be valid")
    }
}

impl Bech32Codec {
    /// Make a codec for the given human-readable part.
    pub fn new(hrp: Hrp) -> Self {
        Self { hrp }
    }

    /// Parse the human-readable part and make a codec for it.
    pub fn parse(hrp: impl AsRef<str>) -> Result<Self, DecodeError> {
        let hrp = Hrp::parse(hrp.as_ref())
            .map_err(|err| DecodeError::InvalidHrp(err.to_string()))?;
        Ok(Self { hrp })
    }

    /// The human-readable part of this codec.
    pub fn hrp(&self) -> &Hrp {
        &self.hrp
    }

    /// Encode raw bytes to a bech32 string.
    pub fn encode(&self, bytes: &[u8]) -> String {
        // The only failure is exceeding the bech32 code length, which the
        // address length bound keeps us well under.
        bech32::encode::<Bech32>(self.hrp, bytes).unwrap_or_else(|_| {
            panic!(
                "Encoding {} bytes under the human-readable part {} should \
                 never fail",
                bytes.len(),
                self.hrp
            )
        })
    }

    /// Try to decode raw bytes from a bech32 string.
    pub fn decode(
        &self,
        string: impl AsRef<str>,
    ) -> Result<Vec<u8>, DecodeError> {
        let string = string.as_ref();
        if string.trim().is_empty() {
            return Err(DecodeError::Empty);
        }
        let checked = CheckedHrpstring::new::<Bech32>(string)
            .map_err(DecodeError::DecodeBech32)?;
        let found = checked.hrp().to_lowercase();
        let expected = self.hrp.to_lowercase();
        if found != expected {
            return Err(DecodeError::UnexpectedHrp(found, expected));
        }
        let bytes: Vec<u8> = checked.byte_iter().collect();
        // Leftover padding bits must be zero and shorter than a byte, which
        // holds iff re-encoding gives back the input.
        let canonical = bech32::encode_lower::<Bech32>(self.hrp, &bytes)
            .map_err(|err| DecodeError::InvalidInnerEncoding(err.to_string()))?;
        if canonical != string.to_lowercase() {
            return Err(DecodeError::InvalidInnerEncoding(
                "Non-zero or excess padding bits".to_string(),
            ));
        }
        Ok(bytes)
    }
}
