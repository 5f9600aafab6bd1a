//! Native account addresses of the contract VM.

use std::fmt::Debug;

use borsh::{BorshDeserialize, BorshSerialize};
use data_encoding::HEXUPPER;

use crate::string_encoding::{self, Bech32Codec};

/// The largest number of bytes an account address may have.
pub const MAX_ADDRESS_LEN: usize = 255;

/// The length of a user account address derived from a public key.
pub const USER_ADDRESS_LEN: usize = 20;

/// The length of a contract instance address.
pub const CONTRACT_ADDRESS_LEN: usize = 32;

/// Error from decoding address from string
pub type DecodeError = string_encoding::DecodeError;

/// Result of decoding address from string
pub type Result<T> = std::result::Result<T, DecodeError>;

/// An account's address in the calling VM.
///
/// Both user accounts (20 bytes) and contract instances (32 bytes) share this
/// type. Any length in `1..=255` is accepted.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
)]
pub struct AccAddress(Vec<u8>);

impl AccAddress {
    /// Make an address from raw bytes, checking the length bounds.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        verify_address_format(&bytes)?;
        Ok(Self(bytes))
    }

    /// The raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of raw bytes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Upper-case hex of the raw bytes.
    pub fn raw_hash(&self) -> String {
        HEXUPPER.encode(&self.0)
    }
}

impl AsRef<[u8]> for AccAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for AccAddress {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

impl BorshDeserialize for AccAddress {
    fn deserialize_reader<R: std::io::Read>(
        reader: &mut R,
    ) -> std::io::Result<Self> {
        let bytes: Vec<u8> = BorshDeserialize::deserialize_reader(reader)?;
        Self::new(bytes).map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, err)
        })
    }
}

impl Debug for AccAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccAddress({})", self.raw_hash())
    }
}

/// Check the raw length of an account address.
pub fn verify_address_format(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidInnerEncoding(
            "Addresses cannot be empty".to_string(),
        ));
    }
    if bytes.len() > MAX_ADDRESS_LEN {
        return Err(DecodeError::InvalidInnerEncoding(format!(
            "Address length {} exceeds the maximum of {MAX_ADDRESS_LEN} bytes",
            bytes.len()
        )));
    }
    Ok(())
}

/// Conversion between account addresses and their string form.
pub trait AddressCodec {
    /// Parse an address from its string form.
    fn string_to_address(&self, string: &str) -> Result<AccAddress>;

    /// Format an address to its string form.
    fn address_to_string(&self, address: &AccAddress) -> String;
}

impl AddressCodec for Bech32Codec {
    fn string_to_address(&self, string: &str) -> Result<AccAddress> {
        AccAddress::new(self.decode(string)?)
    }

    fn address_to_string(&self, address: &AccAddress) -> String {
        self.encode(address.as_bytes())
    }
}

impl<C: AddressCodec + ?Sized> AddressCodec for &C {
    fn string_to_address(&self, string: &str) -> Result<AccAddress> {
        (**self).string_to_address(string)
    }

    fn address_to_string(&self, address: &AccAddress) -> String {
        (**self).address_to_string(address)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_address_length_bounds() {
        assert_matches!(
            AccAddress::new(vec![]),
            Err(DecodeError::InvalidInnerEncoding(_))
        );
        assert_matches!(
            AccAddress::new(vec![1; MAX_ADDRESS_LEN + 1]),
            Err(DecodeError::InvalidInnerEncoding(_))
        );
        assert!(AccAddress::new(vec![1; 1]).is_ok());
        assert!(AccAddress::new(vec![1; USER_ADDRESS_LEN]).is_ok());
        assert!(AccAddress::new(vec![1; CONTRACT_ADDRESS_LEN]).is_ok());
        assert!(AccAddress::new(vec![1; MAX_ADDRESS_LEN]).is_ok());
    }

    #[test]
    fn test_borsh_checks_length() {
        let empty = borsh::to_vec(&Vec::<u8>::new()).unwrap();
        assert!(AccAddress::try_from_slice(&empty).is_err());
        let too_long = borsh::to_vec(&vec![0u8; MAX_ADDRESS_LEN + 1]).unwrap();
        assert!(AccAddress::try_from_slice(&too_long).is_err());
    }

    #[test]
    fn test_codec_rejects_empty_payload() {
        // Valid checksum, but zero data bytes.
        let codec = Bech32Codec::default();
        assert_matches!(
            codec.string_to_address("cosmos1550dq7"),
            Err(DecodeError::InvalidInnerEncoding(_))
        );
    }

    #[test]
    fn test_codec_sample_addresses() {
        let codec = Bech32Codec::default();
        let contract = testing::contract_address_1();
        assert_eq!(contract.len(), CONTRACT_ADDRESS_LEN);
        assert_eq!(
            codec.address_to_string(&contract),
            testing::CONTRACT_ADDRESS_1
        );
        let user = testing::user_address_1();
        assert_eq!(user.len(), USER_ADDRESS_LEN);
        assert_eq!(codec.address_to_string(&user), testing::USER_ADDRESS_1);
    }

    #[test]
    fn test_debug_is_hex() {
        let contract = testing::contract_address_1();
        assert_eq!(
            format!("{contract:?}"),
            "AccAddress(4939E857759AF2F538B0701E04ED1726F812A0085431949CF4BDB4E2EFA415EE)"
        );
    }

    proptest! {
        #[test]
        fn test_codec_roundtrip(address in testing::arb_acc_address()) {
            let codec = Bech32Codec::default();
            let encoded = codec.address_to_string(&address);
            let decoded = codec.string_to_address(&encoded).unwrap();
            prop_assert_eq!(address, decoded);
        }

        #[test]
        fn test_borsh_keeps_bytes(address in testing::arb_acc_address()) {
            let bytes = borsh::to_vec(&address).unwrap();
            let decoded = AccAddress::try_from_slice(&bytes).unwrap();
            prop_assert_eq!(address.as_bytes(), decoded.as_bytes());
        }
    }
}

/// Helpers for testing with addresses.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use proptest::prelude::*;

    use super::*;

    /// Bech32 form of [`contract_address_1`].
    pub const CONTRACT_ADDRESS_1: &str =
        "cosmos1fyu7s4m4nte02w9swq0qfmghymup9gqg2scef885hk6w9mayzhhqguflzk";

    /// Bech32 form of [`contract_address_2`].
    pub const CONTRACT_ADDRESS_2: &str =
        "cosmos1da0q3w6jctza0y987lj3h9d49quan5t5v4vne98k5phnxz7n2ddqmj7z59";

    /// Bech32 form of [`user_address_1`].
    pub const USER_ADDRESS_1: &str =
        "cosmos1avw932jqfu9d5h5r6mptccyepk5w9ctt9lvkfx";

    /// A sampled contract instance address for tests
    pub fn contract_address_1() -> AccAddress {
        AccAddress(vec![
            73, 57, 232, 87, 117, 154, 242, 245, 56, 176, 112, 30, 4, 237, 23,
            38, 248, 18, 160, 8, 84, 49, 148, 156, 244, 189, 180, 226, 239,
            164, 21, 238,
        ])
    }

    /// A sampled contract instance address for tests
    pub fn contract_address_2() -> AccAddress {
        Bech32Codec::default()
            .string_to_address(CONTRACT_ADDRESS_2)
            .expect("The sample address decoding shouldn't fail")
    }

    /// A sampled user account address for tests
    pub fn user_address_1() -> AccAddress {
        AccAddress(vec![
            235, 28, 88, 170, 64, 79, 10, 218, 94, 131, 214, 194, 188, 96, 153,
            13, 168, 226, 225, 107,
        ])
    }

    /// Generate an arbitrary [`AccAddress`] of any valid length.
    pub fn arb_acc_address() -> impl Strategy<Value = AccAddress> {
        prop::collection::vec(any::<u8>(), 1..=MAX_ADDRESS_LEN)
            .prop_map(AccAddress)
    }

    /// Generate an arbitrary user or contract [`AccAddress`].
    pub fn arb_account_address() -> impl Strategy<Value = AccAddress> {
        prop_oneof![
            prop::collection::vec(any::<u8>(), USER_ADDRESS_LEN),
            prop::collection::vec(any::<u8>(), CONTRACT_ADDRESS_LEN),
        ]
        .prop_map(AccAddress)
    }
}
