//! Chain messages that route a contract call into the EVM module.

use evmwasm_core::address::{AccAddress, AddressCodec, DecodeError};
use prost::Message;
use thiserror::Error;

/// `Any` type URL of [`MsgInternalEvmCall`].
pub const INTERNAL_EVM_CALL_TYPE_URL: &str =
    "/evmwasm.evm.v1.MsgInternalEVMCall";

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum MsgError {
    #[error("Invalid sender address: {0}")]
    InvalidSender(DecodeError),
    #[error("Invalid calling contract address: {0}")]
    InvalidFromContract(DecodeError),
    #[error("Unexpected message type URL {0}")]
    UnexpectedTypeUrl(String),
    #[error("Error decoding a message from bytes: {0}")]
    Decoding(prost::DecodeError),
}

/// Result of message validation and decoding
pub type Result<T> = std::result::Result<T, MsgError>;

/// An EVM call issued from inside a WASM contract.
///
/// `sender` is the identity the call executes as, `from_contract` is always
/// the contract instance whose code emitted the call. The two differ when the
/// contract VM vouched for a different sender.
#[derive(Clone, PartialEq, Eq, Hash, Message)]
pub struct MsgInternalEvmCall {
    /// Resolved sender, bech32 encoded
    #[prost(string, tag = "1")]
    pub sender: String,
    /// Transferred value as a decimal unsigned integer
    #[prost(string, tag = "2")]
    pub value: String,
    /// Destination address in the EVM's native format
    #[prost(string, tag = "3")]
    pub to: String,
    /// Call data
    #[prost(bytes = "vec", tag = "4")]
    pub data: Vec<u8>,
    /// The contract instance that issued the call, bech32 encoded
    #[prost(string, tag = "5")]
    pub from_contract: String,
}

impl MsgInternalEvmCall {
    /// Stateless checks of the message. Only the account addresses are
    /// verified; `to` and `value` are checked by the EVM module.
    pub fn validate_basic(&self, codec: &impl AddressCodec) -> Result<()> {
        codec
            .string_to_address(&self.sender)
            .map_err(MsgError::InvalidSender)?;
        codec
            .string_to_address(&self.from_contract)
            .map_err(MsgError::InvalidFromContract)?;
        Ok(())
    }

    /// The accounts that authorize this message.
    pub fn signers(
        &self,
        codec: &impl AddressCodec,
    ) -> Result<Vec<AccAddress>> {
        let sender = codec
            .string_to_address(&self.sender)
            .map_err(MsgError::InvalidSender)?;
        Ok(vec![sender])
    }
}

/// A message handed to the chain's message router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// Call into the EVM on behalf of a WASM contract
    InternalEvmCall(MsgInternalEvmCall),
}

impl From<MsgInternalEvmCall> for Msg {
    fn from(msg: MsgInternalEvmCall) -> Self {
        Self::InternalEvmCall(msg)
    }
}

impl Msg {
    /// The `Any` type URL the router dispatches on.
    pub fn type_url(&self) -> &'static str {
        match self {
            Msg::InternalEvmCall(_) => INTERNAL_EVM_CALL_TYPE_URL,
        }
    }

    /// Pack into a protobuf `Any`.
    pub fn to_any(&self) -> prost_types::Any {
        let value = match self {
            Msg::InternalEvmCall(msg) => msg.encode_to_vec(),
        };
        prost_types::Any {
            type_url: self.type_url().to_string(),
            value,
        }
    }

    /// Unpack from a protobuf `Any`.
    pub fn try_from_any(any: &prost_types::Any) -> Result<Self> {
        match any.type_url.as_str() {
            INTERNAL_EVM_CALL_TYPE_URL => {
                MsgInternalEvmCall::decode(any.value.as_slice())
                    .map(Msg::InternalEvmCall)
                    .map_err(MsgError::Decoding)
            }
            other => Err(MsgError::UnexpectedTypeUrl(other.to_string())),
        }
    }

    /// Stateless checks of the message.
    pub fn validate_basic(&self, codec: &impl AddressCodec) -> Result<()> {
        match self {
            Msg::InternalEvmCall(msg) => msg.validate_basic(codec),
        }
    }

    /// The accounts that authorize this message.
    pub fn signers(
        &self,
        codec: &impl AddressCodec,
    ) -> Result<Vec<AccAddress>> {
        match self {
            Msg::InternalEvmCall(msg) => msg.signers(codec),
        }
    }
}

/// Helpers for testing with messages.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use evmwasm_core::address::testing::arb_account_address;
    use evmwasm_core::Bech32Codec;
    use proptest::prelude::*;

    use super::*;

    prop_compose! {
        /// Generate an arbitrary well-formed [`MsgInternalEvmCall`] with
        /// bech32 account addresses under the default prefix.
        pub fn arb_msg_internal_evm_call()(
            sender in arb_account_address(),
            from_contract in arb_account_address(),
            value in "[0-9]{1,78}",
            to in "0x[0-9a-f]{40}",
            data in prop::collection::vec(any::<u8>(), 0..512),
        ) -> MsgInternalEvmCall {
            let codec = Bech32Codec::default();
            MsgInternalEvmCall {
                sender: codec.address_to_string(&sender),
                value,
                to,
                data,
                from_contract: codec.address_to_string(&from_contract),
            }
        }
    }

    /// Generate an arbitrary [`Msg`].
    pub fn arb_msg() -> impl Strategy<Value = Msg> {
        arb_msg_internal_evm_call().prop_map(Msg::from)
    }
}
