//! Encoding of contract-emitted EVM calls into chain messages.
//!
//! The encoder sits on the trust boundary between the two VMs: the payload
//! is untrusted contract output, while the invoking contract address and the
//! [`CallerContext`] come from the contract VM runtime. The resulting
//! [`MsgInternalEvmCall`] always records the invoking contract in
//! `from_contract`, whatever sender identity is resolved.

use data_encoding::BASE64;
use evmwasm_core::address::{AccAddress, AddressCodec};
use evmwasm_core::Bech32Codec;
use evmwasm_tx::{Msg, MsgInternalEvmCall};
use thiserror::Error;

use crate::bindings::{CallEvm, EvmWasmMsg};
use crate::context::CallerContext;

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid contract message payload: {0}")]
    InvalidPayload(serde_json::Error),
    #[error("Invalid base64 call data: {0}")]
    InvalidData(data_encoding::DecodeError),
}

/// Result of encoding a contract message
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Outcome of resolving the sender identity of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SenderResolution {
    /// The declared sender parsed as a native address and overrides the
    /// default.
    Declared(AccAddress),
    /// No usable declared sender, the invoking contract is the sender.
    InvokingContract,
}

impl SenderResolution {
    /// The effective sender address.
    pub fn into_address(self, invoking_contract: &AccAddress) -> AccAddress {
        match self {
            SenderResolution::Declared(address) => address,
            SenderResolution::InvokingContract => invoking_contract.clone(),
        }
    }
}

/// Encoder of contract-emitted EVM calls. Holds no state besides the codec
/// of native addresses.
#[derive(Clone, Debug, Default)]
pub struct CallEvmEncoder<C = Bech32Codec> {
    codec: C,
}

impl<C: AddressCodec> CallEvmEncoder<C> {
    /// Make an encoder using the given address codec.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// The address codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encode a raw `call_evm` payload emitted by `invoking_contract`.
    ///
    /// On success, exactly one message is returned. Any malformed payload or
    /// call data fails the whole call without output.
    pub fn encode_call_evm(
        &self,
        raw_payload: &[u8],
        invoking_contract: &AccAddress,
        ctx: &CallerContext,
    ) -> Result<Vec<Msg>> {
        let call: CallEvm = serde_json::from_slice(raw_payload)
            .map_err(|err| {
                tracing::debug!(%err, "Rejecting malformed call_evm payload");
                DecodeError::InvalidPayload(err)
            })?;
        self.encode_parsed_call_evm(call, invoking_contract, ctx)
    }

    /// Encode a custom message envelope such as `{"call_evm": {..}}`,
    /// dispatching on the message kind.
    pub fn encode_custom(
        &self,
        raw_envelope: &[u8],
        invoking_contract: &AccAddress,
        ctx: &CallerContext,
    ) -> Result<Vec<Msg>> {
        let msg: EvmWasmMsg = serde_json::from_slice(raw_envelope)
            .map_err(|err| {
                tracing::debug!(%err, "Rejecting malformed custom message");
                DecodeError::InvalidPayload(err)
            })?;
        match msg {
            EvmWasmMsg::CallEvm(call) => {
                self.encode_parsed_call_evm(call, invoking_contract, ctx)
            }
        }
    }

    /// Resolve the identity a call executes as.
    ///
    /// A declared sender that parses as a native address wins. Anything else
    /// (absent, empty, malformed, wrong checksum or prefix) falls back to
    /// the invoking contract, without failing the call.
    pub fn resolve_sender(&self, ctx: &CallerContext) -> SenderResolution {
        let Some(declared) = ctx.declared_sender() else {
            return SenderResolution::InvokingContract;
        };
        match self.codec.string_to_address(declared) {
            Ok(address) => SenderResolution::Declared(address),
            Err(err) => {
                tracing::debug!(
                    declared_sender = declared,
                    %err,
                    "Ignoring invalid declared sender, the invoking contract \
                     is the sender",
                );
                SenderResolution::InvokingContract
            }
        }
    }

    fn encode_parsed_call_evm(
        &self,
        call: CallEvm,
        invoking_contract: &AccAddress,
        ctx: &CallerContext,
    ) -> Result<Vec<Msg>> {
        let CallEvm { to, value, data } = call;
        let data = BASE64.decode(data.as_bytes()).map_err(|err| {
            tracing::debug!(%err, "Rejecting call_evm with invalid data");
            DecodeError::InvalidData(err)
        })?;
        let sender = self
            .resolve_sender(ctx)
            .into_address(invoking_contract);
        let msg = MsgInternalEvmCall {
            sender: self.codec.address_to_string(&sender),
            value,
            to,
            data,
            from_contract: self.codec.address_to_string(invoking_contract),
        };
        tracing::debug!(
            sender = %msg.sender,
            from_contract = %msg.from_contract,
            to = %msg.to,
            "Encoded call_evm",
        );
        Ok(vec![Msg::InternalEvmCall(msg)])
    }
}
