//! Bindings between WASM contracts and the EVM module.
//!
//! A contract asks for an EVM call by emitting a custom `call_evm` message.
//! [`encoder::CallEvmEncoder`] validates it, resolves the identity the call
//! executes as, and turns it into a [`evmwasm_tx::MsgInternalEvmCall`] for
//! the chain's message router.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![warn(rust_2018_idioms, clippy::dbg_macro, clippy::print_stdout)]

pub mod bindings;
pub mod config;
pub mod context;
pub mod encoder;

pub use bindings::{CallEvm, EvmWasmMsg};
pub use context::CallerContext;
pub use encoder::{CallEvmEncoder, DecodeError, SenderResolution};
