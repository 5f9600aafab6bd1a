//! Canonical chain messages, as accepted by the message router.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod msg;

pub use msg::{Msg, MsgError, MsgInternalEvmCall, INTERNAL_EVM_CALL_TYPE_URL};
