//! Metadata the contract VM runtime attaches to a contract's message.

use serde::{Deserialize, Serialize};

/// Caller metadata supplied by the contract VM runtime, never by contract
/// code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// An address asserted at the call site. It may be absent, empty or not
    /// a valid address at all.
    #[serde(
        rename = "sender",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub declared_sender: Option<String>,
}

impl CallerContext {
    /// Context without a declared sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the given declared sender.
    pub fn with_declared_sender(sender: impl Into<String>) -> Self {
        Self {
            declared_sender: Some(sender.into()),
        }
    }

    /// The declared sender, if any.
    pub fn declared_sender(&self) -> Option<&str> {
        self.declared_sender.as_deref()
    }
}
