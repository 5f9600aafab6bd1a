//! JSON shapes of the custom messages a WASM contract can emit towards the
//! EVM.
//!
//! Deserialization is strict: every field is required, must be a JSON
//! string, and unknown fields are rejected.

use std::fmt;

use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Call an EVM contract from a WASM contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallEvm {
    /// Destination address in the EVM's native format. Not validated here.
    pub to: String,
    /// Transferred value as a decimal unsigned integer. Not validated here.
    pub value: String,
    /// Base64 encoded call data
    pub data: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCallEvm {
    to: String,
    value: String,
    data: String,
}

impl<'de> Deserialize<'de> for CallEvm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CallEvmVisitor;

        impl<'de> Visitor<'de> for CallEvmVisitor {
            type Value = CallEvm;

            fn expecting(
                &self,
                formatter: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                formatter.write_str("a call_evm object")
            }

            // Only a JSON object is accepted, positional arrays are not.
            // The derived visitor rejects repeated keys.
            fn visit_map<A>(self, map: A) -> Result<CallEvm, A::Error>
            where
                A: MapAccess<'de>,
            {
                let RawCallEvm { to, value, data } =
                    RawCallEvm::deserialize(MapAccessDeserializer::new(map))?;
                Ok(CallEvm { to, value, data })
            }
        }

        deserializer.deserialize_map(CallEvmVisitor)
    }
}

/// The custom message envelope, externally tagged by message kind, e.g.
/// `{"call_evm": {"to": "0x..", "value": "0", "data": ""}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvmWasmMsg {
    /// See [`CallEvm`]
    CallEvm(CallEvm),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> serde_json::Result<CallEvm> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_call_evm_fields() {
        let call = parse(json!({
            "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "value": "1000",
            "data": "qQWcuw==",
        }))
        .unwrap();
        assert_eq!(call.to, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(call.value, "1000");
        assert_eq!(call.data, "qQWcuw==");
    }

    #[test]
    fn test_call_evm_is_strict() {
        // missing field
        assert!(parse(json!({"to": "0x01", "value": "1"})).is_err());
        // mistyped field
        assert!(
            parse(json!({"to": "0x01", "value": 1, "data": ""})).is_err()
        );
        assert!(
            parse(json!({"to": null, "value": "1", "data": ""})).is_err()
        );
        // extra field
        assert!(
            parse(json!({
                "to": "0x01",
                "value": "1",
                "data": "",
                "gas_limit": "100",
            }))
            .is_err()
        );
        // not an object
        assert!(parse(json!(["0x01", "1", ""])).is_err());
        assert!(parse(json!("0x01")).is_err());
    }

    #[test]
    fn test_call_evm_rejects_repeated_keys() {
        for raw in [
            r#"{"to":"0xaaaa","to":"0xbbbb","value":"1","data":""}"#,
            r#"{"to":"0xaaaa","value":"1","value":"2","data":""}"#,
            r#"{"to":"0xaaaa","value":"1","data":"","data":"qQ=="}"#,
        ] {
            let err = serde_json::from_str::<CallEvm>(raw).unwrap_err();
            assert!(
                err.to_string().contains("duplicate field"),
                "{raw}: {err}"
            );
        }
        let msg = serde_json::from_str::<EvmWasmMsg>(
            r#"{"call_evm":{"to":"0xaaaa","to":"0xbbbb","value":"1","data":""}}"#,
        );
        assert!(msg.is_err());
    }

    #[test]
    fn test_envelope() {
        let msg: EvmWasmMsg = serde_json::from_value(json!({
            "call_evm": {"to": "0x01", "value": "0", "data": ""}
        }))
        .unwrap();
        assert_eq!(
            msg,
            EvmWasmMsg::CallEvm(CallEvm {
                to: "0x01".to_string(),
                value: "0".to_string(),
                data: "".to_string(),
            })
        );

        let unknown: serde_json::Result<EvmWasmMsg> =
            serde_json::from_value(json!({
                "delegate_call_evm": {"to": "0x01", "value": "0", "data": ""}
            }));
        assert!(unknown.is_err());

        let positional: serde_json::Result<EvmWasmMsg> =
            serde_json::from_value(json!({"call_evm": ["0x01", "0", ""]}));
        assert!(positional.is_err());
    }
}
