//! Adapter for transactions decoded from their wire-format hex by an
//! external Stacks SDK.
//!
//! Decoder output is camelCase and nests most values one level deeper than
//! the indexer JSON (`payload.functionName.content`, `auth.spendingCondition.fee`).
//! Both numeric and named enum encodings are accepted, since SDK releases
//! disagree on which one they emit. The result is an indexer-shaped object
//! that [`crate::explain`] consumes like any other.

use serde_json::{Map, Value};

use crate::resolve::{self, Path};

const PAYLOAD_TYPE: &[Path] = &[&["payload", "payloadType"], &["payload", "type"]];
const ANCHOR_MODE: &[Path] = &[&["anchorMode"], &["anchor_mode"]];
const TX_ID: &[Path] = &[&["txid"], &["tx_id"], &["txId"]];
const SENDER: &[Path] = &[&["senderAddress"], &["sender_address"]];
const FEE: &[Path] = &[&["auth", "spendingCondition", "fee"], &["fee"]];
const NONCE: &[Path] = &[&["auth", "spendingCondition", "nonce"], &["nonce"]];
const RECIPIENT: &[Path] = &[
    &["payload", "recipient", "value"],
    &["payload", "recipient", "address"],
    &["payload", "recipient"],
];
const AMOUNT: &[Path] = &[&["payload", "amount"]];
const MEMO: &[Path] = &[&["payload", "memo", "content"], &["payload", "memo"]];
const CONTRACT_ADDRESS: &[Path] = &[
    &["payload", "contractAddress", "value"],
    &["payload", "contractAddress"],
];
const CONTRACT_NAME: &[Path] = &[
    &["payload", "contractName", "content"],
    &["payload", "contractName"],
];
const FUNCTION_NAME: &[Path] = &[
    &["payload", "functionName", "content"],
    &["payload", "functionName"],
];

/// Maps an SDK payload type, numeric or named, to the indexer's
/// discriminator.
pub fn payload_discriminator(payload_type: &Value) -> Option<&'static str> {
    if let Some(code) = payload_type.as_u64() {
        return match code {
            0 => Some("token_transfer"),
            1 | 6 => Some("smart_contract"),
            2 => Some("contract_call"),
            3 => Some("poison_microblock"),
            4 | 5 | 8 => Some("coinbase"),
            7 => Some("tenure_change"),
            _ => None,
        };
    }

    let name = payload_type.as_str()?;
    let normalized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match normalized.as_str() {
        "tokentransfer" | "stxtransfer" => Some("token_transfer"),
        "smartcontract" | "versionedsmartcontract" => Some("smart_contract"),
        "contractcall" => Some("contract_call"),
        "poisonmicroblock" => Some("poison_microblock"),
        "coinbase" | "coinbasetoaltrecipient" | "nakamotocoinbase" => Some("coinbase"),
        "tenurechange" => Some("tenure_change"),
        _ => None,
    }
}

/// Maps numeric or named anchor modes to the indexer's spelling
/// (`on_chain_only`, `off_chain_only`, `any`). Unrecognized names pass
/// through unchanged.
pub fn anchor_mode_name(anchor_mode: &Value) -> Option<String> {
    if let Some(code) = anchor_mode.as_u64() {
        return match code {
            1 => Some("on_chain_only".to_string()),
            2 => Some("off_chain_only".to_string()),
            3 => Some("any".to_string()),
            _ => None,
        };
    }

    let name = resolve::scalar_string(anchor_mode)?;
    let normalized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let known = match normalized.as_str() {
        "onchainonly" => "on_chain_only",
        "offchainonly" => "off_chain_only",
        "any" => "any",
        _ => return Some(name),
    };
    Some(known.to_string())
}

/// Builds an indexer-shaped transaction from decoder output. Fields the
/// decoder did not provide are left out.
pub fn to_raw_transaction(decoded: &Value) -> Value {
    let tx_type = resolve::first_present(decoded, PAYLOAD_TYPE)
        .and_then(payload_discriminator)
        .unwrap_or(crate::explain::UNKNOWN_TX_TYPE);

    let mut raw = Map::new();
    raw.insert("tx_type".to_string(), Value::from(tx_type));

    insert_opt(&mut raw, "tx_id", resolve::resolve_string(decoded, TX_ID));
    insert_opt(
        &mut raw,
        "sender_address",
        resolve::resolve_string(decoded, SENDER),
    );
    insert_opt(&mut raw, "fee", resolve::resolve_string(decoded, FEE));
    if let Some(nonce) = resolve::resolve_u64(decoded, NONCE) {
        raw.insert("nonce".to_string(), Value::from(nonce));
    }
    insert_opt(
        &mut raw,
        "anchor_mode",
        resolve::first_present(decoded, ANCHOR_MODE).and_then(anchor_mode_name),
    );

    let contract_name = resolve::resolve_string(decoded, CONTRACT_NAME);
    let contract_id = match (
        resolve::resolve_string(decoded, CONTRACT_ADDRESS),
        contract_name.clone(),
    ) {
        (Some(address), Some(name)) => Some(format!("{}.{}", address, name)),
        _ => None,
    };

    match tx_type {
        "token_transfer" => {
            let mut transfer = Map::new();
            insert_opt(
                &mut transfer,
                "recipient_address",
                resolve::resolve_string(decoded, RECIPIENT),
            );
            insert_opt(
                &mut transfer,
                "amount",
                resolve::resolve_string(decoded, AMOUNT),
            );
            insert_opt(&mut transfer, "memo", resolve::resolve_string(decoded, MEMO));
            raw.insert("token_transfer".to_string(), Value::Object(transfer));
        }
        "contract_call" => {
            let mut call = Map::new();
            insert_opt(&mut call, "contract_id", contract_id);
            insert_opt(
                &mut call,
                "function_name",
                resolve::resolve_string(decoded, FUNCTION_NAME),
            );
            raw.insert("contract_call".to_string(), Value::Object(call));
        }
        "smart_contract" => {
            // Deploys carry only the name; the address is the sender's.
            let mut deploy = Map::new();
            let sender = resolve::resolve_string(decoded, SENDER);
            let id = match (sender, contract_name) {
                (Some(sender), Some(name)) => Some(format!("{}.{}", sender, name)),
                (None, name) => name,
                (Some(_), None) => None,
            };
            insert_opt(&mut deploy, "contract_id", id);
            raw.insert("smart_contract".to_string(), Value::Object(deploy));
        }
        _ => {}
    }

    Value::Object(raw)
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::explain;
    use serde_json::json;

    #[test]
    fn numeric_token_transfer() {
        let decoded: Value = serde_json::from_str(
            r#"{
                "anchorMode": 3,
                "payload": {
                    "payloadType": 0,
                    "recipient": {"type": "address", "value": "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7"},
                    "amount": 123456789012345678901,
                    "memo": {"type": 3, "content": "hello"}
                },
                "auth": {"spendingCondition": {"fee": "180", "nonce": "4"}}
            }"#,
        )
        .unwrap();

        let raw = to_raw_transaction(&decoded);
        assert_eq!(raw["tx_type"], json!("token_transfer"));
        assert_eq!(raw["anchor_mode"], json!("any"));
        assert_eq!(raw["nonce"], json!(4));
        assert_eq!(raw["token_transfer"]["amount"], json!("123456789012345678901"));

        let out = explain(&raw, None);
        assert_eq!(out.amount_stx.as_deref(), Some("123456789012345.678901"));
        assert_eq!(out.fee.as_deref(), Some("180"));
        assert_eq!(out.memo.as_deref(), Some("hello"));
        assert_eq!(
            out.recipient.as_deref(),
            Some("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7")
        );
    }

    #[test]
    fn named_contract_call() {
        let decoded = json!({
            "anchorMode": "onChainOnly",
            "payload": {
                "payloadType": "ContractCall",
                "contractAddress": "SP000000000000000000002Q6VF78",
                "contractName": {"content": "pox-4"},
                "functionName": {"content": "stack-stx"}
            },
            "auth": {"spendingCondition": {"fee": 2000, "nonce": 9}}
        });

        let out = explain(&to_raw_transaction(&decoded), None);
        assert_eq!(out.tx_type, "contract_call");
        assert_eq!(
            out.contract_id.as_deref(),
            Some("SP000000000000000000002Q6VF78.pox-4")
        );
        assert_eq!(out.function_name.as_deref(), Some("stack-stx"));
        assert_eq!(out.anchor_mode.as_deref(), Some("on_chain_only"));
        assert_eq!(out.fee.as_deref(), Some("2000"));
        assert_eq!(out.nonce, Some(9));
    }

    #[test]
    fn address_objects_degrade_to_absent() {
        let decoded = json!({
            "payload": {
                "payloadType": 2,
                "contractAddress": {"hash160": "00", "version": 22},
                "contractName": {"content": "pox-4"},
                "functionName": {"content": "stack-stx"}
            }
        });

        let out = explain(&to_raw_transaction(&decoded), None);
        assert_eq!(out.contract_id, None);
        assert!(out.summary.contains("unknown contract"));
    }

    #[test]
    fn deploy_uses_sender_when_known() {
        let decoded = json!({
            "senderAddress": "SP1ABC",
            "payload": {"payloadType": "VersionedSmartContract", "contractName": {"content": "hello"}}
        });
        let out = explain(&to_raw_transaction(&decoded), None);
        assert_eq!(out.tx_type, "smart_contract");
        assert_eq!(out.contract_id.as_deref(), Some("SP1ABC.hello"));
    }

    #[test]
    fn unknown_payload_is_unknown() {
        let raw = to_raw_transaction(&json!({"payload": {"payloadType": 42}}));
        assert_eq!(raw["tx_type"], json!("unknown"));

        let raw = to_raw_transaction(&json!({}));
        assert_eq!(raw, json!({"tx_type": "unknown"}));
    }

    #[test]
    fn anchor_modes_share_one_spelling() {
        assert_eq!(anchor_mode_name(&json!(1)), anchor_mode_name(&json!("onChainOnly")));
        assert_eq!(anchor_mode_name(&json!(2)), anchor_mode_name(&json!("OffChainOnly")));
        assert_eq!(anchor_mode_name(&json!(3)), anchor_mode_name(&json!("Any")));
        assert_eq!(
            anchor_mode_name(&json!("on_chain_only")).as_deref(),
            Some("on_chain_only")
        );
        assert_eq!(anchor_mode_name(&json!("sideways")).as_deref(), Some("sideways"));
        assert_eq!(anchor_mode_name(&json!(9)), None);
    }

    #[test]
    fn coinbase_variants_collapse() {
        for payload_type in [json!(4), json!(8), json!("NakamotoCoinbase")] {
            assert_eq!(payload_discriminator(&payload_type), Some("coinbase"));
        }
    }
}
