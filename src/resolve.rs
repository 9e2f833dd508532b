//! Ordered alias lookups over loosely-typed JSON.
//!
//! The upstream API renames fields between versions and nests them
//! differently per transaction type. Every logical field is described here
//! as an ordered list of paths; the first path holding a usable value wins.

use serde_json::Value;

/// A path of object keys, outermost first.
pub type Path = &'static [&'static str];

pub const TX_TYPE: &[Path] = &[&["tx_type"], &["type"]];
pub const TX_ID: &[Path] = &[&["tx_id"], &["txid"]];
pub const STATUS: &[Path] = &[&["tx_status"], &["status"]];
pub const SENDER: &[Path] = &[&["sender_address"], &["sender"]];
pub const RECIPIENT: &[Path] = &[
    &["token_transfer", "recipient_address"],
    &["contract_call", "contract_id"],
    &["smart_contract", "contract_id"],
];
pub const TRANSFER_AMOUNT: &[Path] = &[&["token_transfer", "amount"]];
pub const MEMO: &[Path] = &[&["token_transfer", "memo"]];
pub const FEE: &[Path] = &[&["fee_rate"], &["fee"]];
pub const NONCE: &[Path] = &[&["nonce"]];
pub const CONTRACT_ID: &[Path] = &[
    &["contract_call", "contract_id"],
    &["smart_contract", "contract_id"],
];
pub const FUNCTION_NAME: &[Path] = &[&["contract_call", "function_name"]];
pub const FUNCTION_ARGS: &[Path] = &[&["contract_call", "function_args"]];
pub const ANCHOR_MODE: &[Path] = &[&["anchor_mode"], &["anchorMode"]];
pub const BLOCK_HEIGHT: &[Path] = &[&["block_height"]];
pub const BLOCK_TIME: &[Path] = &[
    &["block_time_iso"],
    &["burn_block_time_iso"],
    &["receipt_time_iso"],
    &["block_time"],
    &["burn_block_time"],
];

pub const EVENT_TYPE: &[Path] = &[&["event_type"], &["type"], &["name"]];
pub const EVENT_ASSET: &[Path] = &[
    &["asset", "asset_id"],
    &["asset_identifier"],
    &["asset_id"],
    &["ft_transfer_event", "asset_identifier"],
    &["nft_transfer_event", "asset_identifier"],
    &["data", "asset_identifier"],
];
pub const EVENT_AMOUNT: &[Path] = &[
    &["amount"],
    &["value"],
    &["asset", "amount"],
    &["stx_transfer_event", "amount"],
    &["ft_transfer_event", "amount"],
    &["stx_burn_event", "amount"],
    &["data", "amount"],
];
pub const EVENT_SENDER: &[Path] = &[
    &["sender"],
    &["asset", "sender"],
    &["stx_transfer_event", "sender"],
    &["ft_transfer_event", "sender"],
    &["nft_transfer_event", "sender"],
    &["data", "sender"],
];
pub const EVENT_RECIPIENT: &[Path] = &[
    &["recipient"],
    &["asset", "recipient"],
    &["stx_transfer_event", "recipient"],
    &["ft_transfer_event", "recipient"],
    &["nft_transfer_event", "recipient"],
    &["data", "recipient"],
];

/// Walks `path` through nested objects. `null` counts as absent.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Returns the first path in `aliases` that holds a non-null value.
pub fn first_present<'a>(value: &'a Value, aliases: &[Path]) -> Option<&'a Value> {
    aliases.iter().find_map(|path| lookup(value, path))
}

/// Renders a JSON scalar as text. Numbers keep their original digits.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a JSON integer or digit string as `u64`.
pub fn scalar_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// First alias that resolves to a scalar string. Aliases holding objects or
/// arrays are skipped rather than ending the search.
pub fn resolve_string(value: &Value, aliases: &[Path]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(scalar_string)
}

pub fn resolve_u64(value: &Value, aliases: &[Path]) -> Option<u64> {
    aliases
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(scalar_u64)
}
