//! Turns raw transaction JSON into an [`ExplainedTransaction`].
//!
//! Input is whatever the indexer (or the decoded-transaction adapter) hands
//! over; every field except the discriminator is optional and a missing
//! field only ever leaves the matching output field empty.

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;

use crate::models::{ExplainedTransaction, FunctionArg, NormalizedEvent};
use crate::resolve::{self, Path};
use crate::units::format_micro;

pub const UNKNOWN_TX_TYPE: &str = "unknown";
pub const DEFAULT_EVENT_TYPE: &str = "event";

const SHORT_HEAD: usize = 6;
const SHORT_TAIL: usize = 4;
const ELLIPSIS: &str = "...";

/// Logical transaction kinds the summary templates know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Transfer,
    ContractCall,
    ContractDeploy,
    Other,
}

impl TxKind {
    /// `stx_transfer` shows up in some payloads for the same value transfer
    /// that the indexer calls `token_transfer`.
    pub fn from_discriminator(tx_type: &str) -> Self {
        match tx_type {
            "token_transfer" | "stx_transfer" => TxKind::Transfer,
            "contract_call" => TxKind::ContractCall,
            "smart_contract" => TxKind::ContractDeploy,
            _ => TxKind::Other,
        }
    }
}

pub fn explain(tx: &Value, events: Option<&[Value]>) -> ExplainedTransaction {
    explain_at(tx, events, None)
}

/// Same as [`explain`], with the current chain tip used to derive the
/// confirmation count.
pub fn explain_at(
    tx: &Value,
    events: Option<&[Value]>,
    tip_height: Option<u64>,
) -> ExplainedTransaction {
    let tx_type = resolve::resolve_string(tx, resolve::TX_TYPE)
        .unwrap_or_else(|| UNKNOWN_TX_TYPE.to_string());
    let kind = TxKind::from_discriminator(&tx_type);

    let amount = match kind {
        TxKind::Transfer => resolve::resolve_string(tx, resolve::TRANSFER_AMOUNT),
        _ => None,
    };
    let fee = resolve::resolve_string(tx, resolve::FEE);
    let block_height = resolve::resolve_u64(tx, resolve::BLOCK_HEIGHT);

    let mut explained = ExplainedTransaction {
        tx_id: resolve::resolve_string(tx, resolve::TX_ID),
        summary: String::new(),
        status: resolve::resolve_string(tx, resolve::STATUS),
        sender: resolve::resolve_string(tx, resolve::SENDER),
        recipient: resolve::resolve_string(tx, resolve::RECIPIENT),
        amount_stx: amount.as_deref().and_then(format_micro),
        amount,
        fee_stx: fee.as_deref().and_then(format_micro),
        fee,
        nonce: resolve::resolve_u64(tx, resolve::NONCE),
        contract_id: resolve::resolve_string(tx, resolve::CONTRACT_ID),
        function_name: resolve::resolve_string(tx, resolve::FUNCTION_NAME),
        function_args: function_args(tx),
        memo: resolve::resolve_string(tx, resolve::MEMO),
        anchor_mode: resolve::resolve_string(tx, resolve::ANCHOR_MODE),
        block_height,
        block_time: block_time(tx),
        confirmations: confirmations(block_height, tip_height),
        events: normalize_events(events.unwrap_or_default()),
        tx_type,
    };
    explained.summary = summarize(kind, &explained);
    explained
}

pub fn normalize_events(events: &[Value]) -> Vec<NormalizedEvent> {
    events.iter().map(normalize_event).collect()
}

pub fn normalize_event(event: &Value) -> NormalizedEvent {
    let event_type = resolve::resolve_string(event, resolve::EVENT_TYPE)
        .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());
    let asset = resolve::resolve_string(event, resolve::EVENT_ASSET).or_else(|| {
        event_type
            .to_ascii_lowercase()
            .starts_with("stx")
            .then(|| "STX".to_string())
    });

    NormalizedEvent {
        asset,
        amount: resolve::resolve_string(event, resolve::EVENT_AMOUNT),
        sender: resolve::resolve_string(event, resolve::EVENT_SENDER),
        recipient: resolve::resolve_string(event, resolve::EVENT_RECIPIENT),
        event_type,
    }
}

/// Shortens long addresses to `SP1ABC...WXYZ`. Anything that would not get
/// shorter is returned as is.
pub fn shorten_address(address: &str) -> String {
    let len = address.chars().count();
    if len <= SHORT_HEAD + SHORT_TAIL + ELLIPSIS.len() {
        return address.to_string();
    }
    let head: String = address.chars().take(SHORT_HEAD).collect();
    let tail: String = address.chars().skip(len - SHORT_TAIL).collect();
    format!("{}{}{}", head, ELLIPSIS, tail)
}

fn summarize(kind: TxKind, tx: &ExplainedTransaction) -> String {
    let sender = short_or(tx.sender.as_deref(), "unknown sender");

    let body = match kind {
        TxKind::Transfer => {
            let amount = match (tx.amount_stx.as_deref(), tx.amount.as_deref()) {
                (Some(stx), _) => format!("{} STX", stx),
                (None, Some(raw)) => format!("{} micro-STX", raw),
                (None, None) => "an unknown amount of STX".to_string(),
            };
            let recipient = short_or(tx.recipient.as_deref(), "unknown recipient");
            format!("{} sent {} to {}.", sender, amount, recipient)
        }
        TxKind::ContractCall => {
            let function = tx.function_name.as_deref().unwrap_or("unknown function");
            let contract = short_or(tx.contract_id.as_deref(), "unknown contract");
            format!("{} called {} on {}.", sender, function, contract)
        }
        TxKind::ContractDeploy => {
            let contract = short_or(tx.contract_id.as_deref(), "unknown contract");
            format!("{} deployed contract {}.", sender, contract)
        }
        TxKind::Other => format!("{} submitted a {} transaction.", sender, tx.tx_type),
    };

    match tx.status.as_deref() {
        Some(status) => format!("{} Status: {}.", body, status),
        None => body,
    }
}

fn short_or(address: Option<&str>, fallback: &str) -> String {
    address
        .map(shorten_address)
        .unwrap_or_else(|| fallback.to_string())
}

fn function_args(tx: &Value) -> Vec<FunctionArg> {
    let Some(args) = resolve::first_present(tx, resolve::FUNCTION_ARGS).and_then(Value::as_array)
    else {
        return Vec::new();
    };

    const NAME: &[Path] = &[&["name"]];
    const TYPE: &[Path] = &[&["type"]];
    const REPR: &[Path] = &[&["repr"], &["hex"]];

    args.iter()
        .map(|arg| FunctionArg {
            name: resolve::resolve_string(arg, NAME),
            arg_type: resolve::resolve_string(arg, TYPE),
            repr: resolve::resolve_string(arg, REPR),
        })
        .collect()
}

/// ISO strings pass through; unix seconds are rendered as RFC 3339 UTC.
fn block_time(tx: &Value) -> Option<String> {
    resolve::BLOCK_TIME
        .iter()
        .filter_map(|path| resolve::lookup(tx, path))
        .find_map(|value| match resolve::scalar_u64(value) {
            Some(secs) => {
                let secs = i64::try_from(secs).ok()?;
                DateTime::from_timestamp(secs, 0)
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            None => value.as_str().filter(|s| !s.is_empty()).map(str::to_string),
        })
}

fn confirmations(block_height: Option<u64>, tip_height: Option<u64>) -> Option<u64> {
    match (block_height, tip_height) {
        (Some(height), Some(tip)) if tip >= height => Some(tip - height + 1),
        _ => None,
    }
}
