//! Conversion of wire entries into partial `wallet-model` records.
//!
//! Each function produces a record carrying only the fields its RPC
//! perspective actually reports; aggregation merges the partials. Values
//! are copied out of the wire DTOs, never aliased, so one response can
//! seed several independent accumulators.

use wallet_model::{Output, Payment, Transaction};

use crate::{IncomingTransferEntry, PaymentEntry, TransferEntry};

/// Widens a wire amount (atomic units, u64 on the wire) into the model's
/// amount type.
fn amount(wire: Option<u64>) -> Option<u128> {
    wire.map(u128::from)
}

/// Payment view of a `get_transfers` entry.
///
/// Outgoing entries with a destination list yield one payment per
/// destination; everything else yields a single payment for the entry's
/// own address and amount.
pub fn payments_from_transfer(entry: &TransferEntry) -> Vec<Payment> {
    if let Some(destinations) = &entry.destinations {
        if !destinations.is_empty() {
            return destinations
                .iter()
                .map(|d| Payment {
                    address: d.address.clone(),
                    amount: amount(d.amount),
                    ..Default::default()
                })
                .collect();
        }
    }
    vec![Payment {
        address: entry.address.clone(),
        account_index: entry.subaddr_index.map(|s| s.major),
        subaddress_index: entry.subaddr_index.map(|s| s.minor),
        amount: amount(entry.amount),
        outputs: None,
    }]
}

/// Transaction view of a `get_transfers` entry.
pub fn transaction_from_transfer(entry: &TransferEntry) -> Transaction {
    let transfer_type = entry.transfer_type.as_deref();
    Transaction {
        txid: entry.txid.clone(),
        payment_id: normalized_payment_id(entry.payment_id.as_deref()),
        fee: amount(entry.fee),
        height: entry.height.filter(|h| *h > 0),
        timestamp: entry.timestamp,
        in_pool: transfer_type.map(|t| t == "pool"),
        is_incoming: transfer_type.map(|t| t == "in" || t == "pool"),
        note: entry.note.clone().filter(|n| !n.is_empty()),
        payments: Some(payments_from_transfer(entry)),
    }
}

/// Payment view of an `incoming_transfers` entry: no destination address,
/// but the one view that resolves concrete on-chain outputs.
pub fn payment_from_incoming(entry: &IncomingTransferEntry) -> Payment {
    Payment {
        address: None,
        account_index: entry.subaddr_index.map(|s| s.major),
        subaddress_index: entry.subaddr_index.map(|s| s.minor),
        amount: None,
        outputs: Some(vec![Output {
            key_image: entry.key_image.clone(),
            amount: amount(entry.amount),
            index: entry.global_index,
            stealth_public_key: entry.pubkey.clone(),
            is_spent: entry.spent,
        }]),
    }
}

/// Transaction view of an `incoming_transfers` entry.
pub fn transaction_from_incoming(entry: &IncomingTransferEntry) -> Transaction {
    Transaction {
        txid: entry.tx_hash.clone(),
        height: entry.block_height.filter(|h| *h > 0),
        is_incoming: Some(true),
        payments: Some(vec![payment_from_incoming(entry)]),
        ..Default::default()
    }
}

/// Transaction view of a `get_payments` entry.
pub fn transaction_from_payment_entry(entry: &PaymentEntry) -> Transaction {
    Transaction {
        txid: entry.tx_hash.clone(),
        payment_id: normalized_payment_id(entry.payment_id.as_deref()),
        height: entry.block_height.filter(|h| *h > 0),
        is_incoming: Some(true),
        payments: Some(vec![Payment {
            address: entry.address.clone(),
            account_index: entry.subaddr_index.map(|s| s.major),
            subaddress_index: entry.subaddr_index.map(|s| s.minor),
            amount: amount(entry.amount),
            outputs: None,
        }]),
        ..Default::default()
    }
}

// The wallet pads absent payment ids with zeroes; treat those as absent so
// they reconcile against views that omit the field entirely.
fn normalized_payment_id(wire: Option<&str>) -> Option<String> {
    wire.filter(|id| !id.is_empty() && !id.bytes().all(|b| b == b'0'))
        .map(str::to_string)
}
