use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Field, MergeError};
use crate::payment::Payment;
use crate::reconcile::reconcile;
use crate::render::{kv_line, opt, trim_trailing};

/// A wallet transaction assembled from overlapping RPC views.
///
/// Identified by txid. Nested payments merge with the same
/// match-in-place/append rule payments use for their outputs, keyed by
/// `(address, subaddress_index)` with absent fields acting as wildcards:
/// some RPC views (notably `incoming_transfers`) report a payment's
/// subaddress but not its destination address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_incoming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<Payment>>,
}

impl Transaction {
    pub fn new(txid: impl Into<String>) -> Self {
        Transaction {
            txid: Some(txid.into()),
            ..Default::default()
        }
    }

    fn identity(&self) -> String {
        match &self.txid {
            Some(txid) => format!("tx {txid}"),
            None => "tx <no txid>".to_string(),
        }
    }

    /// Merges two observations of the same transaction into a new record.
    pub fn merge(&self, other: &Transaction) -> Result<Transaction, MergeError> {
        if let (Some(a), Some(b)) = (&self.txid, &other.txid) {
            if a != b {
                return Err(MergeError::IdentityMismatch {
                    kind: "transaction",
                    left: a.clone(),
                    right: b.clone(),
                });
            }
        }
        let id = self.identity();
        let payments = match (&self.payments, &other.payments) {
            (None, None) => None,
            (Some(ours), None) => Some(ours.clone()),
            (None, Some(theirs)) => Some(theirs.clone()),
            (Some(ours), Some(theirs)) => {
                let mut merged = ours.clone();
                for incoming in theirs {
                    match merged.iter_mut().find(|p| {
                        compatible(&p.address, &incoming.address)
                            && compatible(&p.subaddress_index, &incoming.subaddress_index)
                    }) {
                        Some(slot) => *slot = slot.merge(incoming)?,
                        None => merged.push(incoming.clone()),
                    }
                }
                Some(merged)
            }
        };
        Ok(Transaction {
            txid: reconcile(Field::Txid, &id, self.txid.clone(), other.txid.clone())?,
            payment_id: reconcile(
                Field::PaymentId,
                &id,
                self.payment_id.clone(),
                other.payment_id.clone(),
            )?,
            fee: reconcile(Field::Fee, &id, self.fee, other.fee)?,
            height: reconcile(Field::Height, &id, self.height, other.height)?,
            timestamp: reconcile(Field::Timestamp, &id, self.timestamp, other.timestamp)?,
            in_pool: reconcile(Field::InPool, &id, self.in_pool, other.in_pool)?,
            is_incoming: reconcile(Field::IsIncoming, &id, self.is_incoming, other.is_incoming)?,
            note: reconcile(Field::Note, &id, self.note.clone(), other.note.clone())?,
            payments,
        })
    }

    /// Folds `other` into `self`, assigning only on success.
    pub fn merge_from(&mut self, other: &Transaction) -> Result<(), MergeError> {
        *self = self.merge(other)?;
        Ok(())
    }

    pub fn to_indented_string(&self, indent: usize) -> String {
        let mut s = String::new();
        s += &kv_line("Txid", &opt(&self.txid), indent);
        s += &kv_line("Payment id", &opt(&self.payment_id), indent);
        s += &kv_line("Fee", &opt(&self.fee), indent);
        s += &kv_line("Height", &opt(&self.height), indent);
        s += &kv_line("Timestamp", &opt(&self.timestamp), indent);
        s += &kv_line("In pool", &opt(&self.in_pool), indent);
        s += &kv_line("Is incoming", &opt(&self.is_incoming), indent);
        s += &kv_line("Note", &opt(&self.note), indent);
        match &self.payments {
            Some(payments) => {
                s += &kv_line("Payments", "", indent);
                for (i, payment) in payments.iter().enumerate() {
                    s += &kv_line(i + 1, "", indent + 1);
                    s += &payment.to_indented_string(indent + 2);
                    s += "\n";
                }
            }
            None => {
                s += &kv_line("Payments", "-", indent);
            }
        }
        trim_trailing(s)
    }
}

/// Two observations of an identity field are compatible when either is
/// absent or both agree; this mirrors what [`reconcile`] would accept.
fn compatible<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_indented_string(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differing_txids_are_an_identity_mismatch() {
        let a = Transaction::new("aa");
        let b = Transaction::new("bb");
        assert!(matches!(
            a.merge(&b).unwrap_err(),
            MergeError::IdentityMismatch {
                kind: "transaction",
                ..
            }
        ));
    }

    #[test]
    fn payments_merge_keyed_by_destination() {
        let mut a = Transaction::new("aa");
        a.height = Some(100);
        a.payments = Some(vec![Payment::new("9xA", 60)]);

        let mut b = Transaction::new("aa");
        b.timestamp = Some(170_000_000);
        b.payments = Some(vec![Payment::new("9xA", 60), Payment::new("9xB", 40)]);

        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.height, Some(100));
        assert_eq!(merged.timestamp, Some(170_000_000));
        let payments = merged.payments.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].address.as_deref(), Some("9xA"));
        assert_eq!(payments[1].address.as_deref(), Some("9xB"));
    }

    #[test]
    fn addressless_payment_unifies_by_subaddress() {
        let mut a = Transaction::new("aa");
        a.payments = Some(vec![Payment {
            address: Some("9xA".into()),
            subaddress_index: Some(1),
            amount: Some(100),
            ..Default::default()
        }]);

        // incoming_transfers knows the subaddress but not the address
        let mut b = Transaction::new("aa");
        b.payments = Some(vec![Payment {
            subaddress_index: Some(1),
            outputs: Some(vec![crate::Output::new("ki-1")]),
            ..Default::default()
        }]);

        let merged = a.merge(&b).unwrap();
        let payments = merged.payments.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].address.as_deref(), Some("9xA"));
        assert_eq!(payments[0].amount, Some(100));
        assert!(payments[0].outputs.is_some());
    }

    #[test]
    fn merge_with_clone_is_idempotent() {
        let mut tx = Transaction::new("aa");
        tx.fee = Some(1_000);
        tx.in_pool = Some(false);
        tx.payments = Some(vec![Payment::new("9xA", 60)]);
        assert_eq!(tx.merge(&tx.clone()).unwrap(), tx);
    }
}
