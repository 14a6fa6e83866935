use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Field, MergeError};
use crate::output::Output;
use crate::reconcile::reconcile;
use crate::render::{kv_line, opt, trim_trailing};

/// A payment to one address, as observed from one RPC perspective.
///
/// A transaction may carry one or more payments. Fields are filled in as
/// overlapping RPC views are merged; `outputs` appears only once the
/// payment has been resolved to concrete on-chain outputs, and key images
/// within it stay unique because merging dedups by key image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Destination address; identity component once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaddress_index: Option<u32>,
    /// Atomic units. Absent means unknown, which is distinct from zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Output>>,
}

impl Payment {
    /// A payment known only by destination and amount.
    pub fn new(address: impl Into<String>, amount: u128) -> Self {
        Payment {
            address: Some(address.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    fn identity(&self) -> String {
        match &self.address {
            Some(addr) => format!("payment {addr}"),
            None => "payment <no address>".to_string(),
        }
    }

    /// Merges two observations of the same payment into a new record.
    ///
    /// Scalar fields go through [`reconcile`]; output lists are combined by
    /// key image: an incoming output matching an existing key image is
    /// merged into the matched slot (position preserved), unmatched
    /// incoming outputs are appended in encounter order. Pure: a failed
    /// merge leaves both inputs as they were.
    pub fn merge(&self, other: &Payment) -> Result<Payment, MergeError> {
        let id = self.identity();
        let outputs = match (&self.outputs, &other.outputs) {
            (None, None) => None,
            (Some(ours), None) => Some(ours.clone()),
            (None, Some(theirs)) => Some(theirs.clone()),
            (Some(ours), Some(theirs)) => {
                let mut merged = ours.clone();
                for incoming in theirs {
                    match merged
                        .iter_mut()
                        .find(|o| o.key_image == incoming.key_image)
                    {
                        Some(slot) => *slot = slot.merge(incoming)?,
                        None => merged.push(incoming.clone()),
                    }
                }
                Some(merged)
            }
        };
        Ok(Payment {
            address: reconcile(
                Field::Address,
                &id,
                self.address.clone(),
                other.address.clone(),
            )?,
            account_index: reconcile(
                Field::AccountIndex,
                &id,
                self.account_index,
                other.account_index,
            )?,
            subaddress_index: reconcile(
                Field::SubaddressIndex,
                &id,
                self.subaddress_index,
                other.subaddress_index,
            )?,
            amount: reconcile(Field::Amount, &id, self.amount, other.amount)?,
            outputs,
        })
    }

    /// Folds `other` into `self`, assigning only on success.
    pub fn merge_from(&mut self, other: &Payment) -> Result<(), MergeError> {
        *self = self.merge(other)?;
        Ok(())
    }

    pub fn to_indented_string(&self, indent: usize) -> String {
        let mut s = String::new();
        s += &kv_line("Address", &opt(&self.address), indent);
        s += &kv_line("Account index", &opt(&self.account_index), indent);
        s += &kv_line("Subaddress index", &opt(&self.subaddress_index), indent);
        s += &kv_line("Amount", &opt(&self.amount), indent);
        match &self.outputs {
            Some(outputs) => {
                s += &kv_line("Outputs", "", indent);
                for (i, output) in outputs.iter().enumerate() {
                    s += &kv_line(i + 1, "", indent + 1);
                    s += &output.to_indented_string(indent + 2);
                    s += "\n";
                }
            }
            None => {
                s += &kv_line("Outputs", "-", indent);
            }
        }
        trim_trailing(s)
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_indented_string(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(key_image: &str, amount: u128) -> Output {
        Output {
            key_image: Some(key_image.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    #[test]
    fn new_reads_back_exactly() {
        let p = Payment::new("9xA", 100);
        assert_eq!(p.address.as_deref(), Some("9xA"));
        assert_eq!(p.amount, Some(100));
        assert_eq!(p.outputs, None);
    }

    #[test]
    fn scalar_fill_in() {
        let a = Payment {
            address: Some("9xA".into()),
            ..Default::default()
        };
        let b = Payment::new("9xA", 100);
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.address.as_deref(), Some("9xA"));
        assert_eq!(merged.amount, Some(100));
    }

    #[test]
    fn amount_conflict_propagates_and_mutates_nothing() {
        let mut a = Payment::new("9xA", 100);
        let b = Payment::new("9xA", 200);
        let before = a.clone();
        let err = a.merge_from(&b).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Conflict {
                field: Field::Amount,
                ..
            }
        ));
        assert_eq!(a, before);
    }

    #[test]
    fn outputs_dedup_by_key_image() {
        let a = Payment {
            outputs: Some(vec![out("a", 5)]),
            ..Default::default()
        };
        let b = Payment {
            outputs: Some(vec![out("a", 5), out("b", 3)]),
            ..Default::default()
        };
        let merged = a.merge(&b).unwrap();
        let outputs = merged.outputs.unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].key_image.as_deref(), Some("a"));
        assert_eq!(outputs[0].amount, Some(5));
        assert_eq!(outputs[1].key_image.as_deref(), Some("b"));
        assert_eq!(outputs[1].amount, Some(3));
    }

    #[test]
    fn matched_output_keeps_position_and_gains_fields() {
        let a = Payment {
            outputs: Some(vec![out("a", 5), out("b", 3)]),
            ..Default::default()
        };
        let enriched = Output {
            key_image: Some("b".into()),
            amount: Some(3),
            index: Some(77),
            ..Default::default()
        };
        let b = Payment {
            outputs: Some(vec![enriched]),
            ..Default::default()
        };
        let merged = a.merge(&b).unwrap();
        let outputs = merged.outputs.unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].key_image.as_deref(), Some("b"));
        assert_eq!(outputs[1].index, Some(77));
    }

    #[test]
    fn absent_outputs_adopt_the_present_side() {
        let a = Payment::new("9xA", 100);
        let b = Payment {
            address: Some("9xA".into()),
            outputs: Some(vec![out("a", 100)]),
            ..Default::default()
        };
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.outputs.as_ref().unwrap().len(), 1);

        // and the other way around
        let merged = b.merge(&a).unwrap();
        assert_eq!(merged.outputs.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn merge_with_clone_is_idempotent() {
        let p = Payment {
            address: Some("9xA".into()),
            account_index: Some(0),
            subaddress_index: Some(2),
            amount: Some(100),
            outputs: Some(vec![out("a", 60), out("b", 40)]),
        };
        assert_eq!(p.merge(&p.clone()).unwrap(), p);
    }

    #[test]
    fn nested_output_conflict_surfaces() {
        let a = Payment {
            outputs: Some(vec![out("a", 5)]),
            ..Default::default()
        };
        let b = Payment {
            outputs: Some(vec![out("a", 6)]),
            ..Default::default()
        };
        let err = a.merge(&b).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Conflict {
                field: Field::Amount,
                ..
            }
        ));
    }

    #[test]
    fn conversion_copies_do_not_alias() {
        let source = Payment::new("9xA", 100);
        let mut derived = source.clone();
        derived.amount = Some(999);
        assert_eq!(source.amount, Some(100));
    }

    #[test]
    fn rendering_is_deterministic_and_strips_trailing_newline() {
        let p = Payment {
            address: Some("9xA".into()),
            account_index: Some(0),
            subaddress_index: None,
            amount: Some(100),
            outputs: Some(vec![out("a", 100)]),
        };
        let rendered = p.to_indented_string(0);
        assert!(!rendered.ends_with('\n'));
        let expected = "Address: 9xA\n\
                        Account index: 0\n\
                        Subaddress index: -\n\
                        Amount: 100\n\
                        Outputs: \n\
                        \x20 1: \n\
                        \x20   Key image: a\n\
                        \x20   Amount: 100\n\
                        \x20   Index: -\n\
                        \x20   Stealth public key: -\n\
                        \x20   Is spent: -";
        assert_eq!(rendered, expected);
    }
}
