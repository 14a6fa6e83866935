use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Field, MergeError};
use crate::reconcile::reconcile;
use crate::render::{kv_line, opt, trim_trailing};

/// A single on-chain output as observed from one RPC perspective.
///
/// The key image is the output's stable identity: two records with equal
/// key images describe the same output seen by different RPC calls. Every
/// field is optional because no single wallet-rpc endpoint reports them all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Hex key image; dedup identity within a payment's output list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_image: Option<String>,
    /// Atomic units. Absent means unknown, which is distinct from zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u128>,
    /// Global output index on chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stealth_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spent: Option<bool>,
}

impl Output {
    pub fn new(key_image: impl Into<String>) -> Self {
        Output {
            key_image: Some(key_image.into()),
            ..Default::default()
        }
    }

    fn identity(&self) -> String {
        match &self.key_image {
            Some(ki) => format!("output {ki}"),
            None => "output <no key image>".to_string(),
        }
    }

    /// Merges two observations of the same output into a new record.
    ///
    /// Returns a fresh merged value; neither input is mutated, so a failed
    /// merge cannot leave an accumulator half-updated. Fails with
    /// [`MergeError::IdentityMismatch`] when both key images are present
    /// and differ, and with [`MergeError::Conflict`] when any other pair of
    /// present fields disagrees.
    pub fn merge(&self, other: &Output) -> Result<Output, MergeError> {
        if let (Some(a), Some(b)) = (&self.key_image, &other.key_image) {
            if a != b {
                return Err(MergeError::IdentityMismatch {
                    kind: "output",
                    left: a.clone(),
                    right: b.clone(),
                });
            }
        }
        let id = self.identity();
        Ok(Output {
            key_image: reconcile(
                Field::KeyImage,
                &id,
                self.key_image.clone(),
                other.key_image.clone(),
            )?,
            amount: reconcile(Field::Amount, &id, self.amount, other.amount)?,
            index: reconcile(Field::OutputIndex, &id, self.index, other.index)?,
            stealth_public_key: reconcile(
                Field::StealthPublicKey,
                &id,
                self.stealth_public_key.clone(),
                other.stealth_public_key.clone(),
            )?,
            is_spent: reconcile(Field::IsSpent, &id, self.is_spent, other.is_spent)?,
        })
    }

    /// Folds `other` into `self`, assigning only on success.
    pub fn merge_from(&mut self, other: &Output) -> Result<(), MergeError> {
        *self = self.merge(other)?;
        Ok(())
    }

    pub fn to_indented_string(&self, indent: usize) -> String {
        let mut s = String::new();
        s += &kv_line("Key image", &opt(&self.key_image), indent);
        s += &kv_line("Amount", &opt(&self.amount), indent);
        s += &kv_line("Index", &opt(&self.index), indent);
        s += &kv_line("Stealth public key", &opt(&self.stealth_public_key), indent);
        s += &kv_line("Is spent", &opt(&self.is_spent), indent);
        trim_trailing(s)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_indented_string(0))
    }
}
