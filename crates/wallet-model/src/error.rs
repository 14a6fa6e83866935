use std::fmt;
use thiserror::Error;

/// Reconcilable fields, named so a conflict reports which field disagreed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Address,
    AccountIndex,
    SubaddressIndex,
    Amount,
    KeyImage,
    OutputIndex,
    StealthPublicKey,
    IsSpent,
    Txid,
    PaymentId,
    Fee,
    Height,
    Timestamp,
    InPool,
    IsIncoming,
    Note,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Address => "address",
            Field::AccountIndex => "account_index",
            Field::SubaddressIndex => "subaddress_index",
            Field::Amount => "amount",
            Field::KeyImage => "key_image",
            Field::OutputIndex => "output_index",
            Field::StealthPublicKey => "stealth_public_key",
            Field::IsSpent => "is_spent",
            Field::Txid => "txid",
            Field::PaymentId => "payment_id",
            Field::Fee => "fee",
            Field::Height => "height",
            Field::Timestamp => "timestamp",
            Field::InPool => "in_pool",
            Field::IsIncoming => "is_incoming",
            Field::Note => "note",
        };
        f.write_str(name)
    }
}

/// Merge failures. Both variants are fatal for the enclosing aggregation:
/// recovering automatically would silently favor one of two disagreeing
/// RPC sources.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("conflicting {field} on {entity}: {left} != {right}")]
    Conflict {
        field: Field,
        /// Identity of the entity being merged (address, key image or txid).
        entity: String,
        left: String,
        right: String,
    },
    #[error("{kind} identity mismatch: {left} != {right}")]
    IdentityMismatch {
        kind: &'static str,
        left: String,
        right: String,
    },
}
