//! Folds several overlapping RPC perspectives into one accumulator, the
//! way wallet aggregation drives the merge engine.

use wallet_model::{MergeError, Output, Payment, Transaction};

fn out(key_image: &str, amount: u128) -> Output {
    Output {
        key_image: Some(key_image.into()),
        amount: Some(amount),
        ..Default::default()
    }
}

#[test]
fn three_partial_views_fold_into_one_payment() {
    // get_transfers reports destination and amount only
    let from_transfers = Payment::new("9xA", 100);

    // incoming_transfers resolves the first on-chain output
    let from_incoming = Payment {
        subaddress_index: Some(1),
        outputs: Some(vec![out("ki-1", 60)]),
        ..Default::default()
    };

    // a later sweep of the same endpoint sees both outputs and spend state
    let second_pass = Payment {
        account_index: Some(0),
        outputs: Some(vec![
            Output {
                key_image: Some("ki-1".into()),
                amount: Some(60),
                is_spent: Some(false),
                ..Default::default()
            },
            out("ki-2", 40),
        ]),
        ..Default::default()
    };

    let mut acc = from_transfers;
    acc.merge_from(&from_incoming).unwrap();
    acc.merge_from(&second_pass).unwrap();

    assert_eq!(acc.address.as_deref(), Some("9xA"));
    assert_eq!(acc.account_index, Some(0));
    assert_eq!(acc.subaddress_index, Some(1));
    assert_eq!(acc.amount, Some(100));

    let outputs = acc.outputs.as_ref().unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].key_image.as_deref(), Some("ki-1"));
    assert_eq!(outputs[0].amount, Some(60));
    assert_eq!(outputs[0].is_spent, Some(false));
    assert_eq!(outputs[1].key_image.as_deref(), Some("ki-2"));
    assert_eq!(outputs[1].amount, Some(40));
}

#[test]
fn disagreeing_sources_abort_the_fold() {
    let mut acc = Transaction::new("aa");
    acc.fee = Some(1_000);

    let mut conflicting = Transaction::new("aa");
    conflicting.fee = Some(2_000);

    let before = acc.clone();
    let err = acc.merge_from(&conflicting).unwrap_err();
    assert!(matches!(err, MergeError::Conflict { .. }));
    // pure merge: the accumulator survives a failed fold untouched
    assert_eq!(acc, before);
}

#[test]
fn serde_round_trips_absence_as_key_absence() {
    let p = Payment::new("9xA", 100);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["address"], "9xA");
    assert!(json.get("subaddress_index").is_none());
    assert!(json.get("outputs").is_none());

    let back: Payment = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
}
