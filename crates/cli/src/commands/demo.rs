use anyhow::{Context, Result};
use clap::Parser;
use wallet_model::{Output, Payment};

#[derive(Parser)]
pub struct DemoArgs {
    /// Indent level for the rendered records.
    #[arg(long, default_value_t = 0)]
    pub indent: usize,
}

/// Builds two overlapping partial views of one payment, merges them, and
/// prints all three. No node required; handy for eyeballing the renderer
/// and the key-image dedup.
pub fn run(args: DemoArgs) -> Result<()> {
    let ki_1 = hex::encode([0x11u8; 32]);
    let ki_2 = hex::encode([0x22u8; 32]);

    // what get_transfers would report
    let mut sparse = Payment::new("9xA-demo-address", 100);
    sparse.account_index = Some(0);

    // what incoming_transfers would report for the same payment
    let resolved = Payment {
        account_index: Some(0),
        subaddress_index: Some(1),
        outputs: Some(vec![
            Output {
                key_image: Some(ki_1),
                amount: Some(60),
                index: Some(79_635),
                is_spent: Some(false),
                ..Default::default()
            },
            Output {
                key_image: Some(ki_2),
                amount: Some(40),
                index: Some(79_636),
                is_spent: Some(false),
                ..Default::default()
            },
        ]),
        ..Default::default()
    };

    println!("view A (transfers):");
    println!("{}", sparse.to_indented_string(args.indent + 1));
    println!();
    println!("view B (incoming transfers):");
    println!("{}", resolved.to_indented_string(args.indent + 1));
    println!();

    let merged = sparse.merge(&resolved).context("merge demo payments")?;
    println!("merged:");
    println!("{}", merged.to_indented_string(args.indent + 1));
    Ok(())
}
