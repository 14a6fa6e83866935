use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use wallet_model::Transaction;
use wallet_rpc::{convert, GetTransfersParams, IncomingTransfersParams, WalletRpc};

#[derive(Parser)]
pub struct ShowArgs {
    /// monero-wallet-rpc base URL, e.g. http://127.0.0.1:18083
    #[arg(long)]
    pub url: String,
    /// Basic-auth user (optional; requires --pass).
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub pass: Option<String>,
    /// Restrict to one wallet account.
    #[arg(long)]
    pub account_index: Option<u32>,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let auth = match (args.user, args.pass) {
        (Some(user), Some(pass)) => Some((user, pass)),
        _ => None,
    };
    let rpc = WalletRpc::new(&args.url, auth).context("build wallet-rpc client")?;

    let height = rpc.get_height().context("get_height")?;
    info!("wallet synced to height {height}");

    let transfers = rpc
        .get_transfers(&GetTransfersParams::all(args.account_index))
        .context("get_transfers")?;
    let incoming = rpc
        .incoming_transfers(&IncomingTransfersParams::all(args.account_index))
        .context("incoming_transfers")?;
    info!(
        "fetched {} transfer entries and {} incoming outputs",
        transfers.entries().count(),
        incoming.transfers.len()
    );

    // Fold every partial view into an accumulator per txid. A merge
    // conflict means the wallet returned inconsistent data; abort rather
    // than pick a side.
    let mut txs: Vec<Transaction> = Vec::new();
    let partials = transfers
        .entries()
        .map(convert::transaction_from_transfer)
        .chain(incoming.transfers.iter().map(convert::transaction_from_incoming));
    for partial in partials {
        match txs
            .iter_mut()
            .find(|t| t.txid.is_some() && t.txid == partial.txid)
        {
            Some(acc) => acc
                .merge_from(&partial)
                .with_context(|| format!("inconsistent wallet views for tx {:?}", partial.txid))?,
            None => txs.push(partial),
        }
    }

    println!("{} transaction(s)", txs.len());
    for tx in &txs {
        println!("---");
        println!("{tx}");
    }
    Ok(())
}
