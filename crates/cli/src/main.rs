mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "walletview", about = "Wallet view-model developer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch overlapping wallet-rpc views and print merged transactions.
    Show(commands::show::ShowArgs),
    /// Offline merge demonstration on two partial payment views.
    Demo(commands::demo::DemoArgs),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Show(args) => commands::show::run(args),
        Commands::Demo(args) => commands::demo::run(args),
    };
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
