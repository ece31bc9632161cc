use autax::cmd::{
    deductions::DeductionsCommand, extract::ExtractCommand, receipts::ReceiptsCommand,
    schema::SchemaCommand, subscriptions::SubscriptionsCommand, tax::TaxCommand,
    verify::VerifyCommand,
};
use autax::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autax", version, about = "Australian bank statement extraction and tax calculator")]
struct Cli {
    /// JSON configuration file (see `autax schema defaults`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statements into classified transactions
    Extract(ExtractCommand),
    /// Claimable totals by owner and category
    Deductions(DeductionsCommand),
    /// Match deductions to receipt files
    Receipts(ReceiptsCommand),
    /// Check receipt file name dates against the dates inside them
    Verify(VerifyCommand),
    /// Annual subscription totals from a folder of invoices
    Subscriptions(SubscriptionsCommand),
    /// Income tax, levies and other obligations
    Tax(TaxCommand),
    /// Print the configuration schema or defaults
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Extract(cmd) => cmd.exec(&config),
        Command::Deductions(cmd) => cmd.exec(&config),
        Command::Receipts(cmd) => cmd.exec(&config),
        Command::Verify(cmd) => cmd.exec(&config),
        Command::Subscriptions(cmd) => cmd.exec(&config),
        Command::Tax(cmd) => cmd.exec(&config),
        Command::Schema(cmd) => cmd.exec(),
    }
}
