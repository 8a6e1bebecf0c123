use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use mealpool::cli::{
    handle_deposit_command, handle_expense_command, handle_history_command, handle_meal_command,
    handle_member_command, handle_shared_command, handle_summary_command,
    handle_transaction_command, DepositArgs, ExpenseArgs, HistoryArgs, MealArgs, MemberCommands,
    SharedArgs, SummaryArgs, TransactionCommands,
};
use mealpool::config::paths::{MealPoolPaths, DATA_DIR_ENV};
use mealpool::config::settings::Settings;
use mealpool::storage::Storage;

#[derive(Parser, Debug)]
#[command(
    name = "mealpool",
    version,
    about = "Shared meal and expense ledger for flatmates",
    long_about = "mealpool keeps a household's shared food money honest. Members deposit \
                  into a common pool, log the meals they eat and the bills they pay, and \
                  mealpool works out the meal rate and what everyone owes."
)]
struct Cli {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// Directory holding settings and ledger data
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,

    /// Member management commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Record meals eaten by a member
    Meal(MealArgs),

    /// Record money paid into the pool
    Deposit(DepositArgs),

    /// Record a food expense paid out of the pool
    Expense(ExpenseArgs),

    /// Record a bill split equally among members
    Shared(SharedArgs),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Show the meal rate and every member's balance
    Summary(SummaryArgs),

    /// Show the running balance, newest first
    History(HistoryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    match main_inner(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(cli: Cli) -> Result<()> {
    trace!("{cli:?}");

    let paths = match &cli.data_dir {
        Some(dir) => MealPoolPaths::with_base_dir(dir.clone()),
        None => MealPoolPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("mealpool - shared meal and expense ledger");
        println!();
        println!("Run 'mealpool --help' for usage information.");
        println!("Run 'mealpool init' to create a new ledger.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing mealpool at: {}", paths.base_dir().display());
            mealpool::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'mealpool member add <NAME>' to add the first member.");
        }
        Commands::Config => print_config(&paths, &settings),
        Commands::Member(cmd) => handle_member_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Meal(args) => handle_meal_command(&open_storage(&paths)?, &settings, args)?,
        Commands::Deposit(args) => {
            handle_deposit_command(&open_storage(&paths)?, &settings, args)?
        }
        Commands::Expense(args) => {
            handle_expense_command(&open_storage(&paths)?, &settings, args)?
        }
        Commands::Shared(args) => handle_shared_command(&open_storage(&paths)?, &settings, args)?,
        Commands::Txn(cmd) => handle_transaction_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Summary(args) => {
            handle_summary_command(&open_storage(&paths)?, &settings, args)?
        }
        Commands::History(args) => {
            handle_history_command(&open_storage(&paths)?, &settings, args)?
        }
    }

    Ok(())
}

fn open_storage(paths: &MealPoolPaths) -> Result<Storage> {
    let mut storage = Storage::new(paths.clone())?;
    storage
        .load_all()
        .with_context(|| format!("loading ledger from {}", paths.data_dir().display()))?;
    Ok(storage)
}

fn print_config(paths: &MealPoolPaths, settings: &Settings) {
    println!("mealpool Configuration");
    println!("======================");
    println!("Base directory:    {}", paths.base_dir().display());
    println!("Data directory:    {}", paths.data_dir().display());
    println!("Settings file:     {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Meal slots:");
    for slot in mealpool::models::MealSlot::all() {
        let slot_settings = settings.meal_slots.slot(*slot);
        println!(
            "    {:<10} {:<9} default {}",
            slot.to_string(),
            if slot_settings.enabled { "enabled" } else { "disabled" },
            slot_settings.default_count
        );
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Only this crate's events unless RUST_LOG says otherwise
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
