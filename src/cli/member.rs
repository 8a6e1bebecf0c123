//! Member CLI commands
//!
//! Implements CLI commands for member management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::member::{format_member_details, format_member_list};
use crate::error::MealPoolResult;
use crate::ledger::LedgerSnapshot;
use crate::services::MemberService;
use crate::storage::Storage;

use super::resolve_member;

/// Member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a new member
    Add {
        /// Member name
        name: String,
        /// Avatar image path or URL
        #[arg(short, long)]
        avatar: Option<String>,
    },
    /// List all members with their balances
    List,
    /// Show a member's balance breakdown
    Show {
        /// Member name or ID
        member: String,
    },
    /// Rename a member
    Rename {
        /// Member name or ID
        member: String,
        /// New name
        new_name: String,
    },
    /// Set or clear a member's avatar
    Avatar {
        /// Member name or ID
        member: String,
        /// Avatar image path or URL (omit to clear)
        avatar: Option<String>,
    },
    /// Remove a member and their transactions
    Remove {
        /// Member name or ID
        member: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a member command
pub fn handle_member_command(
    storage: &Storage,
    settings: &Settings,
    cmd: MemberCommands,
) -> MealPoolResult<()> {
    let service = MemberService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        MemberCommands::Add { name, avatar } => {
            let member = service.create(&name, avatar)?;
            println!("Added member: {}", member.name);
            println!("  ID: {}", member.id);
        }

        MemberCommands::List => {
            let (members, transactions) = storage.snapshot()?;
            let balances = LedgerSnapshot::new(&members, &transactions).member_balances();
            println!("{}", format_member_list(&members, &balances, symbol));
        }

        MemberCommands::Show { member } => {
            let member = resolve_member(storage, &member)?;
            let (members, transactions) = storage.snapshot()?;
            let balance = LedgerSnapshot::new(&members, &transactions).member_balance(member.id);
            print!("{}", format_member_details(&member, balance.as_ref(), symbol));
        }

        MemberCommands::Rename { member, new_name } => {
            let member = resolve_member(storage, &member)?;
            let old_name = member.name.clone();
            let renamed = service.rename(member.id, &new_name)?;
            println!("Renamed '{}' to '{}'", old_name, renamed.name);
        }

        MemberCommands::Avatar { member, avatar } => {
            let member = resolve_member(storage, &member)?;
            let updated = service.set_avatar(member.id, avatar)?;
            match &updated.avatar {
                Some(avatar) => println!("Avatar for {} set to {}", updated.name, avatar),
                None => println!("Avatar for {} cleared", updated.name),
            }
        }

        MemberCommands::Remove { member, force } => {
            let member = resolve_member(storage, &member)?;

            if !force {
                let owned = storage.transactions.get_by_member(member.id)?.len();
                println!("About to remove member: {}", member.name);
                println!("  Their own transactions ({}) will be deleted.", owned);
                println!("  Shared expenses they were part of keep their split.");
                println!();
                println!("Use --force to confirm removal");
                return Ok(());
            }

            let removal = service.delete(member.id)?;
            println!("Removed member: {}", removal.member.name);
            println!("  Transactions deleted: {}", removal.transactions_removed);
        }
    }

    Ok(())
}
