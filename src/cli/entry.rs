//! Ledger entry commands
//!
//! `meal`, `deposit`, `expense` and `shared`: the four ways money or meals
//! enter the ledger.

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{MealPoolError, MealPoolResult};
use crate::models::{MealDetails, MealSlot, MemberId, Transaction};
use crate::services::TransactionService;
use crate::storage::Storage;

use super::{parse_amount, parse_date, resolve_member};

/// Arguments for `meal`
#[derive(Args, Debug)]
pub struct MealArgs {
    /// Member name or ID
    pub member: String,
    /// Breakfasts eaten
    #[arg(short, long)]
    pub breakfast: Option<u32>,
    /// Lunches eaten
    #[arg(short, long)]
    pub lunch: Option<u32>,
    /// Dinners eaten
    #[arg(long)]
    pub dinner: Option<u32>,
    /// Total meals without a per-slot breakdown
    #[arg(short, long, conflicts_with_all = ["breakfast", "lunch", "dinner"])]
    pub count: Option<u32>,
    /// Date (YYYY-MM-DD or RFC 3339), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Note
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for `deposit`
#[derive(Args, Debug)]
pub struct DepositArgs {
    /// Member name or ID
    pub member: String,
    /// Amount (e.g. "500" or "500.50")
    pub amount: String,
    /// Date (YYYY-MM-DD or RFC 3339), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Note
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for `expense`
#[derive(Args, Debug)]
pub struct ExpenseArgs {
    /// Member who paid, name or ID
    pub payer: String,
    /// Amount (e.g. "300" or "299.99")
    pub amount: String,
    /// Other members who paid jointly (repeatable)
    #[arg(long = "payer", value_name = "MEMBER")]
    pub joint_payers: Vec<String>,
    /// Date (YYYY-MM-DD or RFC 3339), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Note
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for `shared`
#[derive(Args, Debug)]
pub struct SharedArgs {
    /// Member who paid, name or ID
    pub payer: String,
    /// Amount (e.g. "150")
    pub amount: String,
    /// Members splitting the bill equally
    #[arg(short, long = "with", value_name = "MEMBER", required = true, num_args = 1..)]
    pub with: Vec<String>,
    /// Date (YYYY-MM-DD or RFC 3339), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Note
    #[arg(short, long)]
    pub note: Option<String>,
}

fn resolve_all(storage: &Storage, identifiers: &[String]) -> MealPoolResult<Vec<MemberId>> {
    identifiers
        .iter()
        .map(|name| resolve_member(storage, name).map(|m| m.id))
        .collect()
}

fn print_recorded(txn: &Transaction, who: &str, symbol: &str) {
    println!("Recorded {} for {}", txn.kind.to_string().to_lowercase(), who);
    println!("  ID:     {}", txn.id);
    println!("  Date:   {}", txn.date.format("%Y-%m-%d"));
    if txn.kind == crate::models::TransactionKind::Meal {
        println!("  Meals:  {}", txn.effective_meal_count());
    } else {
        println!("  Amount: {}", txn.amount.format_with_symbol(symbol));
    }
}

/// Build per-slot counts from the flags, or the configured defaults
fn meal_details(args: &MealArgs, settings: &Settings) -> MealPoolResult<MealDetails> {
    let given = [
        (MealSlot::Breakfast, args.breakfast),
        (MealSlot::Lunch, args.lunch),
        (MealSlot::Dinner, args.dinner),
    ];

    if given.iter().all(|(_, count)| count.is_none()) {
        return Ok(settings.meal_slots.default_details());
    }

    let mut details = MealDetails::new();
    for (slot, count) in given {
        let Some(count) = count else { continue };
        if !settings.meal_slots.slot(slot).enabled && count > 0 {
            return Err(MealPoolError::Validation(format!(
                "{} is disabled in the settings",
                slot
            )));
        }
        details.set(slot, count);
    }
    Ok(details)
}

/// Handle `meal`
pub fn handle_meal_command(
    storage: &Storage,
    settings: &Settings,
    args: MealArgs,
) -> MealPoolResult<()> {
    let member = resolve_member(storage, &args.member)?;
    let date = parse_date(args.date.as_deref())?;
    let service = TransactionService::new(storage);

    let txn = match args.count {
        Some(count) => service.record_meal_count(member.id, date, count, args.note.as_deref())?,
        None => {
            let details = meal_details(&args, settings)?;
            service.record_meal(member.id, date, details, args.note.as_deref())?
        }
    };

    print_recorded(&txn, &member.name, &settings.currency_symbol);
    if let Some(details) = &txn.meal_details {
        println!("  Slots:  {}", details);
    }
    Ok(())
}

/// Handle `deposit`
pub fn handle_deposit_command(
    storage: &Storage,
    settings: &Settings,
    args: DepositArgs,
) -> MealPoolResult<()> {
    let member = resolve_member(storage, &args.member)?;
    let amount = parse_amount(&args.amount)?;
    let date = parse_date(args.date.as_deref())?;

    let txn = TransactionService::new(storage).record_deposit(
        member.id,
        date,
        amount,
        args.note.as_deref(),
    )?;

    print_recorded(&txn, &member.name, &settings.currency_symbol);
    Ok(())
}

/// Handle `expense`
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    args: ExpenseArgs,
) -> MealPoolResult<()> {
    let payer = resolve_member(storage, &args.payer)?;
    let amount = parse_amount(&args.amount)?;
    let date = parse_date(args.date.as_deref())?;

    let mut joint = resolve_all(storage, &args.joint_payers)?;
    if !joint.is_empty() && !joint.contains(&payer.id) {
        joint.insert(0, payer.id);
    }

    let txn = TransactionService::new(storage).record_expense(
        payer.id,
        date,
        amount,
        joint,
        args.note.as_deref(),
    )?;

    print_recorded(&txn, &payer.name, &settings.currency_symbol);
    Ok(())
}

/// Handle `shared`
pub fn handle_shared_command(
    storage: &Storage,
    settings: &Settings,
    args: SharedArgs,
) -> MealPoolResult<()> {
    let payer = resolve_member(storage, &args.payer)?;
    let amount = parse_amount(&args.amount)?;
    let date = parse_date(args.date.as_deref())?;
    let shared_with = resolve_all(storage, &args.with)?;

    let txn = TransactionService::new(storage).record_shared_expense(
        payer.id,
        date,
        amount,
        shared_with,
        args.note.as_deref(),
    )?;

    print_recorded(&txn, &payer.name, &settings.currency_symbol);
    if let Some(share) = txn.amount.divided_by(txn.shared_with.len() as u64) {
        println!(
            "  Split:  {} ways, {} each",
            txn.shared_with.len(),
            share.format_with_symbol(&settings.currency_symbol)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal_args(breakfast: Option<u32>, lunch: Option<u32>, dinner: Option<u32>) -> MealArgs {
        MealArgs {
            member: "Rahim".into(),
            breakfast,
            lunch,
            dinner,
            count: None,
            date: None,
            note: None,
        }
    }

    #[test]
    fn test_meal_details_default_from_settings() {
        let mut settings = Settings::default();
        settings.meal_slots.breakfast.enabled = false;

        let details = meal_details(&meal_args(None, None, None), &settings).unwrap();
        assert_eq!(details.get(MealSlot::Breakfast), 0);
        assert_eq!(details.total(), 2);
    }

    #[test]
    fn test_meal_details_from_flags() {
        let settings = Settings::default();
        let details = meal_details(&meal_args(None, Some(1), Some(2)), &settings).unwrap();
        assert_eq!(details.get(MealSlot::Lunch), 1);
        assert_eq!(details.get(MealSlot::Dinner), 2);
        assert_eq!(details.total(), 3);
    }

    #[test]
    fn test_disabled_slot_rejected() {
        let mut settings = Settings::default();
        settings.meal_slots.dinner.enabled = false;

        let err = meal_details(&meal_args(None, None, Some(1)), &settings).unwrap_err();
        assert!(err.is_validation());
    }
}
