//! Member display formatting

use crate::ledger::MemberBalance;
use crate::models::Member;

/// Format members with their current figures as a table
///
/// `balances` is matched to members by id; members without an entry show
/// zeros.
pub fn format_member_list(members: &[Member], balances: &[MemberBalance], symbol: &str) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>6}  {:>12}  {:>12}\n",
        "Name",
        "ID",
        "Meals",
        "Deposits",
        "Balance",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->6}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for member in members {
        let balance = balances.iter().find(|b| b.member_id == member.id);
        let (meals, deposits, net) = match balance {
            Some(b) => (b.meal_count, b.deposits, b.balance),
            None => Default::default(),
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:>6}  {:>12}  {:>12}\n",
            member.name,
            member.id.to_string(),
            meals,
            deposits.format_with_symbol(symbol),
            net.format_with_symbol(symbol),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single member with the breakdown of their balance
pub fn format_member_details(
    member: &Member,
    balance: Option<&MemberBalance>,
    symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Member:   {}\n", member.name));
    output.push_str(&format!("ID:       {}\n", member.id));
    if let Some(avatar) = &member.avatar {
        output.push_str(&format!("Avatar:   {}\n", avatar));
    }
    output.push_str(&format!("Joined:   {}\n", member.created_at.format("%Y-%m-%d")));

    let Some(b) = balance else {
        return output;
    };

    output.push('\n');
    output.push_str(&format!("Meals eaten:        {:>12}\n", b.meal_count));
    output.push_str(&format!(
        "Deposits:           {:>12}\n",
        b.deposits.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Meal cost:          {:>12}\n",
        (-b.meal_cost).format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Shared bills:       {:>12}\n",
        (-b.shared_expense_share).format_with_symbol(symbol)
    ));
    output.push_str(&format!("{:-<33}\n", ""));
    output.push_str(&format!(
        "Balance:            {:>12}  {}\n",
        b.balance.format_with_symbol(symbol),
        standing(b)
    ));
    output.push_str(&format!(
        "\nPaid for the house: {:>12}\n",
        b.expenses_paid.format_with_symbol(symbol)
    ));

    output
}

fn standing(balance: &MemberBalance) -> &'static str {
    let shown = balance.balance.rounded();
    if shown.is_positive() {
        "(pool owes member)"
    } else if shown.is_negative() {
        "(owes the pool)"
    } else {
        "(settled)"
    }
}
