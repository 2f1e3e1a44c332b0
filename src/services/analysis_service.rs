//! Analysis Service - read-only aggregates over a budget's transactions

use std::collections::HashMap;

use serde::Serialize;

use super::access::budget_for_member;
use super::transaction_service::TransactionQuery;
use crate::domain::validation::round2;
use crate::domain::{CategoryType, DomainError, TransactionFilter};
use crate::infrastructure::AppState;
use crate::models::{category, transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub budget_id: i32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: i32,
    pub category_name: String,
    pub category_type: String,
    pub color: Option<String>,
    pub total: f64,
    pub count: usize,
    /// Share of the total for the same type
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

type Row = (transaction::Model, category::Model);

fn is_income(category: &category::Model) -> bool {
    category.category_type == CategoryType::Income.as_str()
}

/// `(income, expense)` over the rows
pub fn totals(rows: &[Row]) -> (f64, f64) {
    rows.iter().fold((0.0, 0.0), |(income, expense), (tx, cat)| {
        if is_income(cat) {
            (income + tx.amount, expense)
        } else {
            (income, expense + tx.amount)
        }
    })
}

pub fn summarize(budget_id: i32, filter: &TransactionFilter, rows: &[Row]) -> Summary {
    let (income, expense) = totals(rows);
    Summary {
        budget_id,
        from: filter.from.clone(),
        to: filter.to.clone(),
        total_income: round2(income),
        total_expense: round2(expense),
        balance: round2(income - expense),
        transaction_count: rows.len(),
    }
}

pub fn breakdown(rows: &[Row]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<i32, CategoryTotal> = HashMap::new();
    for (tx, cat) in rows {
        let entry = by_category.entry(cat.id).or_insert_with(|| CategoryTotal {
            category_id: cat.id,
            category_name: cat.name.clone(),
            category_type: cat.category_type.clone(),
            color: cat.color.clone(),
            total: 0.0,
            count: 0,
            percent: 0.0,
        });
        entry.total += tx.amount;
        entry.count += 1;
    }

    let (income, expense) = totals(rows);
    let mut result: Vec<CategoryTotal> = by_category.into_values().collect();
    for item in &mut result {
        let type_total = if item.category_type == CategoryType::Income.as_str() {
            income
        } else {
            expense
        };
        item.percent = if type_total > 0.0 {
            round2(item.total / type_total * 100.0)
        } else {
            0.0
        };
        item.total = round2(item.total);
    }

    result.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    result
}

/// Twelve rows, one per calendar month of the rows' year
pub fn monthly(rows: &[Row]) -> Vec<MonthTotal> {
    let mut months: Vec<MonthTotal> = (1..=12)
        .map(|month| MonthTotal {
            month,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        })
        .collect();

    for (tx, cat) in rows {
        let Some(month) = tx
            .transaction_date
            .get(5..7)
            .and_then(|m| m.parse::<usize>().ok())
            .filter(|m| (1..=12).contains(m))
        else {
            continue;
        };
        let slot = &mut months[month - 1];
        if is_income(cat) {
            slot.income += tx.amount;
        } else {
            slot.expense += tx.amount;
        }
    }

    for slot in &mut months {
        slot.income = round2(slot.income);
        slot.expense = round2(slot.expense);
        slot.balance = round2(slot.income - slot.expense);
    }
    months
}

pub async fn summary(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    query: TransactionQuery,
) -> Result<Summary, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    let filter = query.into_filter(budget_id)?;
    let rows = state.transactions.list(filter.clone()).await?;
    Ok(summarize(budget_id, &filter, &rows))
}

pub async fn category_breakdown(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    query: TransactionQuery,
) -> Result<Vec<CategoryTotal>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    let rows = state.transactions.list(query.into_filter(budget_id)?).await?;
    Ok(breakdown(&rows))
}

pub async fn monthly_trend(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    year: i32,
) -> Result<Vec<MonthTotal>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    if !(1900..=9999).contains(&year) {
        return Err(DomainError::validation("year: must be between 1900 and 9999"));
    }

    let filter = TransactionFilter {
        budget_id,
        from: Some(format!("{year:04}-01-01")),
        to: Some(format!("{year:04}-12-31")),
        ..Default::default()
    };
    let rows = state.transactions.list(filter).await?;
    Ok(monthly(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i32, name: &str, kind: CategoryType) -> category::Model {
        category::Model {
            id,
            budget_id: 1,
            name: name.to_string(),
            category_type: kind.as_str().to_string(),
            color: None,
            icon: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn tx(id: i32, category_id: i32, amount: f64, date: &str) -> transaction::Model {
        transaction::Model {
            id,
            budget_id: 1,
            category_id,
            amount,
            transaction_date: date.to_string(),
            description: None,
            created_by: 1,
            regular_payment_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn sample() -> Vec<Row> {
        let salary = cat(1, "Salary", CategoryType::Income);
        let food = cat(2, "Food", CategoryType::Expense);
        let rent = cat(3, "Rent", CategoryType::Expense);
        vec![
            (tx(1, 1, 3000.0, "2024-01-05"), salary.clone()),
            (tx(2, 2, 150.25, "2024-01-10"), food.clone()),
            (tx(3, 3, 900.0, "2024-02-01"), rent),
            (tx(4, 2, 49.75, "2024-02-12"), food),
        ]
    }

    #[test]
    fn summary_sums_income_and_expense() {
        let filter = TransactionFilter {
            budget_id: 1,
            ..Default::default()
        };
        let s = summarize(1, &filter, &sample());
        assert_eq!(s.total_income, 3000.0);
        assert_eq!(s.total_expense, 1100.0);
        assert_eq!(s.balance, 1900.0);
        assert_eq!(s.transaction_count, 4);
    }

    #[test]
    fn breakdown_shares_are_per_type() {
        let items = breakdown(&sample());
        assert_eq!(items[0].category_name, "Salary");
        assert_eq!(items[0].percent, 100.0);

        let rent = items.iter().find(|i| i.category_name == "Rent").unwrap();
        assert_eq!(rent.percent, 81.82);
        let food = items.iter().find(|i| i.category_name == "Food").unwrap();
        assert_eq!(food.total, 200.0);
        assert_eq!(food.count, 2);
    }

    #[test]
    fn monthly_has_twelve_rows() {
        let months = monthly(&sample());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].balance, 2849.75);
        assert_eq!(months[1].expense, 949.75);
        assert_eq!(months[11].balance, 0.0);
    }
}
