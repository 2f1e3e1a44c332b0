//! Transaction Service - income/expense entries and limit alerts

use serde::Deserialize;
use utoipa::IntoParams;

use super::access::{budget_for_member, category_in_budget};
use super::budget_limit_service::usage;
use super::notification_service::notify_family;
use crate::domain::inputs::TransactionInput;
use crate::domain::validation::{date, date_order};
use crate::domain::{
    CategoryType, DomainError, NewTransaction, NotificationType, TransactionFilter,
};
use crate::infrastructure::AppState;
use crate::models::{TransactionDto, budget_limit, category, transaction};

/// Query string accepted by list, export and analysis endpoints
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    /// Inclusive start date, YYYY-MM-DD
    pub from: Option<String>,
    /// Inclusive end date, YYYY-MM-DD
    pub to: Option<String>,
    pub category_id: Option<i32>,
    /// `income` or `expense`; also accepted as `type`
    #[serde(alias = "type")]
    pub transaction_type: Option<String>,
}

impl TransactionQuery {
    pub fn into_filter(self, budget_id: i32) -> Result<TransactionFilter, DomainError> {
        let from = self.from.filter(|s| !s.trim().is_empty());
        let to = self.to.filter(|s| !s.trim().is_empty());
        let from_date = from.as_deref().map(|f| date("from", f)).transpose()?;
        let to_date = to.as_deref().map(|t| date("to", t)).transpose()?;
        if let (Some(start), Some(end)) = (from_date, to_date) {
            date_order(start, end, "to")?;
        }
        let category_type = match self.transaction_type.filter(|s| !s.trim().is_empty()) {
            Some(t) => Some(t.parse::<CategoryType>()?),
            None => None,
        };

        Ok(TransactionFilter {
            budget_id,
            from: from.map(|f| f.trim().to_string()),
            to: to.map(|t| t.trim().to_string()),
            category_id: self.category_id,
            category_type,
        })
    }
}

/// Usage of one limit before a write, to detect threshold crossings after it
struct LimitSnapshot {
    limit: budget_limit::Model,
    spent_before: f64,
}

async fn snapshot_limits(
    state: &AppState,
    category: &category::Model,
    on_date: &str,
) -> Result<Vec<LimitSnapshot>, DomainError> {
    if category.category_type != CategoryType::Expense.as_str() {
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for limit in state.limits.list_covering(category.id, on_date).await? {
        let spent_before = state
            .transactions
            .sum_for_category(category.id, &limit.start_date, &limit.end_date)
            .await?;
        snapshots.push(LimitSnapshot {
            limit,
            spent_before,
        });
    }
    Ok(snapshots)
}

/// Which alert, if any, a change from `before` to `after` spent should raise
pub fn limit_crossing(
    amount: f64,
    before: f64,
    after: f64,
    warning_percent: f64,
) -> Option<NotificationType> {
    let (_, pct_before, exceeded_before) = usage(amount, before);
    let (_, pct_after, exceeded_after) = usage(amount, after);

    if exceeded_after && !exceeded_before {
        Some(NotificationType::LimitExceeded)
    } else if !exceeded_after && pct_after >= warning_percent && pct_before < warning_percent {
        Some(NotificationType::LimitWarning)
    } else {
        None
    }
}

async fn notify_crossings(
    state: &AppState,
    family_id: i32,
    category: &category::Model,
    snapshots: Vec<LimitSnapshot>,
) -> Result<(), DomainError> {
    for snap in snapshots {
        let spent_after = state
            .transactions
            .sum_for_category(category.id, &snap.limit.start_date, &snap.limit.end_date)
            .await?;
        let Some(kind) = limit_crossing(
            snap.limit.amount,
            snap.spent_before,
            spent_after,
            state.settings.limit_warning_percent,
        ) else {
            continue;
        };

        let (_, percent, _) = usage(snap.limit.amount, spent_after);
        let title = match kind {
            NotificationType::LimitExceeded => "Budget limit exceeded",
            _ => "Budget limit almost reached",
        };
        let message = format!(
            "{}: {:.2} of {:.2} spent ({:.2}%) between {} and {}",
            category.name,
            spent_after,
            snap.limit.amount,
            percent,
            snap.limit.start_date,
            snap.limit.end_date
        );
        notify_family(state, family_id, None, kind, title, &message).await?;
    }
    Ok(())
}

/// Insert a transaction and raise limit alerts; used by the API and the
/// regular payment runner
pub async fn record_transaction(
    state: &AppState,
    family_id: i32,
    category: &category::Model,
    new: NewTransaction,
) -> Result<transaction::Model, DomainError> {
    let snapshots = snapshot_limits(state, category, &new.transaction_date).await?;
    let created = state.transactions.create(new).await?;

    if let Err(e) = notify_crossings(state, family_id, category, snapshots).await {
        tracing::error!("Failed to evaluate limits for transaction #{}: {}", created.id, e);
    }
    Ok(created)
}

pub async fn create_transaction(
    state: &AppState,
    user_id: i32,
    input: TransactionInput,
) -> Result<TransactionDto, DomainError> {
    let input = input.validate()?;
    let (budget, _) = budget_for_member(state, input.budget_id, user_id).await?;
    let category = category_in_budget(state, input.category_id, budget.id).await?;

    let created = record_transaction(
        state,
        budget.family_id,
        &category,
        NewTransaction {
            budget_id: budget.id,
            category_id: category.id,
            amount: input.amount,
            transaction_date: input.transaction_date,
            description: input.description,
            created_by: user_id,
            regular_payment_id: None,
        },
    )
    .await?;

    tracing::info!(
        "Transaction #{} ({} {:.2}) added to budget #{}",
        created.id,
        category.category_type,
        created.amount,
        budget.id
    );
    Ok(TransactionDto::from_parts(created, &category))
}

pub async fn get_transaction(
    state: &AppState,
    transaction_id: i32,
    user_id: i32,
) -> Result<TransactionDto, DomainError> {
    let (tx, category) = state
        .transactions
        .find_by_id(transaction_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Transaction"))?;
    budget_for_member(state, tx.budget_id, user_id).await?;
    Ok(TransactionDto::from_parts(tx, &category))
}

pub async fn list_transactions(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    query: TransactionQuery,
) -> Result<Vec<TransactionDto>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    let filter = query.into_filter(budget_id)?;

    let rows = state.transactions.list(filter).await?;
    Ok(rows
        .into_iter()
        .map(|(tx, cat)| TransactionDto::from_parts(tx, &cat))
        .collect())
}

pub async fn update_transaction(
    state: &AppState,
    transaction_id: i32,
    user_id: i32,
    input: TransactionInput,
) -> Result<TransactionDto, DomainError> {
    let input = input.validate()?;
    let (existing, _) = state
        .transactions
        .find_by_id(transaction_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Transaction"))?;
    let (budget, role) = budget_for_member(state, existing.budget_id, user_id).await?;
    if existing.created_by != user_id && !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the author or a family manager can edit this transaction",
        ));
    }
    let category = category_in_budget(state, input.category_id, budget.id).await?;

    let snapshots = snapshot_limits(state, &category, &input.transaction_date).await?;
    let updated = state
        .transactions
        .update(
            existing.id,
            category.id,
            input.amount,
            input.transaction_date,
            input.description,
        )
        .await?;
    if let Err(e) = notify_crossings(state, budget.family_id, &category, snapshots).await {
        tracing::error!("Failed to evaluate limits for transaction #{}: {}", updated.id, e);
    }

    Ok(TransactionDto::from_parts(updated, &category))
}

pub async fn delete_transaction(
    state: &AppState,
    transaction_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (existing, _) = state
        .transactions
        .find_by_id(transaction_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Transaction"))?;
    let (_, role) = budget_for_member(state, existing.budget_id, user_id).await?;
    if existing.created_by != user_id && !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the author or a family manager can delete this transaction",
        ));
    }
    state.transactions.delete(existing.id).await
}

/// CSV with one row per matching transaction, newest first
pub async fn export_transactions_csv(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    query: TransactionQuery,
) -> Result<String, DomainError> {
    let transactions = list_transactions(state, budget_id, user_id, query).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let internal = |e: csv::Error| DomainError::Internal(e.to_string());

    writer
        .write_record(["date", "category", "type", "amount", "description"])
        .map_err(internal)?;
    for tx in &transactions {
        writer
            .write_record([
                tx.transaction_date.as_str(),
                tx.category_name.as_str(),
                tx.transaction_type.as_str(),
                &format!("{:.2}", tx.amount),
                tx.description.as_deref().unwrap_or(""),
            ])
            .map_err(internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Internal(e.to_string()))
}
