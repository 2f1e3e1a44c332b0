//! Regular Payment Service - recurring transaction templates
//!
//! Templates are turned into transactions either on demand (`execute`) or by
//! the background runner calling `process_due_payments`.

use chrono::{Datelike, Duration, NaiveDate};

use super::access::{budget_for_member, category_in_budget};
use super::notification_service::notify_user;
use super::transaction_service::record_transaction;
use crate::domain::inputs::RegularPaymentInput;
use crate::domain::validation::{date, format_date};
use crate::domain::{DomainError, FamilyRole, Frequency, NewTransaction, NotificationType};
use crate::infrastructure::AppState;
use crate::models::{RegularPaymentDto, TransactionDto, budget, category, regular_payment};

/// Upper bound on occurrences generated for one template in one run
pub const MAX_CATCH_UP: usize = 366;

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(28, |d| d.day())
}

fn clamped(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Date of the occurrence following `current`
pub fn next_occurrence(current: NaiveDate, frequency: Frequency, day_of_month: Option<i32>) -> NaiveDate {
    let day = day_of_month.map_or(current.day(), |d| d.max(1) as u32);
    match frequency {
        Frequency::Daily => current + Duration::days(1),
        Frequency::Weekly => current + Duration::days(7),
        Frequency::Monthly => {
            let (year, month) = if current.month() == 12 {
                (current.year() + 1, 1)
            } else {
                (current.year(), current.month() + 1)
            };
            clamped(year, month, day)
        }
        Frequency::Yearly => clamped(current.year() + 1, current.month(), day),
    }
}

/// Outcome of one `process_due_payments` run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessReport {
    pub templates: usize,
    pub transactions: usize,
}

async fn payment_for_member(
    state: &AppState,
    payment_id: i32,
    user_id: i32,
) -> Result<(regular_payment::Model, budget::Model, FamilyRole), DomainError> {
    let payment = state
        .regular_payments
        .find_by_id(payment_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Regular payment"))?;
    let (budget, role) = budget_for_member(state, payment.budget_id, user_id).await?;
    Ok((payment, budget, role))
}

fn ensure_owner_or_manager(
    payment: &regular_payment::Model,
    user_id: i32,
    role: FamilyRole,
) -> Result<(), DomainError> {
    if payment.created_by != user_id && !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the payment's creator or a family manager can change it",
        ));
    }
    Ok(())
}

pub async fn create_regular_payment(
    state: &AppState,
    user_id: i32,
    input: RegularPaymentInput,
) -> Result<RegularPaymentDto, DomainError> {
    let input = input.validate()?;
    let (budget, _) = budget_for_member(state, input.budget_id, user_id).await?;
    category_in_budget(state, input.category_id, budget.id).await?;

    let payment = state.regular_payments.create(input, user_id).await?;
    tracing::info!(
        "Regular payment #{} '{}' ({}) created, first due {}",
        payment.id,
        payment.name,
        payment.frequency,
        payment.next_payment_date
    );
    Ok(RegularPaymentDto::from(payment))
}

pub async fn get_regular_payment(
    state: &AppState,
    payment_id: i32,
    user_id: i32,
) -> Result<RegularPaymentDto, DomainError> {
    let (payment, _, _) = payment_for_member(state, payment_id, user_id).await?;
    Ok(RegularPaymentDto::from(payment))
}

pub async fn list_regular_payments(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
) -> Result<Vec<RegularPaymentDto>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    let payments = state.regular_payments.list_by_budget(budget_id).await?;
    Ok(payments.into_iter().map(RegularPaymentDto::from).collect())
}

pub async fn update_regular_payment(
    state: &AppState,
    payment_id: i32,
    user_id: i32,
    input: RegularPaymentInput,
) -> Result<RegularPaymentDto, DomainError> {
    let input = input.validate()?;
    let (payment, budget, role) = payment_for_member(state, payment_id, user_id).await?;
    ensure_owner_or_manager(&payment, user_id, role)?;
    category_in_budget(state, input.category_id, budget.id).await?;

    let updated = state.regular_payments.update(payment.id, input).await?;
    Ok(RegularPaymentDto::from(updated))
}

pub async fn delete_regular_payment(
    state: &AppState,
    payment_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (payment, _, role) = payment_for_member(state, payment_id, user_id).await?;
    ensure_owner_or_manager(&payment, user_id, role)?;
    state.regular_payments.delete(payment.id).await
}

fn frequency_of(payment: &regular_payment::Model) -> Result<Frequency, DomainError> {
    payment.frequency.parse().map_err(|_| {
        DomainError::Internal(format!(
            "Regular payment #{} has an unreadable frequency '{}'",
            payment.id, payment.frequency
        ))
    })
}

fn end_of(payment: &regular_payment::Model) -> Result<Option<NaiveDate>, DomainError> {
    payment.end_date.as_deref().map(|e| date("end_date", e)).transpose()
}

/// Occurrences to record in one run and where the schedule lands afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUp {
    pub dates: Vec<NaiveDate>,
    pub next: NaiveDate,
    pub active: bool,
}

/// Every occurrence from `start` up to `today`, stopping past `end` or at the cap
pub fn catch_up(
    start: NaiveDate,
    today: NaiveDate,
    frequency: Frequency,
    day_of_month: Option<i32>,
    end: Option<NaiveDate>,
) -> CatchUp {
    let mut plan = CatchUp {
        dates: Vec::new(),
        next: start,
        active: true,
    };

    while plan.next <= today && plan.dates.len() < MAX_CATCH_UP {
        if end.is_some_and(|end| plan.next > end) {
            plan.active = false;
            break;
        }
        plan.dates.push(plan.next);
        plan.next = next_occurrence(plan.next, frequency, day_of_month);
        if end.is_some_and(|end| plan.next > end) {
            plan.active = false;
            break;
        }
    }
    plan
}

async fn load_category(
    state: &AppState,
    payment: &regular_payment::Model,
) -> Result<category::Model, DomainError> {
    category_in_budget(state, payment.category_id, payment.budget_id).await
}

fn occurrence(payment: &regular_payment::Model, on: NaiveDate, created_by: i32) -> NewTransaction {
    NewTransaction {
        budget_id: payment.budget_id,
        category_id: payment.category_id,
        amount: payment.amount,
        transaction_date: format_date(on),
        description: Some(payment.description.clone().unwrap_or_else(|| payment.name.clone())),
        created_by,
        regular_payment_id: Some(payment.id),
    }
}

/// Put a claimed schedule back to `date` after a failed write
async fn release_claim(
    state: &AppState,
    payment_id: i32,
    claimed: (&str, bool),
    date: String,
) {
    let (claimed_next, claimed_active) = claimed;
    match state
        .regular_payments
        .advance_if(payment_id, claimed_next, claimed_active, date.clone(), true)
        .await
    {
        Ok(true) => tracing::warn!("Regular payment #{} rescheduled back to {}", payment_id, date),
        Ok(false) => tracing::warn!(
            "Regular payment #{} changed meanwhile, occurrence {} not restored",
            payment_id,
            date
        ),
        Err(e) => tracing::error!("Failed to restore regular payment #{}: {}", payment_id, e),
    }
}

/// Record the upcoming occurrence now, dated today, and move the schedule on
pub async fn execute_regular_payment(
    state: &AppState,
    payment_id: i32,
    user_id: i32,
) -> Result<TransactionDto, DomainError> {
    let (payment, budget, _) = payment_for_member(state, payment_id, user_id).await?;
    if !payment.is_active {
        return Err(DomainError::conflict("Regular payment is not active"));
    }
    let category = load_category(state, &payment).await?;
    let frequency = frequency_of(&payment)?;
    let current = date("next_payment_date", &payment.next_payment_date)?;
    let next = next_occurrence(current, frequency, payment.day_of_month);
    let active = end_of(&payment)?.map_or(true, |end| next <= end);
    let next = format_date(next);

    // Claim the occurrence before recording it
    let claimed = state
        .regular_payments
        .advance_if(payment.id, &payment.next_payment_date, true, next.clone(), active)
        .await?;
    if !claimed {
        return Err(DomainError::conflict(
            "Regular payment was processed at the same time, reload and try again",
        ));
    }

    let today = chrono::Local::now().date_naive();
    let created = match record_transaction(
        state,
        budget.family_id,
        &category,
        occurrence(&payment, today, user_id),
    )
    .await
    {
        Ok(created) => created,
        Err(e) => {
            release_claim(state, payment.id, (next.as_str(), active), payment.next_payment_date.clone()).await;
            return Err(e);
        }
    };

    tracing::info!("Regular payment #{} executed manually by user #{}", payment.id, user_id);
    Ok(TransactionDto::from_parts(created, &category))
}

/// Generate every missed occurrence of one template up to `today`
async fn process_one(
    state: &AppState,
    payment: &regular_payment::Model,
    today: NaiveDate,
) -> Result<usize, DomainError> {
    let budget = state
        .budgets
        .find_by_id(payment.budget_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Budget"))?;
    let category = load_category(state, payment).await?;
    let start = date("next_payment_date", &payment.next_payment_date)?;
    let plan = catch_up(
        start,
        today,
        frequency_of(payment)?,
        payment.day_of_month,
        end_of(payment)?,
    );
    if plan.dates.len() == MAX_CATCH_UP {
        tracing::warn!(
            "Regular payment #{} hit the catch-up cap, resuming from {}",
            payment.id,
            plan.next
        );
    }

    // Whoever moves the schedule first owns these occurrences
    let next = format_date(plan.next);
    let claimed = state
        .regular_payments
        .advance_if(payment.id, &payment.next_payment_date, true, next.clone(), plan.active)
        .await?;
    if !claimed {
        tracing::debug!("Regular payment #{} already taken by another run", payment.id);
        return Ok(0);
    }

    let mut created = 0;
    for on in &plan.dates {
        let tx = occurrence(payment, *on, payment.created_by);
        if let Err(e) = record_transaction(state, budget.family_id, &category, tx).await {
            // Unrecorded occurrences go back to the schedule for the next run
            release_claim(state, payment.id, (next.as_str(), plan.active), format_date(*on)).await;
            return Err(e);
        }
        created += 1;
    }

    if created > 0 {
        let message = format!(
            "'{}' was recorded {} time(s) for {:.2} each",
            payment.name, created, payment.amount
        );
        if let Err(e) = notify_user(
            state,
            payment.created_by,
            Some(budget.family_id),
            NotificationType::PaymentProcessed,
            "Regular payment processed",
            message,
        )
        .await
        {
            tracing::error!("Failed to notify about regular payment #{}: {}", payment.id, e);
        }
    }
    Ok(created)
}

/// Turn every due template into transactions; failures are logged per template
pub async fn process_due_payments(
    state: &AppState,
    today: NaiveDate,
) -> Result<ProcessReport, DomainError> {
    let due = state.regular_payments.list_due(&format_date(today)).await?;
    let mut report = ProcessReport::default();

    for payment in &due {
        match process_one(state, payment, today).await {
            Ok(count) => {
                report.templates += 1;
                report.transactions += count;
            }
            Err(e) => tracing::error!("Regular payment #{} failed: {}", payment.id, e),
        }
    }

    if report.transactions > 0 {
        tracing::info!(
            "Processed {} regular payment(s), {} transaction(s) recorded",
            report.templates,
            report.transactions
        );
    }
    Ok(report)
}
