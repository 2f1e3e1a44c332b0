use chrono::{Datelike, NaiveDate};
use family_budget::domain::inputs::{
    BudgetInput, BudgetLimitInput, CategoryInput, ContributionInput, FamilyNameInput, GoalInput,
    JoinFamilyInput, RegisterInput, RegularPaymentInput, TransactionInput, UpdateMemberRoleInput,
};
use family_budget::domain::{
    BudgetRepository, DomainError, Frequency, GoalRepository, NotificationType,
    RegularPaymentRepository, TransactionRepository,
};
use family_budget::infrastructure::{AppState, Settings, db};
use family_budget::services::{
    TransactionQuery, analysis_service, auth_service, budget_limit_service, budget_service,
    category_service, family_service, goal_service, notification_service,
    regular_payment_service, transaction_service,
};
use sea_orm::ConnectionTrait;

// Helper to create a test state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::with_settings(db, Settings::default())
}

async fn create_user(state: &AppState, username: &str) -> i32 {
    auth_service::register(
        state,
        RegisterInput {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password123".to_string(),
            display_name: None,
        },
    )
    .await
    .expect("Failed to register user")
    .user
    .id
}

async fn create_family(state: &AppState, owner_id: i32) -> (i32, String) {
    let family = family_service::create_family(
        state,
        owner_id,
        FamilyNameInput {
            name: "The Smiths".to_string(),
        },
    )
    .await
    .expect("Failed to create family");
    (family.id, family.join_code)
}

async fn create_budget(state: &AppState, owner_id: i32, family_id: i32) -> i32 {
    budget_service::create_budget(
        state,
        owner_id,
        BudgetInput {
            family_id,
            name: "2024".to_string(),
            budget_type: "yearly".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: Some("2024-12-31".to_string()),
            description: None,
        },
    )
    .await
    .expect("Failed to create budget")
    .id
}

async fn create_category(state: &AppState, owner_id: i32, budget_id: i32, name: &str, kind: &str) -> i32 {
    category_service::create_category(
        state,
        owner_id,
        CategoryInput {
            budget_id,
            name: name.to_string(),
            category_type: kind.to_string(),
            color: None,
            icon: None,
        },
    )
    .await
    .expect("Failed to create category")
    .id
}

async fn add_transaction(
    state: &AppState,
    user_id: i32,
    budget_id: i32,
    category_id: i32,
    amount: f64,
    date: &str,
) -> i32 {
    transaction_service::create_transaction(
        state,
        user_id,
        TransactionInput {
            budget_id,
            category_id,
            amount,
            transaction_date: date.to_string(),
            description: None,
        },
    )
    .await
    .expect("Failed to create transaction")
    .id
}

async fn notification_types(state: &AppState, user_id: i32) -> Vec<String> {
    notification_service::list_notifications(state, user_id, false)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.notification_type)
        .collect()
}

#[tokio::test]
async fn test_join_family_by_code_notifies_existing_members() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let joiner = create_user(&state, "joiner").await;
    let (family_id, code) = create_family(&state, owner).await;

    let family = family_service::join_family(
        &state,
        joiner,
        JoinFamilyInput {
            join_code: format!(" {} ", code.to_lowercase()),
        },
    )
    .await
    .unwrap();
    assert_eq!(family.id, family_id);
    assert_eq!(family.role, "member");
    assert_eq!(family.members.as_ref().map(|m| m.len()), Some(2));

    assert_eq!(notification_types(&state, owner).await, vec!["member_joined"]);
    assert!(notification_types(&state, joiner).await.is_empty());

    // Second attempt conflicts
    let again = family_service::join_family(&state, joiner, JoinFamilyInput { join_code: code }).await;
    assert!(matches!(again, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_membership_rules() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let admin = create_user(&state, "admin").await;
    let other_admin = create_user(&state, "admin2").await;
    let (family_id, code) = create_family(&state, owner).await;
    for user in [admin, other_admin] {
        family_service::join_family(&state, user, JoinFamilyInput { join_code: code.clone() })
            .await
            .unwrap();
        family_service::update_member_role(
            &state,
            family_id,
            owner,
            user,
            UpdateMemberRoleInput {
                role: "admin".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let owner_leaves = family_service::leave_family(&state, family_id, owner).await;
    assert!(matches!(owner_leaves, Err(DomainError::Conflict(_))));

    let admin_kicks_admin = family_service::remove_member(&state, family_id, admin, other_admin).await;
    assert!(matches!(admin_kicks_admin, Err(DomainError::Forbidden(_))));

    let make_owner = family_service::update_member_role(
        &state,
        family_id,
        owner,
        admin,
        UpdateMemberRoleInput {
            role: "owner".to_string(),
        },
    )
    .await;
    assert!(matches!(make_owner, Err(DomainError::Validation(_))));

    family_service::remove_member(&state, family_id, owner, other_admin)
        .await
        .unwrap();
    family_service::leave_family(&state, family_id, admin).await.unwrap();
    let family = family_service::get_family(&state, family_id, owner).await.unwrap();
    assert_eq!(family.members.map(|m| m.len()), Some(1));

    // A fresh code replaces the old one
    let refreshed = family_service::regenerate_join_code(&state, family_id, owner)
        .await
        .unwrap();
    assert_ne!(refreshed.join_code, code);
    assert_eq!(refreshed.join_code.len(), 8);
}

#[tokio::test]
async fn test_summary_sums_income_and_expense_for_range() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let salary = create_category(&state, owner, budget_id, "Salary", "income").await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;

    add_transaction(&state, owner, budget_id, salary, 2500.0, "2024-03-01").await;
    add_transaction(&state, owner, budget_id, food, 120.40, "2024-03-05").await;
    add_transaction(&state, owner, budget_id, food, 79.60, "2024-03-20").await;
    // Outside the range
    add_transaction(&state, owner, budget_id, food, 999.0, "2024-04-02").await;

    let summary = analysis_service::summary(
        &state,
        budget_id,
        owner,
        TransactionQuery {
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-31".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(summary.total_income, 2500.0);
    assert_eq!(summary.total_expense, 200.0);
    assert_eq!(summary.balance, 2300.0);
    assert_eq!(summary.transaction_count, 3);

    let whole = analysis_service::summary(&state, budget_id, owner, TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(whole.total_expense, 1199.0);

    let months = analysis_service::monthly_trend(&state, budget_id, owner, 2024)
        .await
        .unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[2].balance, 2300.0);
    assert_eq!(months[3].expense, 999.0);

    let breakdown = analysis_service::category_breakdown(
        &state,
        budget_id,
        owner,
        TransactionQuery {
            transaction_type: Some("expense".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].count, 3);
    assert_eq!(breakdown[0].percent, 100.0);
}

#[tokio::test]
async fn test_transactions_filter_and_order() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let salary = create_category(&state, owner, budget_id, "Salary", "income").await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;

    add_transaction(&state, owner, budget_id, food, 10.0, "2024-01-10").await;
    add_transaction(&state, owner, budget_id, salary, 100.0, "2024-02-01").await;
    add_transaction(&state, owner, budget_id, food, 20.0, "2024-03-10").await;

    let all = transaction_service::list_transactions(&state, budget_id, owner, TransactionQuery::default())
        .await
        .unwrap();
    let dates: Vec<&str> = all.iter().map(|t| t.transaction_date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-10", "2024-02-01", "2024-01-10"]);

    let expenses = transaction_service::list_transactions(
        &state,
        budget_id,
        owner,
        TransactionQuery {
            transaction_type: Some("EXPENSE".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|t| t.transaction_type == "expense"));

    let csv = transaction_service::export_transactions_csv(
        &state,
        budget_id,
        owner,
        TransactionQuery {
            category_id: Some(salary),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,category,type,amount,description");
    assert_eq!(lines[1], "2024-02-01,Salary,income,100.00,");
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn test_only_author_or_manager_edits_a_transaction() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;
    let (family_id, code) = create_family(&state, owner).await;
    for user in [alice, bob] {
        family_service::join_family(&state, user, JoinFamilyInput { join_code: code.clone() })
            .await
            .unwrap();
    }
    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    let tx_id = add_transaction(&state, alice, budget_id, food, 30.0, "2024-05-01").await;

    let by_bob = transaction_service::delete_transaction(&state, tx_id, bob).await;
    assert!(matches!(by_bob, Err(DomainError::Forbidden(_))));

    let edited = transaction_service::update_transaction(
        &state,
        tx_id,
        alice,
        TransactionInput {
            budget_id: 0,
            category_id: food,
            amount: 35.5,
            transaction_date: "2024-05-02".to_string(),
            description: Some("  market ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.amount, 35.5);
    assert_eq!(edited.description.as_deref(), Some("market"));

    transaction_service::delete_transaction(&state, tx_id, owner)
        .await
        .unwrap();
    let gone = transaction_service::get_transaction(&state, tx_id, owner).await;
    assert!(matches!(gone, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_limit_usage_and_crossing_notifications() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let member = create_user(&state, "member").await;
    let (family_id, code) = create_family(&state, owner).await;
    family_service::join_family(&state, member, JoinFamilyInput { join_code: code })
        .await
        .unwrap();
    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    let salary = create_category(&state, owner, budget_id, "Salary", "income").await;

    let limit = budget_limit_service::create_limit(
        &state,
        owner,
        BudgetLimitInput {
            category_id: food,
            amount: 300.0,
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-30".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(limit.spent, 0.0);

    // Limits only apply to expense categories
    let on_income = budget_limit_service::create_limit(
        &state,
        owner,
        BudgetLimitInput {
            category_id: salary,
            amount: 300.0,
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-30".to_string(),
        },
    )
    .await;
    assert!(matches!(on_income, Err(DomainError::Validation(_))));

    add_transaction(&state, member, budget_id, food, 100.0, "2024-06-03").await;
    // Outside the limit window
    add_transaction(&state, member, budget_id, food, 500.0, "2024-07-01").await;
    assert!(notification_types(&state, owner).await.iter().all(|t| t == "member_joined"));

    let limit = budget_limit_service::get_limit(&state, limit.id, member).await.unwrap();
    assert_eq!(limit.spent, 100.0);
    assert_eq!(limit.remaining, 200.0);
    assert_eq!(limit.percent_used, 33.33);
    assert!(!limit.is_exceeded);

    add_transaction(&state, member, budget_id, food, 150.0, "2024-06-10").await;
    assert_eq!(
        notification_types(&state, member).await,
        vec![NotificationType::LimitWarning.as_str()]
    );

    // Still above the warning level, no new alert
    add_transaction(&state, member, budget_id, food, 10.0, "2024-06-11").await;
    add_transaction(&state, member, budget_id, food, 60.0, "2024-06-12").await;
    let types = notification_types(&state, member).await;
    assert_eq!(types, vec!["limit_exceeded", "limit_warning"]);

    let limits = budget_limit_service::list_limits(&state, budget_id, owner).await.unwrap();
    assert_eq!(limits.len(), 1);
    assert!(limits[0].is_exceeded);
    assert_eq!(limits[0].remaining, -20.0);
    assert_eq!(limits[0].percent_used, 106.67);

    let unread = notification_service::unread_count(&state, owner).await.unwrap();
    assert_eq!(unread, 3);
}

#[tokio::test]
async fn test_goal_contributions_complete_the_goal() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let kid = create_user(&state, "kid").await;
    let (family_id, code) = create_family(&state, owner).await;
    family_service::join_family(&state, kid, JoinFamilyInput { join_code: code })
        .await
        .unwrap();

    let goal = goal_service::create_goal(
        &state,
        owner,
        GoalInput {
            family_id,
            name: "New laptop".to_string(),
            description: None,
            target_amount: 1000.0,
            current_amount: 250.0,
            deadline: "2099-12-31".to_string(),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(goal.status, "active");
    assert_eq!(goal.percent_complete, 25.0);
    assert!(goal.days_remaining > 0);
    assert!(!goal.is_overdue);

    let goal = goal_service::contribute(&state, goal.id, kid, ContributionInput { amount: 500.0 })
        .await
        .unwrap();
    assert_eq!(goal.current_amount, 750.0);
    assert_eq!(goal.status, "active");

    let goal = goal_service::contribute(&state, goal.id, kid, ContributionInput { amount: 300.0 })
        .await
        .unwrap();
    assert_eq!(goal.status, "completed");
    assert_eq!(goal.percent_complete, 100.0);
    assert_eq!(notification_types(&state, kid).await, vec!["goal_completed"]);

    let closed = goal_service::contribute(&state, goal.id, kid, ContributionInput { amount: 1.0 }).await;
    assert!(matches!(closed, Err(DomainError::Conflict(_))));

    let active = goal_service::list_goals(&state, family_id, owner, Some("active"))
        .await
        .unwrap();
    assert!(active.is_empty());
    let completed = goal_service::list_goals(&state, family_id, owner, Some("completed"))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
}

#[tokio::test]
async fn test_overdue_goal() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;

    let goal = goal_service::create_goal(
        &state,
        owner,
        GoalInput {
            family_id,
            name: "Old plan".to_string(),
            description: None,
            target_amount: 100.0,
            current_amount: 0.0,
            deadline: "2020-01-01".to_string(),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(goal.days_remaining, 0);
    assert!(goal.is_overdue);
}

#[tokio::test]
async fn test_regular_payments_catch_up_and_stop_at_end_date() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let rent = create_category(&state, owner, budget_id, "Rent", "expense").await;

    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        RegularPaymentInput {
            budget_id,
            category_id: rent,
            name: "Rent".to_string(),
            amount: 800.0,
            frequency: "monthly".to_string(),
            day_of_month: Some(31),
            next_payment_date: "2024-01-31".to_string(),
            end_date: Some("2024-04-30".to_string()),
            is_active: true,
            description: None,
        },
    )
    .await
    .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let report = regular_payment_service::process_due_payments(&state, today)
        .await
        .unwrap();
    assert_eq!(report.templates, 1);
    assert_eq!(report.transactions, 2);

    let payment = regular_payment_service::get_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    assert_eq!(payment.next_payment_date, "2024-03-31");
    assert!(payment.is_active);

    let dates: Vec<String> = transaction_service::list_transactions(&state, budget_id, owner, TransactionQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.transaction_date)
        .collect();
    assert_eq!(dates, vec!["2024-02-29", "2024-01-31"]);
    assert_eq!(notification_types(&state, owner).await, vec!["payment_processed"]);

    // Nothing due twice for the same day
    let again = regular_payment_service::process_due_payments(&state, today)
        .await
        .unwrap();
    assert_eq!(again.transactions, 0);

    // March and April run, then the template retires
    let later = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let report = regular_payment_service::process_due_payments(&state, later)
        .await
        .unwrap();
    assert_eq!(report.transactions, 2);
    let payment = regular_payment_service::get_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    assert!(!payment.is_active);

    let rows = state
        .transactions
        .list(family_budget::domain::TransactionFilter {
            budget_id,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|(tx, _)| tx.regular_payment_id == Some(payment.id)));
}

#[tokio::test]
async fn test_execute_regular_payment_records_today() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let gym = create_category(&state, owner, budget_id, "Sport", "expense").await;

    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        RegularPaymentInput {
            budget_id,
            category_id: gym,
            name: "Gym".to_string(),
            amount: 25.0,
            frequency: "weekly".to_string(),
            day_of_month: Some(12),
            next_payment_date: "2099-01-05".to_string(),
            end_date: None,
            is_active: true,
            description: Some("Membership".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(payment.day_of_month, None);

    let tx = regular_payment_service::execute_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(tx.transaction_date, today);
    assert_eq!(tx.description.as_deref(), Some("Membership"));
    assert_eq!(tx.regular_payment_id, Some(payment.id));

    let payment = regular_payment_service::get_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    assert_eq!(payment.next_payment_date, "2099-01-12");
}

#[tokio::test]
async fn test_notifications_are_private() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let joiner = create_user(&state, "joiner").await;
    let (_, code) = create_family(&state, owner).await;
    family_service::join_family(&state, joiner, JoinFamilyInput { join_code: code })
        .await
        .unwrap();

    let inbox = notification_service::list_notifications(&state, owner, true)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    let id = inbox[0].id;

    let foreign = notification_service::mark_read(&state, id, joiner).await;
    assert!(matches!(foreign, Err(DomainError::NotFound(_))));
    let foreign = notification_service::delete_notification(&state, id, joiner).await;
    assert!(matches!(foreign, Err(DomainError::NotFound(_))));

    let read = notification_service::mark_read(&state, id, owner).await.unwrap();
    assert!(read.is_read);
    assert_eq!(notification_service::unread_count(&state, owner).await.unwrap(), 0);
    assert_eq!(notification_service::mark_all_read(&state, owner).await.unwrap(), 0);

    notification_service::delete_notification(&state, id, owner)
        .await
        .unwrap();
    assert!(notification_types(&state, owner).await.is_empty());
}

#[tokio::test]
async fn test_deleting_a_budget_cascades() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    let tx_id = add_transaction(&state, owner, budget_id, food, 12.0, "2024-02-02").await;

    budget_service::delete_budget(&state, budget_id, owner).await.unwrap();

    assert!(state.transactions.find_by_id(tx_id).await.unwrap().is_none());
    let missing = category_service::get_category(&state, food, owner).await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
}

fn goal_input(family_id: i32, target: f64, current: f64) -> GoalInput {
    GoalInput {
        family_id,
        name: "Holiday".to_string(),
        description: None,
        target_amount: target,
        current_amount: current,
        deadline: "2099-06-30".to_string(),
        status: None,
    }
}

fn limit_input(category_id: i32, amount: f64) -> BudgetLimitInput {
    BudgetLimitInput {
        category_id,
        amount,
        start_date: "2024-06-01".to_string(),
        end_date: "2024-06-30".to_string(),
    }
}

fn category_input(budget_id: i32, name: &str, kind: &str) -> CategoryInput {
    CategoryInput {
        budget_id,
        name: name.to_string(),
        category_type: kind.to_string(),
        color: None,
        icon: None,
    }
}

fn payment_input(budget_id: i32, category_id: i32, next: &str, frequency: &str) -> RegularPaymentInput {
    RegularPaymentInput {
        budget_id,
        category_id,
        name: "Internet".to_string(),
        amount: 40.0,
        frequency: frequency.to_string(),
        day_of_month: None,
        next_payment_date: next.to_string(),
        end_date: None,
        is_active: true,
        description: None,
    }
}

async fn transaction_count(state: &AppState, budget_id: i32) -> usize {
    state
        .transactions
        .list(family_budget::domain::TransactionFilter {
            budget_id,
            ..Default::default()
        })
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn test_category_names_stay_unique_under_concurrent_creates() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;

    let (a, b) = tokio::join!(
        category_service::create_category(&state, owner, category_input(budget_id, "Food", "expense")),
        category_service::create_category(&state, owner, category_input(budget_id, "Food", "expense")),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert!(matches!(a.err().or(b.err()), Some(DomainError::Conflict(_))));

    // Names compare case-insensitively
    let shouting = category_service::create_category(&state, owner, category_input(budget_id, "FOOD", "expense")).await;
    assert!(matches!(shouting, Err(DomainError::Conflict(_))));

    let categories = category_service::list_categories(&state, budget_id, owner, None)
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);

    // Renaming onto an existing name conflicts too
    let rent = create_category(&state, owner, budget_id, "Rent", "expense").await;
    let renamed = category_service::update_category(&state, rent, owner, category_input(budget_id, "food", "expense")).await;
    assert!(matches!(renamed, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_concurrent_signups_and_joins_conflict() {
    let state = setup_test_state().await;
    let signup = || RegisterInput {
        username: "anna".to_string(),
        email: "anna@example.com".to_string(),
        password: "password123".to_string(),
        display_name: None,
    };

    let (a, b) = tokio::join!(
        auth_service::register(&state, signup()),
        auth_service::register(&state, signup()),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert!(matches!(a.err().or(b.err()), Some(DomainError::Conflict(_))));

    let owner = create_user(&state, "owner").await;
    let joiner = create_user(&state, "joiner").await;
    let (family_id, code) = create_family(&state, owner).await;
    let (a, b) = tokio::join!(
        family_service::join_family(&state, joiner, JoinFamilyInput { join_code: code.clone() }),
        family_service::join_family(&state, joiner, JoinFamilyInput { join_code: code.clone() }),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert!(matches!(a.err().or(b.err()), Some(DomainError::Conflict(_))));

    let family = family_service::get_family(&state, family_id, owner).await.unwrap();
    assert_eq!(family.members.map(|m| m.len()), Some(2));
}

#[tokio::test]
async fn test_concurrent_runs_record_each_occurrence_once() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let internet = create_category(&state, owner, budget_id, "Internet", "expense").await;

    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        payment_input(budget_id, internet, "2024-01-15", "monthly"),
    )
    .await
    .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let (a, b) = tokio::join!(
        regular_payment_service::process_due_payments(&state, today),
        regular_payment_service::process_due_payments(&state, today),
    );
    assert_eq!(a.unwrap().transactions + b.unwrap().transactions, 3);
    assert_eq!(transaction_count(&state, budget_id).await, 3);

    let payment = regular_payment_service::get_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    assert_eq!(payment.next_payment_date, "2024-04-15");
}

#[tokio::test]
async fn test_manual_execute_and_runner_do_not_double_pay() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let internet = create_category(&state, owner, budget_id, "Internet", "expense").await;

    let today = chrono::Local::now().date_naive();
    let due = today.format("%Y-%m-%d").to_string();
    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        payment_input(budget_id, internet, &due, "monthly"),
    )
    .await
    .unwrap();

    let (run, manual) = tokio::join!(
        regular_payment_service::process_due_payments(&state, today),
        regular_payment_service::execute_regular_payment(&state, payment.id, owner),
    );
    let recorded = run.unwrap().transactions + manual.is_ok() as usize;
    assert_eq!(recorded, 1);
    if let Err(e) = manual {
        assert!(matches!(e, DomainError::Conflict(_)));
    }
    assert_eq!(transaction_count(&state, budget_id).await, 1);

    let expected = regular_payment_service::next_occurrence(today, Frequency::Monthly, Some(today.day() as i32));
    let payment = regular_payment_service::get_regular_payment(&state, payment.id, owner)
        .await
        .unwrap();
    assert_eq!(payment.next_payment_date, expected.format("%Y-%m-%d").to_string());
}

#[tokio::test]
async fn test_unreadable_frequency_skips_the_template() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let internet = create_category(&state, owner, budget_id, "Internet", "expense").await;

    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        payment_input(budget_id, internet, "2024-01-15", "monthly"),
    )
    .await
    .unwrap();
    state
        .db()
        .execute_unprepared(&format!(
            "UPDATE regular_payments SET frequency = 'fortnightly' WHERE id = {}",
            payment.id
        ))
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let report = regular_payment_service::process_due_payments(&state, today)
        .await
        .unwrap();
    assert_eq!(report.templates, 0);
    assert_eq!(transaction_count(&state, budget_id).await, 0);

    let stored = state.regular_payments.find_by_id(payment.id).await.unwrap().unwrap();
    assert_eq!(stored.next_payment_date, "2024-01-15");
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_update_regular_payment_rules() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let member = create_user(&state, "member").await;
    let (family_id, code) = create_family(&state, owner).await;
    family_service::join_family(&state, member, JoinFamilyInput { join_code: code })
        .await
        .unwrap();
    let budget_id = create_budget(&state, owner, family_id).await;
    let internet = create_category(&state, owner, budget_id, "Internet", "expense").await;

    let payment = regular_payment_service::create_regular_payment(
        &state,
        owner,
        payment_input(budget_id, internet, "2024-05-03", "monthly"),
    )
    .await
    .unwrap();
    assert_eq!(payment.day_of_month, Some(3));

    let by_member = regular_payment_service::update_regular_payment(
        &state,
        payment.id,
        member,
        payment_input(budget_id, internet, "2024-05-03", "weekly"),
    )
    .await;
    assert!(matches!(by_member, Err(DomainError::Forbidden(_))));

    let mut input = payment_input(budget_id, internet, "2024-05-10", "weekly");
    input.amount = 45.5;
    let updated = regular_payment_service::update_regular_payment(&state, payment.id, owner, input)
        .await
        .unwrap();
    assert_eq!(updated.frequency, "weekly");
    assert_eq!(updated.amount, 45.5);
    assert_eq!(updated.next_payment_date, "2024-05-10");
    assert_eq!(updated.day_of_month, None);
}

#[tokio::test]
async fn test_goal_reaching_target_on_create_or_update_completes() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;

    let funded = goal_service::create_goal(&state, owner, goal_input(family_id, 500.0, 500.0))
        .await
        .unwrap();
    assert_eq!(funded.status, "completed");
    assert_eq!(notification_types(&state, owner).await, vec!["goal_completed"]);

    let goal = goal_service::create_goal(&state, owner, goal_input(family_id, 800.0, 100.0))
        .await
        .unwrap();
    assert_eq!(goal.status, "active");

    let goal = goal_service::update_goal(&state, goal.id, owner, goal_input(family_id, 800.0, 800.0))
        .await
        .unwrap();
    assert_eq!(goal.status, "completed");
    assert_eq!(goal.percent_complete, 100.0);
    assert_eq!(
        notification_types(&state, owner).await,
        vec!["goal_completed", "goal_completed"]
    );
}

#[tokio::test]
async fn test_category_with_limits_cannot_become_income() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let bonus = create_category(&state, owner, budget_id, "Bonus", "expense").await;

    let limit = budget_limit_service::create_limit(&state, owner, limit_input(bonus, 100.0))
        .await
        .unwrap();
    let switched = category_service::update_category(&state, bonus, owner, category_input(budget_id, "Bonus", "income")).await;
    assert!(matches!(switched, Err(DomainError::Conflict(_))));

    budget_limit_service::delete_limit(&state, limit.id, owner).await.unwrap();
    let switched = category_service::update_category(&state, bonus, owner, category_input(budget_id, "Bonus", "income"))
        .await
        .unwrap();
    assert_eq!(switched.category_type, "income");
}

#[tokio::test]
async fn test_editing_a_transaction_reevaluates_limits() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let (family_id, _) = create_family(&state, owner).await;
    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    budget_limit_service::create_limit(&state, owner, limit_input(food, 100.0))
        .await
        .unwrap();

    let tx = add_transaction(&state, owner, budget_id, food, 10.0, "2024-06-05").await;
    assert!(notification_types(&state, owner).await.is_empty());

    transaction_service::update_transaction(
        &state,
        tx,
        owner,
        TransactionInput {
            budget_id,
            category_id: food,
            amount: 150.0,
            transaction_date: "2024-06-05".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(notification_types(&state, owner).await, vec!["limit_exceeded"]);
}

#[tokio::test]
async fn test_update_and_delete_limits() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let member = create_user(&state, "member").await;
    let (family_id, code) = create_family(&state, owner).await;
    family_service::join_family(&state, member, JoinFamilyInput { join_code: code })
        .await
        .unwrap();
    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    let fuel = create_category(&state, owner, budget_id, "Fuel", "expense").await;
    add_transaction(&state, owner, budget_id, food, 60.0, "2024-06-05").await;

    let limit = budget_limit_service::create_limit(&state, owner, limit_input(food, 100.0))
        .await
        .unwrap();
    assert_eq!(limit.percent_used, 60.0);

    let by_member = budget_limit_service::update_limit(&state, limit.id, member, limit_input(food, 50.0)).await;
    assert!(matches!(by_member, Err(DomainError::Forbidden(_))));

    // The category stays fixed even if the payload names another one
    let updated = budget_limit_service::update_limit(&state, limit.id, owner, limit_input(fuel, 200.0))
        .await
        .unwrap();
    assert_eq!(updated.category_id, food);
    assert_eq!(updated.amount, 200.0);
    assert_eq!(updated.remaining, 140.0);
    assert_eq!(updated.percent_used, 30.0);

    let by_member = budget_limit_service::delete_limit(&state, limit.id, member).await;
    assert!(matches!(by_member, Err(DomainError::Forbidden(_))));
    budget_limit_service::delete_limit(&state, limit.id, owner).await.unwrap();
    let gone = budget_limit_service::get_limit(&state, limit.id, owner).await;
    assert!(matches!(gone, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_family_rename_and_delete_permissions() {
    let state = setup_test_state().await;
    let owner = create_user(&state, "owner").await;
    let admin = create_user(&state, "admin").await;
    let member = create_user(&state, "member").await;
    let (family_id, code) = create_family(&state, owner).await;
    for user in [admin, member] {
        family_service::join_family(&state, user, JoinFamilyInput { join_code: code.clone() })
            .await
            .unwrap();
    }
    family_service::update_member_role(
        &state,
        family_id,
        owner,
        admin,
        UpdateMemberRoleInput {
            role: "admin".to_string(),
        },
    )
    .await
    .unwrap();

    let rename = |name: &str| FamilyNameInput {
        name: name.to_string(),
    };
    let by_member = family_service::update_family(&state, family_id, member, rename("Mine")).await;
    assert!(matches!(by_member, Err(DomainError::Forbidden(_))));
    let renamed = family_service::update_family(&state, family_id, admin, rename("The Joneses"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "The Joneses");

    let budget_id = create_budget(&state, owner, family_id).await;
    let food = create_category(&state, owner, budget_id, "Food", "expense").await;
    let tx_id = add_transaction(&state, member, budget_id, food, 20.0, "2024-03-03").await;
    let goal = goal_service::create_goal(&state, member, goal_input(family_id, 300.0, 0.0))
        .await
        .unwrap();

    for user in [admin, member] {
        let denied = family_service::delete_family(&state, family_id, user).await;
        assert!(matches!(denied, Err(DomainError::Forbidden(_))));
    }
    family_service::delete_family(&state, family_id, owner).await.unwrap();

    let missing = family_service::get_family(&state, family_id, owner).await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
    assert!(state.budgets.find_by_id(budget_id).await.unwrap().is_none());
    assert!(state.transactions.find_by_id(tx_id).await.unwrap().is_none());
    assert!(state.goals.find_by_id(goal.id).await.unwrap().is_none());
    assert!(family_service::list_families(&state, member).await.unwrap().is_empty());
}
