//! Request payloads and their field rules
//!
//! `validate` consumes the payload and hands back a normalized copy
//! (trimmed text, lower-case enum values) that repositories store as is.

use serde::Deserialize;

use super::DomainError;
use super::types::{BudgetType, CategoryType, FamilyRole, Frequency, GoalStatus};
use super::validation::{
    clean_optional, date, date_order, email, length, max_length, non_negative_amount,
    positive_amount, range_i32, required,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl RegisterInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("username", &self.username)?;
        length("username", &self.username, 3, 50)?;
        if self.username.trim().contains(char::is_whitespace) {
            return Err(DomainError::validation("username: must not contain spaces"));
        }
        required("email", &self.email)?;
        length("email", &self.email, 3, 100)?;
        email("email", &self.email)?;
        required("password", &self.password)?;
        if self.password.chars().count() < 6 || self.password.chars().count() > 100 {
            return Err(DomainError::validation(
                "password: length must be between 6 and 100 characters",
            ));
        }
        let display_name = clean_optional(self.display_name);
        max_length("display_name", display_name.as_deref(), 100)?;

        Ok(Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
            display_name,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Username or email
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("login", &self.login)?;
        required("password", &self.password)?;
        Ok(Self {
            login: self.login.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyNameInput {
    pub name: String,
}

impl FamilyNameInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("name", &self.name)?;
        length("name", &self.name, 1, 100)?;
        Ok(Self {
            name: self.name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinFamilyInput {
    pub join_code: String,
}

impl JoinFamilyInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("join_code", &self.join_code)?;
        length("join_code", &self.join_code, 8, 8)?;
        Ok(Self {
            join_code: self.join_code.trim().to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRoleInput {
    pub role: String,
}

impl UpdateMemberRoleInput {
    pub fn role(&self) -> Result<FamilyRole, DomainError> {
        self.role.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetInput {
    /// Only read on create
    #[serde(default)]
    pub family_id: i32,
    pub name: String,
    pub budget_type: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl BudgetInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("name", &self.name)?;
        length("name", &self.name, 1, 100)?;
        let budget_type: BudgetType = self.budget_type.parse()?;
        let start = date("start_date", &self.start_date)?;
        let end_date = clean_optional(self.end_date);
        if let Some(end) = &end_date {
            date_order(start, date("end_date", end)?, "end_date")?;
        }
        let description = clean_optional(self.description);
        max_length("description", description.as_deref(), 500)?;

        Ok(Self {
            family_id: self.family_id,
            name: self.name.trim().to_string(),
            budget_type: budget_type.as_str().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: end_date.map(|d| d.trim().to_string()),
            description,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub budget_id: i32,
    pub name: String,
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("name", &self.name)?;
        length("name", &self.name, 1, 50)?;
        let category_type: CategoryType = self.category_type.parse()?;
        let color = clean_optional(self.color);
        max_length("color", color.as_deref(), 20)?;
        let icon = clean_optional(self.icon);
        max_length("icon", icon.as_deref(), 50)?;

        Ok(Self {
            budget_id: self.budget_id,
            name: self.name.trim().to_string(),
            category_type: category_type.as_str().to_string(),
            color,
            icon,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub budget_id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub transaction_date: String,
    pub description: Option<String>,
}

impl TransactionInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        positive_amount("amount", self.amount)?;
        date("transaction_date", &self.transaction_date)?;
        let description = clean_optional(self.description);
        max_length("description", description.as_deref(), 255)?;

        Ok(Self {
            budget_id: self.budget_id,
            category_id: self.category_id,
            amount: self.amount,
            transaction_date: self.transaction_date.trim().to_string(),
            description,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetLimitInput {
    #[serde(default)]
    pub category_id: i32,
    pub amount: f64,
    pub start_date: String,
    pub end_date: String,
}

impl BudgetLimitInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        positive_amount("amount", self.amount)?;
        let start = date("start_date", &self.start_date)?;
        let end = date("end_date", &self.end_date)?;
        date_order(start, end, "end_date")?;

        Ok(Self {
            category_id: self.category_id,
            amount: self.amount,
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalInput {
    #[serde(default)]
    pub family_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: String,
    /// Ignored on create, goals start active
    pub status: Option<String>,
}

impl GoalInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("name", &self.name)?;
        length("name", &self.name, 1, 100)?;
        let description = clean_optional(self.description);
        max_length("description", description.as_deref(), 500)?;
        positive_amount("target_amount", self.target_amount)?;
        non_negative_amount("current_amount", self.current_amount)?;
        date("deadline", &self.deadline)?;
        let status = match clean_optional(self.status) {
            Some(s) => Some(s.parse::<GoalStatus>()?.as_str().to_string()),
            None => None,
        };

        Ok(Self {
            family_id: self.family_id,
            name: self.name.trim().to_string(),
            description,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline.trim().to_string(),
            status,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionInput {
    pub amount: f64,
}

impl ContributionInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        positive_amount("amount", self.amount)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegularPaymentInput {
    #[serde(default)]
    pub budget_id: i32,
    pub category_id: i32,
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub day_of_month: Option<i32>,
    /// First (or, on update, next) due date
    pub next_payment_date: String,
    pub end_date: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl RegularPaymentInput {
    pub fn validate(self) -> Result<Self, DomainError> {
        required("name", &self.name)?;
        length("name", &self.name, 1, 100)?;
        positive_amount("amount", self.amount)?;
        let frequency: Frequency = self.frequency.parse()?;
        let next = date("next_payment_date", &self.next_payment_date)?;
        let end_date = clean_optional(self.end_date);
        if let Some(end) = &end_date {
            date_order(next, date("end_date", end)?, "end_date")?;
        }
        let day_of_month = match frequency {
            Frequency::Monthly | Frequency::Yearly => {
                let day = self
                    .day_of_month
                    .unwrap_or_else(|| chrono::Datelike::day(&next) as i32);
                range_i32("day_of_month", day, 1, 31)?;
                Some(day)
            }
            Frequency::Daily | Frequency::Weekly => None,
        };
        let description = clean_optional(self.description);
        max_length("description", description.as_deref(), 255)?;

        Ok(Self {
            budget_id: self.budget_id,
            category_id: self.category_id,
            name: self.name.trim().to_string(),
            amount: self.amount,
            frequency: frequency.as_str().to_string(),
            day_of_month,
            next_payment_date: self.next_payment_date.trim().to_string(),
            end_date,
            is_active: self.is_active,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(amount: f64) -> TransactionInput {
        TransactionInput {
            budget_id: 1,
            category_id: 1,
            amount,
            transaction_date: "2024-05-01".into(),
            description: None,
        }
    }

    #[test]
    fn transaction_amount_must_be_positive() {
        assert!(transaction(0.0).validate().is_err());
        assert!(transaction(-12.5).validate().is_err());
        assert!(transaction(12.5).validate().is_ok());
    }

    #[test]
    fn register_normalizes_email() {
        let input = RegisterInput {
            username: " anna ".into(),
            email: "Anna@Example.COM".into(),
            password: "hunter22".into(),
            display_name: Some("  ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.username, "anna");
        assert_eq!(input.email, "anna@example.com");
        assert_eq!(input.display_name, None);
    }

    #[test]
    fn register_rejects_short_password() {
        let err = RegisterInput {
            username: "anna".into(),
            email: "anna@example.com".into(),
            password: "123".into(),
            display_name: None,
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn budget_type_is_lowercased() {
        let input = BudgetInput {
            family_id: 1,
            name: "Household".into(),
            budget_type: "Monthly".into(),
            start_date: "2024-01-01".into(),
            end_date: Some("2023-12-31".into()),
            description: None,
        };
        assert!(input.clone().validate().is_err());

        let ok = BudgetInput {
            end_date: None,
            ..input
        }
        .validate()
        .unwrap();
        assert_eq!(ok.budget_type, "monthly");
    }

    #[test]
    fn limit_range_must_be_ordered() {
        let input = BudgetLimitInput {
            category_id: 1,
            amount: 300.0,
            start_date: "2024-06-30".into(),
            end_date: "2024-06-01".into(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn monthly_payment_defaults_day_from_first_date() {
        let input = RegularPaymentInput {
            budget_id: 1,
            category_id: 2,
            name: "Rent".into(),
            amount: 950.0,
            frequency: "Monthly".into(),
            day_of_month: None,
            next_payment_date: "2024-03-15".into(),
            end_date: None,
            is_active: true,
            description: None,
        }
        .validate()
        .unwrap();
        assert_eq!(input.day_of_month, Some(15));
        assert_eq!(input.frequency, "monthly");
    }

    #[test]
    fn weekly_payment_drops_day_of_month() {
        let input = RegularPaymentInput {
            budget_id: 1,
            category_id: 2,
            name: "Allowance".into(),
            amount: 10.0,
            frequency: "weekly".into(),
            day_of_month: Some(40),
            next_payment_date: "2024-03-15".into(),
            end_date: None,
            is_active: true,
            description: None,
        }
        .validate()
        .unwrap();
        assert_eq!(input.day_of_month, None);
    }

    #[test]
    fn join_code_is_uppercased() {
        let input = JoinFamilyInput {
            join_code: "abcd2345".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(input.join_code, "ABCD2345");
    }

    #[test]
    fn goal_status_is_checked() {
        let input = GoalInput {
            family_id: 1,
            name: "Holiday".into(),
            description: None,
            target_amount: 1500.0,
            current_amount: 0.0,
            deadline: "2025-07-01".into(),
            status: Some("paused".into()),
        };
        assert!(input.validate().is_err());
    }
}
