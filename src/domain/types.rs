//! Closed vocabularies stored as lower-case text columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(DomainError::Validation(format!(
                        "{}: must be one of {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

text_enum!(
    /// Period type of a budget
    BudgetType, "budget_type" {
        Monthly => "monthly",
        Yearly => "yearly",
        Special => "special",
    }
);

text_enum!(
    /// Direction of money for a category and its transactions
    CategoryType, "category_type" {
        Income => "income",
        Expense => "expense",
    }
);

text_enum!(
    /// Role of a user inside a family
    FamilyRole, "role" {
        Owner => "owner",
        Admin => "admin",
        Member => "member",
    }
);

text_enum!(
    GoalStatus, "status" {
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

text_enum!(
    /// How often a regular payment repeats
    Frequency, "frequency" {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
);

text_enum!(
    NotificationType, "notification_type" {
        LimitWarning => "limit_warning",
        LimitExceeded => "limit_exceeded",
        GoalCompleted => "goal_completed",
        PaymentProcessed => "payment_processed",
        MemberJoined => "member_joined",
        General => "general",
    }
);

impl FamilyRole {
    /// Owners and admins manage budgets, categories, limits and members
    pub fn can_manage(&self) -> bool {
        matches!(self, FamilyRole::Owner | FamilyRole::Admin)
    }
}
