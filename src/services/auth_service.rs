//! Auth Service - registration, login and the current user

use serde::Serialize;

use crate::domain::inputs::{LoginInput, RegisterInput};
use crate::domain::{DomainError, NewUser};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{create_jwt, hash_password, verify_password};
use crate::models::{UserDto, user};

/// Token plus the profile it was issued for
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserDto,
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthorized("Invalid credentials".to_string())
}

fn issue_session(state: &AppState, user: user::Model) -> Result<AuthSession, DomainError> {
    let token = create_jwt(user.id, &user.username, state.settings.jwt_ttl_hours)
        .map_err(DomainError::Internal)?;
    Ok(AuthSession {
        token,
        user: UserDto::from(user),
    })
}

pub async fn register(state: &AppState, input: RegisterInput) -> Result<AuthSession, DomainError> {
    let input = input.validate()?;

    if state.users.username_taken(&input.username).await? {
        return Err(DomainError::conflict("Username is already taken"));
    }
    if state.users.email_taken(&input.email).await? {
        return Err(DomainError::conflict("Email is already registered"));
    }

    let password_hash = hash_password(&input.password).map_err(DomainError::Internal)?;
    let user = state
        .users
        .create(NewUser {
            username: input.username,
            email: input.email,
            password_hash,
            display_name: input.display_name,
        })
        .await?;

    tracing::info!("Registered user {} (#{})", user.username, user.id);
    issue_session(state, user)
}

pub async fn login(state: &AppState, input: LoginInput) -> Result<AuthSession, DomainError> {
    let input = input.validate()?;
    tracing::info!("Login attempt for: {}", input.login);

    let Some(user) = state.users.find_by_login(&input.login).await? else {
        tracing::warn!("User not found: {}", input.login);
        return Err(invalid_credentials());
    };

    match verify_password(&input.password, &user.password_hash) {
        Ok(true) => {
            tracing::info!("Password verified for user: {}", user.username);
            issue_session(state, user)
        }
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            Err(invalid_credentials())
        }
    }
}

/// Profile behind a token; a deleted account invalidates the token
pub async fn current_user(state: &AppState, user_id: i32) -> Result<UserDto, DomainError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .map(UserDto::from)
        .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".to_string()))
}
