//! Family Service - families, join codes and member roles

use rand::Rng;

use super::access::{require_manager, require_member};
use super::notification_service::notify_family;
use crate::domain::inputs::{FamilyNameInput, JoinFamilyInput, UpdateMemberRoleInput};
use crate::domain::{DomainError, FamilyRole, NotificationType};
use crate::infrastructure::AppState;
use crate::models::FamilyDto;

/// No 0/O or 1/I so codes survive being read aloud
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const JOIN_CODE_LEN: usize = 8;
const JOIN_CODE_ATTEMPTS: usize = 10;

pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

async fn unique_join_code(state: &AppState) -> Result<String, DomainError> {
    for _ in 0..JOIN_CODE_ATTEMPTS {
        let code = generate_join_code();
        if !state.families.join_code_exists(&code).await? {
            return Ok(code);
        }
    }
    Err(DomainError::Internal(
        "Could not generate a unique join code".to_string(),
    ))
}

/// Family view with the member list, for a caller already known to be a member
async fn detailed(
    state: &AppState,
    family_id: i32,
    role: FamilyRole,
) -> Result<FamilyDto, DomainError> {
    let family = state
        .families
        .find_by_id(family_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Family"))?;
    let mut dto = FamilyDto::from_model(family, role.as_str());
    dto.members = Some(state.families.list_members(family_id).await?);
    Ok(dto)
}

pub async fn create_family(
    state: &AppState,
    user_id: i32,
    input: FamilyNameInput,
) -> Result<FamilyDto, DomainError> {
    let input = input.validate()?;
    let code = unique_join_code(state).await?;
    let family = state.families.create(input.name, code, user_id).await?;

    tracing::info!("User #{} created family #{} '{}'", user_id, family.id, family.name);
    detailed(state, family.id, FamilyRole::Owner).await
}

pub async fn list_families(state: &AppState, user_id: i32) -> Result<Vec<FamilyDto>, DomainError> {
    let rows = state.families.find_for_user(user_id).await?;
    Ok(rows
        .into_iter()
        .map(|(family, role)| FamilyDto::from_model(family, &role))
        .collect())
}

pub async fn get_family(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<FamilyDto, DomainError> {
    if state.families.find_by_id(family_id).await?.is_none() {
        return Err(DomainError::not_found("Family"));
    }
    let role = require_member(state, family_id, user_id).await?;
    detailed(state, family_id, role).await
}

pub async fn update_family(
    state: &AppState,
    family_id: i32,
    user_id: i32,
    input: FamilyNameInput,
) -> Result<FamilyDto, DomainError> {
    let input = input.validate()?;
    let role = require_manager(state, family_id, user_id).await?;
    state.families.rename(family_id, input.name).await?;
    detailed(state, family_id, role).await
}

pub async fn delete_family(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let role = require_member(state, family_id, user_id).await?;
    if role != FamilyRole::Owner {
        return Err(DomainError::forbidden("Only the owner can delete a family"));
    }
    state.families.delete(family_id).await?;
    tracing::info!("Family #{} deleted by user #{}", family_id, user_id);
    Ok(())
}

pub async fn join_family(
    state: &AppState,
    user_id: i32,
    input: JoinFamilyInput,
) -> Result<FamilyDto, DomainError> {
    let input = input.validate()?;
    let family = state
        .families
        .find_by_join_code(&input.join_code)
        .await?
        .ok_or_else(|| DomainError::not_found("Family with this join code"))?;

    if state.families.find_role(family.id, user_id).await?.is_some() {
        return Err(DomainError::conflict("You are already a member of this family"));
    }

    state
        .families
        .add_member(family.id, user_id, FamilyRole::Member)
        .await?;
    tracing::info!("User #{} joined family #{}", user_id, family.id);

    let who = match state.users.find_by_id(user_id).await? {
        Some(u) => u.display_name.unwrap_or(u.username),
        None => format!("User #{}", user_id),
    };
    if let Err(e) = notify_family(
        state,
        family.id,
        Some(user_id),
        NotificationType::MemberJoined,
        "New family member",
        &format!("{} joined {}", who, family.name),
    )
    .await
    {
        tracing::error!("Failed to send join notifications: {}", e);
    }

    detailed(state, family.id, FamilyRole::Member).await
}

pub async fn leave_family(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let role = require_member(state, family_id, user_id).await?;
    if role == FamilyRole::Owner {
        return Err(DomainError::conflict(
            "The owner cannot leave the family; delete it instead",
        ));
    }
    state.families.remove_member(family_id, user_id).await
}

pub async fn regenerate_join_code(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<FamilyDto, DomainError> {
    let role = require_manager(state, family_id, user_id).await?;
    let code = unique_join_code(state).await?;
    state.families.set_join_code(family_id, code).await?;
    detailed(state, family_id, role).await
}

pub async fn update_member_role(
    state: &AppState,
    family_id: i32,
    user_id: i32,
    member_id: i32,
    input: UpdateMemberRoleInput,
) -> Result<FamilyDto, DomainError> {
    let new_role = input.role()?;
    let role = require_member(state, family_id, user_id).await?;
    if role != FamilyRole::Owner {
        return Err(DomainError::forbidden("Only the owner can change member roles"));
    }
    if new_role == FamilyRole::Owner {
        return Err(DomainError::validation("role: ownership cannot be assigned"));
    }

    let current = state
        .families
        .find_role(family_id, member_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Member"))?;
    if current == FamilyRole::Owner {
        return Err(DomainError::forbidden("The owner's role cannot be changed"));
    }

    state.families.set_role(family_id, member_id, new_role).await?;
    detailed(state, family_id, role).await
}

pub async fn remove_member(
    state: &AppState,
    family_id: i32,
    user_id: i32,
    member_id: i32,
) -> Result<(), DomainError> {
    let role = require_manager(state, family_id, user_id).await?;
    let target = state
        .families
        .find_role(family_id, member_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Member"))?;

    if target == FamilyRole::Owner {
        return Err(DomainError::forbidden("The owner cannot be removed"));
    }
    if role == FamilyRole::Admin && target == FamilyRole::Admin && member_id != user_id {
        return Err(DomainError::forbidden("Admins cannot remove other admins"));
    }

    state.families.remove_member(family_id, member_id).await?;
    tracing::info!("User #{} removed from family #{} by #{}", member_id, family_id, user_id);
    Ok(())
}
