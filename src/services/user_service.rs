//! User Service - accounts, credentials and identity lookups

use sea_orm::*;
use serde::Serialize;

use crate::auth::{Claims, ROLE_USER, create_jwt, hash_password, verify_password};
use crate::domain::{DomainError, Page, PageRequest};
use crate::models::user;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Public view of an account (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            full_name: m.full_name,
            phone_number: m.phone_number,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Create an account with the given role. Emails are stored lowercased.
pub async fn create_user(
    db: &DatabaseConnection,
    input: NewUser,
    role: &str,
) -> Result<UserProfile, DomainError> {
    let email = input.email.trim().to_lowercase();

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(DomainError::Validation(format!(
            "Email is already in use: {}",
            email
        )));
    }

    let password_hash = hash_password(&input.password).map_err(DomainError::Internal)?;

    let created = user::ActiveModel {
        email: Set(email),
        password_hash: Set(password_hash),
        full_name: Set(input.full_name),
        phone_number: Set(input.phone_number),
        role: Set(role.to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Registered user {} with role {}", created.email, created.role);
    Ok(created.into())
}

/// Self-service registration always yields a USER account.
pub async fn register(db: &DatabaseConnection, input: NewUser) -> Result<UserProfile, DomainError> {
    create_user(db, input, ROLE_USER).await
}

/// Verify credentials and issue a token. Every failure reports the same
/// generic message.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<LoginResult, DomainError> {
    let email = email.trim().to_lowercase();
    tracing::info!("Login attempt for user: {}", email);

    let Some(account) = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
    else {
        tracing::warn!("User not found: {}", email);
        return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    match verify_password(password, &account.password_hash) {
        Ok(true) => {}
        _ => {
            tracing::warn!("Password verification failed for user: {}", email);
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    }

    let token = create_jwt(&account.email, account.id, &account.role)
        .map_err(DomainError::Internal)?;

    Ok(LoginResult {
        token,
        user_id: account.id,
        email: account.email,
        full_name: account.full_name,
        role: account.role,
    })
}

pub async fn list_users(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<UserProfile>, DomainError> {
    let paginator = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .paginate(db, request.size);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(request.page).await?;
    Ok(Page::new(rows, total, request).map(UserProfile::from))
}

/// Admins may read any account, users only their own.
pub async fn get_user(
    db: &DatabaseConnection,
    claims: &Claims,
    id: i32,
) -> Result<UserProfile, DomainError> {
    claims.require_self_or_admin(id)?;

    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| DomainError::not_found("User", id))
}

/// Account of the verified caller.
pub async fn profile(db: &DatabaseConnection, claims: &Claims) -> Result<UserProfile, DomainError> {
    user::Entity::find_by_id(claims.user_id)
        .one(db)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| DomainError::not_found("User", claims.user_id))
}

pub async fn count_users(db: &DatabaseConnection) -> Result<u64, DomainError> {
    Ok(user::Entity::find().count(db).await?)
}
