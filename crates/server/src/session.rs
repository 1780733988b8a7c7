//! Session API endpoints

use api_types::session::{LoginRequest, LoginResponse, Role as ApiRole, SessionUser};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Principal, ServerState},
};
use engine::entities::{sessions, users};

const SESSION_TTL_HOURS: i64 = 24;

fn role_view(role: engine::Role) -> ApiRole {
    match role {
        engine::Role::Admin => ApiRole::Admin,
        engine::Role::Hr => ApiRole::Hr,
        engine::Role::Management => ApiRole::Management,
        engine::Role::Employee => ApiRole::Employee,
    }
}

/// Verify credentials and issue a fresh session token.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    let user = users::Entity::find_by_id(&payload.username)
        .one(&state.db)
        .await?;
    let Some(user) = user else {
        return Err(ServerError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };
    if !engine::verify_password(&payload.password, &user.password_hash) {
        return Err(ServerError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }
    if !user.is_active {
        return Err(ServerError::Forbidden("Account is deactivated".to_string()));
    }
    let role = engine::Role::try_from(user.role.as_str())?;

    let now = Utc::now();
    let expires_at = now + Duration::hours(SESSION_TTL_HOURS);
    let token = Uuid::new_v4().to_string();
    sessions::ActiveModel {
        token: ActiveValue::Set(token.clone()),
        username: ActiveValue::Set(user.username.clone()),
        created_at: ActiveValue::Set(now),
        expires_at: ActiveValue::Set(expires_at),
    }
    .insert(&state.db)
    .await?;

    let session_user = SessionUser {
        username: user.username.clone(),
        employee_code: user.employee_code.clone(),
        role: role_view(role),
    };

    let mut account: users::ActiveModel = user.into();
    account.last_login = ActiveValue::Set(Some(now));
    account.update(&state.db).await?;

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: session_user,
    }))
}

/// Drop the presented session. The token has already passed the auth layer.
pub async fn logout(
    auth_header: TypedHeader<Authorization<Bearer>>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    sessions::Entity::delete_by_id(auth_header.token())
        .exec(&state.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(principal): Extension<Principal>) -> Json<SessionUser> {
    Json(SessionUser {
        username: principal.username,
        employee_code: principal.employee_code,
        role: role_view(principal.role),
    })
}
