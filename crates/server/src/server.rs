use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait};

use std::net::SocketAddr;
use std::sync::Arc;

use crate::{ServerError, attendance, leaves, session, summary};
use engine::{
    Engine, Role,
    entities::{sessions, users},
};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// The authenticated caller, injected into request extensions by [`auth`].
#[derive(Clone, Debug)]
pub struct Principal {
    pub username: String,
    pub employee_code: Option<String>,
    pub role: Role,
    /// Peer address of the connection, when the listener exposes one.
    pub peer_addr: Option<SocketAddr>,
}

pub fn require_reviewer(principal: &Principal) -> Result<(), ServerError> {
    if principal.role.can_review() {
        Ok(())
    } else {
        Err(ServerError::Forbidden("Not authorized".to_string()))
    }
}

/// Attendance and leave calls act on the caller's own employee code; staff
/// accounts without one cannot use them.
pub fn require_employee_code(principal: &Principal) -> Result<String, ServerError> {
    principal
        .employee_code
        .clone()
        .ok_or_else(|| ServerError::Forbidden("Account is not linked to an employee".to_string()))
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let session = sessions::Entity::find_by_id(auth_header.token())
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Expiry is enforced lazily: a stale token is dropped on first use.
    if session.expires_at < Utc::now() {
        sessions::Entity::delete_by_id(session.token)
            .exec(&state.db)
            .await
            .map_err(|_| StatusCode::UNAUTHORIZED)?;
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = users::Entity::find_by_id(session.username)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if !user.is_active {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let role = Role::try_from(user.role.as_str()).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let peer_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    request.extensions_mut().insert(Principal {
        username: user.username,
        employee_code: user.employee_code,
        role,
        peer_addr,
    });
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/session/logout", post(session::logout))
        .route("/session/me", get(session::me))
        .route("/attendance/status", get(attendance::status))
        .route("/attendance/clockIn", post(attendance::clock_in))
        .route("/attendance/clockOut", post(attendance::clock_out))
        .route("/attendance/history", get(attendance::history))
        .route("/attendance/daily", get(attendance::daily))
        .route("/leave/balance", get(leaves::balance))
        .route("/leave/apply", post(leaves::apply))
        .route("/leave/mine", get(leaves::mine))
        .route("/leave/pending", get(leaves::pending))
        .route("/leave/{leave_id}/action", post(leaves::action))
        .route("/summary/monthly", get(summary::monthly))
        // route_layer only covers routes added before it; login stays public.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/session/login", post(session::login))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
