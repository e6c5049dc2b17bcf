use aws_config::BehaviorVersion;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use cqrs_es::persist::ViewRepository;
use order_entry::{
    drafts::{
        self,
        cqrs::{DraftStoreTables, DraftsRepo, DynamoDraftsCqrs},
        DraftOrder, DraftTableView,
    },
    orders::ActiveOrder,
    Error,
};
use std::collections::HashMap;
use ulid::Ulid;

#[derive(Clone)]
struct AppState {
    drafts_repo: DraftsRepo,
    drafts_cqrs: DynamoDraftsCqrs,
}

type ApiError = (StatusCode, String);

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidOrder { .. }
        | Error::Validation { .. }
        | Error::PageOutOfRange { .. }
        | Error::OffsetOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Query { .. } | Error::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: Error) -> ApiError {
    (status_for(&err), err.to_string())
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);

    let tables = DraftStoreTables::from_env();
    let drafts_repo = drafts::cqrs::init_repo(dynamodb_client.clone(), &tables);
    let drafts_cqrs = drafts::cqrs::init(dynamodb_client, &tables, drafts_repo.clone());

    let state = AppState {
        drafts_repo,
        drafts_cqrs,
    };

    let app = Router::new()
        .route(
            "/patients/:patient/drafts",
            get(list_drafts).post(add_draft).delete(clear_drafts),
        )
        .route("/patients/:patient/drafts/discontinue", post(discontinue_order))
        .route("/patients/:patient/drafts/:uuid", delete(remove_draft))
        .with_state(state);

    let app = tower::ServiceBuilder::new()
        .layer(axum_aws_lambda::LambdaLayer::default())
        .service(app);

    lambda_http::run(app).await?;
    Ok(())
}

async fn execute(
    state: &AppState,
    patient: &str,
    command: drafts::Command,
) -> Result<(), ApiError> {
    let mut metadata = HashMap::new();
    metadata.insert("command_id".to_string(), Ulid::new().to_string());

    state
        .drafts_cqrs
        .execute_with_metadata(patient, command, metadata)
        .await
        .map_err(|e| api_error(e.into()))
}

// List staged drafts
async fn list_drafts(
    Path(patient): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .drafts_repo
        .load(&patient)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .unwrap_or_else(|| DraftTableView::for_patient(&patient));

    Ok(Json(view))
}

// Add or replace a draft
async fn add_draft(
    Path(patient): Path<String>,
    State(state): State<AppState>,
    Json(draft): Json<DraftOrder>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid = draft.uuid.clone();
    execute(&state, &patient, drafts::Command::AddDraftOrder { draft }).await?;

    tracing::info!("Draft {} staged for {}", uuid, patient);
    Ok((StatusCode::OK, "Draft staged"))
}

// Compose a discontinuation draft from an active order
async fn discontinue_order(
    Path(patient): Path<String>,
    State(state): State<AppState>,
    Json(order): Json<ActiveOrder>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = drafts::compose_discontinuation(&order).map_err(api_error)?;
    execute(
        &state,
        &patient,
        drafts::Command::AddDraftOrder {
            draft: draft.clone(),
        },
    )
    .await?;

    tracing::info!("Discontinuation of {} staged for {}", draft.order_number, patient);
    Ok((StatusCode::CREATED, Json(draft)))
}

// Remove one draft
async fn remove_draft(
    Path((patient, uuid)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    execute(&state, &patient, drafts::Command::RemoveDraftOrder { uuid }).await?;

    Ok((StatusCode::OK, "Draft removed"))
}

// Remove every draft
async fn clear_drafts(
    Path(patient): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    execute(&state, &patient, drafts::Command::ClearDrafts).await?;

    Ok((StatusCode::OK, "Drafts cleared"))
}
