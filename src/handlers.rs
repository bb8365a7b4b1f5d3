use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    models::{
        Booking, BookingConfirmation, BookingCreate, BookingsQuery, ClassCreate, ClassCreated,
        FitnessClass,
    },
    validation::{validate_booking, validate_class, validate_email},
};

#[utoipa::path(
    get,
    path = "/healthy",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    info!("Health check requested");
    Json(serde_json::json!({"status": "healthy"}))
}

#[utoipa::path(
    post,
    path = "/classes/",
    request_body = ClassCreate,
    responses(
        (status = 201, description = "Class created", body = ClassCreated),
        (status = 422, description = "Missing field or invalid datetime"),
        (status = 500, description = "Database failure")
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<ClassCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    info!("Attempting to create class: {}", input.name);

    let new_class = validate_class(input)?;
    let created = state.service.create_class(new_class).await?;

    Ok((StatusCode::CREATED, Json(ClassCreated::from(created))))
}

#[utoipa::path(
    get,
    path = "/classesall",
    responses(
        (status = 200, description = "Every class", body = [FitnessClass]),
        (status = 404, description = "No classes found")
    ),
    tag = "classes"
)]
pub async fn list_all_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<FitnessClass>>, ApiError> {
    info!("Fetching all classes");
    let classes = state.service.list_all_classes().await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/classes",
    responses(
        (status = 200, description = "Classes scheduled after now (UTC)", body = [FitnessClass]),
        (status = 404, description = "No classes found")
    ),
    tag = "classes"
)]
pub async fn list_upcoming_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<FitnessClass>>, ApiError> {
    info!("Fetching upcoming classes");
    let classes = state.service.list_upcoming_classes(Utc::now()).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/book",
    request_body = BookingCreate,
    responses(
        (status = 201, description = "Booking created", body = BookingConfirmation),
        (status = 400, description = "No slots available"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Missing field or invalid email"),
        (status = 500, description = "Database failure")
    ),
    tag = "bookings"
)]
pub async fn book_class(
    State(state): State<AppState>,
    payload: Result<Json<BookingCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    info!(
        "Attempting to book class ID {} for {}",
        input.class_id, input.client_email
    );

    let client_email = validate_booking(&input)?;
    let receipt = state
        .service
        .book_class(input.class_id, &input.client_name, &client_email)
        .await?;

    Ok((StatusCode::CREATED, Json(BookingConfirmation::from(receipt))))
}

#[utoipa::path(
    get,
    path = "/bookings",
    params(BookingsQuery),
    responses(
        (status = 200, description = "Bookings made with this email", body = [Booking]),
        (status = 404, description = "No bookings found for this email"),
        (status = 422, description = "Missing or invalid email")
    ),
    tag = "bookings"
)]
pub async fn bookings_by_email(
    State(state): State<AppState>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let Query(query) = query?;
    info!("Fetching bookings for email: {}", query.email);

    let email = validate_email(&query.email)?;
    let bookings = state.service.list_bookings_by_email(&email).await?;
    Ok(Json(bookings))
}
