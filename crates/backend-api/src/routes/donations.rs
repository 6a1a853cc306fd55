use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use rescatando_database::Donation;
use rescatando_shelter::DonationForm;

use crate::{ApiError, AppState};

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "Donations",
    request_body = DonationForm,
    responses(
        (status = 201, description = "Donation recorded", body = Donation),
        (status = 400, description = "Invalid donation", body = crate::error::ErrorResponse)
    )
)]
pub async fn donate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<DonationForm>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    let donor = state.maybe_signed_in(&headers).await?;
    let donation = state.shelter().donations.donate(&form, donor.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/api/donations/receipts",
    tag = "Donations",
    responses((status = 200, description = "Donations, newest first", body = [Donation]))
)]
pub async fn receipts(State(state): State<AppState>) -> Result<Json<Vec<Donation>>, ApiError> {
    Ok(Json(state.shelter().donations.receipts().await?))
}
