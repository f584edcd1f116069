use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::generate_token::InvitationTokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::invitation::errors::InvitationStatusError;
use crate::domain::invitation::errors::PagingError;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;
use crate::inbound::http::router::AppState;

pub async fn list_tokens(
    State(state): State<AppState>,
    Query(query): Query<ListTokensQuery>,
) -> Result<ApiSuccess<Vec<InvitationTokenData>>, ApiError> {
    let (filter, paging) = query.try_into_parts()?;

    let tokens = state
        .auth_service
        .list_invitation_tokens(&filter, &paging)
        .await?;

    Ok(ApiSuccess::page(
        StatusCode::OK,
        tokens.iter().map(InvitationTokenData::from).collect(),
        &paging,
        &filter,
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListTokensQuery {
    status: Option<i64>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Clone, Error)]
enum ParseListTokensQueryError {
    #[error("Invalid status filter: {0}")]
    Status(#[from] InvitationStatusError),

    #[error("Invalid paging: {0}")]
    Paging(#[from] PagingError),
}

impl ListTokensQuery {
    fn try_into_parts(self) -> Result<(InvitationTokenFilter, Paging), ParseListTokensQueryError> {
        let status = self
            .status
            .map(InvitationTokenStatus::try_from)
            .transpose()?;
        let paging = Paging::new(self.page, self.limit)?;
        Ok((InvitationTokenFilter { status }, paging))
    }
}

impl From<ParseListTokensQueryError> for ApiError {
    fn from(err: ParseListTokensQueryError) -> Self {
        ApiError::invalid_request(err.to_string())
    }
}
