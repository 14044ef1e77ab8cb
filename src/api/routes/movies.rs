//! Favorite Movies Routes
//!
//! - GET /api/v1/movies - Favorites, newest first
//! - POST /api/v1/movies - Add a favorite
//! - DELETE /api/v1/movies/:id - Remove a favorite
//! - PUT /api/v1/movies/:id/rating - Set or clear a rating

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AddMovieRequest, MovieListResponse, RateMovieRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::movies::Movie;

/// GET /api/v1/movies
pub async fn list_movies(State(state): State<Arc<AppState>>) -> Json<MovieListResponse> {
    let movies = state.dashboard.movies().movies().to_vec();
    Json(MovieListResponse {
        total: movies.len(),
        movies,
    })
}

/// POST /api/v1/movies
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddMovieRequest>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let movie = state.dashboard.movies().add(&req.title)?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// DELETE /api/v1/movies/:id
pub async fn remove_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.dashboard.movies().remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/movies/:id/rating
pub async fn rate_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RateMovieRequest>,
) -> ApiResult<Json<Movie>> {
    let movie = state.dashboard.movies().rate(&id, req.rating)?;
    Ok(Json(movie))
}
