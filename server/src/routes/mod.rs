use minesweeper_common::{
    models::{Difficulty, GameView, Score},
    protocol::{CoordinateRequest, NewGameRequest, PingResponse, SubmitScoreRequest},
};
use rocket::{State, get, http::Status, post, serde::json::Json};
use tracing::{info, instrument, warn};

use crate::{
    error::ServiceError,
    rate_limit::{ClientIp, RateLimiter},
    service::GameService,
};

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(_) => Status::NotFound,
            ServiceError::AlreadySubmitted(_) => Status::Conflict,
            ServiceError::Game(_)
            | ServiceError::MissingCustomConfig
            | ServiceError::NotWon(_)
            | ServiceError::InvalidPlayerName => Status::BadRequest,
        }
    }
}

fn respond<T>(result: Result<T, ServiceError>) -> Result<Json<T>, Status> {
    result.map(Json).map_err(|error| {
        warn!("Request failed: {}", error);
        Status::from(error)
    })
}

#[get("/api/ping")]
pub fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "pong".to_string(),
    })
}

#[post("/api", data = "<request>")]
#[instrument(level = "trace", skip(service, rate_limiter), fields(client_ip = %client_ip.0, difficulty = %request.difficulty))]
pub fn create_game(
    request: Json<NewGameRequest>,
    service: &State<GameService>,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
) -> Result<Json<GameView>, Status> {
    info!("Game creation request from {}: {}", client_ip.0, request.difficulty);

    if !rate_limiter.check(client_ip.0) {
        return Err(Status::TooManyRequests);
    }

    respond(service.create_game(&request))
}

#[get("/api/<id>")]
pub async fn get_game(id: &str, service: &State<GameService>) -> Result<Json<GameView>, Status> {
    respond(service.get(id).await)
}

#[post("/api/<id>/reveal", data = "<coordinate>")]
pub async fn reveal(
    id: &str,
    coordinate: Json<CoordinateRequest>,
    service: &State<GameService>,
) -> Result<Json<GameView>, Status> {
    respond(service.reveal(id, coordinate.into_inner()).await)
}

#[post("/api/<id>/toggle-mark", data = "<coordinate>")]
pub async fn toggle_mark(
    id: &str,
    coordinate: Json<CoordinateRequest>,
    service: &State<GameService>,
) -> Result<Json<GameView>, Status> {
    respond(service.toggle_mark(id, coordinate.into_inner()).await)
}

#[post("/api/<id>/auto-expand", data = "<coordinate>")]
pub async fn auto_expand(
    id: &str,
    coordinate: Json<CoordinateRequest>,
    service: &State<GameService>,
) -> Result<Json<GameView>, Status> {
    respond(service.auto_expand(id, coordinate.into_inner()).await)
}

#[post("/api/<id>/score", data = "<request>")]
pub async fn submit_score(
    id: &str,
    request: Json<SubmitScoreRequest>,
    service: &State<GameService>,
) -> Result<Json<Score>, Status> {
    respond(service.submit_score(id, &request.player_name).await)
}

#[get("/api/scores/<difficulty>")]
pub fn top_scores(difficulty: &str, service: &State<GameService>) -> Result<Json<Vec<Score>>, Status> {
    let difficulty: Difficulty = difficulty.parse().map_err(|_| Status::NotFound)?;
    Ok(Json(service.top_scores(difficulty)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(Status::from(ServiceError::NotFound("x".into())), Status::NotFound);
        assert_eq!(Status::from(ServiceError::AlreadySubmitted("x".into())), Status::Conflict);
        assert_eq!(Status::from(ServiceError::MissingCustomConfig), Status::BadRequest);
        assert_eq!(
            Status::from(ServiceError::Game(GameError::TooManyMines { mines: 90, max: 72 })),
            Status::BadRequest
        );
    }
}
