//! Single binary web server exposing the tournament engine over a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, LOG_LEVEL,
//! POINTS_WIN / POINTS_DRAW / POINTS_LOSS for the default scoring.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use score_tournament::{
    export::write_standings_csv, Board, BoardId, DrawMode, FixtureFilter, FixtureId,
    FixtureScore, FixtureStatus, GroupId, InMemoryStore, NewTournament, Participant,
    ParticipantId, Round, ServerConfig, TournamentEngine, TournamentError, TournamentId,
};
use serde::Deserialize;

type AppState = Data<TournamentEngine<InMemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct GroupConfigBody {
    group_config: Vec<usize>,
}

#[derive(Deserialize)]
struct AddParticipantsBody {
    participant_ids: Vec<ParticipantId>,
}

#[derive(Deserialize)]
struct FixtureQuery {
    group_id: Option<GroupId>,
    round: Option<Round>,
    status: Option<FixtureStatus>,
}

/// Path segment: board id (e.g. /api/boards/{id})
#[derive(Deserialize)]
struct BoardPath {
    id: BoardId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Path segments: tournament id and fixture id
#[derive(Deserialize)]
struct TournamentFixturePath {
    id: TournamentId,
    fixture_id: FixtureId,
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotFound { .. } => HttpResponse::NotFound().json(body),
        TournamentError::InvalidPhase { .. }
        | TournamentError::DuplicateParticipant(_)
        | TournamentError::FixtureClosed(_)
        | TournamentError::Conflict(_) => HttpResponse::Conflict().json(body),
        TournamentError::Storage(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "score-tournament",
    })
}

#[post("/api/boards")]
async fn api_create_board(state: AppState, body: Json<NameBody>) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is empty" }));
    }
    let board = Board::new(name);
    respond(
        state
            .store()
            .insert_board(board.clone())
            .map(|()| board)
            .map_err(TournamentError::from),
    )
}

/// Register a participant on a board.
#[post("/api/boards/{id}/participants")]
async fn api_create_participant(
    state: AppState,
    path: Path<BoardPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is empty" }));
    }
    let participant = Participant::new(path.id, name);
    respond(
        state
            .store()
            .insert_participant(participant.clone())
            .map(|()| participant)
            .map_err(TournamentError::from),
    )
}

#[get("/api/boards/{id}/participants")]
async fn api_board_participants(state: AppState, path: Path<BoardPath>) -> HttpResponse {
    respond(
        state
            .store()
            .board_participants(path.id)
            .map_err(TournamentError::from),
    )
}

#[get("/api/boards/{id}/tournaments")]
async fn api_board_tournaments(state: AppState, path: Path<BoardPath>) -> HttpResponse {
    respond(state.tournaments(Some(path.id)))
}

/// Create a new tournament in Setup (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    respond(state.create_tournament(body.into_inner()))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.tournament(path.id))
}

/// Replace the group-size plan (Setup only).
#[put("/api/tournaments/{id}/group-config")]
async fn api_set_group_config(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<GroupConfigBody>,
) -> HttpResponse {
    respond(state.set_group_config(path.id, body.into_inner().group_config))
}

/// Enroll participants (Setup only).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participants(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantsBody>,
) -> HttpResponse {
    respond(state.add_participants(path.id, &body.participant_ids))
}

/// Withdraw a participant (Setup only).
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
) -> HttpResponse {
    respond(state.remove_participant(path.id, path.participant_id))
}

/// Draw groups, randomly or from a manual assignment map.
#[post("/api/tournaments/{id}/draw")]
async fn api_draw_groups(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<DrawMode>,
) -> HttpResponse {
    respond(state.draw_groups(path.id, &body))
}

/// Generate the round-robin schedule (GroupDraw -> GroupStage).
#[post("/api/tournaments/{id}/schedule")]
async fn api_generate_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.generate_schedule(path.id))
}

#[get("/api/tournaments/{id}/groups")]
async fn api_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.groups(path.id))
}

/// List fixtures, optionally filtered by group, round and status.
#[get("/api/tournaments/{id}/fixtures")]
async fn api_fixtures(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<FixtureQuery>,
) -> HttpResponse {
    let filter = FixtureFilter {
        tournament_id: path.id,
        group_id: query.group_id,
        round: query.round,
        status: query.status,
    };
    respond(state.fixtures(&filter))
}

/// Submit a fixture's final score.
#[put("/api/tournaments/{id}/fixtures/{fixture_id}/score")]
async fn api_complete_fixture(
    state: AppState,
    path: Path<TournamentFixturePath>,
    body: Json<FixtureScore>,
) -> HttpResponse {
    respond(state.complete_fixture(path.id, path.fixture_id, body.into_inner()))
}

/// Advance to knockout (GroupStage -> Knockout); returns the semifinals.
#[post("/api/tournaments/{id}/knockout")]
async fn api_advance_to_knockout(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.advance_to_knockout(path.id))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.standings(path.id))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let standings = match state.standings(path.id) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };
    let mut buf = Vec::new();
    if let Err(e) = write_standings_csv(&standings, &mut buf) {
        log::error!("CSV export failed for tournament {}: {}", path.id, e);
        return HttpResponse::InternalServerError().body("csv error");
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(buf)
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.bracket(path.id))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.as_str()));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Default scoring: win {} / draw {} / loss {}",
        config.scoring.win,
        config.scoring.draw,
        config.scoring.loss
    );

    let state = Data::new(TournamentEngine::with_scoring(
        InMemoryStore::new(),
        config.scoring,
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_board)
            .service(api_create_participant)
            .service(api_board_participants)
            .service(api_board_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_group_config)
            .service(api_add_participants)
            .service(api_remove_participant)
            .service(api_draw_groups)
            .service(api_generate_schedule)
            .service(api_groups)
            .service(api_fixtures)
            .service(api_complete_fixture)
            .service(api_advance_to_knockout)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_bracket)
    })
    .bind(bind)?
    .run()
    .await
}
