//! Tournament server: REST API over the in-memory store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, MATCH_DURATION_SECS,
//! DRAW_SPACING_MINUTES, AUTO_FINISH_GRACE_MS. Log level via RUST_LOG (default info).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use matchday::logic::DrawOptions;
use matchday::{
    compute_standings, generate_draw, top_scorer, ClockError, ClockPhase, Config, GoalDesk,
    GoalError, GoalStore, InMemoryStore, MatchControl, MatchId, MatchStore, PlayerId, Reconciler,
    ReconcilerHandle, SameSportGuard, SportId, StoreError, TeamId, UndoOutcome, WallClock,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Store = InMemoryStore;
type Control = MatchControl<Store, SameSportGuard<Store>>;

/// Shared server state.
struct AppContext {
    store: Arc<Store>,
    control: Arc<Control>,
    goals: GoalDesk<Store>,
    config: Config,
    /// Server-side clock views of started matches, so an expired match finishes even when no
    /// browser has it open.
    viewers: Mutex<HashMap<MatchId, ReconcilerHandle>>,
}

type AppState = Data<AppContext>;

/// How often finished or paused server-side clock views are closed.
const VIEWER_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct DrawBody {
    team_ids: Vec<TeamId>,
    #[serde(default)]
    start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    spacing_minutes: Option<u32>,
    #[serde(default)]
    duration_seconds: Option<u32>,
}

#[derive(Deserialize)]
struct ResetBody {
    #[serde(default)]
    duration_seconds: Option<u32>,
}

#[derive(Deserialize)]
struct GoalBody {
    team_id: TeamId,
    #[serde(default)]
    player_id: Option<PlayerId>,
}

#[derive(Deserialize)]
struct TeamQuery {
    team_id: TeamId,
}

/// Path segment: competition id (e.g. /api/sports/{sport_id}/matches)
#[derive(Deserialize)]
struct SportPath {
    sport_id: SportId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_json(message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::MatchNotFound(_) => HttpResponse::NotFound().json(error_json(e)),
        StoreError::Unavailable(_) => HttpResponse::ServiceUnavailable().json(error_json(e)),
        StoreError::Rejected(_) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

fn clock_error(e: ClockError) -> HttpResponse {
    match e {
        ClockError::Store(e) => store_error(e),
        ClockError::LiveMatchInProgress { .. } => HttpResponse::Conflict().json(error_json(e)),
        ClockError::AlreadyFinished => HttpResponse::BadRequest().json(error_json(e)),
    }
}

fn goal_error(e: GoalError) -> HttpResponse {
    match e {
        GoalError::Store(e) => store_error(e),
        _ => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Keep a server-side reconciler for a started match.
async fn ensure_viewer(ctx: &AppContext, id: MatchId) {
    let exists = match ctx.viewers.lock() {
        Ok(g) => g.get(&id).map_or(false, |h| !h.is_closed()),
        Err(_) => return,
    };
    if exists {
        return;
    }
    match Reconciler::spawn(ctx.control.clone(), id).await {
        Ok(handle) => {
            if let Ok(mut g) = ctx.viewers.lock() {
                g.insert(id, handle);
            }
        }
        Err(e) => log::warn!("Could not open clock view for match {}: {}", id, e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "matchday",
    })
}

/// Draw groups and insert the interleaved schedule for a competition.
#[post("/api/sports/{sport_id}/draw")]
async fn api_draw(
    state: AppState,
    path: Path<SportPath>,
    body: Json<DrawBody>,
) -> HttpResponse {
    let options = DrawOptions {
        start_time: body.start_time,
        spacing_minutes: body
            .spacing_minutes
            .unwrap_or(state.config.draw_spacing_minutes),
        duration_seconds: body
            .duration_seconds
            .unwrap_or(state.config.match_duration_seconds),
    };
    let mut rng = rand::thread_rng();
    let draw = match generate_draw(path.sport_id, &body.team_ids, &options, &mut rng) {
        Ok(d) => d,
        Err(e) => return HttpResponse::BadRequest().json(error_json(e)),
    };
    match state.store.insert_matches(draw.matches).await {
        Ok(rows) => HttpResponse::Ok().json(serde_json::json!({
            "grouping": draw.grouping,
            "groups": draw.groups,
            "matches": rows,
        })),
        Err(e) => store_error(e),
    }
}

#[get("/api/sports/{sport_id}/matches")]
async fn api_list_matches(state: AppState, path: Path<SportPath>) -> HttpResponse {
    match state.store.list_matches(path.sport_id).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => store_error(e),
    }
}

/// Delete the whole schedule of a competition (undo of a draw).
#[delete("/api/sports/{sport_id}/matches")]
async fn api_delete_schedule(state: AppState, path: Path<SportPath>) -> HttpResponse {
    match state.store.delete_matches(path.sport_id).await {
        Ok(removed) => HttpResponse::Ok().json(serde_json::json!({ "removed": removed })),
        Err(e) => store_error(e),
    }
}

/// Group tables plus the competition's top scorer (`null` before anyone has scored).
#[get("/api/sports/{sport_id}/standings")]
async fn api_standings(state: AppState, path: Path<SportPath>) -> HttpResponse {
    let rows = match state.store.list_matches(path.sport_id).await {
        Ok(rows) => rows,
        Err(e) => return store_error(e),
    };
    let goals = match state.store.list_sport_goals(path.sport_id).await {
        Ok(goals) => goals,
        Err(e) => return store_error(e),
    };
    let top = top_scorer(&goals).map(|(player_id, count)| {
        serde_json::json!({ "player_id": player_id, "goals": count })
    });
    HttpResponse::Ok().json(serde_json::json!({
        "table": compute_standings(&rows),
        "top_scorer": top,
    }))
}

/// Match row plus the derived clock display.
#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.store.fetch_match(path.id).await {
        Ok(row) => {
            let clock = row.clock.view(state.control.wall_clock().now());
            HttpResponse::Ok().json(serde_json::json!({ "match": row, "clock": clock }))
        }
        Err(e) => store_error(e),
    }
}

#[post("/api/matches/{id}/start")]
async fn api_start(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.control.start(path.id).await {
        Ok(row) => {
            ensure_viewer(&state, path.id).await;
            HttpResponse::Ok().json(row)
        }
        Err(e) => clock_error(e),
    }
}

#[post("/api/matches/{id}/pause")]
async fn api_pause(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.control.pause(path.id).await {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => clock_error(e),
    }
}

#[post("/api/matches/{id}/reset")]
async fn api_reset(
    state: AppState,
    path: Path<MatchPath>,
    body: Option<Json<ResetBody>>,
) -> HttpResponse {
    let duration = body.and_then(|b| b.duration_seconds);
    match state.control.reset(path.id, duration).await {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => clock_error(e),
    }
}

#[post("/api/matches/{id}/finish")]
async fn api_finish(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.control.finish(path.id).await {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => clock_error(e),
    }
}

#[get("/api/matches/{id}/goals")]
async fn api_list_goals(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.goals.goals(path.id).await {
        Ok(goals) => HttpResponse::Ok().json(goals),
        Err(e) => goal_error(e),
    }
}

/// Record a goal; without `player_id` this is the quick "+1".
#[post("/api/matches/{id}/goals")]
async fn api_add_goal(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<GoalBody>,
) -> HttpResponse {
    match state.goals.record_goal(path.id, body.team_id, body.player_id).await {
        Ok(goal) => HttpResponse::Ok().json(goal),
        Err(e) => goal_error(e),
    }
}

/// Quick "-1": remove the team's most recent goal.
#[delete("/api/matches/{id}/goals/last")]
async fn api_undo_goal(
    state: AppState,
    path: Path<MatchPath>,
    query: Query<TeamQuery>,
) -> HttpResponse {
    match state.goals.quick_minus(path.id, query.team_id).await {
        Ok(UndoOutcome::Removed(goal)) => {
            HttpResponse::Ok().json(serde_json::json!({ "removed": true, "goal": goal }))
        }
        Ok(UndoOutcome::NothingToUndo) => HttpResponse::Ok().json(serde_json::json!({
            "removed": false,
            "message": "No goal to undo for this team",
        })),
        Err(e) => goal_error(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Arc::new(InMemoryStore::new());
    let control = Arc::new(
        MatchControl::new(store.clone(), SameSportGuard::new(store.clone()))
            .with_grace(config.auto_finish_grace),
    );
    let state = Data::new(AppContext {
        store: store.clone(),
        control,
        goals: GoalDesk::new(store),
        config,
        viewers: Mutex::new(HashMap::new()),
    });

    // Background task: close server-side clock views of matches that no longer run
    let state_sweep = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(VIEWER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_sweep.viewers.lock() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, handle| {
                !handle.is_closed() && handle.view().phase == ClockPhase::Running
            });
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Closed {} idle clock view(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_draw)
            .service(api_list_matches)
            .service(api_delete_schedule)
            .service(api_standings)
            .service(api_get_match)
            .service(api_start)
            .service(api_pause)
            .service(api_reset)
            .service(api_finish)
            .service(api_list_goals)
            .service(api_add_goal)
            .service(api_undo_goal)
    })
    .bind(bind)?
    .run()
    .await
}
