use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono_tz::Tz;
use log::{error, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc as StdArc;
use tower_http::cors::{Any, CorsLayer};

use crate::analytics::Analytics;
use crate::config::AppConfig;
use crate::events::EventLog;
use crate::registry::{Sound, SoundRegistry};
use crate::store::{CreateSequenceInput, SequenceStore};

// State shared by all handlers
pub struct AppState {
    pub store: SequenceStore,
    pub registry: SoundRegistry,
    pub events: EventLog,
    pub analytics: Analytics,
    pub default_timer_color: String,
    pub display_timezone: Tz,
}

impl AppState {
    pub fn from_pool(pool: sqlx::sqlite::SqlitePool, config: &AppConfig, zone: Tz) -> Self {
        Self {
            store: SequenceStore::new(pool.clone(), config.default_timer_color.clone()),
            registry: SoundRegistry::new(pool.clone(), config.fallback_alarm_sound.clone()),
            events: EventLog::new(pool.clone()),
            analytics: Analytics::new(pool),
            default_timer_color: config.default_timer_color.clone(),
            display_timezone: zone,
        }
    }
}

pub fn build_router(state: StdArc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(index_handler))
        .route("/timer", post(create_sequence_handler))
        .route("/timer/{sequence_id}", get(show_sequence_handler))
        .route("/log_activity", post(log_activity_handler))
        .route("/logs/{sequence_id}", get(show_logs_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until shutdown
pub fn run(config: AppConfig, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let display_timezone = config.display_zone()?;

    println!("SQLite database: {}", config.database_path.display());
    println!("Listening on: http://[::]:{} (IPv4 + IPv6)", port);
    println!("Endpoints:");
    println!("  GET  /health  - Health check");
    println!("  GET  /  - Sound catalog and most-used sequences");
    println!("  POST /timer  - Create a timer sequence");
    println!("  GET  /timer/:sequence_id  - Sequence replay data");
    println!("  POST /log_activity  - Record a lifecycle event");
    println!("  GET  /logs/:sequence_id  - Event log for a sequence");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let pool = crate::db::open_database_pool(&config.database_path).await?;
        crate::db::init_database_schema(&pool).await?;

        let state = StdArc::new(AppState::from_pool(pool, &config, display_timezone));
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind(format!("[::]:{}", port))
            .await
            .map_err(|e| format!("Failed to bind to port {}: {}", port, e))?;
        axum::serve(listener, app)
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
    })
    .map_err(|e| e as Box<dyn std::error::Error>)
}

// Health check endpoint - returns 200 OK if server is running
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn storage_failure(context: &str, err: impl std::fmt::Display) -> Response {
    error!("Storage failure while trying to {}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Internal storage failure"})),
    )
        .into_response()
}

fn sequence_not_found(sequence_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": format!("Sequence '{}' not found", sequence_id)})),
    )
        .into_response()
}

#[derive(Serialize)]
struct MostUsedRow {
    id: String,
    name: String,
    use_count: i64,
    timer_count: i64,
    total_duration_display: String,
}

#[derive(Serialize)]
struct IndexView {
    available_sounds: Vec<Sound>,
    default_alarm_sound: String,
    default_timer_color: String,
    most_used_sequences: Vec<MostUsedRow>,
}

// Landing view-data: sound catalog plus the most-used ranking
async fn index_handler(State(state): State<StdArc<AppState>>) -> Response {
    let available_sounds = match state.registry.list_sounds().await {
        Ok(sounds) => sounds,
        Err(e) => return storage_failure("list sounds", e),
    };
    let default_alarm_sound = match state.registry.default_filename().await {
        Ok(filename) => filename,
        Err(e) => return storage_failure("resolve default sound", e),
    };
    let most_used = match state.analytics.most_used_sequences().await {
        Ok(usage) => usage,
        Err(e) => return storage_failure("rank sequences", e),
    };

    let most_used_sequences = most_used
        .into_iter()
        .map(|usage| MostUsedRow {
            name: usage.display_name(),
            total_duration_display: usage.total_duration_display(),
            use_count: usage.start_count,
            timer_count: usage.timer_count,
            id: usage.id,
        })
        .collect();

    (
        StatusCode::OK,
        Json(IndexView {
            available_sounds,
            default_alarm_sound,
            default_timer_color: state.default_timer_color.clone(),
            most_used_sequences,
        }),
    )
        .into_response()
}

/// Repeated-key form fields, as submitted by the sequence builder
struct FormFields(HashMap<String, Vec<String>>);

impl FormFields {
    fn parse(body: &str) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            fields
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self(fields)
    }

    fn single(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    fn many(&self, key: &str) -> Vec<String> {
        self.0.get(key).cloned().unwrap_or_default()
    }
}

// Sequence creation: parallel form arrays in, sequence id out
async fn create_sequence_handler(
    State(state): State<StdArc<AppState>>,
    body: String,
) -> Response {
    let form = FormFields::parse(&body);

    // Honeypot: a real browser form leaves this empty
    if form.single("website").is_some_and(|v| !v.is_empty()) {
        warn!("Honeypot field filled, rejecting creation request");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Rejected"})),
        )
            .into_response();
    }

    let input = CreateSequenceInput {
        sequence_name: form.single("sequence_name").map(str::to_string),
        timer_names: form.many("timer_name[]"),
        hours: form.many("hours[]"),
        minutes: form.many("minutes[]"),
        seconds: form.many("seconds[]"),
        colors: form.many("color[]"),
        alarm_sounds: form.many("alarm_sound[]"),
    };

    let default_alarm_sound = match state.registry.default_filename().await {
        Ok(filename) => filename,
        Err(e) => return storage_failure("resolve default sound", e),
    };

    match state.store.create_sequence(&input, &default_alarm_sound).await {
        Ok(sequence_id) => (
            StatusCode::CREATED,
            Json(json!({"sequence_id": sequence_id})),
        )
            .into_response(),
        Err(e) if e.is_input_error() => {
            warn!("Rejected sequence creation: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": e.to_string()})),
            )
                .into_response()
        }
        Err(e) => storage_failure("create sequence", e),
    }
}

#[derive(Serialize)]
struct TimerView {
    duration: i64,
    name: String,
    color: String,
    alarm_sound: String,
}

#[derive(Serialize)]
struct SequenceView {
    sequence_id: String,
    sequence_name: Option<String>,
    timers: Vec<TimerView>,
}

// Replay view-data for one sequence
async fn show_sequence_handler(
    State(state): State<StdArc<AppState>>,
    Path(sequence_id): Path<String>,
) -> Response {
    match state.store.get_sequence(&sequence_id).await {
        Ok(Some(sequence)) => {
            let timers = sequence
                .timers
                .iter()
                .map(|t| TimerView {
                    duration: t.duration,
                    name: t.display_name(),
                    color: t.color.clone(),
                    alarm_sound: t.alarm_sound.clone(),
                })
                .collect();
            (
                StatusCode::OK,
                Json(SequenceView {
                    sequence_id: sequence.id,
                    sequence_name: sequence.name,
                    timers,
                }),
            )
                .into_response()
        }
        Ok(None) => sequence_not_found(&sequence_id),
        Err(e) => storage_failure("load sequence", e),
    }
}

/// timer_order may be null/absent, an integer, or an integer-valued string;
/// anything else is malformed input
fn parse_timer_order(value: Option<&Value>) -> Result<Option<i64>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(()),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| ()),
        Some(_) => Err(()),
    }
}

// Background activity reports from the countdown player
async fn log_activity_handler(
    State(state): State<StdArc<AppState>>,
    Json(data): Json<Value>,
) -> Response {
    let sequence_id = data.get("sequence_id").and_then(Value::as_str).unwrap_or("");
    let event_type = data.get("event_type").and_then(Value::as_str).unwrap_or("");

    if sequence_id.is_empty() || event_type.is_empty() {
        warn!("Missing data for log activity: {}", data);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Missing data (sequence_id or event_type)"})),
        )
            .into_response();
    }

    let timer_order = match parse_timer_order(data.get("timer_order")) {
        Ok(order) => order,
        Err(()) => {
            warn!("Invalid timer_order in log activity: {}", data);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Invalid timer_order format"})),
            )
                .into_response();
        }
    };

    match state
        .events
        .append_event(sequence_id, timer_order, event_type)
        .await
    {
        Ok(log_id) => (
            StatusCode::CREATED,
            Json(json!({"message": "Activity logged successfully", "log_id": log_id})),
        )
            .into_response(),
        Err(e) => {
            error!(
                "Database error logging activity for sequence {}: {}",
                sequence_id, e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Failed to log activity"})),
            )
                .into_response()
        }
    }
}

#[derive(Serialize)]
struct LogRow {
    id: i64,
    sequence_id: String,
    timer_order: Option<i64>,
    event_type: String,
    timestamp: String,
    timer_name: Option<String>,
}

#[derive(Serialize)]
struct LogsView {
    sequence_id: String,
    sequence_name: String,
    logs: Vec<LogRow>,
}

// Event log viewer for one sequence, timestamps in the display zone
async fn show_logs_handler(
    State(state): State<StdArc<AppState>>,
    Path(sequence_id): Path<String>,
) -> Response {
    let sequence = match state.store.get_sequence(&sequence_id).await {
        Ok(Some(sequence)) => sequence,
        Ok(None) => return sequence_not_found(&sequence_id),
        Err(e) => return storage_failure("load sequence", e),
    };

    let entries = match state.events.entries_for_sequence(&sequence_id).await {
        Ok(entries) => entries,
        Err(e) => return storage_failure("load event log", e),
    };

    let logs = entries
        .into_iter()
        .map(|entry| LogRow {
            timestamp: entry.display_timestamp(state.display_timezone),
            id: entry.id,
            sequence_id: entry.sequence_id,
            timer_order: entry.timer_order,
            event_type: entry.event_type,
            timer_name: entry.timer_name,
        })
        .collect();

    let sequence_name = sequence
        .name
        .unwrap_or_else(|| format!("Sequence {}", sequence_id));

    (
        StatusCode::OK,
        Json(LogsView {
            sequence_id,
            sequence_name,
            logs,
        }),
    )
        .into_response()
}
