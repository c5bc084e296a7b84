// Wedding Planner - REST API with Axum
//
// Thin layer: parse form fields, call a service, wrap the result in
// `ApiResponse`. Writes take form-encoded bodies (every field is a string, as
// an HTML form sends it); reads return JSON.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::dates;
use crate::entities::{Expense, ExpenseFields, Guest, GuestUpdate, Progress, Task, Venue, VenueFields};
use crate::error::PlannerError;
use crate::forms;
use crate::planner::{all_readable, CollectionHealth, Dashboard, Planner};
use crate::tables::TableConfig;
use crate::BudgetSummary;

/// Form keys for bulk seating look like `table_<guest id>`.
const TABLE_FIELD_PREFIX: &str = "table_";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    planner: Arc<Planner>,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

/// Error side of every handler.
#[derive(Debug)]
pub struct ApiError(PlannerError);

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_format() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(ApiResponse::failure(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GuestEditForm {
    pub rsvp: String,
    #[serde(default)]
    pub dietary: String,
    #[serde(default)]
    pub plus_ones: String,
}

impl GuestEditForm {
    fn into_update(self) -> crate::Result<GuestUpdate> {
        Ok(GuestUpdate {
            plus_ones: forms::parse_count("plus_ones", &self.plus_ones)?,
            rsvp: self.rsvp,
            dietary: self.dietary,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct VenueForm {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub date: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub menu_price: String,
    #[serde(default)]
    pub contact: String,
}

impl VenueForm {
    fn into_fields(self) -> crate::Result<VenueFields> {
        Ok(VenueFields {
            name: forms::required("name", &self.name)?,
            date: dates::parse_date(self.date.trim())?,
            capacity: forms::parse_count("capacity", &self.capacity)?,
            menu_price: forms::parse_money("menu_price", &self.menu_price)?,
            address: self.address,
            contact: self.contact,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseForm {
    fn into_fields(self) -> crate::Result<ExpenseFields> {
        Ok(ExpenseFields {
            name: forms::required("name", &self.name)?,
            price: forms::parse_money("price", &self.price)?,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct WeddingDateForm {
    pub wedding_date: String,
}

#[derive(Debug, Deserialize)]
pub struct TableConfigForm {
    pub num_tables: String,
    pub seats_per_table: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Toggled {
    pub found: bool,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub collections: Vec<CollectionHealth>,
}

#[derive(Debug, Serialize)]
pub struct WeddingDateResponse {
    pub wedding_date: Option<String>,
    pub days_until: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SeatingResponse {
    pub config: TableConfig,
    pub tables: BTreeMap<u32, Vec<String>>,
    pub unseated: Vec<String>,
    pub overfull: Vec<u32>,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Collection read status
async fn health(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let collections = state.planner.health();
    let status = if all_readable(&collections) {
        "ok"
    } else {
        "degraded"
    };

    ok(HealthResponse {
        status,
        version: crate::VERSION,
        collections,
    })
}

/// GET /api/dashboard - Front page numbers
async fn dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    ok(state.planner.dashboard(today()))
}

// --- guests -----------------------------------------------------------------

/// GET /api/guests
async fn list_guests(State(state): State<AppState>) -> ApiResult<Vec<Guest>> {
    ok(state.planner.guests().list())
}

/// POST /api/guests
async fn add_guest(State(state): State<AppState>, Form(form): Form<NameForm>) -> ApiResult<Guest> {
    ok(state.planner.guests().add(&form.name)?)
}

/// GET /api/guests/search?q=
async fn search_guests(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Guest>> {
    ok(state.planner.guests().search(&query.q))
}

/// GET /api/guests/:id
async fn get_guest(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Guest> {
    ok(state.planner.guests().get(&id)?)
}

/// POST /api/guests/:id
async fn edit_guest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GuestEditForm>,
) -> ApiResult<Guest> {
    let update = form.into_update()?;
    ok(state.planner.guests().edit(&id, update)?)
}

/// DELETE /api/guests/:id
async fn delete_guest(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    let deleted = state.planner.guests().delete(&id)?;
    ok(Deleted { deleted })
}

// --- venues -----------------------------------------------------------------

/// GET /api/venues
async fn list_venues(State(state): State<AppState>) -> ApiResult<Vec<Venue>> {
    ok(state.planner.venues().list())
}

/// POST /api/venues
async fn add_venue(State(state): State<AppState>, Form(form): Form<VenueForm>) -> ApiResult<Venue> {
    let fields = form.into_fields()?;
    ok(state.planner.venues().add(fields)?)
}

/// POST /api/venues/:id
async fn edit_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<VenueForm>,
) -> ApiResult<Venue> {
    let fields = form.into_fields()?;
    ok(state.planner.venues().edit(&id, fields)?)
}

/// DELETE /api/venues/:id
async fn delete_venue(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    let deleted = state.planner.venues().delete(&id)?;
    ok(Deleted { deleted })
}

// --- expenses ---------------------------------------------------------------

/// GET /api/expenses
async fn list_expenses(State(state): State<AppState>) -> ApiResult<Vec<Expense>> {
    ok(state.planner.expenses().list())
}

/// POST /api/expenses
async fn add_expense(
    State(state): State<AppState>,
    Form(form): Form<ExpenseForm>,
) -> ApiResult<Expense> {
    let fields = form.into_fields()?;
    ok(state.planner.expenses().add(fields)?)
}

/// POST /api/expenses/:id
async fn edit_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ExpenseForm>,
) -> ApiResult<Expense> {
    let fields = form.into_fields()?;
    ok(state.planner.expenses().edit(&id, fields)?)
}

/// DELETE /api/expenses/:id
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.planner.expenses().delete(&id)?;
    ok(Deleted { deleted })
}

// --- tasks ------------------------------------------------------------------

/// GET /api/tasks
async fn list_tasks(State(state): State<AppState>) -> ApiResult<Vec<Task>> {
    ok(state.planner.tasks().list())
}

/// POST /api/tasks
async fn add_task(State(state): State<AppState>, Form(form): Form<TaskForm>) -> ApiResult<Task> {
    ok(state.planner.tasks().add(&form.title)?)
}

/// POST /api/tasks/:id/toggle
async fn toggle_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Toggled> {
    let completed = state.planner.tasks().toggle(&id)?;
    ok(Toggled {
        found: completed.is_some(),
        completed,
    })
}

/// DELETE /api/tasks/:id
async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    let deleted = state.planner.tasks().delete(&id)?;
    ok(Deleted { deleted })
}

/// GET /api/tasks/progress
async fn task_progress(State(state): State<AppState>) -> ApiResult<Progress> {
    ok(state.planner.tasks().progress())
}

// --- budget, date, tables ---------------------------------------------------

/// GET /api/budget
async fn budget(State(state): State<AppState>) -> ApiResult<BudgetSummary> {
    ok(state.planner.budget())
}

fn wedding_date_response(state: &AppState) -> WeddingDateResponse {
    let service = state.planner.wedding_date();
    WeddingDateResponse {
        wedding_date: service.get().map(dates::format_date),
        days_until: service.days_until(today()),
    }
}

/// GET /api/wedding-date
async fn get_wedding_date(State(state): State<AppState>) -> ApiResult<WeddingDateResponse> {
    ok(wedding_date_response(&state))
}

/// POST /api/wedding-date
async fn set_wedding_date(
    State(state): State<AppState>,
    Form(form): Form<WeddingDateForm>,
) -> ApiResult<WeddingDateResponse> {
    state.planner.wedding_date().set(&form.wedding_date)?;
    ok(wedding_date_response(&state))
}

/// DELETE /api/wedding-date
async fn clear_wedding_date(State(state): State<AppState>) -> ApiResult<WeddingDateResponse> {
    state.planner.wedding_date().clear()?;
    ok(wedding_date_response(&state))
}

fn seating_response(state: &AppState) -> SeatingResponse {
    let tables = state.planner.tables();
    SeatingResponse {
        config: tables.config(),
        tables: tables.view(),
        unseated: tables.unseated(),
        overfull: tables.overfull(),
    }
}

/// GET /api/tables
async fn get_tables(State(state): State<AppState>) -> ApiResult<SeatingResponse> {
    ok(seating_response(&state))
}

/// POST /api/tables/config
async fn configure_tables(
    State(state): State<AppState>,
    Form(form): Form<TableConfigForm>,
) -> ApiResult<SeatingResponse> {
    let num_tables = forms::parse_count("num_tables", &form.num_tables)?;
    let seats_per_table = forms::parse_count("seats_per_table", &form.seats_per_table)?;
    state.planner.tables().configure(num_tables, seats_per_table)?;
    ok(seating_response(&state))
}

/// POST /api/tables/assign - body of `table_<guest id>=<number>` pairs
async fn assign_tables(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> ApiResult<SeatingResponse> {
    let submitted: HashMap<String, String> = form
        .into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(TABLE_FIELD_PREFIX)
                .map(|id| (id.to_string(), value))
        })
        .collect();

    state.planner.tables().bulk_assign(&submitted)?;
    ok(seating_response(&state))
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over a planner.
pub fn router(planner: Planner, permissive_cors: bool) -> Router {
    let state = AppState {
        planner: Arc::new(planner),
    };

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(dashboard))
        .route("/guests", get(list_guests).post(add_guest))
        .route("/guests/search", get(search_guests))
        .route(
            "/guests/:id",
            get(get_guest).post(edit_guest).delete(delete_guest),
        )
        .route("/venues", get(list_venues).post(add_venue))
        .route("/venues/:id", post(edit_venue).delete(delete_venue))
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/:id", post(edit_expense).delete(delete_expense))
        .route("/tasks", get(list_tasks).post(add_task))
        .route("/tasks/progress", get(task_progress))
        .route("/tasks/:id", axum::routing::delete(delete_task))
        .route("/tasks/:id/toggle", post(toggle_task))
        .route("/budget", get(budget))
        .route(
            "/wedding-date",
            get(get_wedding_date)
                .post(set_wedding_date)
                .delete(clear_wedding_date),
        )
        .route("/tables", get(get_tables))
        .route("/tables/config", post(configure_tables))
        .route("/tables/assign", post(assign_tables))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

// ============================================================================
// TESTS
// ============================================================================
