//! HTTP request handlers

use super::state::AppState;
use crate::engines::{Catalog, Engine};
use crate::preferences::{
    resolve, EditError, EditorView, PreferenceEditor, PreferenceError, PreferenceRecord,
};
use crate::search::{build_search_url, select_engine, RedirectError};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{debug, error};

/// Query parameters shared by the search page and the redirect
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Engine id
    pub engine: Option<String>,
}

/// Query parameters for the preferences page
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesParams {
    pub view: Option<EditorView>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub engine: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub from: usize,
    pub to: usize,
}

/// Engine as rendered by the templates
#[derive(Debug, Serialize)]
struct EngineView<'a> {
    id: &'a str,
    image: &'a str,
    dark_image: Option<&'a str>,
    notes: Option<&'a str>,
    enabled: bool,
    /// Enabled and the only one left
    last_enabled: bool,
}

impl<'a> EngineView<'a> {
    fn new(engine: &'a Engine, record: &PreferenceRecord, enabled_count: usize) -> Self {
        let enabled = record.is_enabled(&engine.id);
        Self {
            id: &engine.id,
            image: &engine.image,
            dark_image: engine.dark_image.as_deref(),
            notes: engine.notes.as_deref(),
            enabled,
            last_enabled: enabled && enabled_count == 1,
        }
    }
}

/// Search page handler
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let record = load_or_empty(&state);
    let enabled = resolve(&state.catalog, &record);
    let selected = select_engine(&state.catalog, &enabled, params.engine.as_deref());
    let count = record.enabled_count(&state.catalog);

    let engines: Vec<_> = enabled
        .iter()
        .map(|e| EngineView::new(e, &record, count))
        .collect();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("engines", &engines);
    ctx.insert("selected", &EngineView::new(selected, &record, count));
    ctx.insert("query", params.q.as_deref().unwrap_or(""));

    render(&state, "index.html", &ctx)
}

/// Redirect handler: sends the browser to the engine's search URL
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let requested = params.engine.as_deref().filter(|id| !id.is_empty());
    if let Some(id) = requested {
        if !state.catalog.contains(id) {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unknown search engine: {}", id),
            )
                .into_response();
        }
    }

    let record = load_or_empty(&state);
    let enabled = resolve(&state.catalog, &record);
    let engine = select_engine(&state.catalog, &enabled, requested);

    match build_search_url(engine, params.q.as_deref().unwrap_or("")) {
        Ok(url) => {
            debug!("Redirecting search to {}", engine.id);
            Redirect::to(url.as_str()).into_response()
        }
        Err(RedirectError::EmptyQuery) => {
            Redirect::to(&format!("/?engine={}", urlencoding::encode(&engine.id))).into_response()
        }
        Err(e) => {
            error!("Failed to build search URL: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Preferences page handler
pub async fn preferences(
    State(state): State<AppState>,
    Query(params): Query<PreferencesParams>,
) -> Response {
    let view = params.view.unwrap_or_default();
    match render_preferences(&state, view) {
        Ok(response) => response,
        Err(EditError::Store(PreferenceError::MalformedRecord(e))) => {
            error!("Stored preferences are corrupt: {}", e);
            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("corrupt", &true);
            ctx.insert("view", &view);
            render(&state, "preferences.html", &ctx)
        }
        Err(e) => edit_error_response(e),
    }
}

fn render_preferences(state: &AppState, view: EditorView) -> Result<Response, EditError> {
    let mut editor = PreferenceEditor::new();
    editor.open(&state.store)?;
    editor.set_view(view)?;

    let draft = editor.draft().ok_or(EditError::NotOpen)?;
    let count = draft.enabled_count(&state.catalog);
    let engines: Vec<_> = state
        .catalog
        .iter()
        .map(|e| EngineView::new(e, draft, count))
        .collect();
    let enabled: Vec<_> = editor
        .sorted_enabled(&state.catalog)?
        .into_iter()
        .map(|e| EngineView::new(e, draft, count))
        .collect();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("corrupt", &false);
    ctx.insert("view", &view);
    ctx.insert("engines", &engines);
    ctx.insert("enabled", &enabled);

    Ok(render(state, "preferences.html", &ctx))
}

/// Enable or disable one engine
pub async fn toggle_engine(State(state): State<AppState>, Form(form): Form<ToggleForm>) -> Response {
    match edit(&state, |editor, catalog| editor.toggle(catalog, &form.engine)) {
        Ok(()) => Redirect::to("/preferences?view=toggle").into_response(),
        Err(e) => edit_error_response(e),
    }
}

/// Move an enabled engine to another position
pub async fn move_engine(State(state): State<AppState>, Form(form): Form<MoveForm>) -> Response {
    match edit(&state, |editor, catalog| editor.move_engine(catalog, form.from, form.to)) {
        Ok(()) => Redirect::to("/preferences?view=reorder").into_response(),
        Err(e) => edit_error_response(e),
    }
}

/// Restore catalog defaults, replacing the stored record even if it is corrupt
pub async fn reset_preferences(State(state): State<AppState>) -> Response {
    let mut editor = PreferenceEditor::new();
    editor.open_defaults(&state.catalog);
    match editor.save(&state.store) {
        Ok(()) => Redirect::to("/preferences").into_response(),
        Err(e) => edit_error_response(e),
    }
}

/// Persisted preference record as JSON
pub async fn get_preferences(State(state): State<AppState>) -> Response {
    match state.store.load() {
        Ok(record) => Json(record).into_response(),
        Err(e) => api_error(preference_status(&e), &e),
    }
}

/// Replace the persisted preference record
pub async fn put_preferences(
    State(state): State<AppState>,
    Json(record): Json<PreferenceRecord>,
) -> Response {
    if record.enabled_count(&state.catalog) == 0 {
        return api_error(StatusCode::CONFLICT, &EditError::LastEnabled);
    }
    match state.store.save(&record) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => api_error(preference_status(&e), &e),
    }
}

/// Resolved enabled engines as JSON
pub async fn enabled_engines(State(state): State<AppState>) -> Response {
    match state.store.enabled_engines() {
        Ok(engines) => Json(engines).into_response(),
        Err(e) => api_error(preference_status(&e), &e),
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Open an editor on the persisted record, apply one edit and save
fn edit<F>(state: &AppState, apply: F) -> Result<(), EditError>
where
    F: FnOnce(&mut PreferenceEditor, &Catalog) -> Result<(), EditError>,
{
    let mut editor = PreferenceEditor::new();
    editor.open(&state.store)?;
    apply(&mut editor, &state.catalog)?;
    editor.save(&state.store)
}

/// Load preferences for the search page, treating a broken record as empty
fn load_or_empty(state: &AppState) -> PreferenceRecord {
    match state.store.load() {
        Ok(record) => record,
        Err(e) => {
            error!("Ignoring stored preferences: {}", e);
            PreferenceRecord::new()
        }
    }
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn preference_status(err: &PreferenceError) -> StatusCode {
    match err {
        PreferenceError::RecordTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        _ => {
            error!("Preference store error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn edit_status(err: &EditError) -> StatusCode {
    match err {
        EditError::LastEnabled => StatusCode::CONFLICT,
        EditError::UnknownEngine(_) | EditError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
        EditError::Store(e) => preference_status(e),
        EditError::NotOpen => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn edit_error_response(err: EditError) -> Response {
    (edit_status(&err), err.to_string()).into_response()
}

fn api_error(status: StatusCode, err: &dyn std::error::Error) -> Response {
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}
