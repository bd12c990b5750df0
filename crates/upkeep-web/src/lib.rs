//! Axum + Askama dashboard over the catalog, issue knowledge base, and
//! lead intake.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use axum::{
    extract::{Form, Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::warn;
use upkeep_catalog::{load_catalog, CatalogBundle, SearchHit, ServiceRef};
use upkeep_core::{MaintenanceIssue, Season, Severity};
use upkeep_leads::{
    HttpLeadSink, LeadForm, LeadSink, LeadWizard, MemoryLeadSink, SubmissionState, SubmitError,
    ValidationError,
};

pub const CRATE_NAME: &str = "upkeep-web";

pub struct AppState {
    pub catalog: CatalogBundle,
    pub sink: Box<dyn LeadSink>,
}

impl AppState {
    pub fn new(catalog: CatalogBundle, sink: Box<dyn LeadSink>) -> Self {
        Self { catalog, sink }
    }
}

#[derive(Debug, Clone)]
struct CategoryRow {
    id: String,
    name: String,
    description: String,
    icon: String,
    sub_category_count: usize,
    service_count: usize,
}

#[derive(Debug, Clone)]
struct ServiceRow {
    sub_category_id: String,
    name: String,
    description: String,
    duration: String,
    price_min: u32,
    price_max: u32,
    frequency: String,
}

#[derive(Debug, Clone)]
struct SearchRow {
    relevance: u32,
    category_id: String,
    sub_category_id: String,
    name: String,
    description: String,
    price_min: u32,
    price_max: u32,
}

#[derive(Debug, Clone)]
struct IssueRow {
    title: String,
    description: String,
    severity: String,
    estimated_cost: String,
    professional: String,
}

#[derive(Debug, Clone)]
struct CategoryOption {
    id: String,
    name: String,
    selected: bool,
}

#[derive(Debug, Deserialize, Default)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct IssuesQuery {
    severity: Option<String>,
    season: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    total_categories: usize,
    total_services: usize,
    total_issues: usize,
    emergency_issues: usize,
}

#[derive(Template)]
#[template(path = "categories.html")]
struct CategoriesTemplate {
    categories: Vec<CategoryRow>,
}

#[derive(Template)]
#[template(path = "category_detail.html")]
struct CategoryDetailTemplate {
    name: String,
    description: String,
    services: Vec<ServiceRow>,
}

#[derive(Template)]
#[template(path = "search.html")]
struct SearchPageTemplate {
    query: String,
}

#[derive(Template)]
#[template(path = "search_table_partial.html")]
struct SearchTablePartialTemplate {
    hits: Vec<SearchRow>,
}

#[derive(Template)]
#[template(path = "issues.html")]
struct IssuesTemplate {
    issues: Vec<IssueRow>,
}

#[derive(Template)]
#[template(path = "lead_form.html")]
struct LeadFormTemplate {
    form: LeadForm,
    errors: Vec<ValidationError>,
    error_banner: String,
    category_options: Vec<CategoryOption>,
}

#[derive(Template)]
#[template(path = "lead_submitted.html")]
struct LeadSubmittedTemplate {
    lead_id: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/categories", get(categories_handler))
        .route("/categories/{id}", get(category_detail_handler))
        .route("/search", get(search_page_handler))
        .route("/search/table", get(search_table_handler))
        .route("/issues", get(issues_handler))
        .route("/lead", get(lead_form_handler).post(lead_submit_handler))
        .route("/api/stats", get(api_stats_handler))
        .with_state(Arc::new(state))
}

/// Load the catalog from `data_dir` and build the shared state.
pub fn build_state(data_dir: impl AsRef<Path>, sink: Box<dyn LeadSink>) -> anyhow::Result<AppState> {
    Ok(AppState::new(load_catalog(data_dir)?, sink))
}

/// Serve the dashboard over the catalog in `data_dir`. Port and lead
/// endpoint come from `UPKEEP_WEB_PORT` and `UPKEEP_LEAD_ENDPOINT`; an
/// unset endpoint falls back to an in-memory sink.
pub async fn serve(data_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let port: u16 = std::env::var("UPKEEP_WEB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let sink: Box<dyn LeadSink> = match std::env::var("UPKEEP_LEAD_ENDPOINT") {
        Ok(endpoint) => Box::new(HttpLeadSink::new(endpoint, Duration::from_secs(20))?),
        Err(_) => {
            warn!("UPKEEP_LEAD_ENDPOINT not set; leads will be kept in memory only");
            Box::new(MemoryLeadSink::new())
        }
    };
    let state = build_state(data_dir, sink)?;
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// `serve` with the data directory taken from `UPKEEP_DATA_DIR`.
pub async fn serve_from_env() -> anyhow::Result<()> {
    let data_dir =
        std::env::var("UPKEEP_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    serve(data_dir).await
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let registry = &state.catalog.registry;
    let issues = &state.catalog.issues;
    render_html(IndexTemplate {
        total_categories: registry.categories().len(),
        total_services: registry.service_count(),
        total_issues: issues.issue_count(),
        emergency_issues: issues.issues_by_severity(Severity::Emergency).len(),
    })
}

async fn categories_handler(State(state): State<Arc<AppState>>) -> Response {
    let categories = state
        .catalog
        .registry
        .categories()
        .iter()
        .map(|c| CategoryRow {
            id: c.id.clone(),
            name: c.name.clone(),
            description: c.description.clone(),
            icon: c.icon.clone(),
            sub_category_count: c.sub_categories.len(),
            service_count: c.sub_categories.iter().map(|s| s.services.len()).sum(),
        })
        .collect();
    render_html(CategoriesTemplate { categories })
}

async fn category_detail_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> Response {
    let Some(category) = state.catalog.registry.category(&id) else {
        return (StatusCode::NOT_FOUND, Html("Category not found".to_string())).into_response();
    };
    let services = state
        .catalog
        .registry
        .services_by_category(&id)
        .into_iter()
        .map(service_row)
        .collect();
    render_html(CategoryDetailTemplate {
        name: category.name.clone(),
        description: category.description.clone(),
        services,
    })
}

fn service_row(entry: ServiceRef<'_>) -> ServiceRow {
    ServiceRow {
        sub_category_id: entry.sub_category_id.to_string(),
        name: entry.service.name.clone(),
        description: entry.service.description.clone(),
        duration: entry.service.estimated_duration.clone(),
        price_min: entry.service.price_range.min,
        price_max: entry.service.price_range.max,
        frequency: entry.service.frequency.clone(),
    }
}

async fn search_page_handler(Query(query): Query<SearchQuery>) -> Response {
    render_html(SearchPageTemplate {
        query: query.q.unwrap_or_default(),
    })
}

async fn search_table_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let needle = query.q.unwrap_or_default();
    let hits = if needle.trim().is_empty() {
        Vec::new()
    } else {
        state
            .catalog
            .registry
            .search(&needle)
            .into_iter()
            .map(search_row)
            .collect()
    };
    let mut resp = render_html(SearchTablePartialTemplate { hits });
    resp.headers_mut().insert(
        header::HeaderName::from_static("hx-trigger"),
        header::HeaderValue::from_static("searchTableLoaded"),
    );
    resp
}

fn search_row(hit: SearchHit<'_>) -> SearchRow {
    SearchRow {
        relevance: hit.relevance,
        category_id: hit.entry.category_id.to_string(),
        sub_category_id: hit.entry.sub_category_id.to_string(),
        name: hit.entry.service.name.clone(),
        description: hit.entry.service.description.clone(),
        price_min: hit.entry.service.price_range.min,
        price_max: hit.entry.service.price_range.max,
    }
}

async fn issues_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IssuesQuery>,
) -> Response {
    let severity = match parse_filter::<Severity>(query.severity.as_deref()) {
        Ok(value) => value,
        Err(resp) => return resp,
    };
    let season = match parse_filter::<Season>(query.season.as_deref()) {
        Ok(value) => value,
        Err(resp) => return resp,
    };

    let rows: Vec<IssueRow> = state
        .catalog
        .issues
        .filtered_issues(severity, season)
        .into_iter()
        .map(issue_row)
        .collect();
    render_html(IssuesTemplate { issues: rows })
}

fn parse_filter<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, Response>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|err| {
            (StatusCode::BAD_REQUEST, Html(format!("Bad filter: {err}"))).into_response()
        }),
    }
}

fn issue_row(issue: &MaintenanceIssue) -> IssueRow {
    IssueRow {
        title: issue.title.clone(),
        description: issue.description.clone(),
        severity: issue.severity.to_string(),
        estimated_cost: issue.estimated_cost.clone(),
        professional: if issue.professional_required { "yes" } else { "no" }.to_string(),
    }
}

async fn lead_form_handler(State(state): State<Arc<AppState>>) -> Response {
    render_html(lead_form_template(&state, LeadForm::default(), Vec::new(), String::new()))
}

async fn lead_submit_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LeadForm>,
) -> Response {
    let mut wizard = LeadWizard::new();
    *wizard.form_mut() = form.clone();
    let mut submission = SubmissionState::default();
    match wizard.submit(state.sink.as_ref(), &mut submission).await {
        Ok(receipt) => render_html(LeadSubmittedTemplate {
            lead_id: receipt.lead_id.to_string(),
        }),
        Err(SubmitError::Invalid(errors)) => {
            render_html(lead_form_template(&state, form, errors, String::new()))
        }
        Err(SubmitError::Sink(err)) => {
            warn!(error = %err, "lead dispatch failed");
            let banner = "We could not submit your request. Please try again.".to_string();
            render_html(lead_form_template(&state, form, Vec::new(), banner))
        }
    }
}

fn lead_form_template(
    state: &AppState,
    form: LeadForm,
    errors: Vec<ValidationError>,
    error_banner: String,
) -> LeadFormTemplate {
    let category_options = state
        .catalog
        .registry
        .categories()
        .iter()
        .map(|c| CategoryOption {
            selected: c.id == form.category_id,
            id: c.id.clone(),
            name: c.name.clone(),
        })
        .collect();
    LeadFormTemplate {
        form,
        errors,
        error_banner,
        category_options,
    }
}

async fn api_stats_handler(State(state): State<Arc<AppState>>) -> Response {
    let registry = &state.catalog.registry;
    let issues = &state.catalog.issues;
    Json(serde_json::json!({
        "categories": registry.categories().len(),
        "services": registry.service_count(),
        "issues": issues.issue_count(),
        "emergency_issues": issues.issues_by_severity(Severity::Emergency).len(),
    }))
    .into_response()
}

fn render_html<T: Template>(tpl: T) -> Response {
    match tpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => server_error(anyhow::anyhow!(err.to_string())),
    }
}

fn server_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("Server error: {}", err)),
    )
        .into_response()
}
