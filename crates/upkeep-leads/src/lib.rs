//! Lead intake: the three-step request wizard and submission sinks.
//!
//! Validation runs over the whole form; each wizard step only surfaces the
//! errors for the fields it owns, so a visitor cannot advance past a step
//! with problems but is never blamed for fields they have not seen yet.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use upkeep_core::{Lead, Urgency};
use uuid::Uuid;

pub const CRATE_NAME: &str = "upkeep-leads";

/// Category id that triggers the business-identity fields.
pub const COMMERCIAL_CATEGORY_ID: &str = "commercial";

/// Raw wizard state as typed in by the visitor. Everything is a string
/// until submission; `into_lead` produces the dispatch shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
}

impl LeadForm {
    fn is_commercial(&self) -> bool {
        self.category_id == COMMERCIAL_CATEGORY_ID
    }

    fn parsed_urgency(&self) -> Option<Urgency> {
        self.urgency.parse().ok()
    }

    /// Build the dispatch record. Only valid after `validate` returns empty.
    pub fn into_lead(self) -> Lead {
        let urgency = self.parsed_urgency().unwrap_or(Urgency::Emergency);
        let optional = |s: String| if s.trim().is_empty() { None } else { Some(s) };
        Lead {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            category_id: self.category_id,
            sub_category_id: self.sub_category_id,
            urgency,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            description: self.description,
            business_name: optional(self.business_name),
            contact_person: optional(self.contact_person),
            preferred_date: optional(self.preferred_date),
            preferred_time: optional(self.preferred_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ServiceSelection,
    UrgencyDetails,
    ContactDetails,
}

impl WizardStep {
    /// Form fields the step owns, used to partition validation errors.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::ServiceSelection => &["category_id", "sub_category_id"],
            WizardStep::UrgencyDetails => &["urgency", "preferred_date", "preferred_time"],
            WizardStep::ContactDetails => &[
                "name",
                "email",
                "phone",
                "address",
                "description",
                "business_name",
                "contact_person",
            ],
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::ServiceSelection => Some(WizardStep::UrgencyDetails),
            WizardStep::UrgencyDetails => Some(WizardStep::ContactDetails),
            WizardStep::ContactDetails => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::ServiceSelection => None,
            WizardStep::UrgencyDetails => Some(WizardStep::ServiceSelection),
            WizardStep::ContactDetails => Some(WizardStep::UrgencyDetails),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn required(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError {
            field,
            message: format!("{label} is required"),
        });
    }
}

/// Validate the whole form. Step transitions filter this list down to the
/// current step's fields; final submission requires it to be empty.
pub fn validate(form: &LeadForm) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    required(&mut errors, "category_id", &form.category_id, "Category");
    required(&mut errors, "sub_category_id", &form.sub_category_id, "Subcategory");

    match form.parsed_urgency() {
        None => errors.push(ValidationError {
            field: "urgency",
            message: "Select emergency or scheduled service".to_string(),
        }),
        Some(Urgency::Scheduled) => {
            required(&mut errors, "preferred_date", &form.preferred_date, "Preferred date");
            required(&mut errors, "preferred_time", &form.preferred_time, "Preferred time");
        }
        Some(Urgency::Emergency) => {}
    }

    required(&mut errors, "name", &form.name, "Name");
    if form.email.trim().is_empty() {
        errors.push(ValidationError {
            field: "email",
            message: "Email is required".to_string(),
        });
    } else if !form.email.contains('@') {
        errors.push(ValidationError {
            field: "email",
            message: "Email address is not valid".to_string(),
        });
    }
    if form.phone.chars().filter(|c| c.is_ascii_digit()).count() < 7 {
        errors.push(ValidationError {
            field: "phone",
            message: "Phone number is not valid".to_string(),
        });
    }
    required(&mut errors, "address", &form.address, "Service address");
    required(&mut errors, "description", &form.description, "Issue description");

    if form.is_commercial() {
        required(&mut errors, "business_name", &form.business_name, "Business name");
        required(&mut errors, "contact_person", &form.contact_person, "Contact person");
    }

    errors
}

/// The full-form error list restricted to the fields the step owns.
pub fn errors_for_step(form: &LeadForm, step: WizardStep) -> Vec<ValidationError> {
    let fields = step.fields();
    validate(form)
        .into_iter()
        .filter(|err| fields.contains(&err.field))
        .collect()
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("lead intake rejected the request with status {status}")]
    Rejected { status: u16 },
    #[error("lead dispatch failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub lead_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// Destination for validated leads. Injected into the web layer so tests
/// can substitute an in-memory double for the HTTP endpoint.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, lead: &Lead) -> Result<LeadReceipt, LeadError>;
}

/// Single-shot JSON POST to the external lead-intake endpoint. No retry,
/// no partial success: the lead either lands or the error surfaces.
#[derive(Debug)]
pub struct HttpLeadSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLeadSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building lead intake client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LeadSink for HttpLeadSink {
    async fn submit(&self, lead: &Lead) -> Result<LeadReceipt, LeadError> {
        info!(lead_id = %lead.id, category = %lead.category_id, "dispatching lead");
        let resp = self.client.post(&self.endpoint).json(lead).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LeadError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(LeadReceipt {
            lead_id: lead.id,
            submitted_at: lead.submitted_at,
        })
    }
}

/// In-memory sink for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryLeadSink {
    leads: Mutex<Vec<Lead>>,
    reject: bool,
}

impl MemoryLeadSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every submission, for failure-path tests.
    pub fn rejecting() -> Self {
        Self {
            leads: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub async fn submitted(&self) -> Vec<Lead> {
        self.leads.lock().await.clone()
    }
}

#[async_trait]
impl LeadSink for MemoryLeadSink {
    async fn submit(&self, lead: &Lead) -> Result<LeadReceipt, LeadError> {
        if self.reject {
            return Err(LeadError::Rejected { status: 503 });
        }
        self.leads.lock().await.push(lead.clone());
        Ok(LeadReceipt {
            lead_id: lead.id,
            submitted_at: lead.submitted_at,
        })
    }
}

/// In-flight tracking for a submission. `finish` runs on both outcomes so
/// the flag can never stay stuck after a failed dispatch.
#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    in_flight: bool,
    last_error: Option<String>,
}

impl SubmissionState {
    pub fn begin(&mut self) {
        self.in_flight = true;
        self.last_error = None;
    }

    pub fn finish(&mut self, error: Option<String>) {
        self.in_flight = false;
        self.last_error = error;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has {} validation error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error(transparent)]
    Sink(#[from] LeadError),
}

/// Wizard state machine: step pointer plus the form being filled in.
#[derive(Debug, Clone, Default)]
pub struct LeadWizard {
    step: Option<WizardStep>,
    form: LeadForm,
}

impl LeadWizard {
    pub fn new() -> Self {
        Self {
            step: Some(WizardStep::ServiceSelection),
            form: LeadForm::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step.unwrap_or(WizardStep::ServiceSelection)
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LeadForm {
        &mut self.form
    }

    /// Move to the next step if the current one validates cleanly.
    pub fn advance(&mut self) -> Result<WizardStep, Vec<ValidationError>> {
        let current = self.step();
        let errors = errors_for_step(&self.form, current);
        if !errors.is_empty() {
            return Err(errors);
        }
        let next = current.next().unwrap_or(current);
        self.step = Some(next);
        Ok(next)
    }

    pub fn back(&mut self) -> WizardStep {
        let previous = self.step().previous().unwrap_or(WizardStep::ServiceSelection);
        self.step = Some(previous);
        previous
    }

    /// Re-validate the whole form, dispatch through the sink, and reset to
    /// step one on success. The form survives a failed dispatch so the
    /// visitor can retry without retyping.
    pub async fn submit(
        &mut self,
        sink: &dyn LeadSink,
        state: &mut SubmissionState,
    ) -> Result<LeadReceipt, SubmitError> {
        let errors = validate(&self.form);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        state.begin();
        let lead = self.form.clone().into_lead();
        match sink.submit(&lead).await {
            Ok(receipt) => {
                state.finish(None);
                *self = LeadWizard::new();
                Ok(receipt)
            }
            Err(err) => {
                state.finish(Some(err.to_string()));
                Err(SubmitError::Sink(err))
            }
        }
    }
}
