//! Core domain model for the Upkeep maintenance marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CRATE_NAME: &str = "upkeep-core";

/// Inclusive price band for a service, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

/// A purchasable leaf offering. Immutable after catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub estimated_duration: String,
    pub price_range: PriceRange,
    pub expertise: Vec<String>,
    pub materials: Vec<String>,
    pub frequency: String,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub sub_categories: Vec<SubCategory>,
}

/// Unified severity scale. The legacy data files used a parallel
/// `minor|moderate|severe|emergency` taxonomy for the same entities; those
/// words are accepted as aliases on the way in and never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "minor")]
    Low,
    #[serde(alias = "moderate")]
    Medium,
    #[serde(alias = "severe")]
    High,
    Emergency,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" | "minor" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" | "severe" => Ok(Severity::High),
            "emergency" => Ok(Severity::Emergency),
            other => Err(format!("unknown severity `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unknown season `{other}`")),
        }
    }
}

/// How soon the visitor needs the work done; drives the wizard's
/// conditional scheduling fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Emergency,
    Scheduled,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Urgency::Emergency => "emergency",
            Urgency::Scheduled => "scheduled",
        })
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(Urgency::Emergency),
            "scheduled" => Ok(Urgency::Scheduled),
            other => Err(format!("unknown urgency `{other}`")),
        }
    }
}

/// A diagnosable maintenance problem, distinct from a purchasable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceIssue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub estimated_time: String,
    /// Free-text band of the form `"$min-$max"`; validated at catalog load.
    pub estimated_cost: String,
    pub common_causes: Vec<String>,
    pub preventive_measures: Vec<String>,
    #[serde(default)]
    pub required_tools: Vec<String>,
    pub professional_required: bool,
    #[serde(default)]
    pub seasonal_relevance: Option<Vec<Season>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSubCategory {
    pub id: String,
    pub name: String,
    pub issues: Vec<MaintenanceIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCategory {
    pub id: String,
    pub name: String,
    pub sub_categories: Vec<IssueSubCategory>,
}

/// Summed cost band across a set of issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    pub min: u64,
    pub max: u64,
}

impl CostEstimate {
    pub fn add(&mut self, other: CostEstimate) {
        self.min += other.min;
        self.max += other.max;
    }
}

/// A submitted service request as dispatched to the lead-intake endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub category_id: String,
    pub sub_category_id: String,
    pub urgency: Urgency,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
}
