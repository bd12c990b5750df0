//! Catalog loading, registry queries, and the issue knowledge base.
//!
//! Category and issue data live in YAML fragments under a data directory.
//! Fragments are merged in file-name order and validated once at load time;
//! every query after that is a pure scan over in-memory literals and never
//! fails.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use upkeep_core::{
    Category, CostEstimate, IssueCategory, MaintenanceIssue, Season, Service, Severity,
};

pub const CRATE_NAME: &str = "upkeep-catalog";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate {kind} id `{id}` in {scope}")]
    DuplicateId {
        kind: &'static str,
        id: String,
        scope: String,
    },
    #[error("service `{id}`: price range min {min} exceeds max {max}")]
    InvalidPriceRange { id: String, min: u32, max: u32 },
    #[error("issue `{id}`: malformed cost string `{raw}` (expected \"$min-$max\")")]
    MalformedCost { id: String, raw: String },
}

/// Parse a cost band of the form `"$100-$300"` (commas tolerated in the
/// numbers). Returns `None` for anything that does not fit the shape.
pub fn parse_cost_range(raw: &str) -> Option<CostEstimate> {
    let (min_part, max_part) = raw.split_once('-')?;
    let min = parse_dollar_amount(min_part)?;
    let max = parse_dollar_amount(max_part)?;
    Some(CostEstimate { min, max })
}

fn parse_dollar_amount(part: &str) -> Option<u64> {
    let digits: String = part
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Flat view of one service plus where it sits in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRef<'a> {
    pub category_id: &'a str,
    pub sub_category_id: &'a str,
    pub service: &'a Service,
}

/// A service reference annotated with its search relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub relevance: u32,
    pub entry: ServiceRef<'a>,
}

const NAME_WEIGHT: u32 = 3;
const DESCRIPTION_WEIGHT: u32 = 2;
const EXPERTISE_WEIGHT: u32 = 1;

/// All category data sets merged into one browsable, searchable collection.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    categories: Vec<Category>,
}

impl ServiceRegistry {
    /// Build from already-merged categories, rejecting structural defects.
    pub fn from_categories(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "category",
                    id: category.id.clone(),
                    scope: "registry".to_string(),
                });
            }
            let mut sub_ids = HashSet::new();
            for sub in &category.sub_categories {
                if !sub_ids.insert(sub.id.as_str()) {
                    return Err(CatalogError::DuplicateId {
                        kind: "subcategory",
                        id: sub.id.clone(),
                        scope: format!("category `{}`", category.id),
                    });
                }
                let mut service_ids = HashSet::new();
                for service in &sub.services {
                    if !service_ids.insert(service.id.as_str()) {
                        return Err(CatalogError::DuplicateId {
                            kind: "service",
                            id: service.id.clone(),
                            scope: format!("subcategory `{}`", sub.id),
                        });
                    }
                    let range = service.price_range;
                    if range.min > range.max {
                        return Err(CatalogError::InvalidPriceRange {
                            id: service.id.clone(),
                            min: range.min,
                            max: range.max,
                        });
                    }
                }
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn service_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.sub_categories)
            .map(|s| s.services.len())
            .sum()
    }

    /// Every service in registration order: categories, then subcategories,
    /// then services.
    pub fn all_services(&self) -> Vec<ServiceRef<'_>> {
        let mut out = Vec::with_capacity(self.service_count());
        for category in &self.categories {
            for sub in &category.sub_categories {
                for service in &sub.services {
                    out.push(ServiceRef {
                        category_id: &category.id,
                        sub_category_id: &sub.id,
                        service,
                    });
                }
            }
        }
        out
    }

    /// Services under one category; unknown ids yield an empty list.
    pub fn services_by_category(&self, category_id: &str) -> Vec<ServiceRef<'_>> {
        let Some(category) = self.category(category_id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for sub in &category.sub_categories {
            for service in &sub.services {
                out.push(ServiceRef {
                    category_id: &category.id,
                    sub_category_id: &sub.id,
                    service,
                });
            }
        }
        out
    }

    /// Case-insensitive substring search over name, description, and
    /// expertise entries. Relevance sums the matched-field weights; services
    /// matching nothing are omitted. Ties keep catalog iteration order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<SearchHit<'_>> = self
            .all_services()
            .into_iter()
            .filter_map(|entry| {
                let service = entry.service;
                let mut relevance = 0;
                if service.name.to_lowercase().contains(&needle) {
                    relevance += NAME_WEIGHT;
                }
                if service.description.to_lowercase().contains(&needle) {
                    relevance += DESCRIPTION_WEIGHT;
                }
                for expertise in &service.expertise {
                    if expertise.to_lowercase().contains(&needle) {
                        relevance += EXPERTISE_WEIGHT;
                    }
                }
                (relevance > 0).then_some(SearchHit { relevance, entry })
            })
            .collect();
        hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        hits
    }
}

/// Descriptive queries over the static issue list, independent of the
/// service catalog.
#[derive(Debug, Clone, Default)]
pub struct IssueIndex {
    categories: Vec<IssueCategory>,
}

impl IssueIndex {
    /// Build from already-merged issue categories, rejecting duplicate ids
    /// and cost strings that would not parse at estimation time.
    pub fn from_categories(categories: Vec<IssueCategory>) -> Result<Self, CatalogError> {
        let mut issue_ids = HashSet::new();
        for category in &categories {
            for sub in &category.sub_categories {
                for issue in &sub.issues {
                    if !issue_ids.insert(issue.id.as_str()) {
                        return Err(CatalogError::DuplicateId {
                            kind: "issue",
                            id: issue.id.clone(),
                            scope: "issue index".to_string(),
                        });
                    }
                    if parse_cost_range(&issue.estimated_cost).is_none() {
                        return Err(CatalogError::MalformedCost {
                            id: issue.id.clone(),
                            raw: issue.estimated_cost.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[IssueCategory] {
        &self.categories
    }

    pub fn issue_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.sub_categories)
            .map(|s| s.issues.len())
            .sum()
    }

    fn all_issues(&self) -> impl Iterator<Item = &MaintenanceIssue> {
        self.categories
            .iter()
            .flat_map(|c| &c.sub_categories)
            .flat_map(|s| &s.issues)
    }

    /// All issues under every subcategory of the named category; unknown
    /// ids yield an empty list.
    pub fn issues_by_category(&self, category_id: &str) -> Vec<&MaintenanceIssue> {
        self.categories
            .iter()
            .filter(|c| c.id == category_id)
            .flat_map(|c| &c.sub_categories)
            .flat_map(|s| &s.issues)
            .collect()
    }

    /// Issues matching every supplied predicate; a `None` filter matches
    /// everything. Seasonal matching requires seasonal data, so issues
    /// without it never pass a season filter.
    pub fn filtered_issues(
        &self,
        severity: Option<Severity>,
        season: Option<Season>,
    ) -> Vec<&MaintenanceIssue> {
        self.all_issues()
            .filter(|issue| severity.is_none_or(|sev| issue.severity == sev))
            .filter(|issue| {
                season.is_none_or(|season| {
                    issue
                        .seasonal_relevance
                        .as_ref()
                        .is_some_and(|seasons| seasons.contains(&season))
                })
            })
            .collect()
    }

    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&MaintenanceIssue> {
        self.filtered_issues(Some(severity), None)
    }

    /// Issues whose seasonal relevance names the season.
    pub fn seasonal_issues(&self, season: Season) -> Vec<&MaintenanceIssue> {
        self.filtered_issues(None, Some(season))
    }

    /// First issue matching the id in category-order traversal.
    pub fn issue_by_id(&self, issue_id: &str) -> Option<&MaintenanceIssue> {
        self.all_issues().find(|issue| issue.id == issue_id)
    }

    /// Sum the cost bands of the named issues. Unresolvable ids contribute
    /// zero; cost strings are known-parseable from load-time validation.
    pub fn estimate_total_cost<I, S>(&self, issue_ids: I) -> CostEstimate
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut total = CostEstimate::default();
        for id in issue_ids {
            let Some(issue) = self.issue_by_id(id.as_ref()) else {
                continue;
            };
            if let Some(band) = parse_cost_range(&issue.estimated_cost) {
                total.add(band);
            }
        }
        total
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CategoryFragment {
    categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
struct IssueFile {
    categories: Vec<IssueCategory>,
}

/// The fully loaded, validated catalog: service registry plus issue index.
#[derive(Debug, Clone)]
pub struct CatalogBundle {
    pub registry: ServiceRegistry,
    pub issues: IssueIndex,
}

const ISSUES_FILE: &str = "issues.yaml";

/// Load every category fragment plus the issue file from a data directory.
///
/// Fragments are merged in file-name order so registration order is stable
/// across platforms. Validation failures abort the load.
pub fn load_catalog(data_dir: impl AsRef<Path>) -> anyhow::Result<CatalogBundle> {
    let data_dir = data_dir.as_ref();
    let mut fragment_paths = Vec::new();
    for entry in std::fs::read_dir(data_dir)
        .with_context(|| format!("reading data directory {}", data_dir.display()))?
    {
        let entry = entry.with_context(|| format!("listing {}", data_dir.display()))?;
        let path = entry.path();
        let is_yaml = path.extension().is_some_and(|ext| ext == "yaml");
        let is_issues = path.file_name().is_some_and(|name| name == ISSUES_FILE);
        if is_yaml && !is_issues {
            fragment_paths.push(path);
        }
    }
    fragment_paths.sort();

    let mut categories = Vec::new();
    for path in &fragment_paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let fragment: CategoryFragment =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        categories.extend(fragment.categories);
    }

    let issues_path = data_dir.join(ISSUES_FILE);
    let issues_text = std::fs::read_to_string(&issues_path)
        .with_context(|| format!("reading {}", issues_path.display()))?;
    let issue_file: IssueFile = serde_yaml::from_str(&issues_text)
        .with_context(|| format!("parsing {}", issues_path.display()))?;

    let registry = ServiceRegistry::from_categories(categories)
        .with_context(|| format!("validating catalog fragments in {}", data_dir.display()))?;
    let issues = IssueIndex::from_categories(issue_file.categories)
        .with_context(|| format!("validating {}", issues_path.display()))?;

    info!(
        fragments = fragment_paths.len(),
        services = registry.service_count(),
        issues = issues.issue_count(),
        "catalog loaded"
    );
    Ok(CatalogBundle { registry, issues })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use upkeep_core::{IssueSubCategory, PriceRange, SubCategory};

    fn service(id: &str, name: &str, description: &str, expertise: &[&str]) -> Service {
        Service {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            estimated_duration: "1-2 hours".to_string(),
            price_range: PriceRange { min: 80, max: 240 },
            expertise: expertise.iter().map(|e| e.to_string()).collect(),
            materials: vec!["sealant".to_string()],
            frequency: "as needed".to_string(),
            compliance: Vec::new(),
            certifications: Vec::new(),
        }
    }

    fn fixture_registry() -> ServiceRegistry {
        let categories = vec![
            Category {
                id: "plumbing".to_string(),
                name: "Plumbing".to_string(),
                description: "Pipes and fixtures".to_string(),
                icon: "wrench".to_string(),
                sub_categories: vec![
                    SubCategory {
                        id: "leaks".to_string(),
                        name: "Leak Repair".to_string(),
                        description: "Stop water loss".to_string(),
                        services: vec![
                            service("faucet-repair", "Faucet Repair", "Fix a dripping faucet", &["plumber"]),
                            service("pipe-patch", "Pipe Patch", "Patch a leaking pipe run", &["plumber"]),
                        ],
                    },
                    SubCategory {
                        id: "drains".to_string(),
                        name: "Drain Service".to_string(),
                        description: "Clear blockages".to_string(),
                        services: vec![service(
                            "drain-clear",
                            "Drain Clearing",
                            "Auger out a clogged drain",
                            &["plumber", "drain technician"],
                        )],
                    },
                ],
            },
            Category {
                id: "hvac".to_string(),
                name: "HVAC".to_string(),
                description: "Heating and cooling".to_string(),
                icon: "fan".to_string(),
                sub_categories: vec![SubCategory {
                    id: "cooling".to_string(),
                    name: "Cooling".to_string(),
                    description: "Air conditioning".to_string(),
                    services: vec![service(
                        "ac-tune-up",
                        "AC Tune-Up",
                        "Seasonal air conditioner service",
                        &["hvac technician"],
                    )],
                }],
            },
        ];
        ServiceRegistry::from_categories(categories).unwrap()
    }

    fn issue(id: &str, severity: Severity, cost: &str, seasons: Option<Vec<Season>>) -> MaintenanceIssue {
        MaintenanceIssue {
            id: id.to_string(),
            title: format!("Issue {id}"),
            description: "fixture issue".to_string(),
            severity,
            estimated_time: "2 hours".to_string(),
            estimated_cost: cost.to_string(),
            common_causes: vec!["wear".to_string()],
            preventive_measures: vec!["inspection".to_string()],
            required_tools: Vec::new(),
            professional_required: true,
            seasonal_relevance: seasons,
        }
    }

    fn fixture_issues() -> IssueIndex {
        let categories = vec![
            IssueCategory {
                id: "plumbing".to_string(),
                name: "Plumbing".to_string(),
                sub_categories: vec![IssueSubCategory {
                    id: "leaks".to_string(),
                    name: "Leaks".to_string(),
                    issues: vec![
                        issue("burst-pipe", Severity::Emergency, "$500-$2,000", Some(vec![Season::Winter])),
                        issue("dripping-faucet", Severity::Low, "$100-$300", None),
                    ],
                }],
            },
            IssueCategory {
                id: "hvac".to_string(),
                name: "HVAC".to_string(),
                sub_categories: vec![IssueSubCategory {
                    id: "cooling".to_string(),
                    name: "Cooling".to_string(),
                    issues: vec![issue(
                        "weak-airflow",
                        Severity::Medium,
                        "$50-$150",
                        Some(vec![Season::Summer]),
                    )],
                }],
            },
        ];
        IssueIndex::from_categories(categories).unwrap()
    }

    #[test]
    fn service_count_matches_nested_lists() {
        let registry = fixture_registry();
        let nested: usize = registry
            .categories()
            .iter()
            .flat_map(|c| &c.sub_categories)
            .map(|s| s.services.len())
            .sum();
        assert_eq!(registry.service_count(), nested);
        assert_eq!(registry.service_count(), 4);
    }

    #[test]
    fn services_by_category_is_exact_and_ordered() {
        let registry = fixture_registry();
        let plumbing = registry.services_by_category("plumbing");
        let ids: Vec<&str> = plumbing.iter().map(|r| r.service.id.as_str()).collect();
        assert_eq!(ids, ["faucet-repair", "pipe-patch", "drain-clear"]);
        assert!(plumbing.iter().all(|r| r.category_id == "plumbing"));
    }

    #[test]
    fn unknown_category_returns_empty() {
        let registry = fixture_registry();
        assert!(registry.services_by_category("landscaping").is_empty());
        let issues = fixture_issues();
        assert!(issues.issues_by_category("landscaping").is_empty());
    }

    #[test]
    fn search_weights_and_omits_non_matches() {
        let registry = fixture_registry();
        let hits = registry.search("drain");
        // "Drain Clearing" matches name (3) + description (2) + one
        // expertise entry (1) = 6.
        assert_eq!(hits[0].entry.service.id, "drain-clear");
        assert_eq!(hits[0].relevance, 6);
        assert!(hits.iter().all(|h| h.relevance > 0));
        assert!(registry.search("chimney").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let registry = fixture_registry();
        let upper = registry.search("FAUCET");
        let lower = registry.search("faucet");
        assert_eq!(upper.len(), lower.len());
        assert_eq!(upper[0].entry.service.id, "faucet-repair");
    }

    #[test]
    fn search_ties_keep_catalog_order() {
        let registry = fixture_registry();
        // "plumber" matches only expertise for both leak services.
        let hits = registry.search("plumber");
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.service.id.as_str()).collect();
        assert_eq!(ids, ["faucet-repair", "pipe-patch", "drain-clear"]);
        assert!(hits.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }

    #[test]
    fn issue_lookup_round_trips() {
        let issues = fixture_issues();
        for found in issues.issues_by_category("plumbing") {
            let by_id = issues.issue_by_id(&found.id).unwrap();
            assert_eq!(by_id, found);
        }
        assert!(issues.issue_by_id("nope").is_none());
    }

    #[test]
    fn severity_filter_is_exact() {
        let issues = fixture_issues();
        let emergencies = issues.issues_by_severity(Severity::Emergency);
        assert_eq!(emergencies.len(), 1);
        assert_eq!(emergencies[0].id, "burst-pipe");
        assert!(issues.issues_by_severity(Severity::High).is_empty());
    }

    #[test]
    fn seasonal_filter_skips_unseasonal_issues() {
        let issues = fixture_issues();
        let winter = issues.seasonal_issues(Season::Winter);
        assert_eq!(winter.len(), 1);
        assert_eq!(winter[0].id, "burst-pipe");
        assert!(issues.seasonal_issues(Season::Spring).is_empty());
    }

    #[test]
    fn combined_filter_applies_both_predicates() {
        let issues = fixture_issues();
        let both = issues.filtered_issues(Some(Severity::Emergency), Some(Season::Winter));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "burst-pipe");
        assert!(issues
            .filtered_issues(Some(Severity::Low), Some(Season::Winter))
            .is_empty());
        assert_eq!(issues.filtered_issues(None, None).len(), issues.issue_count());
    }

    #[test]
    fn cost_estimation_sums_bands() {
        let issues = fixture_issues();
        let total = issues.estimate_total_cost(["dripping-faucet", "weak-airflow"]);
        assert_eq!(total, CostEstimate { min: 150, max: 450 });
    }

    #[test]
    fn cost_estimation_empty_and_unknown_ids() {
        let issues = fixture_issues();
        assert_eq!(issues.estimate_total_cost(Vec::<String>::new()), CostEstimate::default());
        let total = issues.estimate_total_cost(["dripping-faucet", "not-an-issue"]);
        assert_eq!(total, CostEstimate { min: 100, max: 300 });
    }

    #[test]
    fn cost_parser_handles_commas_and_rejects_junk() {
        assert_eq!(
            parse_cost_range("$1,500-$3,000"),
            Some(CostEstimate { min: 1500, max: 3000 })
        );
        assert_eq!(parse_cost_range("$100-$300"), Some(CostEstimate { min: 100, max: 300 }));
        assert!(parse_cost_range("$100").is_none());
        assert!(parse_cost_range("cheap-expensive").is_none());
        assert!(parse_cost_range("").is_none());
    }

    #[test]
    fn duplicate_category_id_is_rejected() {
        let category = Category {
            id: "plumbing".to_string(),
            name: "Plumbing".to_string(),
            description: String::new(),
            icon: "wrench".to_string(),
            sub_categories: Vec::new(),
        };
        let err = ServiceRegistry::from_categories(vec![category.clone(), category]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "category", .. }));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let mut bad = service("bad", "Bad", "inverted band", &[]);
        bad.price_range = PriceRange { min: 500, max: 100 };
        let categories = vec![Category {
            id: "c".to_string(),
            name: "C".to_string(),
            description: String::new(),
            icon: "x".to_string(),
            sub_categories: vec![SubCategory {
                id: "s".to_string(),
                name: "S".to_string(),
                description: String::new(),
                services: vec![bad],
            }],
        }];
        let err = ServiceRegistry::from_categories(categories).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPriceRange { .. }));
    }

    #[test]
    fn malformed_cost_string_fails_load() {
        let categories = vec![IssueCategory {
            id: "c".to_string(),
            name: "C".to_string(),
            sub_categories: vec![IssueSubCategory {
                id: "s".to_string(),
                name: "S".to_string(),
                issues: vec![issue("bad-cost", Severity::Low, "call for quote", None)],
            }],
        }];
        let err = IssueIndex::from_categories(categories).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedCost { .. }));
    }

    #[test]
    fn loader_merges_fragments_in_file_name_order() {
        let dir = tempdir().expect("tempdir");
        let mut write = |name: &str, body: &str| {
            let mut file = std::fs::File::create(dir.path().join(name)).expect("create");
            file.write_all(body.as_bytes()).expect("write");
        };
        write(
            "a_first.yaml",
            r#"
categories:
  - id: electrical
    name: Electrical
    description: Wiring and panels
    icon: bolt
    sub_categories:
      - id: panels
        name: Panels
        description: Breaker panels
        services:
          - id: panel-inspect
            name: Panel Inspection
            description: Inspect a breaker panel
            estimated_duration: 1-2 hours
            price_range: { min: 120, max: 250 }
            expertise: [electrician]
            materials: []
            frequency: yearly
"#,
        );
        write(
            "b_second.yaml",
            r#"
categories:
  - id: pest
    name: Pest Control
    description: Inspection and treatment
    icon: bug
    sub_categories:
      - id: inspection
        name: Inspection
        description: Find infestations
        services:
          - id: termite-inspect
            name: Termite Inspection
            description: Inspect for termites
            estimated_duration: 2-3 hours
            price_range: { min: 90, max: 180 }
            expertise: [pest inspector]
            materials: []
            frequency: yearly
"#,
        );
        write(
            "issues.yaml",
            r#"
categories:
  - id: electrical
    name: Electrical
    sub_categories:
      - id: panels
        name: Panels
        issues:
          - id: tripped-breaker
            title: Breaker keeps tripping
            description: A circuit breaker trips repeatedly
            severity: severe
            estimated_time: 1-3 hours
            estimated_cost: $150-$400
            common_causes: [overloaded circuit]
            preventive_measures: [load audit]
            professional_required: true
"#,
        );

        let bundle = load_catalog(dir.path()).expect("load");
        let ids: Vec<&str> = bundle
            .registry
            .categories()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["electrical", "pest"]);
        assert_eq!(bundle.registry.service_count(), 2);
        // Legacy severity word normalized on the way in.
        let breaker = bundle.issues.issue_by_id("tripped-breaker").unwrap();
        assert_eq!(breaker.severity, Severity::High);
    }

    #[test]
    fn loader_rejects_duplicate_ids_across_fragments() {
        let dir = tempdir().expect("tempdir");
        let fragment = r#"
categories:
  - id: plumbing
    name: Plumbing
    description: Pipes
    icon: wrench
    sub_categories: []
"#;
        std::fs::write(dir.path().join("one.yaml"), fragment).expect("write");
        std::fs::write(dir.path().join("two.yaml"), fragment).expect("write");
        std::fs::write(dir.path().join("issues.yaml"), "categories: []").expect("write");
        assert!(load_catalog(dir.path()).is_err());
    }
}
