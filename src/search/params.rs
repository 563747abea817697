//! Query construction for upstream search requests.
//!
//! A request is assembled from three layers, later layers winning on key
//! collision: the fixed [`default_parameters`], the caller's query and
//! paging values, then the operation's filter policy as `fq`. Multi-valued
//! entries (`fq`, `facet.field`) stay lists so the executor can emit them as
//! repeated `key=value` pairs.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Deserialize;

/// Upper bound applied to the caller's `rows`.
pub const MAX_ROWS: i64 = 50;

/// Default page size when the caller leaves `rows` out.
pub const DEFAULT_ROWS: i64 = 10;

const RESULT_FIELDS: &[&str] = &[
    "id",
    "documentKind",
    "allTitle",
    "view_uri",
    "logo_uri",
    "partnerName",
    "short_description",
    "type",
    "target_platforms",
    "certified_RedHat_Platforms",
    "certified_category",
    "lastModifiedDate",
    "partners",
    "repository",
    "display_data_short_description",
    "push_date",
    "total_accreditations",
    "partnerProductNamespace",
    "partnerProductName",
    "architecture",
    "catalog_url_id",
    "practice_accelerator_specializations",
    "subcategories",
    "repository_tags",
    "industry",
    "freshness_grades_json",
    "secondary_partners",
    "practice_accelerator_specializations_count",
    "certification_developer_count",
    "certification_delivery_count",
    "certification_support_engineer_count",
    "credential_seller_count",
    "credential_tech_seller_count",
];

const FACET_FIELDS: &[&str] = &[
    "{!ex=documentKind_tag}documentKind",
    "{!ex=partnerName_tag}partnerName",
    "{!ex=platform_tag}target_platforms",
    "{!ex=industry_tag}industry",
    "{!ex=subcategories_tag}subcategories",
];

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    /// Sent as one `key=value` pair per entry, in order.
    Multi(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Ordered parameter map ready for encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters(IndexMap<String, ParamValue>);

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value of a single-valued key.
    pub fn single(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            ParamValue::Single(value) => Some(value),
            ParamValue::Multi(_) => None,
        }
    }

    /// Values of a key, whichever shape it has.
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(ParamValue::Single(value)) => vec![value.as_str()],
            Some(ParamValue::Multi(values)) => values.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: SearchParameters) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Flatten into `(key, value)` pairs: every single-valued entry first,
    /// then each multi-valued entry expanded into repeated pairs.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .0
            .iter()
            .filter_map(|(key, value)| match value {
                ParamValue::Single(v) => Some((key.as_str(), v.as_str())),
                ParamValue::Multi(_) => None,
            })
            .collect();

        for (key, value) in &self.0 {
            if let ParamValue::Multi(values) = value {
                pairs.extend(values.iter().map(|v| (key.as_str(), v.as_str())));
            }
        }

        pairs
    }
}

/// The fixed parameters every upstream request carries.
pub fn default_parameters() -> SearchParameters {
    let mut params = SearchParameters::new();
    params.set("redhat_client", "ecosystem-catalog");
    params.set("enableElevation", "false");
    params.set("wt", "json");
    params.set("altQueryFields", "true");
    params.set("omitHeader", "false");
    params.set("sort", "score desc");
    params.set("facet", "true");
    params.set("facet.limit", "-1");
    params.set("facet.mincount", "1");
    params.set("fl", RESULT_FIELDS.join(","));
    params.set("f.target_platforms.facet.method", "enum");
    params.set(
        "facet.field",
        FACET_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>(),
    );
    params
}

pub(crate) fn default_rows() -> i64 {
    DEFAULT_ROWS
}

/// Caller input shared by every catalog operation.
///
/// Also the argument schema of the general catalog tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchRequest {
    #[schemars(description = "Search terms, matched against titles and descriptions")]
    pub query: String,
    #[serde(default)]
    #[schemars(description = "Offset of the first result (default 0)")]
    pub start: i64,
    #[serde(default = "default_rows")]
    #[schemars(description = "Results per page, at most 50 (default 10)")]
    pub rows: i64,
    /// Extra kind restriction, honored by the general search only.
    #[serde(default)]
    #[schemars(description = "Restrict to these document kinds, e.g. [\"CertifiedSoftware\"]")]
    pub document_kinds: Option<Vec<String>>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: 0,
            rows: DEFAULT_ROWS,
            document_kinds: None,
        }
    }

    pub fn page(mut self, start: i64, rows: i64) -> Self {
        self.start = start;
        self.rows = rows;
        self
    }

    pub fn kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_kinds = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    /// `rows` bounded above by [`MAX_ROWS`]. Negative values pass through.
    pub fn clamped_rows(&self) -> i64 {
        self.rows.min(MAX_ROWS)
    }
}

/// Builds the `(documentKind:A OR documentKind:B)` clause, or `None` for an
/// empty list.
pub fn kind_clause(kinds: &[String]) -> Option<String> {
    if kinds.is_empty() {
        return None;
    }
    let joined = kinds
        .iter()
        .map(|kind| format!("documentKind:{kind}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    Some(format!("({joined})"))
}

/// Merges defaults, caller input and a filter policy into one request.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    defaults: SearchParameters,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(default_parameters())
    }
}

impl QueryBuilder {
    pub fn new(defaults: SearchParameters) -> Self {
        Self { defaults }
    }

    /// Build the parameters for one call.
    ///
    /// `extra_kinds` is only passed by the general search; every other
    /// operation sends its policy unchanged.
    pub fn build(
        &self,
        filters: &[&str],
        request: &SearchRequest,
        extra_kinds: Option<&[String]>,
    ) -> SearchParameters {
        let mut params = self.defaults.clone();

        let mut caller = SearchParameters::new();
        caller.set("q", request.query.as_str());
        caller.set("start", request.start.to_string());
        caller.set("rows", request.clamped_rows().to_string());
        params.merge(caller);

        let mut fq: Vec<String> = filters.iter().map(|clause| clause.to_string()).collect();
        if let Some(clause) = extra_kinds.and_then(kind_clause) {
            fq.push(clause);
        }
        params.set("fq", fq);

        params
    }
}
