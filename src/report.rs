//! Text rendering of search results.
//!
//! Everything here is pure and infallible: missing or empty fields are
//! skipped, never reported.

use crate::search::response::{Document, FieldValue, SearchResponse};

/// Descriptions longer than this are cut and suffixed with `...`.
const MAX_DESCRIPTION_CHARS: usize = 150;

const MAX_PLATFORMS: usize = 3;
const MAX_CATEGORIES: usize = 2;
const MAX_REPOSITORY_TAGS: usize = 5;
const MAX_INDUSTRIES: usize = 3;
const MAX_SPECIALIZATIONS: usize = 3;

/// Facet array entries read per field (two entries per value/count pair).
const DOCUMENT_KIND_FACET_ENTRIES: usize = 10;
const PARTNER_FACET_ENTRIES: usize = 6;

const INDENT: &str = "   ";

/// Extra section appended after the document list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    None,
    Container,
    Partner,
    Facets,
}

/// Render the full report for one operation.
pub fn render(response: &SearchResponse, label: &str, enrichment: Enrichment) -> String {
    let mut report = format_results(response, label);

    let extra = match enrichment {
        Enrichment::None => Vec::new(),
        Enrichment::Container => container_details(response.docs()),
        Enrichment::Partner => partner_details(response.docs()),
        Enrichment::Facets => facet_summary(response),
    };

    if !extra.is_empty() {
        report.push('\n');
        report.push_str(&extra.join("\n"));
    }

    report
}

/// Header plus one block per document.
pub fn format_results(response: &SearchResponse, label: &str) -> String {
    let mut lines = vec![format!("Found {} {}", response.num_found(), label)];

    let docs = response.docs();
    if docs.is_empty() {
        lines.push("No results found".to_string());
        return lines.join("\n");
    }

    for (i, doc) in docs.iter().enumerate() {
        lines.extend(document_lines(i + 1, doc));
    }

    lines.join("\n")
}

fn document_lines(position: usize, doc: &Document) -> Vec<String> {
    let title = doc.text("allTitle").unwrap_or_else(|| "No Title".to_string());
    let mut lines = vec![format!("\n{position}. {title}")];

    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            lines.push(format!("{INDENT}{name}: {value}"));
        }
    };

    push("Type", doc.text("documentKind"));
    push("Partner", doc.text("partnerName"));
    push("Category", doc.text("type"));
    push(
        "Description",
        doc.text("short_description").map(|d| truncate_description(&d)),
    );
    push(
        "Platforms",
        doc.field("target_platforms").map(|v| v.render(MAX_PLATFORMS)),
    );
    push(
        "Categories",
        doc.field("certified_category").map(|v| v.render(MAX_CATEGORIES)),
    );
    push("Last Modified", doc.text("lastModifiedDate"));
    push("URL", doc.text("view_uri"));

    lines
}

/// First 150 characters plus `...` when longer, otherwise unchanged.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        let head: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{head}...")
    } else {
        description.to_string()
    }
}

/// Repository details of every document, as one flat list.
pub fn container_details(docs: &[Document]) -> Vec<String> {
    let mut lines = Vec::new();

    for doc in docs {
        if let Some(repository) = doc.text("repository") {
            lines.push(format!("{INDENT}Repository: {repository}"));
        }
        if let Some(FieldValue::List(tags)) = doc.field("repository_tags") {
            let tags = FieldValue::List(tags).render(MAX_REPOSITORY_TAGS);
            lines.push(format!("{INDENT}Tags: {tags}"));
        }
        if let Some(architecture) = doc.text("architecture") {
            lines.push(format!("{INDENT}Architecture: {architecture}"));
        }
        if let Some(pushed) = doc.text("push_date") {
            lines.push(format!("{INDENT}Last Push: {pushed}"));
        }
    }

    lines
}

/// Partner details of every document, as one flat list.
pub fn partner_details(docs: &[Document]) -> Vec<String> {
    let mut lines = Vec::new();

    for doc in docs {
        match doc.field("industry") {
            Some(list @ FieldValue::List(_)) => {
                lines.push(format!("{INDENT}Industries: {}", list.render(MAX_INDUSTRIES)));
            }
            Some(FieldValue::Scalar(industry)) => {
                lines.push(format!("{INDENT}Industry: {industry}"));
            }
            None => {}
        }
        if let Some(specs @ FieldValue::List(_)) = doc.field("practice_accelerator_specializations")
        {
            lines.push(format!(
                "{INDENT}Specializations: {}",
                specs.render(MAX_SPECIALIZATIONS)
            ));
        }
        if let Some(accreditations) = doc.text("total_accreditations") {
            lines.push(format!("{INDENT}Accreditations: {accreditations}"));
        }
    }

    lines
}

/// Top document kinds and partners from the facet counts.
///
/// Empty when the response carries no facet fields at all.
pub fn facet_summary(response: &SearchResponse) -> Vec<String> {
    if response.facet_fields().is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["\n📊 Search Facets:".to_string()];

    let sections = [
        ("documentKind", "Document Types", DOCUMENT_KIND_FACET_ENTRIES),
        ("partnerName", "Top Partners", PARTNER_FACET_ENTRIES),
    ];

    for (field, heading, max_entries) in sections {
        if !response.has_facet_entries(field) {
            continue;
        }
        lines.push(format!("{INDENT}{heading}:"));
        lines.extend(
            response
                .facet_pairs(field, max_entries)
                .into_iter()
                .map(|(value, count)| format!("{INDENT}  - {value}: {count}")),
        );
    }

    lines
}
