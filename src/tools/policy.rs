//! The six catalog tools and their fixed filter policies.

use crate::report::Enrichment;

const TRADITIONAL_APPLICATION: &str = "(*:* -type:\"traditional application\") OR (type:\"traditional application\" AND certification_level:\"Vendor validated\")";
const NO_VULNERABILITY_SCANNERS: &str = "-type:\"Vulnerability Scanner\"";

const CERTIFIED_SOFTWARE: &[&str] = &[
    "documentKind:CertifiedSoftware OR (documentKind:EcoSolution)",
    TRADITIONAL_APPLICATION,
    NO_VULNERABILITY_SCANNERS,
];

const CONTAINER_REPOSITORIES: &[&str] = &[
    "documentKind:ContainerRepository AND NOT release_categories:Deprecated",
    "documentKind:ContainerProductListing",
];

const BUSINESS_PARTNERS: &[&str] = &["documentKind:BusinessPartner"];

const CERTIFIED_HARDWARE: &[&str] =
    &["documentKind:CertifiedHardware AND NOT certified_category:\"Cloud Instance Type\""];

const CLOUD_SOLUTIONS: &[&str] = &[
    "certified_category:(\"Cloud Instance Type\" OR \"Cloud Image\") AND NOT certified_category:\"Cloud Instance\"",
];

const GENERAL_CATALOG: &[&str] = &[
    "documentKind:BusinessPartner OR documentKind:EcoSolution OR (documentKind:CertifiedSoftware) OR (documentKind:ContainerProductListing) OR (certified_category:(\"Cloud Instance Type\" OR \"Cloud Image\") AND NOT certified_category:\"Cloud Instance\") OR (documentKind:CertifiedHardware AND NOT certified_category:\"Cloud Instance Type\") OR (documentKind:ContainerRepository AND NOT release_categories:Deprecated)",
    TRADITIONAL_APPLICATION,
    NO_VULNERABILITY_SCANNERS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTool {
    CertifiedSoftware,
    ContainerRepositories,
    BusinessPartners,
    CertifiedHardware,
    CloudSolutions,
    GeneralCatalog,
}

impl CatalogTool {
    pub const ALL: [CatalogTool; 6] = [
        Self::CertifiedSoftware,
        Self::ContainerRepositories,
        Self::BusinessPartners,
        Self::CertifiedHardware,
        Self::CloudSolutions,
        Self::GeneralCatalog,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CertifiedSoftware => "search_certified_software",
            Self::ContainerRepositories => "search_container_repositories",
            Self::BusinessPartners => "search_business_partners",
            Self::CertifiedHardware => "search_certified_hardware",
            Self::CloudSolutions => "search_cloud_solutions",
            Self::GeneralCatalog => "general_catalog_search",
        }
    }

    /// `fq` clauses sent with every call of this tool.
    pub fn filters(self) -> &'static [&'static str] {
        match self {
            Self::CertifiedSoftware => CERTIFIED_SOFTWARE,
            Self::ContainerRepositories => CONTAINER_REPOSITORIES,
            Self::BusinessPartners => BUSINESS_PARTNERS,
            Self::CertifiedHardware => CERTIFIED_HARDWARE,
            Self::CloudSolutions => CLOUD_SOLUTIONS,
            Self::GeneralCatalog => GENERAL_CATALOG,
        }
    }

    /// Noun phrase used in the report header.
    pub fn label(self) -> &'static str {
        match self {
            Self::CertifiedSoftware => "certified software items",
            Self::ContainerRepositories => "container repositories",
            Self::BusinessPartners => "business partners",
            Self::CertifiedHardware => "certified hardware items",
            Self::CloudSolutions => "cloud solutions",
            Self::GeneralCatalog => "catalog items",
        }
    }

    pub fn enrichment(self) -> Enrichment {
        match self {
            Self::ContainerRepositories => Enrichment::Container,
            Self::BusinessPartners => Enrichment::Partner,
            Self::GeneralCatalog => Enrichment::Facets,
            _ => Enrichment::None,
        }
    }

    /// Whether the caller's `document_kinds` is honored.
    pub fn accepts_kind_filter(self) -> bool {
        self == Self::GeneralCatalog
    }

    /// Prefix of the text returned when the search fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::CertifiedSoftware => "Error searching certified software",
            Self::ContainerRepositories => "Error searching container repositories",
            Self::BusinessPartners => "Error searching business partners",
            Self::CertifiedHardware => "Error searching certified hardware",
            Self::CloudSolutions => "Error searching cloud solutions",
            Self::GeneralCatalog => "Error in general catalog search",
        }
    }
}
