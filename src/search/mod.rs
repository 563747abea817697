pub mod client;
pub mod params;
pub mod response;

pub use client::SearchService;
pub use params::{
    default_parameters, ParamValue, QueryBuilder, SearchParameters, SearchRequest,
};
pub use response::{Document, FieldValue, SearchResponse};
