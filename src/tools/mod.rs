pub mod catalog;
pub mod policy;

pub use catalog::CatalogTools;
pub use policy::CatalogTool;
