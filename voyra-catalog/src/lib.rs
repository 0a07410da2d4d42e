pub mod service;

pub use service::ProductCatalogService;
