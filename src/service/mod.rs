pub mod dashboard;
pub mod inactivity;
pub mod inventory;
pub mod labels;
pub mod products;
pub mod reconciliation;
pub mod report;
pub mod summary;

pub use labels::{format_document_id, product_display_name};
pub use report::{ReportService, SalesFilter};
