pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pdf;
pub mod schema;
pub mod shaping;

pub use config::AppConfig;
pub use db::InvoiceStore;
pub use error::AppError;
pub use models::{Invoice, NewInvoice};
