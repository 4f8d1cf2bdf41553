use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup. Everything has a default so
/// the server runs with no environment at all.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database path (`INVOICE_DATABASE_URL`).
    pub database_url: String,
    /// Listen address (`INVOICE_BIND_ADDR`).
    pub bind_addr: String,
    /// Arabic-capable TrueType font for PDF output (`INVOICE_PDF_FONT`).
    /// When unset and no bundled font is present, PDFs fall back to the
    /// built-in Helvetica family.
    pub pdf_font: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("INVOICE_DATABASE_URL").unwrap_or_else(|_| default_database_path());
        let bind_addr =
            env::var("INVOICE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let pdf_font = env::var("INVOICE_PDF_FONT")
            .map(PathBuf::from)
            .ok()
            .or_else(|| {
                let bundled = PathBuf::from("assets/DejaVuSans.ttf");
                bundled.exists().then_some(bundled)
            });

        AppConfig {
            database_url,
            bind_addr,
            pdf_font,
        }
    }
}

fn default_database_path() -> String {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invoice-manager");
    let _ = std::fs::create_dir_all(&dir);
    dir.join("invoices.db").to_string_lossy().into_owned()
}
