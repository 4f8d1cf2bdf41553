//! HTTP surface: the creation form, the create/list flow and the PDF
//! download, wired into an axum router around an explicitly constructed
//! [`InvoiceStore`].

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tower_http::trace::TraceLayer;

use crate::db::InvoiceStore;
use crate::error::AppError;
use crate::models::{Invoice, NewInvoice, line_total};
use crate::pdf;

#[derive(Clone)]
pub struct AppState {
    pub store: InvoiceStore,
    templates: Arc<Tera>,
    pdf_font: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: InvoiceStore, pdf_font: Option<PathBuf>) -> Result<Self, AppError> {
        let mut templates = Tera::default();
        templates.add_raw_templates(vec![
            ("index.html", include_str!("../templates/index.html")),
            ("list.html", include_str!("../templates/list.html")),
        ])?;
        Ok(AppState {
            store,
            templates: Arc::new(templates),
            pdf_font,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create", post(create_invoice))
        .route("/invoices", get(list_invoices))
        .route("/download/{id}", get(download_invoice))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw form fields. Everything arrives as text; parsing and bounds checks
/// happen in [`CreateInvoiceForm::into_new_invoice`] so that a missing or
/// malformed field becomes a 400 rather than a generic rejection.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceForm {
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    client_address: String,
    #[serde(default)]
    item_name: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    price_per_item: String,
    #[serde(default)]
    invoice_type: String,
}

impl CreateInvoiceForm {
    fn into_new_invoice(self) -> Result<NewInvoice, AppError> {
        let client_name = required_text("client_name", self.client_name, 200)?;
        let client_address = required_text("client_address", self.client_address, 500)?;
        let item_name = required_text("item_name", self.item_name, 200)?;
        let invoice_type = required_text("invoice_type", self.invoice_type, 50)?;

        let quantity: i32 = self.quantity.trim().parse().map_err(|_| AppError::Validation {
            field: "quantity",
            message: format!("'{}' is not an integer", self.quantity.trim()),
        })?;
        let price_per_item: f64 =
            self.price_per_item.trim().parse().map_err(|_| AppError::Validation {
                field: "price_per_item",
                message: format!("'{}' is not a number", self.price_per_item.trim()),
            })?;

        Ok(NewInvoice {
            total: line_total(quantity, price_per_item),
            client_name,
            client_address,
            item_name,
            quantity,
            price_per_item,
            invoice_type,
        })
    }
}

fn required_text(
    field: &'static str,
    value: String,
    max_chars: usize,
) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation {
            field,
            message: "must not be empty".to_string(),
        });
    }
    if value.chars().count() > max_chars {
        return Err(AppError::Validation {
            field,
            message: format!("must be at most {max_chars} characters"),
        });
    }
    Ok(value)
}

/// Listing row with display-ready formatting.
#[derive(Debug, Serialize)]
struct InvoiceRow {
    id: i32,
    client_name: String,
    item_name: String,
    quantity: i32,
    invoice_type: String,
    total: String,
    date_created: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        InvoiceRow {
            id: invoice.id,
            client_name: invoice.client_name.clone(),
            item_name: invoice.item_name.clone(),
            quantity: invoice.quantity,
            invoice_type: invoice.invoice_type.clone(),
            total: format!("${:.2}", invoice.total),
            date_created: invoice.date_created.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state.templates.render("index.html", &Context::new())?;
    Ok(Html(html))
}

async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<CreateInvoiceForm>,
) -> Result<Redirect, AppError> {
    let new = form.into_new_invoice()?;
    let store = state.store.clone();
    let invoice = tokio::task::spawn_blocking(move || store.create(new))
        .await
        .map_err(join_error)??;
    tracing::info!(id = invoice.id, client = %invoice.client_name, "created invoice");
    Ok(Redirect::to("/invoices"))
}

async fn list_invoices(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let store = state.store.clone();
    let invoices = tokio::task::spawn_blocking(move || store.list_all())
        .await
        .map_err(join_error)??;

    let rows: Vec<InvoiceRow> = invoices.iter().map(InvoiceRow::from).collect();
    let mut context = Context::new();
    context.insert("invoices", &rows);
    let html = state.templates.render("list.html", &context)?;
    Ok(Html(html))
}

async fn download_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let store = state.store.clone();
    let font = state.pdf_font.clone();
    let (invoice, bytes) = tokio::task::spawn_blocking(move || {
        let invoice = store.get(id)?;
        let bytes = pdf::render(&invoice, font.as_deref())?;
        Ok::<_, AppError>((invoice, bytes))
    })
    .await
    .map_err(join_error)??;

    let filename = format!("invoice_{}_{}.pdf", invoice.id, invoice.invoice_type);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

fn join_error(err: tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("blocking task failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(quantity: &str, price: &str) -> CreateInvoiceForm {
        CreateInvoiceForm {
            client_name: "Acme Corp".to_string(),
            client_address: "123 Main St".to_string(),
            item_name: "Widget".to_string(),
            quantity: quantity.to_string(),
            price_per_item: price.to_string(),
            invoice_type: "Sales".to_string(),
        }
    }

    #[test]
    fn form_computes_exact_total() {
        let new = form("3", "9.99").into_new_invoice().unwrap();
        assert_eq!(new.quantity, 3);
        assert_eq!(new.price_per_item, 9.99);
        assert_eq!(new.total, 29.97);
    }

    #[test]
    fn form_rejects_unparseable_quantity() {
        let err = form("three", "9.99").into_new_invoice().unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "quantity"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn form_rejects_unparseable_price() {
        let err = form("3", "nine").into_new_invoice().unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "price_per_item"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn form_rejects_blank_required_field() {
        let mut f = form("3", "9.99");
        f.client_name = "   ".to_string();
        let err = f.into_new_invoice().unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "client_name"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn form_rejects_overlong_field() {
        let mut f = form("3", "9.99");
        f.invoice_type = "x".repeat(51);
        let err = f.into_new_invoice().unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "invoice_type"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
