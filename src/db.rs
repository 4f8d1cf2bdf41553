use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::AppError;
use crate::models::{Invoice, NewInvoice};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Persistent invoice store backed by a pooled SQLite database.
///
/// Insert-only: records are created once and then read back by id or as an
/// ordered listing. Field validation happens in the web layer before a
/// `NewInvoice` is handed over; the store performs no defensive re-checks.
/// Concurrent creations are serialized by SQLite's insert atomicity.
#[derive(Clone)]
pub struct InvoiceStore {
    pool: SqlitePool,
}

impl InvoiceStore {
    /// Opens (or creates) the database at `database_url` and runs the
    /// embedded schema migration. The migration is idempotent, so calling
    /// this against an existing database is safe.
    pub fn new(database_url: &str) -> Result<Self, AppError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder().build(manager)?;

        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Internal(format!("running migrations: {e}")))?;

        Ok(InvoiceStore { pool })
    }

    /// Inserts a new invoice, assigning its id and creation timestamp.
    /// `new.total` must already be computed by the caller.
    pub fn create(&self, new: NewInvoice) -> Result<Invoice, AppError> {
        use crate::schema::invoices::dsl::*;

        let mut conn = self.pool.get()?;
        let created = diesel::insert_into(invoices)
            .values((&new, date_created.eq(Utc::now().naive_utc())))
            .returning(Invoice::as_returning())
            .get_result(&mut conn)?;
        Ok(created)
    }

    pub fn get(&self, invoice_id: i32) -> Result<Invoice, AppError> {
        use crate::schema::invoices::dsl::*;

        let mut conn = self.pool.get()?;
        invoices
            .find(invoice_id)
            .select(Invoice::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound(invoice_id))
    }

    /// All invoices, newest first. Equal timestamps fall back to id order so
    /// the listing is deterministic.
    pub fn list_all(&self) -> Result<Vec<Invoice>, AppError> {
        use crate::schema::invoices::dsl::*;

        let mut conn = self.pool.get()?;
        let all = invoices
            .select(Invoice::as_select())
            .order((date_created.desc(), id.desc()))
            .load(&mut conn)?;
        Ok(all)
    }
}
