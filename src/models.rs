use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::invoices;

/// A stored invoice. Immutable once created: there are no update or delete
/// operations anywhere in the application.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = invoices)]
pub struct Invoice {
    pub id: i32,
    pub client_name: String,
    pub client_address: String,
    pub item_name: String,
    pub quantity: i32,
    pub price_per_item: f64,
    pub total: f64,
    pub invoice_type: String,
    pub date_created: NaiveDateTime,
}

/// Insert payload for a new invoice. `total` must already be computed by the
/// caller (see [`line_total`]); the store assigns `id` and `date_created`.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = invoices)]
pub struct NewInvoice {
    pub client_name: String,
    pub client_address: String,
    pub item_name: String,
    pub quantity: i32,
    pub price_per_item: f64,
    pub total: f64,
    pub invoice_type: String,
}

/// Line total in whole cents, so the stored value is exact to two decimal
/// places regardless of how the unit price divides in binary.
pub fn line_total(quantity: i32, price_per_item: f64) -> f64 {
    (f64::from(quantity) * price_per_item * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_exact_at_two_decimals() {
        assert_eq!(line_total(3, 9.99), 29.97);
        assert_eq!(line_total(1, 0.1), 0.1);
        assert_eq!(line_total(10, 0.1), 1.0);
    }

    #[test]
    fn line_total_handles_zero_quantity() {
        assert_eq!(line_total(0, 123.45), 0.0);
    }
}
