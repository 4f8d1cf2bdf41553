//! Fixed-layout invoice painter.
//!
//! One US-Letter page, every field drawn at a literal coordinate measured in
//! inches from the bottom-left of the page. Labels are bilingual; Arabic text
//! goes through [`shape`] before it reaches the left-to-right text primitive.

use std::io::{BufWriter, Cursor};
use std::path::Path;

use chrono::Local;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::AppError;
use crate::models::Invoice;
use crate::shaping::shape;

const MM_PER_INCH: f32 = 25.4;
const PAGE_WIDTH_IN: f32 = 8.5;
const PAGE_HEIGHT_IN: f32 = 11.0;
// Table rules sit 5 pt below the baseline of the row above them.
const RULE_DROP_IN: f32 = 5.0 / 72.0;

const AR_CLIENT_INFO: &str = "معلومات العميل";
const AR_NAME: &str = "الاسم";
const AR_ADDRESS: &str = "العنوان";
const AR_ITEMS: &str = "عناصر الفاتورة";
const AR_ITEM: &str = "الصنف";
const AR_QTY: &str = "الكمية";
const AR_PRICE: &str = "السعر";
const AR_TOTAL: &str = "الإجمالي";
const AR_GRAND_TOTAL: &str = "المجموع";
const AR_THANKS: &str = "شكراً لتعاملكم معنا";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

fn inches(value: f32) -> Mm {
    Mm(value * MM_PER_INCH)
}

fn from_top(value: f32) -> Mm {
    inches(PAGE_HEIGHT_IN - value)
}

fn bilingual(english: &str, arabic: &str) -> String {
    format!("{} / {}", english, shape(arabic))
}

fn currency(value: f64) -> String {
    format!("${value:.2}")
}

/// Renders `invoice` as a single-page PDF.
///
/// When `font_path` points at a readable TrueType face it is embedded and
/// used for all text, giving real Arabic glyphs. Otherwise the built-in
/// Helvetica family is used and Arabic fields degrade to garbled glyphs
/// rather than failing the render.
pub fn render(invoice: &Invoice, font_path: Option<&Path>) -> Result<Vec<u8>, AppError> {
    let title = format!("{} Invoice", invoice.invoice_type);
    let (doc, page, layer) = PdfDocument::new(
        title.clone(),
        inches(PAGE_WIDTH_IN),
        inches(PAGE_HEIGHT_IN),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let fonts = load_fonts(&doc, font_path)?;

    layer.use_text(title, 24.0, inches(1.0), from_top(1.0), &fonts.bold);

    layer.use_text(
        format!("Invoice #: {}", invoice.id),
        12.0,
        inches(1.0),
        from_top(1.5),
        &fonts.bold,
    );
    layer.use_text(
        format!("Date: {}", invoice.date_created.format("%Y-%m-%d %H:%M")),
        12.0,
        inches(1.0),
        from_top(1.8),
        &fonts.bold,
    );

    layer.use_text(
        format!("{}:", bilingual("Client Information", AR_CLIENT_INFO)),
        14.0,
        inches(1.0),
        from_top(2.5),
        &fonts.bold,
    );
    layer.use_text(
        format!("{}: {}", bilingual("Name", AR_NAME), shape(&invoice.client_name)),
        12.0,
        inches(1.0),
        from_top(2.8),
        &fonts.regular,
    );
    layer.use_text(
        format!(
            "{}: {}",
            bilingual("Address", AR_ADDRESS),
            shape(&invoice.client_address)
        ),
        12.0,
        inches(1.0),
        from_top(3.1),
        &fonts.regular,
    );

    layer.use_text(
        format!("{}:", bilingual("Invoice Items", AR_ITEMS)),
        14.0,
        inches(1.0),
        from_top(4.0),
        &fonts.bold,
    );

    layer.set_outline_thickness(1.0);

    let header_y = 4.4;
    layer.use_text(bilingual("Item", AR_ITEM), 11.0, inches(1.0), from_top(header_y), &fonts.bold);
    layer.use_text(bilingual("Qty", AR_QTY), 11.0, inches(3.5), from_top(header_y), &fonts.bold);
    layer.use_text(bilingual("Price", AR_PRICE), 11.0, inches(4.5), from_top(header_y), &fonts.bold);
    layer.use_text(bilingual("Total", AR_TOTAL), 11.0, inches(5.5), from_top(header_y), &fonts.bold);
    draw_rule(&layer, 1.0, 6.5, header_y + RULE_DROP_IN);

    // Exactly one data row: the schema holds a single line item per invoice.
    let row_y = header_y + 0.3;
    layer.use_text(shape(&invoice.item_name), 11.0, inches(1.0), from_top(row_y), &fonts.regular);
    layer.use_text(
        invoice.quantity.to_string(),
        11.0,
        inches(3.5),
        from_top(row_y),
        &fonts.regular,
    );
    layer.use_text(
        currency(invoice.price_per_item),
        11.0,
        inches(4.5),
        from_top(row_y),
        &fonts.regular,
    );
    layer.use_text(currency(invoice.total), 11.0, inches(5.5), from_top(row_y), &fonts.regular);
    draw_rule(&layer, 1.0, 6.5, row_y + RULE_DROP_IN);

    // The bilingual label starts one column left of the English-only layout
    // so both scripts fit before the amount column.
    let total_y = row_y + 0.4;
    layer.use_text(
        format!("{}:", bilingual("Grand Total", AR_GRAND_TOTAL)),
        12.0,
        inches(3.5),
        from_top(total_y),
        &fonts.bold,
    );
    layer.use_text(currency(invoice.total), 12.0, inches(5.5), from_top(total_y), &fonts.bold);

    let thanks_y = total_y + 1.0;
    layer.use_text(
        "Thank you for your business!",
        11.0,
        inches(1.0),
        from_top(thanks_y),
        &fonts.italic,
    );
    layer.use_text(shape(AR_THANKS), 11.0, inches(1.0), from_top(thanks_y + 0.3), &fonts.italic);

    // Render time, not the invoice's date_created.
    layer.use_text(
        format!("Generated on {}", Local::now().format("%Y-%m-%d %H:%M")),
        9.0,
        inches(1.0),
        inches(0.5),
        &fonts.regular,
    );

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buffer));
        doc.save(&mut writer)
            .map_err(|e| AppError::Render(e.to_string()))?;
    }
    Ok(buffer)
}

fn load_fonts(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<Fonts, AppError> {
    if let Some(path) = font_path {
        match std::fs::read(path) {
            Ok(bytes) => match doc.add_external_font(Cursor::new(bytes)) {
                Ok(font) => {
                    // One Unicode face for every weight keeps Arabic coverage consistent.
                    return Ok(Fonts {
                        regular: font.clone(),
                        bold: font.clone(),
                        italic: font,
                    });
                }
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "unusable PDF font, falling back to Helvetica"
                ),
            },
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "unreadable PDF font, falling back to Helvetica"
            ),
        }
    }

    // Helvetica has no Arabic coverage; Arabic fields come out garbled here
    // instead of failing the render.
    Ok(Fonts {
        regular: builtin(doc, BuiltinFont::Helvetica)?,
        bold: builtin(doc, BuiltinFont::HelveticaBold)?,
        italic: builtin(doc, BuiltinFont::HelveticaOblique)?,
    })
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, AppError> {
    doc.add_builtin_font(font)
        .map_err(|e| AppError::Render(e.to_string()))
}

fn draw_rule(layer: &PdfLayerReference, x1_in: f32, x2_in: f32, y_from_top_in: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(inches(x1_in), from_top(y_from_top_in)), false),
            (Point::new(inches(x2_in), from_top(y_from_top_in)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_invoice() -> Invoice {
        Invoice {
            id: 7,
            client_name: "Acme Corp".to_string(),
            client_address: "123 Main St".to_string(),
            item_name: "Widget".to_string(),
            quantity: 3,
            price_per_item: 9.99,
            total: 29.97,
            invoice_type: "Sales".to_string(),
            date_created: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn renders_a_single_page_pdf() {
        let bytes = render(&sample_invoice(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn latin_fields_are_extractable_text() {
        let bytes = render(&sample_invoice(), None).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();

        assert!(text.contains("Sales Invoice"));
        assert!(text.contains("Invoice #: 7"));
        assert!(text.contains("Acme Corp"));
        assert!(text.contains("Widget"));
        assert!(text.contains("$29.97"));
        assert!(text.contains("Date: 2024-03-01 12:30"));
    }

    #[test]
    fn quantity_renders_as_plain_integer() {
        let bytes = render(&sample_invoice(), None).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains('3'));
    }

    #[test]
    fn arabic_client_name_does_not_fail_the_render() {
        let mut invoice = sample_invoice();
        invoice.client_name = "شركة الاختبار".to_string();
        let bytes = render(&invoice, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_font_file_degrades_to_builtin() {
        let bytes = render(
            &sample_invoice(),
            Some(Path::new("/nonexistent/font.ttf")),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn currency_always_has_two_decimals() {
        assert_eq!(currency(29.97), "$29.97");
        assert_eq!(currency(5.0), "$5.00");
        assert_eq!(currency(0.1), "$0.10");
    }
}
