// Summary Exporter - renders the ledger snapshot as a paginated PDF
// Two stages: a pure, deterministic document plan, then the PDF drawing.

use crate::ledger::DiemEntry;
use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// Deterministic output name for the export action
pub const EXPORT_FILENAME: &str = "resumo_diarias.pdf";

pub const DOC_TITLE: &str = "Resumo das Diárias";

// A4 page, margins in mm
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 20.0;

/// One line of the document plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    Title(String),
    Heading(String),
    Field(String),
    Spacer,
}

impl SummaryLine {
    /// Vertical space the line consumes, in mm
    fn advance(&self) -> f64 {
        match self {
            SummaryLine::Title(_) => 14.0,
            SummaryLine::Heading(_) => 8.0,
            SummaryLine::Field(_) => 6.0,
            SummaryLine::Spacer => 6.0,
        }
    }
}

/// Build the document plan: one title, then per entry a sequentially
/// numbered heading (starting at 1), one line per field in the entry's
/// defined order, and spacing before the next entry. Pure function of the
/// entry sequence - same input order, same plan.
pub fn summary_lines(entries: &[DiemEntry]) -> Vec<SummaryLine> {
    let mut lines = vec![
        SummaryLine::Title(DOC_TITLE.to_string()),
        SummaryLine::Spacer,
    ];

    for (i, entry) in entries.iter().enumerate() {
        lines.push(SummaryLine::Heading(format!("Diária {}", i + 1)));
        for (label, value) in entry.fields() {
            lines.push(SummaryLine::Field(format!("{label}: {value}")));
        }
        lines.push(SummaryLine::Spacer);
    }

    lines
}

/// Render the plan as PDF bytes. Builtin Helvetica fonts, no timestamps,
/// no external assets. An empty entry sequence yields a title-only
/// document; the caller is responsible for not exporting an empty ledger.
pub fn render(entries: &[DiemEntry]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        DOC_TITLE,
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "Camada 1",
    );

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - MARGIN_TOP;

    for line in summary_lines(entries) {
        if y - line.advance() < MARGIN_BOTTOM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Camada 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - MARGIN_TOP;
        }

        match &line {
            SummaryLine::Title(text) => {
                layer.use_text(text.clone(), 18.0, Mm(MARGIN_LEFT as f32), Mm(y as f32), &bold);
            }
            SummaryLine::Heading(text) => {
                layer.use_text(text.clone(), 13.0, Mm(MARGIN_LEFT as f32), Mm(y as f32), &bold);
            }
            SummaryLine::Field(text) => {
                layer.use_text(text.clone(), 11.0, Mm(MARGIN_LEFT as f32), Mm(y as f32), &regular);
            }
            SummaryLine::Spacer => {}
        }

        y -= line.advance();
    }

    let bytes = doc.save_to_bytes()?;
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<DiemEntry> {
        (0..n)
            .map(|i| {
                DiemEntry::new(
                    format!("Cidade {}", i + 1),
                    "AM".to_string(),
                    "Interior Padrão".to_string(),
                    150.0,
                    2,
                )
            })
            .collect()
    }

    #[test]
    fn test_plan_has_one_numbered_section_per_entry() {
        let lines = summary_lines(&entries(3));

        let headings: Vec<&SummaryLine> = lines
            .iter()
            .filter(|l| matches!(l, SummaryLine::Heading(_)))
            .collect();

        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0], &SummaryLine::Heading("Diária 1".to_string()));
        assert_eq!(headings[2], &SummaryLine::Heading("Diária 3".to_string()));
    }

    #[test]
    fn test_plan_lists_fields_in_entry_order() {
        let lines = summary_lines(&entries(1));

        let fields: Vec<&str> = lines
            .iter()
            .filter_map(|l| match l {
                SummaryLine::Field(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(
            fields,
            vec![
                "Cidade: Cidade 1",
                "Estado: AM",
                "Tipo de Diária: Interior Padrão",
                "Valor Unitário: 150.00",
                "Dias: 2",
                "Total: 300.00",
            ]
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let batch = entries(5);
        assert_eq!(summary_lines(&batch), summary_lines(&batch));
    }

    #[test]
    fn test_empty_ledger_gives_title_only_plan() {
        let lines = summary_lines(&[]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], SummaryLine::Title(DOC_TITLE.to_string()));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(&entries(2)).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn test_render_empty_ledger_still_produces_document() {
        let bytes = render(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_many_entries_paginates() {
        // 40 sections do not fit one A4 page; render must not fail
        let bytes = render(&entries(40)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > render(&entries(1)).unwrap().len());
    }
}
