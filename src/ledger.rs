// Ledger - session-scoped, append-only list of saved per-diem entries
// Owned by the active session; no hidden global state.

use serde::{Deserialize, Serialize};

/// One saved per-diem record. Immutable once created; only a full
/// `Ledger::clear` removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiemEntry {
    pub city: String,
    pub uf: String,
    pub category: String,
    pub rate: f64,
    pub days: u32,
    pub total: f64,
}

impl DiemEntry {
    /// Build an entry, computing `total = rate * days`.
    pub fn new(city: String, uf: String, category: String, rate: f64, days: u32) -> Self {
        let total = rate * f64::from(days);
        DiemEntry {
            city,
            uf,
            category,
            rate,
            days,
            total,
        }
    }

    /// Field labels and display values, in the entry's defined order.
    /// Shared by the summary table and the PDF exporter.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Cidade", self.city.clone()),
            ("Estado", self.uf.clone()),
            ("Tipo de Diária", self.category.clone()),
            ("Valor Unitário", format!("{:.2}", self.rate)),
            ("Dias", self.days.to_string()),
            ("Total", format!("{:.2}", self.total)),
        ]
    }
}

/// Ordered sequence of entries; insertion order is display/export order.
/// Empty at session start, destroyed at session end.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<DiemEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Always succeeds; no dedup, no validation beyond what the caller
    /// already guaranteed when building the entry.
    pub fn append(&mut self, entry: DiemEntry) {
        self.entries.push(entry);
    }

    /// Irreversible, no confirmation step, no undo.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only ordered view reflecting all appends so far.
    pub fn snapshot(&self) -> &[DiemEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry totals, shown in the summary table.
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|e| e.total).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
