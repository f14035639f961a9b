// Calculadora de Diárias - Core Library
// Exposes all modules for use in the TUI binary and tests

pub mod classifier;
pub mod export;
pub mod form;
pub mod ledger;
pub mod rates;
pub mod refdata;

// Re-export commonly used types
pub use classifier::{filter_candidates, Classifier, DiemGroup, GroupRule};
pub use export::{render, summary_lines, SummaryLine, DOC_TITLE, EXPORT_FILENAME};
pub use form::{FormState, ValidationWarning};
pub use ledger::{DiemEntry, Ledger};
pub use rates::{options_for_group, resolve_rate};
pub use refdata::{
    load_csv, load_workbook, DataLoadError, DiemCategory, Municipality, ReferenceData,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
