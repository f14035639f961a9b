// Rate Resolver - category table lookups

use crate::classifier::DiemGroup;
use crate::refdata::DiemCategory;

/// Category labels selectable for a group: every label containing the group
/// label as a case-insensitive substring, in table order.
pub fn options_for_group(group: DiemGroup, categories: &[DiemCategory]) -> Vec<String> {
    let needle = group.label().to_lowercase();

    categories
        .iter()
        .filter(|c| c.label.to_lowercase().contains(&needle))
        .map(|c| c.label.clone())
        .collect()
}

/// Unit rate for an exact (trimmed, case-sensitive) label match. The first
/// row in table order wins; a missing label resolves to 0.0, which callers
/// treat as "selection incomplete", never as an error.
pub fn resolve_rate(label: &str, categories: &[DiemCategory]) -> f64 {
    let needle = label.trim();

    categories
        .iter()
        .find(|c| c.label.trim() == needle)
        .map(|c| c.rate)
        .unwrap_or(0.0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<DiemCategory> {
        vec![
            DiemCategory { label: "Diária Capitais Nacionais".to_string(), rate: 320.0 },
            DiemCategory { label: "Diária Comunidades".to_string(), rate: 120.0 },
            DiemCategory { label: "Diária ATER".to_string(), rate: 180.0 },
            DiemCategory { label: "Interior Padrão".to_string(), rate: 150.0 },
        ]
    }

    #[test]
    fn test_options_restricted_to_group() {
        let options = options_for_group(DiemGroup::Capitals, &categories());
        assert_eq!(options, vec!["Diária Capitais Nacionais".to_string()]);
    }

    #[test]
    fn test_options_match_is_case_insensitive() {
        let table = vec![DiemCategory { label: "diária capitais".to_string(), rate: 300.0 }];
        let options = options_for_group(DiemGroup::Capitals, &table);
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_options_keep_table_order() {
        let table = vec![
            DiemCategory { label: "Interior Especial".to_string(), rate: 200.0 },
            DiemCategory { label: "Interior Padrão".to_string(), rate: 150.0 },
        ];
        let options = options_for_group(DiemGroup::Interior, &table);
        assert_eq!(options, vec!["Interior Especial", "Interior Padrão"]);
    }

    #[test]
    fn test_resolve_rate_exact_match() {
        assert_eq!(resolve_rate("Interior Padrão", &categories()), 150.0);
    }

    #[test]
    fn test_resolve_rate_trims_label() {
        assert_eq!(resolve_rate("  Interior Padrão  ", &categories()), 150.0);
    }

    #[test]
    fn test_resolve_rate_missing_label_is_zero() {
        assert_eq!(resolve_rate("Diária Inexistente", &categories()), 0.0);
        assert_eq!(resolve_rate("", &categories()), 0.0);
    }

    #[test]
    fn test_resolve_rate_is_case_sensitive() {
        assert_eq!(resolve_rate("interior padrão", &categories()), 0.0);
    }

    #[test]
    fn test_resolve_rate_first_row_wins_on_duplicate() {
        let table = vec![
            DiemCategory { label: "Interior Padrão".to_string(), rate: 150.0 },
            DiemCategory { label: "Interior Padrão".to_string(), rate: 999.0 },
        ];
        assert_eq!(resolve_rate("Interior Padrão", &table), 150.0);
    }
}
