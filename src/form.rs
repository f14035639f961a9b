// Form State - the interactive form's logic, kept out of the terminal layer
// so city filtering, category options and save validation are testable.

use crate::classifier::{filter_candidates, Classifier, DiemGroup};
use crate::ledger::DiemEntry;
use crate::rates::{options_for_group, resolve_rate};
use crate::refdata::{Municipality, ReferenceData};
use std::collections::HashSet;
use thiserror::Error;

/// Recoverable, user-facing validation issues. Blocks the save action and
/// leaves the ledger untouched; never a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("Selecione uma cidade válida para continuar.")]
    NoCityChosen,

    #[error("Selecione um tipo de diária.")]
    NoCategoryChosen,

    #[error("Tipo de diária sem valor cadastrado.")]
    RateUnavailable,
}

/// Current state of the expense form: free-text city query, selections and
/// day count. All derived values (candidates, UF, options, rate) are
/// computed on demand against the reference data handle.
#[derive(Debug)]
pub struct FormState {
    classifier: Classifier,
    query: String,
    city_index: usize,
    category_index: Option<usize>,
    days: u32,
}

impl FormState {
    pub fn new(classifier: Classifier) -> Self {
        FormState {
            classifier,
            query: String::new(),
            city_index: 0,
            category_index: None,
            days: 1,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.reset_selection();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.city_index = 0;
        self.category_index = None;
    }

    /// Matching cities, deduplicated by name (first occurrence keeps its
    /// row, so its UF is the one displayed).
    pub fn candidates<'a>(&self, data: &'a ReferenceData) -> Vec<&'a Municipality> {
        let mut seen = HashSet::new();
        filter_candidates(&self.query, &data.municipalities)
            .into_iter()
            .filter(|m| seen.insert(m.name.as_str()))
            .collect()
    }

    pub fn city_index(&self) -> usize {
        self.city_index
    }

    pub fn selected_city<'a>(&self, data: &'a ReferenceData) -> Option<&'a Municipality> {
        let candidates = self.candidates(data);
        let index = self.city_index.min(candidates.len().saturating_sub(1));
        candidates.get(index).copied()
    }

    /// Read-only UF field, empty until a city is chosen
    pub fn uf(&self, data: &ReferenceData) -> String {
        self.selected_city(data)
            .map(|m| m.uf.clone())
            .unwrap_or_default()
    }

    pub fn city_next(&mut self, data: &ReferenceData) {
        let len = self.candidates(data).len();
        if len == 0 {
            return;
        }
        self.city_index = (self.city_index + 1).min(len - 1);
        self.category_index = None;
    }

    pub fn city_previous(&mut self) {
        if self.city_index > 0 {
            self.city_index -= 1;
        }
        self.category_index = None;
    }

    pub fn group(&self, data: &ReferenceData) -> Option<DiemGroup> {
        self.selected_city(data)
            .map(|m| self.classifier.classify(&m.name))
    }

    /// Category labels selectable for the chosen city's group
    pub fn category_options(&self, data: &ReferenceData) -> Vec<String> {
        match self.group(data) {
            Some(group) => options_for_group(group, &data.categories),
            None => Vec::new(),
        }
    }

    pub fn category_index(&self) -> Option<usize> {
        self.category_index
    }

    pub fn selected_category(&self, data: &ReferenceData) -> Option<String> {
        let options = self.category_options(data);
        let index = self.category_index?.min(options.len().checked_sub(1)?);
        options.get(index).cloned()
    }

    /// None means the placeholder ("Selecione...") is still active
    pub fn category_next(&mut self, data: &ReferenceData) {
        let len = self.category_options(data).len();
        if len == 0 {
            return;
        }
        self.category_index = Some(match self.category_index {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    pub fn category_previous(&mut self) {
        self.category_index = match self.category_index {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Read-only rate display; 0.0 while the selection is incomplete
    pub fn rate(&self, data: &ReferenceData) -> f64 {
        match self.selected_category(data) {
            Some(label) => resolve_rate(&label, &data.categories),
            None => 0.0,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn days_increment(&mut self) {
        self.days = self.days.saturating_add(1).min(9999);
    }

    pub fn days_decrement(&mut self) {
        if self.days > 1 {
            self.days -= 1;
        }
    }

    pub fn push_day_digit(&mut self, digit: u32) {
        self.days = (self.days * 10 + digit).min(9999);
    }

    pub fn pop_day_digit(&mut self) {
        self.days /= 10;
    }

    /// The only path that builds a `DiemEntry`. Fails with a warning when
    /// city or category are not chosen or the rate resolves to zero; the
    /// caller surfaces the warning and keeps the ledger untouched.
    pub fn try_save(&self, data: &ReferenceData) -> Result<DiemEntry, ValidationWarning> {
        let city = self
            .selected_city(data)
            .ok_or(ValidationWarning::NoCityChosen)?;

        let category = self
            .selected_category(data)
            .ok_or(ValidationWarning::NoCategoryChosen)?;

        let rate = resolve_rate(&category, &data.categories);
        if rate <= 0.0 {
            return Err(ValidationWarning::RateUnavailable);
        }

        Ok(DiemEntry::new(
            city.name.clone(),
            city.uf.clone(),
            category,
            rate,
            self.days.max(1),
        ))
    }
}

impl Default for FormState {
    fn default() -> Self {
        FormState::new(Classifier::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::refdata::DiemCategory;

    fn reference_data() -> ReferenceData {
        ReferenceData {
            municipalities: vec![
                Municipality { name: "Manaus".to_string(), uf: "AM".to_string() },
                Municipality { name: "Manacapuru".to_string(), uf: "AM".to_string() },
                Municipality { name: "Santarém".to_string(), uf: "PA".to_string() },
                Municipality { name: "Santarém".to_string(), uf: "XX".to_string() },
            ],
            categories: vec![
                DiemCategory { label: "Diária Capitais Nacionais".to_string(), rate: 320.0 },
                DiemCategory { label: "Interior Padrão".to_string(), rate: 150.0 },
                DiemCategory { label: "Interior Sem Valor".to_string(), rate: 0.0 },
            ],
        }
    }

    fn type_query(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.push_query_char(c);
        }
    }

    #[test]
    fn test_save_without_city_is_blocked() {
        let data = reference_data();
        let form = FormState::default();
        let mut ledger = Ledger::new();

        let result = form.try_save(&data);
        assert_eq!(result.unwrap_err(), ValidationWarning::NoCityChosen);
        assert_eq!(ledger.len(), 0);

        // a blocked save never touches the ledger
        if let Ok(entry) = form.try_save(&data) {
            ledger.append(entry);
        }
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_save_without_category_is_blocked() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "Manaus");

        assert!(form.selected_city(&data).is_some());
        assert_eq!(
            form.try_save(&data).unwrap_err(),
            ValidationWarning::NoCategoryChosen
        );
    }

    #[test]
    fn test_save_with_zero_rate_is_blocked() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "Santarém");
        form.category_next(&data); // "Interior Padrão"
        form.category_next(&data); // "Interior Sem Valor"

        assert_eq!(form.rate(&data), 0.0);
        assert_eq!(
            form.try_save(&data).unwrap_err(),
            ValidationWarning::RateUnavailable
        );
    }

    #[test]
    fn test_full_save_flow() {
        let data = reference_data();
        let mut form = FormState::default();
        let mut ledger = Ledger::new();

        type_query(&mut form, "santar");
        form.category_next(&data);
        for _ in 0..2 {
            form.days_increment();
        }

        assert_eq!(form.uf(&data), "PA");
        assert_eq!(form.rate(&data), 150.0);

        let entry = form.try_save(&data).unwrap();
        assert_eq!(entry.city, "Santarém");
        assert_eq!(entry.category, "Interior Padrão");
        assert_eq!(entry.days, 3);
        assert_eq!(entry.total, 450.0);

        ledger.append(entry);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_capital_gets_capital_options() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "Manaus");

        assert_eq!(form.group(&data), Some(DiemGroup::Capitals));
        assert_eq!(
            form.category_options(&data),
            vec!["Diária Capitais Nacionais".to_string()]
        );
    }

    #[test]
    fn test_candidates_deduplicate_by_name() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "Santarém");

        let candidates = form.candidates(&data);
        assert_eq!(candidates.len(), 1);
        // first row wins, so its UF is the one shown
        assert_eq!(form.uf(&data), "PA");
    }

    #[test]
    fn test_query_edit_resets_selection() {
        let data = reference_data();
        let mut form = FormState::default();

        type_query(&mut form, "mana");
        form.city_next(&data);
        form.category_next(&data);
        assert_eq!(form.city_index(), 1);

        form.push_query_char('c');
        assert_eq!(form.city_index(), 0);
        assert_eq!(form.category_index(), None);
        assert_eq!(form.selected_city(&data).unwrap().name, "Manacapuru");
    }

    #[test]
    fn test_category_cursor_walks_back_to_placeholder() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "santar");

        form.category_next(&data);
        assert!(form.selected_category(&data).is_some());

        form.category_previous();
        assert_eq!(form.category_index(), None);
        assert_eq!(form.selected_category(&data), None);
        assert_eq!(form.rate(&data), 0.0);
    }

    #[test]
    fn test_days_never_drop_below_one_on_save() {
        let data = reference_data();
        let mut form = FormState::default();
        type_query(&mut form, "santar");
        form.category_next(&data);

        form.pop_day_digit(); // days becomes 0 while editing
        assert_eq!(form.days(), 0);

        let entry = form.try_save(&data).unwrap();
        assert_eq!(entry.days, 1);
    }

    #[test]
    fn test_day_digit_editing() {
        let mut form = FormState::default();
        form.pop_day_digit();
        form.push_day_digit(2);
        form.push_day_digit(5);
        assert_eq!(form.days(), 25);

        form.days_decrement();
        assert_eq!(form.days(), 24);
    }
}
