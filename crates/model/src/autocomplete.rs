//! Autocomplete input state machine
//!
//! Picks exactly one value from a finite list of candidates. Typing fills a
//! free-text buffer; filtering runs once the debounce delay has elapsed for
//! the latest keystroke. Blurring checks the buffer against the candidates
//! so the field never holds a value that is not in the list.
//!
//! Methods that change the selected value return a [`ValueChange`], which
//! the view forwards to its `on_change` callback.

use std::collections::BTreeMap;
use std::time::Duration;

/// Delay between the last keystroke and filtering
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// A selectable `{value, label}` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub value: String,
    pub label: String,
}

impl Candidate {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Build candidates from `(value, label)` pairs, one per value, ordered by
/// label
pub fn candidates_from_map<I, K, V>(map: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let by_value: BTreeMap<String, String> = map
        .into_iter()
        .map(|(value, label)| (value.into(), label.into()))
        .collect();
    let mut candidates: Vec<Candidate> = by_value
        .into_iter()
        .map(|(value, label)| Candidate { value, label })
        .collect();
    candidates.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
    candidates
}

/// Inline field error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteError {
    /// Nothing selected on a required field
    Required,
    /// Text typed that matches no candidate
    InvalidOption,
}

impl AutocompleteError {
    pub fn message(self) -> &'static str {
        match self {
            AutocompleteError::Required => "This field is required",
            AutocompleteError::InvalidOption => "Please select a valid option",
        }
    }
}

/// A new value to report to the owner of the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange(pub Option<String>);

/// Identifies one keystroke's debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Keys the input reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Tab,
    Escape,
}

/// State of one autocomplete field
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteState {
    candidates: Vec<Candidate>,
    value: Option<String>,
    buffer: String,
    open: bool,
    filtered: Vec<usize>,
    highlighted: Option<usize>,
    error: Option<AutocompleteError>,
    required: bool,
    disabled: bool,
    generation: u64,
    /// The buffer changed since the last filter pass
    stale: bool,
}

impl AutocompleteState {
    pub fn new(candidates: Vec<Candidate>, value: Option<String>) -> Self {
        let mut state = Self {
            candidates,
            value: None,
            buffer: String::new(),
            open: false,
            filtered: Vec::new(),
            highlighted: None,
            error: None,
            required: false,
            disabled: false,
            generation: 0,
            stale: false,
        };
        state.set_value(value);
        state
    }

    pub fn required(mut self, required: bool) -> Self {
        self.set_required(required);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn error(&self) -> Option<AutocompleteError> {
        self.error
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Options currently listed
    pub fn options(&self) -> Vec<&Candidate> {
        self.filtered.iter().map(|&i| &self.candidates[i]).collect()
    }

    /// Position of the highlighted option in [`Self::options`]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Screen-reader announcement of the result count
    pub fn announcement(&self) -> String {
        match self.filtered.len() {
            0 => "No results".to_string(),
            1 => "1 result available".to_string(),
            n => format!("{} results available", n),
        }
    }

    fn label_of(&self, value: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
    }

    // ========================================================================
    // Owner updates
    // ========================================================================

    /// Replace the candidate list, e.g. after the options were re-fetched.
    /// While the list is open the typed text is left alone.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        if !self.open {
            let label = self
                .value
                .as_deref()
                .and_then(|v| self.label_of(v))
                .map(str::to_string);
            if let Some(label) = label {
                self.buffer = label;
            }
        }
        self.refilter();
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.open = false;
        }
    }

    /// Sync with a value set by the owner
    pub fn set_value(&mut self, value: Option<String>) {
        self.buffer = value
            .as_deref()
            .map(|v| self.label_of(v).unwrap_or(v).to_string())
            .unwrap_or_default();
        self.value = value;
    }

    // ========================================================================
    // User interaction
    // ========================================================================

    /// Open the list; with a selection in place, every candidate is shown
    pub fn focus(&mut self) {
        if self.disabled {
            return;
        }
        self.open = true;
        let selected_label = self.value.as_deref().and_then(|v| self.label_of(v));
        let showing_selection = selected_label == Some(self.buffer.as_str());
        if showing_selection {
            self.filter_with("");
        } else {
            self.refilter();
        }
    }

    /// Record a keystroke; filtering waits for the returned ticket to elapse
    pub fn input(&mut self, text: impl Into<String>) -> Option<DebounceTicket> {
        if self.disabled {
            return None;
        }
        self.buffer = text.into();
        self.open = true;
        self.error = None;
        self.generation += 1;
        self.stale = true;
        Some(DebounceTicket(self.generation))
    }

    /// Run the filter if `ticket` belongs to the latest keystroke
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.refilter();
        true
    }

    fn refilter(&mut self) {
        let query = self.buffer.clone();
        self.filter_with(&query);
    }

    fn filter_with(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        self.filtered = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| query.is_empty() || c.label.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect();
        self.highlighted = if self.filtered.is_empty() { None } else { Some(0) };
        self.stale = false;
    }

    pub fn highlight_next(&mut self) {
        if !self.open {
            self.focus();
            return;
        }
        if let Some(last) = self.filtered.len().checked_sub(1) {
            self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1).min(last)));
        }
    }

    pub fn highlight_previous(&mut self) {
        if !self.filtered.is_empty() {
            self.highlighted = Some(self.highlighted.map_or(0, |i| i.saturating_sub(1)));
        }
    }

    /// Pick the option at `index` in [`Self::options`]
    pub fn select(&mut self, index: usize) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        let candidate = self.candidates.get(*self.filtered.get(index)?)?.clone();
        Some(self.choose(candidate))
    }

    fn choose(&mut self, candidate: Candidate) -> ValueChange {
        self.buffer = candidate.label;
        self.value = Some(candidate.value.clone());
        self.open = false;
        self.error = None;
        self.generation += 1;
        ValueChange(Some(candidate.value))
    }

    /// Handle a navigation key
    pub fn key(&mut self, key: NavKey) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        match key {
            NavKey::ArrowDown => {
                self.highlight_next();
                None
            }
            NavKey::ArrowUp => {
                self.highlight_previous();
                None
            }
            NavKey::Enter | NavKey::Tab if self.open => {
                // A keystroke whose debounce has not fired yet still counts
                if self.stale {
                    self.refilter();
                }
                self.highlighted.and_then(|i| self.select(i))
            }
            NavKey::Enter | NavKey::Tab => None,
            NavKey::Escape => self.blur(),
        }
    }

    /// Close the list and reconcile the buffer with the candidates
    pub fn blur(&mut self) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        self.open = false;
        self.generation += 1;

        let text = self.buffer.trim().to_lowercase();
        if text.is_empty() {
            self.error = self.required.then_some(AutocompleteError::Required);
            return self.clear_value();
        }

        if let Some(candidate) = self
            .candidates
            .iter()
            .find(|c| c.label.to_lowercase() == text)
            .cloned()
        {
            let changed = self.value.as_deref() != Some(candidate.value.as_str());
            let change = self.choose(candidate);
            return changed.then_some(change);
        }

        self.error = self.required.then_some(AutocompleteError::InvalidOption);
        self.clear_value()
    }

    /// Clear affordance
    pub fn clear(&mut self) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        self.buffer.clear();
        self.error = None;
        self.generation += 1;
        self.filter_with("");
        self.clear_value()
    }

    fn clear_value(&mut self) -> Option<ValueChange> {
        self.value.take().map(|_| ValueChange(None))
    }
}
