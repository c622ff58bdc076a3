//! # Resource Form Component
//!
//! Create/edit form for any resource, rendered from its field descriptors.
//! Each field picks its control from its kind; reference fields get an
//! autocomplete over the referenced resource's records.

use atelier_api::allowed_values;
use atelier_model::{
    Candidate, FieldDef, FieldKind, FormErrors, FormMode, FormValues, OperatorRole,
};
use atelier_model::autocomplete::DEBOUNCE;
use dioxus::prelude::*;
use std::time::Duration;

use super::autocomplete::Autocomplete;
use super::feedback::LoadErrorAlert;
use super::inputs::{Select, SelectOption, TextArea, TextInput};
use crate::Services;
use crate::hooks::{LoadState, use_field_options};
use crate::state::{APP_STATE, Sheet, SheetMode, ToastLevel, bump_revision, notify};

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct ResourceFormProps {
    pub sheet: Sheet,
}

// ============================================================================
// Main Component
// ============================================================================

/// Form for creating or editing one record
#[component]
pub fn ResourceForm(props: ResourceFormProps) -> Element {
    let services = use_context::<Services>();
    let debounce = services.config.debounce();
    let kind = props.sheet.kind;
    let mode = props.sheet.mode.clone();

    let mut form = use_signal(move || match &mode {
        SheetMode::Create => FormValues::new(kind),
        SheetMode::Edit(record) => FormValues::from_record(record),
    });
    let mut errors = use_signal(FormErrors::new);
    let mut is_saving = use_signal(|| false);
    let mut options = use_field_options(kind);

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        if *is_saving.read() {
            return;
        }

        let values = form.read().clone();
        // Unloaded options skip the membership check; the server still validates
        let references = options.state.read().value().map(|o| allowed_values(o));
        if let Err(invalid) = values.validate(references.as_ref()) {
            errors.set(invalid);
            return;
        }
        errors.set(FormErrors::new());
        is_saving.set(true);

        let crud = services.crud.clone();
        spawn(async move {
            let result = match values.mode() {
                FormMode::Create => crud.create(&values, references.as_ref()).await,
                FormMode::Edit => crud.update(&values, references.as_ref()).await,
            };
            match result {
                Ok(record) => {
                    let verb = match values.mode() {
                        FormMode::Create => "created",
                        FormMode::Edit => "updated",
                    };
                    APP_STATE.write().close_sheet();
                    bump_revision(kind);
                    notify(
                        format!("{} {} {}", kind.singular(), record.key(), verb),
                        ToastLevel::Success,
                    );
                }
                Err(err) => {
                    if let Some(field_errors) = err.form_errors() {
                        errors.set(field_errors.clone());
                    } else {
                        tracing::error!(resource = %kind, error = %err, "Save failed");
                        notify(err.user_message(), ToastLevel::Error);
                    }
                    is_saving.set(false);
                }
            }
        });
    };

    let option_state = options.get();
    let options_loading = option_state.is_loading();
    let fields = kind.fields();
    let saving = *is_saving.read();
    let submit_label = match form.read().mode() {
        FormMode::Create => "Create",
        FormMode::Edit => "Save changes",
    };

    rsx! {
        form {
            class: "resource-form",
            novalidate: true,
            onsubmit: handle_submit,

            if let LoadState::Failed(message) = &option_state {
                LoadErrorAlert {
                    subject: "form options".to_string(),
                    message: message.clone(),
                    on_retry: move |_| options.retry(),
                }
            }

            for field in fields {
                FormField {
                    key: "{field.name}",
                    value: form.read().get(field.name).to_string(),
                    error: errors.read().get(field.name).map(str::to_string),
                    disabled: saving || !form.read().is_editable(field.name),
                    candidates: reference_candidates(&field, &option_state),
                    loading: options_loading,
                    debounce: debounce,
                    on_change: {
                        let name = field.name;
                        move |value: String| form.write().set(name, value)
                    },
                    field: field.clone(),
                }
            }

            div {
                class: "form-actions",

                button {
                    r#type: "button",
                    class: "btn btn-secondary",
                    disabled: saving,
                    onclick: move |_| APP_STATE.write().close_sheet(),
                    "Cancel"
                }

                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: saving,

                    if saving {
                        span { class: "spinner", "⏳" }
                        "Saving..."
                    } else {
                        "{submit_label}"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Form Field
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct FormFieldProps {
    pub field: FieldDef,

    /// Raw text of the field
    pub value: String,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub disabled: bool,

    /// Autocomplete candidates for reference fields
    #[props(default)]
    pub candidates: Vec<Candidate>,

    /// Whether reference candidates are still loading
    #[props(default = false)]
    pub loading: bool,

    /// Autocomplete filtering delay
    #[props(default = DEBOUNCE)]
    pub debounce: Duration,

    pub on_change: EventHandler<String>,
}

/// A single labelled control chosen from the field's kind
#[component]
pub fn FormField(props: FormFieldProps) -> Element {
    let field = &props.field;
    let id = format!("field-{}", field.name);
    let label = Some(field.display_label());
    let placeholder = field.placeholder.map(str::to_string);
    let on_change = props.on_change;

    match &field.kind {
        FieldKind::LongText => rsx! {
            TextArea {
                id: id,
                value: props.value.clone(),
                label: label,
                placeholder: placeholder,
                error: props.error.clone(),
                required: field.required,
                disabled: props.disabled,
                on_change: on_change,
            }
        },
        FieldKind::Choice(values) => rsx! {
            Select {
                id: id,
                value: props.value.clone(),
                options: values.iter().map(|v| SelectOption::new(*v, choice_label(v))).collect::<Vec<_>>(),
                label: label,
                placeholder: "Select...".to_string(),
                error: props.error.clone(),
                required: field.required,
                disabled: props.disabled,
                on_change: on_change,
            }
        },
        FieldKind::Role => rsx! {
            Select {
                id: id,
                value: props.value.clone(),
                options: role_options(),
                label: label,
                placeholder: "Select a role...".to_string(),
                error: props.error.clone(),
                required: field.required,
                disabled: props.disabled,
                on_change: on_change,
            }
        },
        FieldKind::Reference { target, .. } => {
            let value = Some(props.value.clone()).filter(|v| !v.is_empty());
            let placeholder = if props.loading {
                "Loading...".to_string()
            } else {
                format!("Search {}...", target.plural().to_lowercase())
            };
            rsx! {
                Autocomplete {
                    id: id,
                    candidates: props.candidates.clone(),
                    value: value,
                    label: label,
                    placeholder: placeholder,
                    error: props.error.clone(),
                    required: field.required,
                    disabled: props.disabled || props.loading,
                    debounce: props.debounce,
                    on_change: move |value: Option<String>| on_change.call(value.unwrap_or_default()),
                }
            }
        }
        kind => rsx! {
            TextInput {
                id: id,
                value: props.value.clone(),
                label: label,
                placeholder: placeholder,
                error: props.error.clone(),
                required: field.required,
                disabled: props.disabled,
                input_type: input_type(kind).to_string(),
                step: number_step(kind).map(str::to_string),
                on_change: on_change,
            }
        },
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// HTML input type for plain-input kinds
fn input_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer | FieldKind::Decimal => "number",
        FieldKind::Date => "date",
        FieldKind::DateTime => "datetime-local",
        _ => "text",
    }
}

fn number_step(kind: &FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::Integer => Some("1"),
        FieldKind::Decimal => Some("any"),
        _ => None,
    }
}

/// "en_cours" -> "En cours"
fn choice_label(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn role_options() -> Vec<SelectOption> {
    OperatorRole::KNOWN
        .iter()
        .map(|role| SelectOption::new(role.wire_value(), role.label()))
        .collect()
}

/// Candidates for a reference field once options have loaded
fn reference_candidates<T>(field: &FieldDef, state: &LoadState<T>) -> Vec<Candidate>
where
    T: std::ops::Deref<Target = atelier_api::FieldOptions>,
{
    state
        .value()
        .and_then(|options| options.get(field.name))
        .cloned()
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_api::FieldOptions;
    use atelier_model::ResourceKind;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_input_types() {
        assert_eq!(input_type(&FieldKind::Integer), "number");
        assert_eq!(input_type(&FieldKind::DateTime), "datetime-local");
        assert_eq!(input_type(&FieldKind::Text), "text");
        assert_eq!(number_step(&FieldKind::Decimal), Some("any"));
        assert_eq!(number_step(&FieldKind::Date), None);
    }

    #[test]
    fn test_choice_label() {
        assert_eq!(choice_label("en_cours"), "En cours");
        assert_eq!(choice_label("kg"), "Kg");
        assert_eq!(choice_label(""), "");
    }

    #[test]
    fn test_role_options_use_wire_values() {
        let options = role_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, "soudeur");
        assert_eq!(options[1].label, "Contrôleur");
    }

    #[test]
    fn test_reference_candidates_follow_load_state() {
        let field = ResourceKind::Repair.field("codeMachine").unwrap();
        let mut options = FieldOptions::new();
        options.insert("codeMachine", vec![Candidate::new("M1", "M1 - Presse")]);

        let ready = LoadState::Ready(Arc::new(options));
        assert_eq!(
            reference_candidates(&field, &ready),
            vec![Candidate::new("M1", "M1 - Presse")]
        );

        let loading: LoadState<Arc<FieldOptions>> = LoadState::Loading;
        assert!(reference_candidates(&field, &loading).is_empty());
    }
}
