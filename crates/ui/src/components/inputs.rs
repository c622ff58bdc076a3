//! # Input Components
//!
//! Form controls used by the resource form:
//! - **TextInput**: single-line input (text, number, date, datetime-local)
//! - **TextArea**: multi-line input
//! - **Select**: dropdown over a fixed option list
//!
//! Each renders its label, a required marker and an inline error message.

use dioxus::prelude::*;

// ============================================================================
// Field Frame
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct FieldFrameProps {
    pub id: String,
    #[props(default)]
    pub label: Option<String>,
    #[props(default = false)]
    pub required: bool,
    #[props(default)]
    pub error: Option<String>,
    #[props(default)]
    pub help_text: Option<String>,
    pub children: Element,
}

/// Label, control and message shared by every input
#[component]
pub fn FieldFrame(props: FieldFrameProps) -> Element {
    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label {
                    class: "input-label",
                    r#for: "{props.id}",
                    "{label}"
                    if props.required {
                        span { class: "input-required", "*" }
                    }
                }
            }

            {props.children}

            if let Some(error) = &props.error {
                p {
                    class: "input-error",
                    role: "alert",
                    "{error}"
                }
            } else if let Some(help) = &props.help_text {
                p { class: "input-help", "{help}" }
            }
        }
    }
}

// ============================================================================
// Text Input Component
// ============================================================================

/// Properties for TextInput component
#[derive(Props, Clone, PartialEq)]
pub struct TextInputProps {
    /// Element id, also used by the label
    pub id: String,

    /// Input value
    pub value: String,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub placeholder: Option<String>,

    #[props(default)]
    pub help_text: Option<String>,

    /// Error message (shows error state)
    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default = false)]
    pub readonly: bool,

    /// Input type (text, number, date, datetime-local, ...)
    #[props(default = "text".to_string())]
    pub input_type: String,

    /// Step for number inputs
    #[props(default)]
    pub step: Option<String>,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<String>,
}

/// Single-line text input component
#[component]
pub fn TextInput(props: TextInputProps) -> Element {
    let input_class = build_input_class(props.error.is_some(), props.disabled || props.readonly);

    rsx! {
        FieldFrame {
            id: props.id.clone(),
            label: props.label.clone(),
            required: props.required,
            error: props.error.clone(),
            help_text: props.help_text.clone(),

            input {
                id: "{props.id}",
                class: "{input_class}",
                r#type: "{props.input_type}",
                value: "{props.value}",
                step: props.step.clone(),
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                disabled: props.disabled,
                readonly: props.readonly,
                aria_invalid: props.error.is_some(),
                oninput: move |e| props.on_change.call(e.value()),
                onblur: {
                    let value = props.value.clone();
                    move |_| props.on_blur.call(value.clone())
                },
            }
        }
    }
}

// ============================================================================
// Text Area Component
// ============================================================================

/// Properties for TextArea component
#[derive(Props, Clone, PartialEq)]
pub struct TextAreaProps {
    pub id: String,

    pub value: String,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub placeholder: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    /// Number of visible rows
    #[props(default = 3)]
    pub rows: usize,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,
}

/// Multi-line text input component
#[component]
pub fn TextArea(props: TextAreaProps) -> Element {
    let mut textarea_class = build_input_class(props.error.is_some(), props.disabled);
    textarea_class.push_str(" input--multiline");

    rsx! {
        FieldFrame {
            id: props.id.clone(),
            label: props.label.clone(),
            required: props.required,
            error: props.error.clone(),

            textarea {
                id: "{props.id}",
                class: "{textarea_class}",
                rows: "{props.rows}",
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                disabled: props.disabled,
                value: "{props.value}",
                oninput: move |e| props.on_change.call(e.value()),
            }
        }
    }
}

// ============================================================================
// Select Component
// ============================================================================

/// A single option for the Select component
#[derive(Clone, PartialEq, Debug)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Properties for Select component
#[derive(Props, Clone, PartialEq)]
pub struct SelectProps {
    pub id: String,

    /// Selected value
    pub value: String,

    /// Available options
    pub options: Vec<SelectOption>,

    #[props(default)]
    pub label: Option<String>,

    /// Placeholder (shown when no selection)
    #[props(default)]
    pub placeholder: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,
}

/// Dropdown select component
#[component]
pub fn Select(props: SelectProps) -> Element {
    let mut select_class = build_input_class(props.error.is_some(), props.disabled);
    select_class.push_str(" input--select");

    // A stored value outside the option list is still shown
    let unlisted = !props.value.is_empty() && !props.options.iter().any(|o| o.value == props.value);

    rsx! {
        FieldFrame {
            id: props.id.clone(),
            label: props.label.clone(),
            required: props.required,
            error: props.error.clone(),

            select {
                id: "{props.id}",
                class: "{select_class}",
                disabled: props.disabled,
                onchange: move |e| props.on_change.call(e.value()),

                option {
                    value: "",
                    selected: props.value.is_empty(),
                    {props.placeholder.clone().unwrap_or_default()}
                }

                if unlisted {
                    option {
                        value: "{props.value}",
                        selected: true,
                        "{props.value}"
                    }
                }

                for option in &props.options {
                    option {
                        key: "{option.value}",
                        value: "{option.value}",
                        selected: props.value == option.value,
                        "{option.label}"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Build input class string
fn build_input_class(has_error: bool, disabled: bool) -> String {
    let mut classes = vec!["input"];
    if has_error {
        classes.push("input--error");
    }
    if disabled {
        classes.push("input--disabled");
    }
    classes.join(" ")
}

// ============================================================================
// Tests
// ============================================================================
