//! # Autocomplete Component
//!
//! Combo-box over a fixed candidate list. The behaviour lives in
//! [`AutocompleteState`]; this component wires it to DOM events and runs
//! the debounce timer.

use atelier_model::autocomplete::DEBOUNCE;
use atelier_model::{AutocompleteState, Candidate, NavKey, ValueChange};
use dioxus::prelude::*;
use std::time::Duration;

use super::inputs::FieldFrame;

/// Properties for Autocomplete component
#[derive(Props, Clone, PartialEq)]
pub struct AutocompleteProps {
    /// Element id, also the prefix of the listbox and option ids
    pub id: String,

    pub candidates: Vec<Candidate>,

    /// Selected candidate value
    #[props(default)]
    pub value: Option<String>,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub placeholder: Option<String>,

    /// Error from the owning form, shown when the field has none of its own
    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    /// Delay between the last keystroke and filtering
    #[props(default = DEBOUNCE)]
    pub debounce: Duration,

    /// Called with the new value, or `None` when cleared
    #[props(default)]
    pub on_change: EventHandler<Option<String>>,
}

/// Type-ahead select bound to a candidate list
#[component]
pub fn Autocomplete(props: AutocompleteProps) -> Element {
    let mut state = use_signal(|| {
        AutocompleteState::new(props.candidates.clone(), props.value.clone())
            .required(props.required)
            .disabled(props.disabled)
    });

    // Follow the owner's props
    let candidates = props.candidates.clone();
    let value = props.value.clone();
    let required = props.required;
    let disabled = props.disabled;
    use_effect(use_reactive!(|(candidates, value, required, disabled)| {
        let mut current = state.write();
        if current.candidates() != candidates.as_slice() {
            current.set_candidates(candidates);
        }
        if current.value() != value.as_deref() {
            current.set_value(value);
        }
        current.set_required(required);
        current.set_disabled(disabled);
    }));

    let on_change = props.on_change;
    let emit = move |change: Option<ValueChange>| {
        if let Some(ValueChange(value)) = change {
            on_change.call(value);
        }
    };

    let debounce = props.debounce;
    let snapshot = state.read().clone();
    let listbox_id = format!("{}-listbox", props.id);
    let active_id = snapshot
        .highlighted()
        .map(|i| format!("{}-option-{}", props.id, i))
        .unwrap_or_default();
    let options: Vec<Candidate> = snapshot.options().into_iter().cloned().collect();
    let error = snapshot
        .error()
        .map(|e| e.message().to_string())
        .or_else(|| props.error.clone());
    let buffer = snapshot.buffer().to_string();
    let announcement = snapshot.announcement();
    let show_clear = !snapshot.is_disabled() && !buffer.is_empty();
    let mut input_class = if error.is_some() {
        "input input--error".to_string()
    } else {
        "input".to_string()
    };
    if snapshot.is_disabled() {
        input_class.push_str(" input--disabled");
    }

    rsx! {
        FieldFrame {
            id: props.id.clone(),
            label: props.label.clone(),
            required: props.required,
            error: error,

            div {
                class: "autocomplete",

                div {
                    class: "autocomplete-control",

                    input {
                        id: "{props.id}",
                        class: "{input_class}",
                        r#type: "text",
                        role: "combobox",
                        autocomplete: "off",
                        aria_autocomplete: "list",
                        aria_expanded: snapshot.is_open(),
                        aria_controls: "{listbox_id}",
                        aria_activedescendant: "{active_id}",
                        aria_invalid: snapshot.error().is_some(),
                        value: "{buffer}",
                        placeholder: props.placeholder.as_deref().unwrap_or(""),
                        disabled: snapshot.is_disabled(),
                        onfocus: move |_| state.write().focus(),
                        oninput: move |e| {
                            let ticket = state.write().input(e.value());
                            if let Some(ticket) = ticket {
                                spawn(async move {
                                    tokio::time::sleep(debounce).await;
                                    state.write().debounce_elapsed(ticket);
                                });
                            }
                        },
                        onkeydown: move |e| {
                            let Some(key) = nav_key(&e.key()) else {
                                return;
                            };
                            if matches!(key, NavKey::ArrowUp | NavKey::ArrowDown | NavKey::Enter) {
                                e.prevent_default();
                            }
                            let change = state.write().key(key);
                            emit(change);
                        },
                        onblur: move |_| {
                            let change = state.write().blur();
                            emit(change);
                        },
                    }

                    if show_clear {
                        button {
                            class: "autocomplete-clear",
                            r#type: "button",
                            aria_label: "Clear",
                            tabindex: "-1",
                            onclick: move |_| {
                                let change = state.write().clear();
                                emit(change);
                            },
                            "✕"
                        }
                    }
                }

                if snapshot.is_open() {
                    ul {
                        id: "{listbox_id}",
                        class: "autocomplete-list",
                        role: "listbox",

                        for (index, option) in options.into_iter().enumerate() {
                            li {
                                key: "{option.value}",
                                id: "{props.id}-option-{index}",
                                role: "option",
                                aria_selected: snapshot.highlighted() == Some(index),
                                class: if snapshot.highlighted() == Some(index) {
                                    "autocomplete-option autocomplete-option--active"
                                } else {
                                    "autocomplete-option"
                                },
                                // mousedown keeps focus in the input, so blur does not run first
                                onmousedown: move |e| {
                                    e.prevent_default();
                                    let change = state.write().select(index);
                                    emit(change);
                                },
                                "{option.label}"
                            }
                        }
                    }
                }

                div {
                    class: "sr-only",
                    role: "status",
                    aria_live: "polite",
                    "{announcement}"
                }
            }
        }
    }
}

/// Keys the autocomplete reacts to
fn nav_key(key: &Key) -> Option<NavKey> {
    match key {
        Key::ArrowUp => Some(NavKey::ArrowUp),
        Key::ArrowDown => Some(NavKey::ArrowDown),
        Key::Enter => Some(NavKey::Enter),
        Key::Tab => Some(NavKey::Tab),
        Key::Escape => Some(NavKey::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nav_key_mapping() {
        assert_eq!(nav_key(&Key::ArrowDown), Some(NavKey::ArrowDown));
        assert_eq!(nav_key(&Key::Escape), Some(NavKey::Escape));
        assert_eq!(nav_key(&Key::Character("a".to_string())), None);
        assert_eq!(nav_key(&Key::Backspace), None);
    }
}
