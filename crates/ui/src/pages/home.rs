//! Home Page Component
//!
//! Landing page listing every resource as a card that opens its list page.

use atelier_model::ResourceKind;
use dioxus::prelude::*;

use crate::state::{APP_STATE, Page, resource_icon};
use crate::{NAME, VERSION};

/// Landing page component
#[component]
pub fn HomePage() -> Element {
    rsx! {
        div {
            class: "home",

            div {
                class: "home-hero",
                div { class: "home-logo", "🏭" }
                h1 { class: "home-title", "{NAME}" }
                p {
                    class: "home-subtitle",
                    "Work orders, production, maintenance and quality in one place"
                }
            }

            div {
                class: "home-grid",
                for kind in ResourceKind::ALL {
                    ResourceCard { key: "{kind}", kind: kind }
                }
            }

            footer {
                class: "home-footer",
                "{NAME} v{VERSION}"
            }
        }
    }
}

#[component]
fn ResourceCard(kind: ResourceKind) -> Element {
    let icon = resource_icon(kind);
    let title = kind.plural();
    let description = resource_description(kind);

    rsx! {
        button {
            class: "home-card",
            r#type: "button",
            onclick: move |_| APP_STATE.write().navigate(Page::Resource(kind)),

            div { class: "home-card-icon", "{icon}" }
            h3 { class: "home-card-title", "{title}" }
            p { class: "home-card-description", "{description}" }
        }
    }
}

/// One-line summary shown on a resource card
fn resource_description(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Client => "Customers ordering production runs.",
        ResourceKind::Operator => "Welders, inspectors and machine operators.",
        ResourceKind::Machine => "Equipment on the shop floor.",
        ResourceKind::WorkOrder => "Planned and running manufacturing orders.",
        ResourceKind::Production => "Quantities produced per order and machine.",
        ResourceKind::Repair => "Machine breakdowns and their fixes.",
        ResourceKind::Defect => "Non-conformities found on produced parts.",
        ResourceKind::Cause => "Root causes referenced by defects.",
        ResourceKind::Material => "Raw materials and their stock unit.",
        ResourceKind::Consumption => "Material used by each work order.",
        ResourceKind::QualityCheck => "Inspection results signed by an inspector.",
    }
}
