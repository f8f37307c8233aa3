use dioxus::prelude::*;

use crate::domain::SellStep;

#[component]
pub fn Stepper(current: SellStep) -> Element {
    let reached = current.index();

    rsx! {
        ol {
            class: "flex",
            for step in SellStep::ALL {
                {
                    let position = step.index();
                    let item_class = if position < reached {
                        "step-item completed"
                    } else if position == reached {
                        "step-item active"
                    } else {
                        "step-item"
                    };
                    let marker = if position < reached {
                        "✓".to_string()
                    } else {
                        (position + 1).to_string()
                    };
                    rsx! {
                        li {
                            class: "{item_class}",
                            span { class: "step-circle", "{marker}" }
                            span { class: "step-label", "{step.label()}" }
                        }
                    }
                }
            }
        }
    }
}
