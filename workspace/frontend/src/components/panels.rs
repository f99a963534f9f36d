//! Dashboard panels. Each one subscribes to a single resource through
//! [`use_resource`] and renders it independently of the others.

mod anomalies;
mod forecast;
mod model_comparison;
mod risk;
mod sentiment;

pub use anomalies::AnomaliesPanel;
pub use forecast::ForecastPanel;
pub use model_comparison::ModelComparisonPanel;
pub use risk::RiskPanel;
pub use sentiment::SentimentPanel;

use std::rc::Rc;

use common::Target;
use query::{ResourceData, ResourceKind};
use yew::prelude::*;

use crate::common::fetch_render::QueryRender;
use crate::hooks::{use_query_client, use_resource};

#[derive(Properties, PartialEq)]
pub struct ResourcePanelProps {
    pub title: AttrValue,
    pub kind: ResourceKind,
    #[prop_or_default]
    pub target: Target,
    pub render: Callback<Rc<ResourceData>, Html>,
}

/// Card wrapping one resource: loading, error, not-found and data states.
#[function_component(ResourcePanel)]
pub fn resource_panel(props: &ResourcePanelProps) -> Html {
    let snapshot = use_resource(props.kind, props.target);
    let client = use_query_client();

    let on_retry = {
        let kind = props.kind;
        Callback::from(move |_: ()| {
            log::info!("Retrying {} panel", kind);
            client.invalidate_kind(kind);
        })
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{&props.title}</h2>
                <QueryRender
                    snapshot={snapshot}
                    render={props.render.clone()}
                    on_retry={Some(on_retry)}
                    loading_text={format!("Loading {}...", props.kind.display_name())}
                />
            </div>
        </div>
    }
}

/// `1234567.8` -> `"1,234,568"`.
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = value.round().abs() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value.round() < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub(crate) fn format_currency(value: f64) -> String {
    format!("${}", group_thousands(value))
}
