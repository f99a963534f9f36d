use std::rc::Rc;

use common::AnomalySeries;
use query::{ResourceData, ResourceKind};
use yew::prelude::*;

use super::ResourcePanel;

fn series_table(series: &AnomalySeries) -> Html {
    let flagged: Vec<_> = series.signals.iter().filter(|s| s.is_anomaly).collect();

    html! {
        <div class="flex flex-col gap-1">
            <h3 class="font-semibold capitalize">
                {series.target.as_str()}
                <span class="badge badge-sm ml-2">{format!("{} flagged", flagged.len())}</span>
            </h3>
            if flagged.is_empty() {
                <p class="text-sm opacity-70">{"No anomalies detected."}</p>
            } else {
                <table class="table table-sm">
                    <thead>
                        <tr><th>{"Month"}</th><th class="text-right">{"Score"}</th></tr>
                    </thead>
                    <tbody>
                        { for flagged.iter().map(|signal| html! {
                            <tr>
                                <td>{&signal.date}</td>
                                <td class="text-right">{format!("{:.2}", signal.score)}</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            }
        </div>
    }
}

#[function_component(AnomaliesPanel)]
pub fn anomalies_panel() -> Html {
    let render = Callback::from(|data: Rc<ResourceData>| match data.as_anomalies() {
        Some(series) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for series.iter().map(series_table) }
            </div>
        },
        None => html! {},
    });

    html! {
        <ResourcePanel title="Market Anomalies" kind={ResourceKind::Anomalies} {render} />
    }
}
