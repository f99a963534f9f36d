use std::rc::Rc;

use common::{horizon_label, HorizonMetric, ModelComparisonResponse};
use query::{ResourceData, ResourceKind};
use yew::prelude::*;

use super::{group_thousands, ResourcePanel};

fn metric_row(model: &'static str, metric: &HorizonMetric) -> Html {
    html! {
        <tr>
            <td class="uppercase">{model}</td>
            <td>{horizon_label(metric.horizon)}</td>
            <td class="text-right">{group_thousands(metric.mae)}</td>
            <td class="text-right">{format!("{:.2}%", metric.mape)}</td>
            <td class="text-right">{group_thousands(metric.rmse)}</td>
            <td class="text-right">
                {metric.r2.map(|r2| format!("{:.3}", r2)).unwrap_or_else(|| "–".to_string())}
            </td>
        </tr>
    }
}

fn comparison_table(comparison: &ModelComparisonResponse) -> Html {
    html! {
        <div class="overflow-x-auto">
            <table class="table table-sm">
                <thead>
                    <tr>
                        <th>{"Model"}</th>
                        <th>{"Horizon"}</th>
                        <th class="text-right">{"MAE"}</th>
                        <th class="text-right">{"MAPE"}</th>
                        <th class="text-right">{"RMSE"}</th>
                        <th class="text-right">{"R²"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for comparison.models.iter().flat_map(|(model, metrics)| {
                        metrics.iter().map(move |metric| metric_row(model, metric))
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[function_component(ModelComparisonPanel)]
pub fn model_comparison_panel() -> Html {
    let render = Callback::from(|data: Rc<ResourceData>| {
        data.as_model_comparison().map(comparison_table).unwrap_or_default()
    });

    html! {
        <ResourcePanel title="Model Comparison" kind={ResourceKind::ModelComparison} {render} />
    }
}
