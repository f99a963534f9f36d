use std::rc::Rc;

use common::{IndicatorStatus, RiskGauge};
use query::{ResourceData, ResourceKind};
use yew::prelude::*;

use super::ResourcePanel;

fn score_class(score: f64) -> &'static str {
    if score >= 70.0 {
        "text-error"
    } else if score >= 40.0 {
        "text-warning"
    } else {
        "text-success"
    }
}

fn status_class(status: IndicatorStatus) -> &'static str {
    match status {
        IndicatorStatus::Tight => "badge-warning",
        IndicatorStatus::Elevated => "badge-error",
        IndicatorStatus::Low => "badge-success",
    }
}

fn gauge(risk: &RiskGauge) -> Html {
    let score = risk.gauge_score();

    html! {
        <div class="flex flex-col gap-4">
            <div class="stat p-0">
                <div class="stat-title">{format!("{} · {}", risk.city, risk.date)}</div>
                <div class={classes!("stat-value", score_class(score))}>{format!("{:.0}", score)}</div>
                <progress class="progress w-full" value={score.to_string()} max="100"></progress>
            </div>
            <table class="table table-sm">
                <tbody>
                    { for risk.breakdown.iter().map(|indicator| html! {
                        <tr>
                            <td>{&indicator.name}</td>
                            <td class="text-right">
                                <span class={classes!("badge", "badge-sm", status_class(indicator.status))}>
                                    {indicator.status.as_str()}
                                </span>
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[function_component(RiskPanel)]
pub fn risk_panel() -> Html {
    let render = Callback::from(|data: Rc<ResourceData>| data.as_risk().map(gauge).unwrap_or_default());

    html! {
        <ResourcePanel title="Risk Gauge" kind={ResourceKind::Risk} {render} />
    }
}
