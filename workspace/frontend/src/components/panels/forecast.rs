use common::{ForecastResponse, Target};
use query::ResourceKind;
use yew::prelude::*;

use super::{format_currency, ResourcePanel};

#[derive(Properties, PartialEq)]
pub struct ForecastPanelProps {
    pub target: Target,
}

fn title(target: Target) -> &'static str {
    match target {
        Target::Price => "Price Forecast",
        Target::Rent => "Rent Forecast",
    }
}

fn band(bound: Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), format_currency)
}

fn forecast_table(forecast: &ForecastResponse) -> Html {
    if forecast.data.is_empty() {
        return html! { <p class="text-sm opacity-70">{"No forecast points returned."}</p> };
    }

    html! {
        <div class="overflow-x-auto">
            <p class="text-sm opacity-70">
                {format!("{} · {} horizon", forecast.city, forecast.horizon_label())}
            </p>
            <table class="table table-sm">
                <thead>
                    <tr>
                        <th>{"Date"}</th>
                        <th class="text-right">{"Forecast"}</th>
                        <th class="text-right">{"Low"}</th>
                        <th class="text-right">{"High"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for forecast.data.iter().map(|point| html! {
                        <tr>
                            <td>{&point.date}</td>
                            <td class="text-right font-semibold">{format_currency(point.value)}</td>
                            <td class="text-right">{band(point.lower)}</td>
                            <td class="text-right">{band(point.upper)}</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[function_component(ForecastPanel)]
pub fn forecast_panel(props: &ForecastPanelProps) -> Html {
    let render = Callback::from(|data: std::rc::Rc<query::ResourceData>| match data.as_forecast() {
        Some(forecast) => forecast_table(forecast),
        None => html! {},
    });

    html! {
        <ResourcePanel
            title={title(props.target)}
            kind={ResourceKind::Forecast}
            target={props.target}
            {render}
        />
    }
}
