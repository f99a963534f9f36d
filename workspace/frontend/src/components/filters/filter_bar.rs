use common::Target;
use query::{FilterAction, Horizon, ModelType, ResourceKind};
use yew::prelude::*;

use super::selector::Selector;
use super::sqft_range::SqftRangeSelector;
use crate::hooks::{use_filters, use_predict, use_resource};

const PROPERTY_TYPES: [&str; 4] = ["Condo", "House", "Town House", "Apartment"];
const ROOM_COUNTS: [&str; 3] = ["1", "2", "3+"];
const YEAR_BUILT: [&str; 3] = ["2000+", "2010+", "2020+"];

fn options(values: &[&'static str]) -> Vec<AttrValue> {
    values.iter().copied().map(AttrValue::from).collect()
}

fn selected(value: &Option<std::rc::Rc<str>>) -> Option<AttrValue> {
    value.as_deref().map(|v| AttrValue::from(v.to_string()))
}

/// Every dashboard filter plus the Predict and Reset buttons.
#[function_component(FilterBar)]
pub fn filter_bar() -> Html {
    let filters = use_filters();
    let state = filters.state.clone();
    let cities = use_resource(ResourceKind::Cities, Target::Price);
    let on_predict = use_predict();

    let dispatch = |make: fn(String) -> FilterAction| {
        let filters = filters.clone();
        Callback::from(move |value: String| filters.dispatch(make(value)))
    };

    let city_options: Vec<AttrValue> = match cities.result.data().and_then(|d| d.as_cities()) {
        Some(list) => list.iter().map(|c| AttrValue::from(c.clone())).collect(),
        // keep the current city selectable while the list loads or failed
        None => vec![AttrValue::from(state.city.to_string())],
    };
    if let Some(error) = cities.result.error() {
        log::warn!("City list unavailable: {}", error.details());
    }

    let on_model = {
        let filters = filters.clone();
        Callback::from(move |value: String| match value.parse::<ModelType>() {
            Ok(model) => filters.dispatch(FilterAction::SetModelType(model)),
            Err(e) => log::error!("{}", e),
        })
    };
    let on_reset = {
        let filters = filters.clone();
        Callback::from(move |_: MouseEvent| filters.dispatch(FilterAction::Reset))
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body py-4">
                <div class="flex flex-wrap items-end gap-4">
                    <Selector
                        label="City"
                        options={city_options}
                        value={Some(AttrValue::from(state.city.to_string()))}
                        allow_any={false}
                        onchange={dispatch(FilterAction::SetCity)}
                    />
                    <div class="form-control">
                        <div class="label"><span class="label-text">{"Horizon"}</span></div>
                        <div class="join">
                            { for Horizon::ALL.iter().map(|horizon| {
                                let horizon = *horizon;
                                let filters = filters.clone();
                                let active = state.horizon == horizon;
                                html! {
                                    <button
                                        class={classes!("btn", "btn-sm", "join-item", active.then_some("btn-primary"))}
                                        onclick={Callback::from(move |_| filters.dispatch(FilterAction::SetHorizon(horizon)))}
                                    >
                                        {horizon.label()}
                                    </button>
                                }
                            }) }
                        </div>
                    </div>
                    <Selector
                        label="Model"
                        options={ModelType::ALL.iter().map(|m| AttrValue::from(m.query_value())).collect::<Vec<_>>()}
                        value={Some(AttrValue::from(state.model_type.query_value()))}
                        allow_any={false}
                        onchange={on_model}
                    />
                    <Selector
                        label="Property Type"
                        options={options(&PROPERTY_TYPES)}
                        value={selected(&state.property_type)}
                        onchange={dispatch(FilterAction::SetPropertyType)}
                    />
                    <Selector
                        label="Beds"
                        options={options(&ROOM_COUNTS)}
                        value={selected(&state.beds)}
                        onchange={dispatch(FilterAction::SetBeds)}
                    />
                    <Selector
                        label="Baths"
                        options={options(&ROOM_COUNTS)}
                        value={selected(&state.baths)}
                        onchange={dispatch(FilterAction::SetBaths)}
                    />
                    <SqftRangeSelector />
                    <Selector
                        label="Year Built"
                        options={options(&YEAR_BUILT)}
                        value={selected(&state.year_built)}
                        onchange={dispatch(FilterAction::SetYearBuilt)}
                    />
                    <div class="flex gap-2 ml-auto">
                        <button class="btn btn-ghost btn-sm" onclick={on_reset}>{"Reset"}</button>
                        <button class="btn btn-primary btn-sm" onclick={on_predict}>
                            <i class="fas fa-chart-line"></i>
                            {" Predict"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
