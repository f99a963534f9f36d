use common::Target;
use yew::prelude::*;

use crate::components::filters::FilterBar;
use crate::components::panels::{
    AnomaliesPanel, ForecastPanel, ModelComparisonPanel, RiskPanel, SentimentPanel,
};
use crate::hooks::use_filters;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let filters = use_filters();
    log::trace!("Rendering dashboard for {}", filters.state.city);

    html! {
        <>
            <FilterBar />
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mt-6">
                <ForecastPanel target={Target::Price} />
                <ForecastPanel target={Target::Rent} />
            </div>
            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6 mt-6">
                <SentimentPanel />
                <RiskPanel />
                <AnomaliesPanel />
            </div>
            <div class="mt-6">
                <ModelComparisonPanel />
            </div>
        </>
    }
}
