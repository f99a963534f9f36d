use query::{FilterAction, SQFT_CEILING, SQFT_FLOOR};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_filters;

const SQFT_STEP: u32 = 50;

fn slider_value(e: &InputEvent) -> Option<u32> {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value().parse().ok()
}

/// Pair of range sliders for the square footage filter. The reducer keeps
/// `min <= max`, so the sliders simply dispatch what the user picked.
#[function_component(SqftRangeSelector)]
pub fn sqft_range_selector() -> Html {
    let filters = use_filters();
    let range = filters.state.sqft.unwrap_or_default();
    let is_set = filters.state.sqft.is_some();

    let on_min = {
        let filters = filters.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(min) = slider_value(&e) {
                filters.dispatch(FilterAction::SetSqftMin(min));
            }
        })
    };
    let on_max = {
        let filters = filters.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(max) = slider_value(&e) {
                filters.dispatch(FilterAction::SetSqftMax(max));
            }
        })
    };
    let on_clear = {
        let filters = filters.clone();
        Callback::from(move |_: MouseEvent| filters.dispatch(FilterAction::ClearSqft))
    };

    html! {
        <div class="form-control">
            <div class="label">
                <span class="label-text">{"Sqft"}</span>
                if is_set {
                    <button class="btn btn-ghost btn-xs" onclick={on_clear}>{"Any size"}</button>
                }
            </div>
            <div class="flex items-center gap-2">
                <input type="range" class="range range-xs w-28"
                    min={SQFT_FLOOR.to_string()} max={SQFT_CEILING.to_string()} step={SQFT_STEP.to_string()}
                    value={range.min().to_string()} oninput={on_min} />
                <span class="text-xs opacity-70">{format!("min {}", range.min())}</span>
                <input type="range" class="range range-xs w-28"
                    min={SQFT_FLOOR.to_string()} max={SQFT_CEILING.to_string()} step={SQFT_STEP.to_string()}
                    value={range.max().to_string()} oninput={on_max} />
                <span class="text-xs opacity-70">{format!("max {}", range.max())}</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::SqftRange;

    #[test]
    fn test_slider_bounds_are_step_aligned() {
        assert_eq!(SQFT_FLOOR % SQFT_STEP, 0);
        assert_eq!(SQFT_CEILING % SQFT_STEP, 0);
        assert_eq!(SqftRange::default().min(), SQFT_FLOOR);
    }
}
