use std::rc::Rc;

use query::{QuerySnapshot, ResourceData};
use yew::prelude::*;

use super::error::ErrorDisplay;
use super::loading::{Loading, RefreshingBadge};

#[derive(Properties, PartialEq)]
pub struct QueryRenderProps {
    pub snapshot: QuerySnapshot,
    pub render: Callback<Rc<ResourceData>, Html>,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
    #[prop_or_default]
    pub loading_text: Option<String>,
}

/// Renders a query snapshot:
/// - Loading: spinner
/// - Error: error display, or a notice when the data does not exist
/// - Success: the render callback, with a badge while a refetch runs
#[function_component(QueryRender)]
pub fn query_render(props: &QueryRenderProps) -> Html {
    let snapshot = &props.snapshot;

    let body = match &snapshot.result {
        query::ResourceResult::Loading => html! { <Loading text={props.loading_text.clone()} /> },
        query::ResourceResult::Error(error) => html! {
            <ErrorDisplay error={error.clone()} on_retry={props.on_retry.clone()} />
        },
        query::ResourceResult::Success(data) => props.render.emit(Rc::clone(data)),
    };

    html! {
        <div class={classes!("relative", snapshot.is_refreshing().then_some("opacity-70"))}>
            if snapshot.is_refreshing() {
                <RefreshingBadge />
            }
            { body }
        </div>
    }
}
