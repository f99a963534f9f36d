//! Filter and query contexts plus the hooks panels use to read them.

use std::rc::Rc;

use common::Target;
use query::{FilterAction, FilterState, QueryClient, QuerySnapshot, ResourceKind, ResourceRequest};
use yew::prelude::*;

/// Filter state as a Yew reducer. Returning the same `Rc` for a no-op
/// action lets `use_reducer` skip the re-render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    pub state: Rc<FilterState>,
}

impl Reducible for Filters {
    type Action = FilterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = Rc::clone(&self.state).reduce(action);
        if Rc::ptr_eq(&next, &self.state) {
            self
        } else {
            Rc::new(Filters { state: next })
        }
    }
}

pub type FilterContext = UseReducerHandle<Filters>;

#[derive(Properties, PartialEq)]
pub struct FilterProviderProps {
    pub children: Children,
}

#[function_component(FilterProvider)]
pub fn filter_provider(props: &FilterProviderProps) -> Html {
    let filters = use_reducer(Filters::default);

    html! {
        <ContextProvider<FilterContext> context={filters}>
            { for props.children.iter() }
        </ContextProvider<FilterContext>>
    }
}

#[derive(Properties, PartialEq)]
pub struct QueryClientProviderProps {
    pub client: QueryClient,
    pub children: Children,
}

#[function_component(QueryClientProvider)]
pub fn query_client_provider(props: &QueryClientProviderProps) -> Html {
    html! {
        <ContextProvider<QueryClient> context={props.client.clone()}>
            { for props.children.iter() }
        </ContextProvider<QueryClient>>
    }
}

#[hook]
pub fn use_filters() -> FilterContext {
    use_context::<FilterContext>().expect("use_filters called outside FilterProvider")
}

#[hook]
pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>().expect("use_query_client called outside QueryClientProvider")
}

/// Latest snapshot of `kind` for the current filters.
///
/// The request is re-derived whenever the filters change; a new key means a
/// new subscription, while the previous key keeps whatever its own fetch
/// produces.
#[hook]
pub fn use_resource(kind: ResourceKind, target: Target) -> QuerySnapshot {
    let filters = use_filters();
    let client = use_query_client();

    let request = use_memo(
        (kind, target, Rc::clone(&filters.state)),
        |(kind, target, state)| ResourceRequest::derive(*kind, state, *target),
    );
    let snapshot = use_state(|| QuerySnapshot::loading(request.key().clone()));

    {
        let client = client.clone();
        let setter = snapshot.setter();
        use_effect_with(request.clone(), move |request| {
            log::trace!("Subscribing to {}", request.key());
            let listener = setter.clone();
            let subscription = client.subscribe(request, move |next: &QuerySnapshot| {
                listener.set(next.clone());
            });
            if let Some(current) = client.peek(request.key()) {
                setter.set(current);
            }
            move || drop(subscription)
        });
    }

    // until the effect runs for a new key, show what the cache has for it
    if snapshot.key == *request.key() {
        (*snapshot).clone()
    } else {
        client
            .peek(request.key())
            .unwrap_or_else(|| QuerySnapshot::loading(request.key().clone()))
    }
}

/// Callback behind the Predict button: refreshes every query on the page.
#[hook]
pub fn use_predict() -> Callback<MouseEvent> {
    let client = use_query_client();
    Callback::from(move |_: MouseEvent| {
        log::info!("Predict clicked, invalidating all queries");
        client.invalidate_all();
    })
}
