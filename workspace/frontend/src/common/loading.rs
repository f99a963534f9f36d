use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub text: Option<String>,
}

/// Placeholder shown while a panel has never loaded.
#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex flex-col justify-center items-center py-10 gap-4">
            <span class="loading loading-spinner loading-md"></span>
            {if let Some(text) = &props.text {
                html! { <p class="text-sm text-gray-500">{text}</p> }
            } else {
                html! {}
            }}
        </div>
    }
}

/// Small badge drawn over a panel that still shows its previous data.
#[function_component(RefreshingBadge)]
pub fn refreshing_badge() -> Html {
    html! {
        <div class="absolute top-2 right-2 badge badge-ghost gap-2">
            <span class="loading loading-spinner loading-xs"></span>
            {"Updating"}
        </div>
    }
}
