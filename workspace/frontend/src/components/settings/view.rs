use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::settings::{get_settings, update_settings};

fn input_value(input: &NodeRef) -> Option<String> {
    input.cast::<HtmlInputElement>().map(|el| el.value())
}

/// Connection and cache settings, persisted to localStorage. The query
/// client is built once at startup, so saving reloads the page.
#[function_component(Settings)]
pub fn settings() -> Html {
    let current = get_settings();
    let api_url = use_node_ref();
    let max_entries = use_node_ref();
    let ttl = use_node_ref();
    let error = use_state(|| None::<String>);

    let on_save = {
        let (api_url, max_entries, ttl, error) = (api_url.clone(), max_entries.clone(), ttl.clone(), error.clone());
        Callback::from(move |_: MouseEvent| {
            let api_base_url = input_value(&api_url).unwrap_or_default();
            let cache_max_entries = input_value(&max_entries).and_then(|v| v.parse::<usize>().ok());
            let cache_ttl_secs = input_value(&ttl).and_then(|v| v.parse::<u64>().ok());

            let result = update_settings(|settings| {
                if !api_base_url.trim().is_empty() {
                    settings.api_base_url = api_base_url.trim().to_string();
                }
                if let Some(value) = cache_max_entries {
                    settings.cache_max_entries = value;
                }
                if let Some(value) = cache_ttl_secs {
                    settings.cache_ttl_secs = value;
                }
            });

            match result {
                Ok(()) => {
                    log::info!("Settings saved, reloading");
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                }
                Err(e) => {
                    log::error!("Failed to save settings: {:?}", e);
                    error.set(Some("Settings could not be saved to local storage.".to_string()));
                }
            }
        })
    };

    html! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-8">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"Connection Settings"}</h2>
                    <div class="form-control w-full mt-4">
                        <label class="label"><span class="label-text">{"API Base URL"}</span></label>
                        <input type="text" ref={api_url} value={current.api_base_url.clone()} class="input input-bordered w-full" />
                    </div>
                    <div class="form-control w-full">
                        <label class="label"><span class="label-text">{"Cached queries"}</span></label>
                        <input type="number" min="1" ref={max_entries} value={current.cache_max_entries.to_string()} class="input input-bordered w-full" />
                    </div>
                    <div class="form-control w-full">
                        <label class="label"><span class="label-text">{"Cache lifetime (seconds)"}</span></label>
                        <input type="number" min="0" ref={ttl} value={current.cache_ttl_secs.to_string()} class="input input-bordered w-full" />
                    </div>
                    if let Some(message) = &*error {
                        <div class="alert alert-error mt-4"><span>{message}</span></div>
                    }
                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-primary" onclick={on_save}>{"Save & Reload"}</button>
                    </div>
                </div>
            </div>
        </div>
    }
}
