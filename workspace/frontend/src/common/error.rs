use query::{ClassifiedError, ErrorKind};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub error: ClassifiedError,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

/// Panel body for a failed query. Missing data for a filter combination is
/// shown as a neutral notice, anything else as an error with a retry button.
#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    let error = &props.error;

    if error.kind() == ErrorKind::NotFound {
        log::debug!("No data for panel: {}", error.details());
        return html! {
            <div class="alert alert-info">
                <i class="fas fa-info-circle"></i>
                <div class="flex flex-col gap-1">
                    <span class="font-semibold">{error.message()}</span>
                    <span class="text-sm">{error.details()}</span>
                </div>
            </div>
        };
    }

    log::warn!("Displaying {} error to user: {}", error.kind().as_str(), error.details());

    html! {
        <div class="flex flex-col items-center justify-center py-6 gap-4">
            <div class="alert alert-error max-w-lg">
                <i class="fas fa-exclamation-circle text-2xl"></i>
                <div class="flex flex-col gap-2">
                    <span class="font-semibold">{error.message()}</span>
                    <span class="text-sm">{error.details()}</span>
                </div>
            </div>
            {if let Some(on_retry) = &props.on_retry {
                let on_retry = on_retry.clone();
                html! {
                    <button
                        class="btn btn-primary btn-sm"
                        onclick={Callback::from(move |_| {
                            log::debug!("User clicked retry button");
                            on_retry.emit(());
                        })}
                    >
                        <i class="fas fa-redo"></i>
                        {" Try Again"}
                    </button>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
