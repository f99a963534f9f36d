use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SelectorProps {
    pub label: AttrValue,
    pub options: Vec<AttrValue>,
    /// Current value; `None` selects the "Any" entry.
    #[prop_or_default]
    pub value: Option<AttrValue>,
    /// Adds a leading "Any" entry that clears the filter.
    #[prop_or(true)]
    pub allow_any: bool,
    pub onchange: Callback<String>,
}

/// Labelled `<select>` emitting the chosen option value.
#[function_component(Selector)]
pub fn selector(props: &SelectorProps) -> Html {
    let onchange = {
        let callback = props.onchange.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            callback.emit(select.value());
        })
    };
    let current = props.value.clone().unwrap_or_else(|| AttrValue::from("any"));

    html! {
        <label class="form-control w-full max-w-[10rem]">
            <div class="label"><span class="label-text">{&props.label}</span></div>
            <select class="select select-sm select-bordered" {onchange}>
                if props.allow_any {
                    <option value="any" selected={current.as_str() == "any"}>{"Any"}</option>
                }
                { for props.options.iter().map(|option| html! {
                    <option value={option.clone()} selected={*option == current}>{option}</option>
                }) }
            </select>
        </label>
    }
}
