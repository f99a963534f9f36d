use std::rc::Rc;

use common::{CitySentiments, SentimentLabel};
use query::{ResourceData, ResourceKind};
use yew::prelude::*;

use super::ResourcePanel;

fn badge_class(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "badge-success",
        SentimentLabel::Negative => "badge-error",
        SentimentLabel::Neutral => "badge-ghost",
    }
}

fn news_list(sentiments: &CitySentiments) -> Html {
    if sentiments.items.is_empty() {
        return html! {
            <div class="alert alert-info">
                <i class="fas fa-info-circle"></i>
                <span>{format!("No recent news for {}.", sentiments.city)}</span>
            </div>
        };
    }

    html! {
        <ul class="flex flex-col gap-2">
            { for sentiments.items.iter().map(|item| html! {
                <li class="flex items-start gap-3">
                    <span class={classes!("badge", "badge-sm", badge_class(item.sentiment))}>
                        {item.sentiment.as_str()}
                    </span>
                    <div class="flex flex-col">
                        <a class="link link-hover" href={item.url.clone()} target="_blank" rel="noopener noreferrer">
                            {&item.headline}
                        </a>
                        <span class="text-xs opacity-60">{&item.date}</span>
                    </div>
                </li>
            }) }
        </ul>
    }
}

#[function_component(SentimentPanel)]
pub fn sentiment_panel() -> Html {
    let render = Callback::from(|data: Rc<ResourceData>| {
        data.as_sentiment().map(news_list).unwrap_or_default()
    });

    html! {
        <ResourcePanel title="Sentiment & News" kind={ResourceKind::Sentiment} {render} />
    }
}
