use serde::{Deserialize, Serialize};

/// Sentiment classification of a news headline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SentimentLabel {
    #[serde(rename = "POS")]
    Positive,
    #[serde(rename = "NEG")]
    Negative,
    #[serde(rename = "NEU")]
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POS",
            SentimentLabel::Negative => "NEG",
            SentimentLabel::Neutral => "NEU",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub date: String,
    pub headline: String,
    pub sentiment: SentimentLabel,
    pub url: String,
}

/// Payload of `GET /sentiment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitySentiments {
    pub city: String,
    pub items: Vec<NewsItem>,
}

impl CitySentiments {
    /// Count of (positive, negative, neutral) headlines.
    pub fn tally(&self) -> (usize, usize, usize) {
        self.items.iter().fold((0, 0, 0), |(pos, neg, neu), item| match item.sentiment {
            SentimentLabel::Positive => (pos + 1, neg, neu),
            SentimentLabel::Negative => (pos, neg + 1, neu),
            SentimentLabel::Neutral => (pos, neg, neu + 1),
        })
    }
}
