mod filter_bar;
mod selector;
mod sqft_range;

pub use filter_bar::FilterBar;
