//! Filter state and its reducer.
//!
//! Every change to the dashboard filters goes through [`FilterAction`] and
//! the pure [`FilterState::reduce`] transition. Reduction never mutates the
//! previous state: it returns a new `Rc<FilterState>` whose untouched fields
//! share their allocations with the previous one, or the very same `Rc` when
//! the action does not change anything.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, trace};

/// Lower bound of the square footage slider.
pub const SQFT_FLOOR: u32 = 300;
/// Upper bound of the square footage slider.
pub const SQFT_CEILING: u32 = 5500;
/// City selected when the dashboard starts or is reset.
pub const DEFAULT_CITY: &str = "Calgary";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    #[error("unknown horizon '{0}', expected one of 1Y, 2Y, 5Y, 10Y")]
    Horizon(String),
    #[error("unknown model type '{0}', expected one of arima, lstm, prophet")]
    ModelType(String),
}

/// Forecast horizon offered by the horizon selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Horizon {
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneYear,
        Horizon::TwoYears,
        Horizon::FiveYears,
        Horizon::TenYears,
    ];

    /// Label shown in the UI and in error details (`5Y`).
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::OneYear => "1Y",
            Horizon::TwoYears => "2Y",
            Horizon::FiveYears => "5Y",
            Horizon::TenYears => "10Y",
        }
    }

    /// Value sent in the `horizon` query parameter (`5y`).
    pub fn query_value(&self) -> &'static str {
        match self {
            Horizon::OneYear => "1y",
            Horizon::TwoYears => "2y",
            Horizon::FiveYears => "5y",
            Horizon::TenYears => "10y",
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            Horizon::OneYear => 1,
            Horizon::TwoYears => 2,
            Horizon::FiveYears => 5,
            Horizon::TenYears => 10,
        }
    }

    pub fn months(&self) -> u32 {
        self.years() * 12
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Horizon::ALL
            .into_iter()
            .find(|h| h.label() == normalized)
            .ok_or_else(|| FilterParseError::Horizon(s.to_string()))
    }
}

/// Forecasting model the backend should serve predictions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelType {
    #[default]
    Arima,
    Lstm,
    Prophet,
}

impl ModelType {
    pub const ALL: [ModelType; 3] = [ModelType::Arima, ModelType::Lstm, ModelType::Prophet];

    pub fn label(&self) -> &'static str {
        match self {
            ModelType::Arima => "ARIMA",
            ModelType::Lstm => "LSTM",
            ModelType::Prophet => "Prophet",
        }
    }

    /// Value sent in the `model` query parameter.
    pub fn query_value(&self) -> &'static str {
        match self {
            ModelType::Arima => "arima",
            ModelType::Lstm => "lstm",
            ModelType::Prophet => "prophet",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelType {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ModelType::ALL
            .into_iter()
            .find(|m| m.query_value() == normalized)
            .ok_or_else(|| FilterParseError::ModelType(s.to_string()))
    }
}

/// Square footage range. Always satisfies `SQFT_FLOOR <= min <= max <= SQFT_CEILING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqftRange {
    min: u32,
    max: u32,
}

impl SqftRange {
    /// Builds a range, clamping both bounds into the slider range and
    /// pulling `min` down to `max` when they arrive out of order.
    pub fn new(min: u32, max: u32) -> Self {
        let max = clamp_sqft(max);
        let min = clamp_sqft(min).min(max);
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Moves the lower bound, never past the current upper bound.
    pub fn with_min(self, min: u32) -> Self {
        Self {
            min: clamp_sqft(min).min(self.max),
            max: self.max,
        }
    }

    /// Moves the upper bound, never below the current lower bound.
    pub fn with_max(self, max: u32) -> Self {
        Self {
            min: self.min,
            max: clamp_sqft(max).max(self.min),
        }
    }
}

impl Default for SqftRange {
    fn default() -> Self {
        Self {
            min: SQFT_FLOOR,
            max: SQFT_CEILING,
        }
    }
}

fn clamp_sqft(value: u32) -> u32 {
    value.clamp(SQFT_FLOOR, SQFT_CEILING)
}

/// Normalizes a selector value. `"Any"` and blank mean no filter.
fn selection(value: &str) -> Option<Rc<str>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("any") {
        None
    } else {
        Some(Rc::from(value))
    }
}

/// Current dashboard filters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub city: Rc<str>,
    pub horizon: Horizon,
    pub model_type: ModelType,
    pub property_type: Option<Rc<str>>,
    pub beds: Option<Rc<str>>,
    pub baths: Option<Rc<str>>,
    pub sqft: Option<SqftRange>,
    pub year_built: Option<Rc<str>>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            city: Rc::from(DEFAULT_CITY),
            horizon: Horizon::default(),
            model_type: ModelType::default(),
            property_type: None,
            beds: None,
            baths: None,
            sqft: None,
            year_built: None,
        }
    }
}

/// A discrete filter change.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetCity(String),
    SetHorizon(Horizon),
    SetModelType(ModelType),
    SetPropertyType(String),
    SetBeds(String),
    SetBaths(String),
    SetYearBuilt(String),
    SetSqft { min: u32, max: u32 },
    SetSqftMin(u32),
    SetSqftMax(u32),
    ClearSqft,
    Reset,
}

impl FilterState {
    /// Applies `action` and returns the next state.
    ///
    /// Returns `self` unchanged (pointer-equal) when the action is a no-op, so
    /// consumers comparing with `Rc::ptr_eq` do not see a spurious change.
    /// An empty city is ignored.
    pub fn reduce(self: Rc<Self>, action: FilterAction) -> Rc<Self> {
        trace!(?action, "Reducing filter action");

        let next = match &action {
            FilterAction::SetCity(city) => {
                let city = city.trim();
                if city.is_empty() || *self.city == *city {
                    return self;
                }
                FilterState {
                    city: Rc::from(city),
                    ..(*self).clone()
                }
            }
            FilterAction::SetHorizon(horizon) => {
                if self.horizon == *horizon {
                    return self;
                }
                FilterState {
                    horizon: *horizon,
                    ..(*self).clone()
                }
            }
            FilterAction::SetModelType(model_type) => {
                if self.model_type == *model_type {
                    return self;
                }
                FilterState {
                    model_type: *model_type,
                    ..(*self).clone()
                }
            }
            FilterAction::SetPropertyType(value) => {
                let property_type = selection(value);
                if self.property_type == property_type {
                    return self;
                }
                FilterState {
                    property_type,
                    ..(*self).clone()
                }
            }
            FilterAction::SetBeds(value) => {
                let beds = selection(value);
                if self.beds == beds {
                    return self;
                }
                FilterState {
                    beds,
                    ..(*self).clone()
                }
            }
            FilterAction::SetBaths(value) => {
                let baths = selection(value);
                if self.baths == baths {
                    return self;
                }
                FilterState {
                    baths,
                    ..(*self).clone()
                }
            }
            FilterAction::SetYearBuilt(value) => {
                let year_built = selection(value);
                if self.year_built == year_built {
                    return self;
                }
                FilterState {
                    year_built,
                    ..(*self).clone()
                }
            }
            FilterAction::SetSqft { .. }
            | FilterAction::SetSqftMin(_)
            | FilterAction::SetSqftMax(_)
            | FilterAction::ClearSqft => {
                let sqft = match &action {
                    FilterAction::SetSqft { min, max } => Some(SqftRange::new(*min, *max)),
                    FilterAction::SetSqftMin(min) => Some(self.sqft.unwrap_or_default().with_min(*min)),
                    FilterAction::SetSqftMax(max) => Some(self.sqft.unwrap_or_default().with_max(*max)),
                    _ => None,
                };
                if self.sqft == sqft {
                    return self;
                }
                FilterState {
                    sqft,
                    ..(*self).clone()
                }
            }
            FilterAction::Reset => {
                let defaults = FilterState::default();
                if *self == defaults {
                    return self;
                }
                defaults
            }
        };

        debug!(?action, city = %next.city, horizon = %next.horizon, "Filter state changed");
        Rc::new(next)
    }
}

/// Owner of the current [`FilterState`].
///
/// Dispatches take `&mut self`, so they are applied one at a time in arrival
/// order. The store performs no side effects; consumers react to the new
/// state themselves.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: Rc<FilterState>,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FilterState) -> Self {
        Self {
            state: Rc::new(state),
            revision: 0,
        }
    }

    /// Current state. Cheap to clone and never mutated in place.
    pub fn state(&self) -> Rc<FilterState> {
        Rc::clone(&self.state)
    }

    /// Number of dispatches that changed the state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `action`. Returns `true` when the state changed.
    pub fn dispatch(&mut self, action: FilterAction) -> bool {
        let next = Rc::clone(&self.state).reduce(action);
        if Rc::ptr_eq(&next, &self.state) {
            trace!("Filter action was a no-op");
            return false;
        }
        self.state = next;
        self.revision += 1;
        true
    }
}
