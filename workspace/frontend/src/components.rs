pub mod dashboard;
pub mod filters;
pub mod layout;
pub mod panels;
pub mod settings;
