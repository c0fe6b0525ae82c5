// Module exports for models

pub mod color;
pub mod event;
pub mod filters;
pub mod request;
pub mod settings;
pub mod view;
