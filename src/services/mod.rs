// Service module exports

pub mod pdf;
pub mod settings;
