pub mod analytics;
pub mod instrument;
pub mod portfolio;
pub mod series;
pub mod settings;
