//! Configuration for addonctl

pub mod images;
pub mod settings;

pub use images::ImageTemplate;
pub use settings::Settings;
