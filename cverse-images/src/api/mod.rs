//! HTTP API handlers

pub mod batch;
pub mod health;
pub mod images;
pub mod settings;

pub use batch::batch_routes;
pub use health::health_routes;
pub use images::image_routes;
pub use settings::settings_routes;
