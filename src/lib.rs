#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;

pub mod api;
pub mod meter;
pub mod metrics;
pub mod model;
pub mod poller;
pub mod publisher;
pub mod settings;
pub mod sink;

pub use api::Error;
pub use meter::Meter;
