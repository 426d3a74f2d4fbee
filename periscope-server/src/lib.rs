mod api;
mod config;
mod error;
mod relay;
mod signaling;

pub use api::*;
pub use config::*;
pub use error::*;
pub use relay::*;
pub use signaling::*;
