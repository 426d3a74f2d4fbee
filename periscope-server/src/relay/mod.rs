mod registry;
mod relay;
mod relay_command;
mod relay_handle;

pub use registry::*;
pub use relay::*;
pub use relay_command::*;
pub use relay_handle::*;
