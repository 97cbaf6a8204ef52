pub mod config;
pub mod error;
pub mod intent;
pub mod kernel;
pub mod resolver;
pub mod services;

pub use kernel::reactor::Reactor;
