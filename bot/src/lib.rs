//! Random-move players driving a [`sweeper_surface::Surface`] through a
//! [`Desktop`], scheduled on a single-threaded [`EventLoop`].

pub use agent::*;
pub use config::*;
pub use debug::*;
pub use desktop::*;
pub use scheduler::*;
pub use stats::*;

mod agent;
mod config;
mod debug;
mod desktop;
mod scheduler;
mod stats;
