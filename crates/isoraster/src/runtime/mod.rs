//! # Display Runtime
//!
//! Threads and mailboxes around the render core. Each attached display runs
//! on its own actor thread; the host's ticker and the registry only ever send
//! it messages.

pub mod actor;
pub mod host;
pub mod messages;
pub mod registry;

pub use actor::{DisplayActor, DisplayHandle};
pub use host::DisplayHost;
pub use messages::{DisplayMessage, DisplayStatus};
pub use registry::DisplayRegistry;
