//! Domain entities - Core business objects

pub mod message;
pub mod command;
pub mod plugin;
pub mod report;

pub use message::{Message, Content};
pub use command::{ArgKind, Command, CommandRegistry, CommandScope};
pub use plugin::{PluginCatalog, PluginDescriptor, PluginOrigin, PluginState, Transition};
pub use report::{BatchReport, Outcome};
