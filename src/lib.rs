pub mod bible;
pub mod error;
pub mod loader;
pub mod messages;
pub mod navigator;

// Re-export main types for convenience
pub use bible::{Bible, Book, Chapter, Verse};
pub use error::{Error, Level, Result};
pub use loader::{DataLoader, Location, Shape};
pub use messages::{Locale, Message};
pub use navigator::{ContextTag, ContextVerse, Navigator, Position, Reference, Step};
