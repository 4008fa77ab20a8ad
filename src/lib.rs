pub mod backend;
pub mod buffer;
pub mod config;
pub mod error;
pub mod frame;
pub mod poster;
pub mod surface;
pub mod types;
pub mod video;

// Re-exports
pub use buffer::*;
pub use config::*;
pub use error::*;
pub use frame::*;
pub use poster::*;
pub use surface::*;
pub use types::*;
pub use video::*;
