pub mod config;
pub mod converter;
pub mod error;
pub mod fixtures;
pub mod formats;
pub mod frame;
pub mod load;
pub mod report;
pub mod resize;
pub mod resolve;
pub mod writer;

pub use config::{DurationSpec, GifConfig};
pub use converter::Converter;
pub use error::{Error, Result};
pub use formats::{supported_formats, SUPPORTED_EXTENSIONS};
pub use frame::Frame;
