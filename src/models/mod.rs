pub mod ceremony;
pub mod gemini;
pub mod image;
pub mod page;
pub mod texts;

pub use ceremony::*;
pub use image::*;
pub use page::*;
pub use texts::*;
