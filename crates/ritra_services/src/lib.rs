//! External collaborators for the Ritra pipeline.
//!
//! - [`SheetsTitleResolver`]: reads a title cell from a Google Sheets tab
//! - [`StaticTitleResolver`]: returns a fixed or caller-supplied title
//! - [`HttpRenderService`]: posts the finished bundle to a render endpoint

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod render;
mod sheets;
mod static_title;

pub use render::HttpRenderService;
pub use sheets::SheetsTitleResolver;
pub use static_title::StaticTitleResolver;
