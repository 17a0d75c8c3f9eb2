pub mod archive_scraper;
pub mod batch;
pub mod droid;
pub mod image_fetcher;
pub mod page_source;
pub mod unique_path;

pub use archive_scraper::*;
pub use batch::*;
pub use droid::*;
pub use image_fetcher::*;
pub use page_source::*;
pub use unique_path::*;
