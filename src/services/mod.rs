pub mod board_discovery;
pub mod content_fetcher;
pub mod droid;
pub mod google_search;
pub mod openai_client;
pub mod truncator;

pub use board_discovery::*;
pub use content_fetcher::*;
pub use droid::*;
pub use google_search::*;
pub use openai_client::*;
pub use truncator::*;
