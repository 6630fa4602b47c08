pub mod error;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod source;

pub use error::FetchError;
pub use mock::MockSlateSource;
pub use models::GameRecord;
pub use source::{HttpSlateSource, SlateSource};
