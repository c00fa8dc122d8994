pub mod api;
pub mod tokens;

pub use api::StravaClient;
pub use tokens::AccessToken;
