pub mod cache;
pub mod errors;
pub mod metadata;
pub mod provider;
pub mod token;
pub mod prelude;

pub use cache::CachedTokenProvider;
pub use metadata::MetadataTokenProvider;
pub use provider::{IdentityTokenProvider, StaticTokenProvider};
pub use token::BearerToken;
