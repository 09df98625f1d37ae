pub use crate::cache::CachedTokenProvider;
pub use crate::errors::AuthError;
pub use crate::metadata::{MetadataTokenProvider, DEFAULT_METADATA_BASE};
pub use crate::provider::{IdentityTokenProvider, StaticTokenProvider};
pub use crate::token::BearerToken;
