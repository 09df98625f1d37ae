pub use crate::codes;
pub use crate::model::{ErrorBuilder, ErrorCode, ErrorObj};
pub use crate::retry::RetryClass;
