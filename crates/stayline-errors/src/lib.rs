pub mod codes;
pub mod model;
pub mod retry;
pub mod prelude;

pub use model::{ErrorBuilder, ErrorCode, ErrorObj};
pub use retry::RetryClass;
