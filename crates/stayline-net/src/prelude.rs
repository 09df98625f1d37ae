pub use crate::client::{BackendInvoker, ReqwestInvoker};
pub use crate::errors::NetError;
pub use crate::types::{BackendRequest, BackendResponse};
