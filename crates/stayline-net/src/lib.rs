pub mod client;
pub mod errors;
pub mod types;
pub mod prelude;

pub use client::{BackendInvoker, ReqwestInvoker};
pub use types::{BackendRequest, BackendResponse};
