pub mod codec;
pub mod coerce;
pub mod errors;
pub mod field;
pub mod prelude;

pub use codec::{decode, encode, UpdateEnvelope};
pub use coerce::coerce;
pub use field::{FieldSchema, FieldSpec, FieldType};
