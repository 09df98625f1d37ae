pub use crate::codec::{decode, encode, UpdateEnvelope};
pub use crate::coerce::coerce;
pub use crate::errors::{CoercionError, SchemaError};
pub use crate::field::{FieldSchema, FieldSpec, FieldType};
