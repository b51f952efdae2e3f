pub mod envelope;
pub mod extract;

pub use envelope::{ApiResponse, ApiResult, BareResult, Envelope};
pub use extract::{parse_id, require, IdInput, JsonBody, Present};
