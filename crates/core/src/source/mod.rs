//! Request sources feeding the conversion pipeline.
//!
//! - `BatchSource`: a culture id, an ordered list of inputs and a shared format
//! - `StreamSource`: newline-delimited JSON records from any async line reader,
//!   ending at a blank line or end of input

mod batch;
mod stream;

pub use batch::BatchSource;
pub use stream::{StreamRecord, StreamSource};
