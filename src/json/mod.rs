pub mod parser;
pub mod value;
pub mod writer;

pub use parser::{parse, ParseError};
pub use value::{JsonValue, Map, Number};
pub use writer::serialize;
