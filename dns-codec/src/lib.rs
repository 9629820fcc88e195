//! Encoding of single-question DNS queries and best-effort decoding of the
//! replies, as used by `dnstool`.

mod builder;
mod error;
mod header;
mod message;
mod name;
mod parser;
mod question;
mod resource_record;
mod writer;

pub use builder::{Query, QueryBuilder};
pub use error::MessageError;
pub use header::{Header, OpCode, RCode, HEADER_LEN};
pub use message::Message;
pub use name::{read_name, skip_name, DecodedName};
pub use question::{Class, Question, RecordType};
pub use resource_record::{RData, ResourceRecord};
pub use writer::WireWriter;

pub type Result<T> = std::result::Result<T, MessageError>;

/// RFC1035 - messages carried by UDP are restricted to 512 bytes.
pub const QUERY_CAPACITY: usize = 512;

/// Size of the buffer a reply is received into.
pub const RESPONSE_CAPACITY: usize = 1024;

/// Transaction id used when the caller does not pick one.
pub const DEFAULT_QUERY_ID: u16 = 0x1234;

/// Builds the query for `name`/`q_type` with the default id, returning the
/// wire bytes ready to be sent.
pub fn build_query(name: &str, q_type: RecordType) -> Result<bytes::Bytes> {
    QueryBuilder::new().name(name).q_type(q_type).build().to_bytes()
}

#[cfg(test)]
mod test {
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn setup() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::TRACE)
                .init();
        });
    }
}
