use crate::{
    Class, Header, Question, RecordType, Result, WireWriter, DEFAULT_QUERY_ID, QUERY_CAPACITY,
};
use bytes::Bytes;
use std::default::Default;
use tracing::{instrument, trace};

/// A standard query carrying a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub header: Header,
    pub question: Question,
}

impl Query {
    /// Encodes the query into a [`QUERY_CAPACITY`] byte buffer and returns
    /// the bytes actually written.
    #[instrument]
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = WireWriter::with_capacity(QUERY_CAPACITY);
        let mut byte_count = self.header.to_bytes(&mut buf)?;
        byte_count += self.question.to_bytes(&mut buf)?;

        trace!("Wrote {} bytes", byte_count);

        Ok(buf.freeze())
    }
}

#[derive(Debug)]
pub struct QueryBuilder {
    id: u16,
    q_name: String,
    q_type: RecordType,
    q_class: Class,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            id: DEFAULT_QUERY_ID,
            q_name: String::new(),
            q_type: Default::default(),
            q_class: Default::default(),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every flag bit is left clear - a plain, non-recursive query.
    pub fn build(self) -> Query {
        Query {
            header: Header {
                id: self.id,
                qd_count: 1,
                ..Default::default()
            },
            question: Question {
                q_name: self.q_name,
                q_type: self.q_type,
                q_class: self.q_class,
            },
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.q_name = name.to_string();
        self
    }

    pub fn q_type(mut self, t: RecordType) -> Self {
        self.q_type = t;
        self
    }

    pub fn class(mut self, cls: Class) -> Self {
        self.q_class = cls;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{test::setup, MessageError, OpCode};

    #[test]
    fn test_query_builder() {
        setup();
        let query = QueryBuilder::new()
            .name("www.google.com")
            .q_type(RecordType::CNAME)
            .build();

        assert_eq!(query.header.id, DEFAULT_QUERY_ID);
        assert!(!query.header.qr);
        assert!(!query.header.rd);
        assert_eq!(query.header.opcode, OpCode::Query);
        assert_eq!(query.header.qd_count, 1);
        assert_eq!(query.header.an_count, 0);
        assert_eq!(query.question.q_name, "www.google.com");
        assert_eq!(query.question.q_type, RecordType::CNAME);
        assert_eq!(query.question.q_class, Class::IN);
    }

    #[test]
    fn test_example_query_bytes() {
        setup();
        let expected: &[u8] = &[
            0x12, 0x34, // ID
            0, 0, // Flags
            0, 1, // qdcount
            0, 0, // ancount
            0, 0, // nscount
            0, 0, // arcount
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', // example
            3, b'c', b'o', b'm', // com
            0, // name terminator
            0, 1, // qtype - A
            0, 1, // qclass - IN
        ];

        let bytes = QueryBuilder::new()
            .name("example.com")
            .q_type(RecordType::A)
            .build()
            .to_bytes()
            .unwrap();
        assert_eq!(bytes.as_ref(), expected);

        let again = crate::build_query("example.com", RecordType::A).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_query_with_id_and_class() {
        setup();
        let bytes = QueryBuilder::new()
            .id(0xbeef)
            .name("a.b")
            .q_type(RecordType::TXT)
            .class(Class::Unknown(3))
            .build()
            .to_bytes()
            .unwrap();
        assert_eq!(&bytes[..2], &[0xbe, 0xef]);
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 16, 0, 3]);
        assert_eq!(bytes.len(), 12 + 5 + 4);
    }

    #[test]
    fn test_query_with_invalid_name() {
        setup();
        assert_eq!(
            crate::build_query("bad..name", RecordType::MX),
            Err(MessageError::EmptyLabel("bad..name".to_string()))
        );
    }
}
