use crate::{parser, Header, Question, ResourceRecord, Result};
use std::fmt;
use tracing::{instrument, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub name_servers: Vec<ResourceRecord>,
    pub additional_records: Vec<ResourceRecord>,
}

impl Message {
    /// Reads the u8 buffer and parses the DNS message from it.
    ///
    /// This includes the dereferencing of rfc1035 Message Compression pointers,
    /// and collapsing the names into strings. Only the bytes in `input` are
    /// ever read - anything the message claims beyond them reads as zero.
    #[instrument(skip(input))]
    pub fn from_bytes(input: &[u8]) -> Result<Message> {
        let message = parser::read_message(input)?;

        trace!(
            "Read message(id:{}) with {} answer(s)",
            message.header.id,
            message.answers.len()
        );

        Ok(message)
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    records: &[ResourceRecord],
) -> fmt::Result {
    writeln!(f, "{} section:", title)?;
    for rr in records {
        writeln!(f, "{}", rr)?;
    }
    writeln!(f)
}

impl fmt::Display for Message {
    /// The report printed for a reply: the flags that matter, the section
    /// counts and every record of the three record sections.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "AA: {}", u8::from(h.aa))?;
        writeln!(f, "TC: {}", u8::from(h.tc))?;
        writeln!(f, "RCODE: {}", h.rcode.as_u8())?;
        writeln!(f, "QDCOUNT: {}", h.qd_count)?;
        writeln!(f, "ANCOUNT: {}", h.an_count)?;
        writeln!(f, "NSCOUNT: {}", h.ns_count)?;
        writeln!(f, "ARCOUNT: {}", h.ar_count)?;
        writeln!(f)?;

        write_section(f, "answer", &self.answers)?;
        write_section(f, "authority", &self.name_servers)?;
        write_section(f, "additional", &self.additional_records)
    }
}
