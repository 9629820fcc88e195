use crate::header::HEADER_LEN;
use crate::name::{read_name, skip_name};
use crate::{Class, Header, Message, Question, RData, RecordType, ResourceRecord, Result};
use nom::number::complete::{be_u16, be_u32};
use nom::IResult;
use std::net::Ipv4Addr;
use tracing::{debug, instrument, trace, warn};

/// A cursor over a received message.
///
/// Reads never look past the end of the message: a field that does not fit
/// reads as zero, and the cursor still moves past it so that every later
/// field of the record lines up the same way it would in a whole message.
struct WireReader<'a> {
    message: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(message: &'a [u8], pos: usize) -> Self {
        Self { message, pos }
    }

    fn rest(&self) -> &'a [u8] {
        self.message.get(self.pos..).unwrap_or(&[])
    }

    fn field<T: Default>(
        &mut self,
        width: usize,
        parser: fn(&'a [u8]) -> IResult<&'a [u8], T>,
    ) -> T {
        let val = match parser(self.rest()) {
            Ok((_, val)) => val,
            Err(_) => {
                trace!(
                    "{} byte field at {} is past the end of the {} byte message",
                    width,
                    self.pos,
                    self.message.len()
                );
                T::default()
            }
        };
        self.skip(width);
        val
    }

    fn u16(&mut self) -> u16 {
        self.field(2, be_u16)
    }

    fn u32(&mut self) -> u32 {
        self.field(4, be_u32)
    }

    fn skip(&mut self, len: usize) {
        self.pos = self.pos.saturating_add(len);
    }

    /// Reads an IPv4 address at the cursor without moving it.
    fn peek_ipv4(&self) -> Ipv4Addr {
        match self.rest().get(..4) {
            Some(&[a, b, c, d]) => Ipv4Addr::new(a, b, c, d),
            _ => {
                warn!("A record address at {} is cut short", self.pos);
                Ipv4Addr::UNSPECIFIED
            }
        }
    }

    /// Copies up to `len` bytes at the cursor without moving it.
    fn peek_bytes(&self, len: usize) -> Vec<u8> {
        let rest = self.rest();
        rest[..len.min(rest.len())].to_vec()
    }

    /// Decodes the name at the cursor and moves past its in-place encoding.
    /// A name that cannot be decoded reads as the root name.
    fn name(&mut self) -> String {
        let start = self.pos;
        match read_name(self.message, start) {
            Ok(decoded) => {
                if decoded.truncated {
                    warn!("Name at {} is cut short: {:?}", start, decoded.name);
                }
                self.skip(decoded.wire_len);
                decoded.name
            }
            Err(e) => {
                warn!("Could not decode name at {}: {}", start, e);
                self.skip(skip_name(self.message, start));
                String::new()
            }
        }
    }
}

fn read_question(reader: &mut WireReader) -> Question {
    trace!("reading question at {}", reader.pos);
    let q_name = reader.name();
    let q_type = RecordType::from(reader.u16());
    let q_class = Class::from(reader.u16());

    Question {
        q_name,
        q_type,
        q_class,
    }
}

fn read_resource_record(reader: &mut WireReader) -> ResourceRecord {
    trace!("reading resource record at {}", reader.pos);
    let name = reader.name();
    let r_type = RecordType::from(reader.u16());
    let class = Class::from(reader.u16());
    let ttl = reader.u32();
    let rd_length = reader.u16();

    trace!("Found rdata of length: {}", rd_length);

    let data = match r_type {
        RecordType::A => RData::A(reader.peek_ipv4()),
        _ => RData::Raw(reader.peek_bytes(usize::from(rd_length))),
    };
    // Every type is stepped over by its declared length, interpreted or not.
    reader.skip(usize::from(rd_length));

    ResourceRecord {
        name,
        r_type,
        class,
        ttl,
        rd_length,
        data,
    }
}

fn read_section(reader: &mut WireReader, count: u16, section: &str) -> Vec<ResourceRecord> {
    debug!("reading {} {} record(s)", count, section);
    let mut records = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        records.push(read_resource_record(reader));
    }
    records
}

/// Decodes a whole message. Damaged input never fails the parse, it only
/// degrades the fields it touches.
#[instrument(skip(input), fields(len = input.len()))]
pub(crate) fn read_message(input: &[u8]) -> Result<Message> {
    trace!("reading message");
    let header = Header::from_bytes(input)?;
    let mut reader = WireReader::new(input, HEADER_LEN);

    let mut questions = Vec::with_capacity(usize::from(header.qd_count));
    for _ in 0..header.qd_count {
        questions.push(read_question(&mut reader));
    }

    let answers = read_section(&mut reader, header.an_count, "answer");
    let name_servers = read_section(&mut reader, header.ns_count, "authority");
    let additional_records = read_section(&mut reader, header.ar_count, "additional");

    if reader.pos < input.len() {
        debug!("{} trailing bytes ignored", input.len() - reader.pos);
    } else if reader.pos > input.len() {
        warn!(
            "Message is {} bytes short of what its records declare",
            reader.pos - input.len()
        );
    }

    Ok(Message {
        header,
        questions,
        answers,
        name_servers,
        additional_records,
    })
}
