use crate::name::write_name;
use crate::{MessageError, Result, WireWriter};
use std::default::Default;
use std::fmt;
use std::str::FromStr;

use tracing::{instrument, trace};

#[derive(Debug, Clone, PartialEq)]
/// The question section is used to carry the "question" in most queries, i.e.,
/// the parameters that define what is being asked.
pub struct Question {
    /// RFC1035 - a domain name represented as a sequence of labels, where each
    /// label consists of a length octet followed by that number of octets.  The
    /// domain name terminates with the zero length octet for the null label of
    /// the root.  Note that this field may be an odd number of octets; no
    /// padding is used.
    pub q_name: String,

    /// RFC1035 - a two octet code which specifies the type of the query.
    pub q_type: RecordType,

    /// RFC1035 - a two octet code that specifies the [`Class`] of the query.
    pub q_class: Class,
}

impl Question {
    #[instrument(skip(buf))]
    pub(crate) fn to_bytes(&self, buf: &mut WireWriter) -> Result<usize> {
        let mut byte_count = write_name(&self.q_name, buf)?;
        buf.write_u16(self.q_type.into())?;
        buf.write_u16(self.q_class.into())?;
        byte_count += 4;

        trace!("Wrote {} bytes", byte_count);

        Ok(byte_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The record types this tool asks for and names. Any other wire value is
/// carried as [`RecordType::Unknown`].
pub enum RecordType {
    /// RFC1035 - (1) a host address.
    A,

    /// RFC1035 - (2) an authoritative name server.
    NS,

    /// RFC1035 - (5) the canonical name for an alias.
    CNAME,

    /// RFC1035 - (15) mail exchange.
    MX,

    /// RFC1035 - (16) text strings.
    TXT,

    /// An unknown [`RecordType`] - the value is contained within.
    Unknown(u16),
}

impl RecordType {
    /// The name printed next to the numeric type.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::Unknown(_) => "unknown record",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

impl From<RecordType> for u16 {
    fn from(t: RecordType) -> u16 {
        match t {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::Unknown(i) => i,
        }
    }
}

impl From<u16> for RecordType {
    fn from(val: u16) -> Self {
        match val {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            _ => RecordType::Unknown(val),
        }
    }
}

impl FromStr for RecordType {
    type Err = MessageError;

    /// Parses a mnemonic, ignoring case. Only the named types are accepted.
    fn from_str(s: &str) -> Result<Self> {
        [
            RecordType::A,
            RecordType::NS,
            RecordType::CNAME,
            RecordType::MX,
            RecordType::TXT,
        ]
        .into_iter()
        .find(|t| t.mnemonic().eq_ignore_ascii_case(s))
        .ok_or_else(|| MessageError::UnknownRecordType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The class of a question or record - only [`Class::IN`] is named.
pub enum Class {
    /// RFC1035 - 1 the Internet.
    IN,

    /// Any other class - contained within.
    Unknown(u16),
}

impl Class {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Class::IN => "IN",
            Class::Unknown(_) => "unknown class",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl Default for Class {
    fn default() -> Self {
        Class::IN
    }
}

impl From<Class> for u16 {
    fn from(c: Class) -> u16 {
        match c {
            Class::IN => 1,
            Class::Unknown(i) => i,
        }
    }
}

impl From<u16> for Class {
    fn from(val: u16) -> Self {
        match val {
            1 => Class::IN,
            _ => Class::Unknown(val),
        }
    }
}
