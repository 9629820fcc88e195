use crate::{Class, RecordType};
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq)]
/// The answer, authority and additional sections all share the same format,
/// that is a variable number of [`ResourceRecord`]s.
pub struct ResourceRecord {
    /// A domain name to which this resource record pertains.
    pub name: String,

    /// RFC1035 - two octets containing one of the RR type codes.
    pub r_type: RecordType,

    /// The class of the data in the `data` field.
    pub class: Class,

    /// RFC1035 - a 32 bit unsigned integer that specifies the time interval (in
    /// seconds) that the resource record may be cached before it should be
    /// discarded.  Zero values are interpreted to mean that the RR can only be
    /// used for the transaction in progress, and should not be cached.
    pub ttl: u32,

    /// RFC1035 - the length in octets of the RDATA field, as found on the wire.
    pub rd_length: u16,

    /// The record data.
    pub data: RData,
}

#[derive(Debug, Clone, PartialEq)]
/// The [`ResourceRecord`] data.
pub enum RData {
    /// RFC1035 - (1) a host address.
    A(Ipv4Addr),

    /// Data of every other type, left uninterpreted. Holds at most
    /// `rd_length` bytes - fewer when the message ended early.
    Raw(Vec<u8>),
}

impl fmt::Display for ResourceRecord {
    /// One report line: the owner name, then type, class and ttl with their
    /// mnemonics, then the address for A records.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}. type: {} ({}), class: {} ({}), ttl: {}",
            self.name,
            u16::from(self.r_type),
            self.r_type,
            u16::from(self.class),
            self.class,
            self.ttl
        )?;
        if let RData::A(v4) = &self.data {
            write!(f, " ({})", v4)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::setup;

    fn record(r_type: RecordType, data: RData) -> ResourceRecord {
        ResourceRecord {
            name: "example.com".to_string(),
            r_type,
            class: Class::IN,
            ttl: 300,
            rd_length: 4,
            data,
        }
    }

    #[test]
    fn test_format_a_record() {
        setup();
        let rr = record(RecordType::A, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(
            rr.to_string(),
            "example.com. type: 1 (A), class: 1 (IN), ttl: 300 (93.184.216.34)"
        );
        // Formatting has no side effects on the record.
        assert_eq!(rr.to_string(), rr.to_string());
    }

    #[test]
    fn test_format_other_records() {
        setup();
        let rr = record(RecordType::NS, RData::Raw(vec![0xc0, 0x0c]));
        assert_eq!(
            rr.to_string(),
            "example.com. type: 2 (NS), class: 1 (IN), ttl: 300"
        );

        let mut rr = record(RecordType::Unknown(99), RData::Raw(vec![]));
        rr.class = Class::Unknown(4);
        rr.name = String::new();
        assert_eq!(
            rr.to_string(),
            ". type: 99 (unknown record), class: 4 (unknown class), ttl: 300"
        );
    }
}
