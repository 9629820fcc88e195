use crate::{MessageError, Result, WireWriter};
use nom::bits::bits;
use nom::bits::complete::take as take_bits;
use nom::combinator::map;
use nom::number::complete::be_u16;
use nom::IResult;
use std::default::Default;
use tracing::{instrument, trace, warn};

/// Size of the fixed header at the start of every message.
pub const HEADER_LEN: usize = 12;

type BitInput<'a> = (&'a [u8], usize);

#[derive(Debug, Default, Clone, PartialEq)]
/// The DNS Message Header as per RFC1035 and RFC2535, with the four section
/// counts that follow the flags.
pub struct Header {
    /// RFC1035 - A 16 bit identifier assigned by the program that generates any
    /// kind of query. This identifier is copied the corresponding reply and
    /// can be used by the requester to match up replies to outstanding queries.
    pub id: u16,

    /// RFC1035 - A one bit field that specifies whether this message is a query
    /// (0), or a response (1).
    pub qr: bool,

    /// RFC1035 -  A four bit field that specifies kind of query in this
    /// message.
    pub opcode: OpCode,

    /// RFC1035 - Authoritative Answer - the responding name server is an
    /// authority for the domain name in question section.
    pub aa: bool,

    /// RFC1035 - TrunCation - specifies that this message was truncated due to
    /// length greater than that permitted on the transmission channel.
    pub tc: bool,

    /// RFC1035 - Recursion Desired.
    pub rd: bool,

    /// RFC1035 - Recursion Available.
    pub ra: bool,

    /// RFC2535 - Authentic Data.
    pub ad: bool,

    /// RFC2535 - Checking Disabled.
    pub cd: bool,

    /// RFC1035 - Response code - this 4 bit field is set as part of responses.
    pub rcode: RCode,

    /// Number of entries in the question section.
    pub qd_count: u16,

    /// Number of resource records in the answer section.
    pub an_count: u16,

    /// Number of name server resource records in the authority section.
    pub ns_count: u16,

    /// Number of resource records in the additional records section.
    pub ar_count: u16,
}

struct Flags {
    qr: bool,
    opcode: OpCode,
    aa: bool,
    tc: bool,
    rd: bool,
    ra: bool,
    ad: bool,
    cd: bool,
    rcode: RCode,
}

impl Header {
    #[instrument(skip(buf))]
    pub(crate) fn to_bytes(&self, buf: &mut WireWriter) -> Result<usize> {
        buf.write_u16(self.id)?;

        let mut val = 0u8;
        if self.qr {
            val |= 1 << 7;
        }
        val |= self.opcode.as_u8()? << 3;
        if self.aa {
            val |= 1 << 2;
        }
        if self.tc {
            val |= 1 << 1;
        }
        if self.rd {
            val |= 1;
        }
        buf.write_u8(val)?;

        val = 0;
        if self.ra {
            val |= 1 << 7;
        }
        if self.ad {
            val |= 1 << 5;
        }
        if self.cd {
            val |= 1 << 4;
        }
        val |= self.rcode.as_u8();
        buf.write_u8(val)?;

        buf.write_u16(self.qd_count)?;
        buf.write_u16(self.an_count)?;
        buf.write_u16(self.ns_count)?;
        buf.write_u16(self.ar_count)?;

        trace!("Wrote {} bytes", HEADER_LEN);

        Ok(HEADER_LEN)
    }

    /// Reads the header from the start of `input`. Bytes missing from a
    /// short message are read as zero.
    #[instrument(skip(input))]
    pub(crate) fn from_bytes(input: &[u8]) -> Result<Header> {
        let mut raw = [0u8; HEADER_LEN];
        let available = input.len().min(HEADER_LEN);
        raw[..available].copy_from_slice(&input[..available]);
        if available < HEADER_LEN {
            warn!(
                "Message holds {} of the {} header bytes, missing fields read as 0",
                available, HEADER_LEN
            );
        }

        let (_, header) = read_header(&raw)?;
        Ok(header)
    }
}

fn flag(i: BitInput<'_>) -> IResult<BitInput<'_>, bool> {
    map(take_bits(1usize), |b: u8| b == 1)(i)
}

fn nibble(i: BitInput<'_>) -> IResult<BitInput<'_>, u8> {
    take_bits(4usize)(i)
}

fn read_flags(i: BitInput<'_>) -> IResult<BitInput<'_>, Flags> {
    let (i, qr) = flag(i)?;
    let (i, opcode) = map(nibble, OpCode::from)(i)?;
    let (i, aa) = flag(i)?;
    let (i, tc) = flag(i)?;
    let (i, rd) = flag(i)?;
    let (i, ra) = flag(i)?;
    // Z - reserved, ignored when reading.
    let (i, _) = flag(i)?;
    let (i, ad) = flag(i)?;
    let (i, cd) = flag(i)?;
    let (i, rcode) = map(nibble, RCode::from)(i)?;
    Ok((
        i,
        Flags {
            qr,
            opcode,
            aa,
            tc,
            rd,
            ra,
            ad,
            cd,
            rcode,
        },
    ))
}

fn read_header(input: &[u8]) -> IResult<&[u8], Header> {
    trace!("reading header");
    let (input, id) = be_u16(input)?;

    trace!("reading flags");
    let (input, flags) =
        bits::<_, _, nom::error::Error<BitInput<'_>>, nom::error::Error<&[u8]>, _>(read_flags)(
            input,
        )?;

    let (input, qd_count) = be_u16(input)?;
    let (input, an_count) = be_u16(input)?;
    let (input, ns_count) = be_u16(input)?;
    let (input, ar_count) = be_u16(input)?;

    Ok((
        input,
        Header {
            id,
            qr: flags.qr,
            opcode: flags.opcode,
            aa: flags.aa,
            tc: flags.tc,
            rd: flags.rd,
            ra: flags.ra,
            ad: flags.ad,
            cd: flags.cd,
            rcode: flags.rcode,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        },
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A four bit field that specifies kind of query in this message.  This value
/// is set by the originator of a query and copied into the response.
pub enum OpCode {
    /// A standard query.
    Query,

    /// An inverse query.
    IQuery,

    /// A server status request.
    Status,

    /// An unknown OpCode (contained within).
    Unknown(u8),
}

impl OpCode {
    #[instrument]
    pub(crate) fn as_u8(&self) -> Result<u8> {
        match self {
            OpCode::Query => Ok(0),
            OpCode::IQuery => Ok(1),
            OpCode::Status => Ok(2),
            OpCode::Unknown(opcode) => {
                if *opcode > 0xf {
                    // OpCodes can only be 4 bits wide.
                    Err(MessageError::ReservedOpCode)
                } else {
                    Ok(*opcode)
                }
            }
        }
    }
}

impl From<u8> for OpCode {
    fn from(val: u8) -> Self {
        match val {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            n => OpCode::Unknown(n),
        }
    }
}

impl Default for OpCode {
    fn default() -> Self {
        OpCode::Query
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Response code - this 4 bit field is set as part of responses.
pub enum RCode {
    /// No error condition.
    NoError,

    /// Format error - The name server was unable to interpret the query.
    FormatError,

    /// Server failure - The name server was unable to process this query due to
    /// a problem with the name server.
    ServerFailure,

    /// Name Error - Meaningful only for responses from an authoritative name
    /// server, this code signifies that the domain name referenced in the query
    /// does not exist.
    NameError,

    /// Not Implemented - The name server does not support the requested kind of
    /// query.
    NotImplemented,

    /// Refused - The name server refuses to perform the specified operation for
    /// policy reasons.
    Refused,

    /// The response code was unknown (contained within).
    Unknown(u8),
}

impl RCode {
    /// The 4 bit wire value.
    pub fn as_u8(&self) -> u8 {
        match self {
            RCode::NoError => 0,
            RCode::FormatError => 1,
            RCode::ServerFailure => 2,
            RCode::NameError => 3,
            RCode::NotImplemented => 4,
            RCode::Refused => 5,
            RCode::Unknown(i) => *i & 0xf,
        }
    }
}

impl From<u8> for RCode {
    fn from(val: u8) -> Self {
        match val {
            0 => RCode::NoError,
            1 => RCode::FormatError,
            2 => RCode::ServerFailure,
            3 => RCode::NameError,
            4 => RCode::NotImplemented,
            5 => RCode::Refused,
            x => RCode::Unknown(x),
        }
    }
}

impl Default for RCode {
    fn default() -> Self {
        RCode::NoError
    }
}
