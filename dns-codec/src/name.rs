use crate::{MessageError, Result, WireWriter};
use std::collections::HashSet;
use tracing::{instrument, trace};

/// The top two bits of a length octet mark a compression pointer.
const POINTER_FLAGS: u8 = 0b1100_0000;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

/// A domain name read out of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedName {
    /// The dotted name, without the trailing root dot. Empty for the root.
    pub name: String,

    /// Number of bytes the name occupies at the position it was read from -
    /// a compression pointer counts as its own two bytes, wherever it points.
    pub wire_len: usize,

    /// Set when the message ended before the terminating zero length label;
    /// `name` then holds only the labels that were complete.
    pub truncated: bool,
}

/// Encodes a dotted name as length prefixed labels followed by the zero
/// length root label, returning the number of bytes written.
///
/// A single trailing dot is accepted, and both `""` and `"."` encode the
/// root. Empty labels, labels longer than 63 bytes and names longer than 255
/// bytes once encoded are rejected before anything is written.
#[instrument(skip(buf))]
pub(crate) fn write_name(name: &str, buf: &mut WireWriter) -> Result<usize> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);

    let mut encoded = Vec::with_capacity(trimmed.len() + 2);
    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(MessageError::EmptyLabel(name.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(MessageError::LabelTooLong(label.len(), label.to_string()));
            }
            encoded.push(label.len() as u8);
            encoded.extend_from_slice(label.as_bytes());
        }
    }
    encoded.push(0);

    if encoded.len() > MAX_NAME_LEN {
        return Err(MessageError::NameTooLong(encoded.len()));
    }

    buf.write_slice(&encoded)?;
    Ok(encoded.len())
}

/// Decodes the name starting at `start` within `message`, following
/// compression pointers until the root label is reached.
///
/// Every pointer target is remembered, and a pointer back to an offset that
/// was already visited fails with [`MessageError::CircularReference`]. A
/// message that ends mid-name is not an error: the labels read so far are
/// returned with `truncated` set.
#[instrument(skip(message))]
pub fn read_name(message: &[u8], start: usize) -> Result<DecodedName> {
    let mut labels = Vec::new();
    let mut encoded_len = 1;
    let mut wire_len = None;
    let mut truncated = false;

    let mut seen = HashSet::new();
    seen.insert(start);
    let mut pos = start;

    loop {
        let Some(&len) = message.get(pos) else {
            truncated = true;
            break;
        };

        match len & POINTER_FLAGS {
            POINTER_FLAGS => {
                wire_len.get_or_insert(pos + 2 - start);
                let Some(&low) = message.get(pos + 1) else {
                    truncated = true;
                    break;
                };
                let offset = (usize::from(len & !POINTER_FLAGS) << 8) | usize::from(low);
                trace!("Name pointer at offset: {}", offset);

                if offset >= message.len() {
                    return Err(MessageError::PointerOutOfRange {
                        offset,
                        len: message.len(),
                    });
                }
                if !seen.insert(offset) {
                    return Err(MessageError::CircularReference(offset));
                }
                pos = offset;
            }
            0 => {
                if len == 0 {
                    wire_len.get_or_insert(pos + 1 - start);
                    break;
                }

                let begin = pos + 1;
                let end = begin + usize::from(len);
                let Some(label) = message.get(begin..end) else {
                    trace!("Label of length {} runs past the message end", len);
                    truncated = true;
                    break;
                };

                encoded_len += label.len() + 1;
                if encoded_len > MAX_NAME_LEN {
                    return Err(MessageError::NameTooLong(encoded_len));
                }
                labels.push(String::from_utf8_lossy(label).into_owned());
                pos = end;
            }
            _ => {
                return Err(MessageError::ReservedLabelType {
                    offset: pos,
                    byte: len,
                })
            }
        }
    }

    let wire_len = wire_len.unwrap_or_else(|| message.len().saturating_sub(start));

    Ok(DecodedName {
        name: labels.join("."),
        wire_len,
        truncated,
    })
}

/// Returns how many bytes the name at `start` occupies in place, without
/// following pointers. Used to step over a name that could not be decoded.
pub fn skip_name(message: &[u8], start: usize) -> usize {
    let mut pos = start;
    while let Some(&len) = message.get(pos) {
        if len & POINTER_FLAGS == POINTER_FLAGS {
            return pos + 2 - start;
        }
        if len == 0 {
            return pos + 1 - start;
        }
        pos += 1 + usize::from(len);
    }
    message.len().saturating_sub(start)
}
