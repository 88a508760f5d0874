//! Turns raw stream payloads into order aggregates.
//!
//! Producers publish the order as JSON. Producers going through a schema
//! registry wrap that JSON in the registry wire format instead: magic byte
//! `0x00`, a 4-byte big-endian schema id, then an Avro-encoded string
//! (zigzag varint length followed by UTF-8 bytes). Both are accepted.

use chrono::SubsecRound;
use thiserror::Error;

use crate::domain::order::Order;

const MAGIC_BYTE: u8 = 0x00;
const FRAME_HEADER_LEN: usize = 5;
/// Postgres `timestamptz` resolution.
const STORED_SUBSEC_DIGITS: u16 = 6;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty payload")]
    Empty,
    #[error("malformed registry frame: {0}")]
    Frame(&'static str),
    #[error("invalid order JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes an order, truncating `date_created` to what the store keeps so the
/// cached copy and a later store read agree.
pub fn decode_order(payload: &[u8]) -> Result<Order, DecodeError> {
    let json = unframe(payload)?;
    let mut order: Order = serde_json::from_slice(json)?;
    order.date_created = order.date_created.trunc_subsecs(STORED_SUBSEC_DIGITS);
    Ok(order)
}

/// Strips the registry envelope when present; plain JSON passes through.
pub fn unframe(payload: &[u8]) -> Result<&[u8], DecodeError> {
    match payload.first() {
        None => Err(DecodeError::Empty),
        Some(&MAGIC_BYTE) => avro_string(payload),
        Some(_) => Ok(payload),
    }
}

fn avro_string(framed: &[u8]) -> Result<&[u8], DecodeError> {
    let body = framed
        .get(FRAME_HEADER_LEN..)
        .ok_or(DecodeError::Frame("header truncated"))?;
    let (len, consumed) = zigzag_varint(body).ok_or(DecodeError::Frame("bad length prefix"))?;
    let len = usize::try_from(len).map_err(|_| DecodeError::Frame("negative length"))?;
    consumed
        .checked_add(len)
        .and_then(|end| body.get(consumed..end))
        .ok_or(DecodeError::Frame("string shorter than declared length"))
}

/// Decodes an Avro `long` from the front of `bytes`, returning the value and
/// the number of bytes it occupied.
fn zigzag_varint(bytes: &[u8]) -> Option<(i64, usize)> {
    let mut raw: u64 = 0;
    for (i, &b) in bytes.iter().enumerate().take(10) {
        raw |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            let value = (raw >> 1) as i64 ^ -((raw & 1) as i64);
            return Some((value, i + 1));
        }
    }
    None
}
