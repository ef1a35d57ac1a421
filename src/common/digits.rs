use num_traits::{NumCast, PrimInt, Unsigned};
use tracing::debug;

use super::metadata::{digit_char, Base, Scheme};

// Radix conversion
//------------------------------------------------------------------------------

// Appends `value` in the given radix, highest digit first, left padded with '0' up to
// `min_width` digits. Wider values are never truncated.
fn push_radix<T>(out: &mut String, value: T, radix: u32, min_width: usize)
where
    T: PrimInt + Unsigned,
{
    let mut buf = ['0'; 64];
    let mut len = 0;
    let mut rem = value;
    let r = <T as NumCast>::from(radix).unwrap_or_else(T::max_value);
    while !rem.is_zero() {
        let d = (rem % r).to_u32().unwrap_or(0);
        buf[len] = digit_char(d);
        len += 1;
        rem = rem / r;
    }
    for _ in len..min_width {
        out.push('0');
    }
    out.extend(buf[..len].iter().rev());
}

fn parse_radix<T>(chunk: &str, radix: u32) -> Option<T>
where
    T: PrimInt + Unsigned,
{
    // from_str_radix tolerates a leading '+', digits never carry one
    if !chunk.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    T::from_str_radix(chunk, radix).ok()
}

// Encode
//------------------------------------------------------------------------------

/// Converts every byte to its digits in `base` and concatenates the groups.
pub fn encode_digits(data: &[u8], base: Base, scheme: Scheme) -> String {
    let width = scheme.group_width(base);
    let mut digits = String::with_capacity(data.len() * base.digit_width().max(width));
    for &b in data {
        push_radix(&mut digits, b, *base, width);
    }
    digits
}


// Decode
//------------------------------------------------------------------------------

// Every complete chunk in order, `None` where it does not parse. A trailing partial chunk
// is dropped.
fn parse_chunks(digits: &str, base: Base, scheme: Scheme) -> Vec<Option<u32>> {
    let width = scheme.group_width(base);
    let symbols = digits.chars().collect::<Vec<_>>();
    symbols
        .chunks_exact(width)
        .map(|c| parse_radix::<u32>(&c.iter().collect::<String>(), *base))
        .collect()
}

fn chunk_values(digits: &str, base: Base, scheme: Scheme) -> Vec<u32> {
    parse_chunks(digits, base, scheme).into_iter().flatten().collect()
}

/// Reassembles bytes from a digit string. Chunks that do not parse or overflow a byte are
/// skipped.
pub fn decode_digits(digits: &str, base: Base, scheme: Scheme) -> Vec<u8> {
    chunk_values(digits, base, scheme).into_iter().filter_map(|v| u8::try_from(v).ok()).collect()
}

/// Decodes a digit string to text. Valid UTF-8 is returned with NULs stripped; otherwise
/// each chunk value is read as a code point, skipping zeros. Never fails, garbage in gives
/// garbage out.
pub fn decode_text(digits: &str, base: Base, scheme: Scheme) -> String {
    let values = chunk_values(digits, base, scheme);
    let bytes = values.iter().filter_map(|&v| u8::try_from(v).ok()).collect::<Vec<_>>();

    match String::from_utf8(bytes) {
        Ok(text) => text.replace('\0', ""),
        Err(e) => {
            debug!("Invalid UTF-8 at byte {}, decoding chunks as code points", e.utf8_error().valid_up_to());
            values.into_iter().filter(|&v| v > 0).filter_map(char::from_u32).collect()
        }
    }
}

/// Whether the digits read as text in `base`: every chunk parses to a byte and the bytes,
/// NULs aside, are UTF-8 free of control characters other than tab, newline and return.
pub fn is_clean_text(digits: &str, base: Base, scheme: Scheme) -> bool {
    let bytes = parse_chunks(digits, base, scheme)
        .into_iter()
        .map(|v| v.and_then(|v| u8::try_from(v).ok()))
        .collect::<Option<Vec<u8>>>();

    match bytes.map(String::from_utf8) {
        Some(Ok(text)) => {
            text.chars().all(|c| c == '\0' || matches!(c, '\t' | '\n' | '\r') || !c.is_control())
        }
        _ => false,
    }
}
