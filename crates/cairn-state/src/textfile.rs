//! Text/binary sniffing and decoding for file-sourced key values

/// Bytes inspected when deciding whether a file holds text
pub const SNIFF_BLOCK_SIZE: usize = 512;

/// Share of non-text bytes tolerated in a block that is not valid UTF-8
const MAX_NON_TEXT_RATIO: f64 = 0.30;

/// Heuristic text check on the leading block of a file.
///
/// Empty input is text. Any NUL byte makes it binary. A block that decodes as
/// UTF-8 is text; otherwise it is text only if at most 30% of its bytes fall
/// outside printable ASCII and `\n \r \t \x08`.
pub fn is_text(content: &[u8]) -> bool {
    let block = &content[..content.len().min(SNIFF_BLOCK_SIZE)];

    if block.is_empty() {
        return true;
    }
    if block.contains(&0) {
        return false;
    }
    if utf8_prefix_valid(block) {
        return true;
    }

    let non_text = block.iter().filter(|b| !is_text_byte(**b)).count();
    (non_text as f64 / block.len() as f64) <= MAX_NON_TEXT_RATIO
}

/// UTF-8 check that tolerates a multi-byte sequence cut off by the block boundary
fn utf8_prefix_valid(block: &[u8]) -> bool {
    match std::str::from_utf8(block) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && block.len() == SNIFF_BLOCK_SIZE,
    }
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 32..=126 | b'\n' | b'\r' | b'\t' | 0x08)
}

/// Normalise an encoding label, `None` when unsupported
pub fn supported_encoding(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().replace('_', "-").as_str() {
        "utf-8" | "utf8" | "u8" => Some("utf-8"),
        "ascii" | "us-ascii" => Some("ascii"),
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some("latin-1"),
        _ => None,
    }
}

/// Decode file contents with a label accepted by `supported_encoding`
pub fn decode(content: &[u8], encoding: &str) -> Option<String> {
    match encoding {
        "utf-8" => String::from_utf8(content.to_vec()).ok(),
        "ascii" => content
            .is_ascii()
            .then(|| content.iter().map(|b| *b as char).collect()),
        // ISO-8859-1 maps every byte to the code point of the same value
        "latin-1" => Some(content.iter().map(|b| *b as char).collect()),
        _ => None,
    }
}
