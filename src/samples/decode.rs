use encoding_rs::{Encoding, SHIFT_JIS};
use tracing::warn;

/// Decode sample bytes: a BOM wins, then UTF-8, then Shift_JIS for legacy
/// Japanese exports. Undecodable bytes become U+FFFD.
pub(super) fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                warn!("sample is neither UTF-8 nor Shift_JIS; invalid bytes replaced");
            }
            text.into_owned()
        }
    }
}
