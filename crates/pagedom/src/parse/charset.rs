// ABOUTME: Byte-to-text decoding for markup read from disk or stdin.
// ABOUTME: Honours an explicit label, then a BOM, then in-document declarations, then chardetng.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// How far into the input in-document declarations are looked for.
const SNIFF_LIMIT: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap()
});
static XML_ENCODING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]+encoding\s*=\s*["']([A-Za-z0-9_:.\-]+)["']"#).unwrap()
});

/// Decode `bytes` to a String.
///
/// `charset` is either an encoding label (`"latin1"`) or a full Content-Type
/// value (`"text/html; charset=latin1"`). Unknown labels fall through to
/// detection.
pub fn decode_markup(bytes: &[u8], charset: Option<&str>) -> String {
    let label = charset.map(|c| extract_charset(c).unwrap_or_else(|| c.trim().to_string()));
    if let Some(label) = label {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
        log::debug!("unknown charset label {:?}, detecting", label);
    }

    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    if let Some(encoding) = sniff_declared(bytes) {
        let (decoded, _, _) = encoding.decode(bytes);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    log::debug!("detected charset {}", encoding.name());
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Extract the charset parameter from a Content-Type value.
pub fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

fn sniff_declared(bytes: &[u8]) -> Option<&'static encoding_rs::Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let label = XML_ENCODING_RE
        .captures(head)
        .or_else(|| META_CHARSET_RE.captures(head))
        .and_then(|c| c.get(1))?;
    encoding_rs::Encoding::for_label(label.as_bytes())
}
