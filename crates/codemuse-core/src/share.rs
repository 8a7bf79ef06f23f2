//! Shared links: one file's code and language carried in a URL query string.
//!
//! `code` holds the standard base64 of the UTF-8 source, percent-encoded;
//! `lang` holds the short extension tag (`js`, `py`, ...). Any base64 text
//! whose `+` signs were turned into spaces in transit is still accepted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CodeMuseError;
use crate::language::Language;

/// Decoded contents of a shared link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedCode {
    pub code: String,
    pub language: Language,
}

/// Parameters found in a link's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub code: Option<String>,
    pub lang: Option<String>,
}

impl ShareParams {
    /// True when the link carries neither parameter and should be ignored.
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.lang.is_none()
    }
}

pub fn encode_code(code: &str) -> String {
    STANDARD.encode(code.as_bytes())
}

pub fn decode_code(encoded: &str) -> Result<String, CodeMuseError> {
    let normalized = encoded.replace(' ', "+");
    let normalized = normalized.trim_matches(|c: char| c == '\r' || c == '\n');
    let bytes = STANDARD
        .decode(normalized.as_bytes())
        .map_err(|e| CodeMuseError::Share(format!("Invalid code payload: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CodeMuseError::Share(format!("Shared code is not valid UTF-8: {e}")))
}

/// Build `<base_url>?code=..&lang=..` for a file.
pub fn build_link(base_url: &str, code: &str, language: Language) -> Result<String, CodeMuseError> {
    let base = base_url.trim();
    if base.is_empty() {
        return Err(CodeMuseError::Share("No share base URL configured".into()));
    }
    let base = base.split(|c: char| c == '?' || c == '#').next().unwrap_or(base);
    let encoded = encode_code(code);
    let tag = language.extension().trim_start_matches('.');
    Ok(format!(
        "{base}?code={}&lang={}",
        urlencoding::encode(&encoded),
        urlencoding::encode(tag)
    ))
}

/// Pull `code` and `lang` out of a full URL or a bare query string.
pub fn parse_params(link: &str) -> Result<ShareParams, CodeMuseError> {
    let query = match link.split_once('?') {
        Some((_, q)) => q,
        None if link.contains('=') => link,
        None => return Ok(ShareParams::default()),
    };
    let query = query.split('#').next().unwrap_or(query);

    let mut params = ShareParams::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value)
            .map_err(|e| CodeMuseError::Share(format!("Malformed query parameter {key}: {e}")))?
            .into_owned();
        match key {
            "code" if params.code.is_none() => params.code = Some(value),
            "lang" if params.lang.is_none() => params.lang = Some(value),
            _ => {}
        }
    }
    Ok(params)
}

/// Decode the file carried by `params`, if any.
///
/// `Ok(None)` means no `code` parameter. The language comes from `lang`,
/// read either as an extension tag or a language id, defaulting to JavaScript.
pub fn decode_params(params: &ShareParams) -> Result<Option<SharedCode>, CodeMuseError> {
    let Some(encoded) = &params.code else {
        return Ok(None);
    };
    let code = decode_code(encoded)?;
    let language = match params.lang.as_deref() {
        Some(tag) if !tag.trim().is_empty() => {
            Language::parse(tag).unwrap_or(Language::Plaintext)
        }
        _ => Language::JavaScript,
    };
    Ok(Some(SharedCode { code, language }))
}
