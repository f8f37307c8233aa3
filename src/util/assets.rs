use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;

/// Everything under `assets/` ships inside the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static TAILWIND_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();
static LOGO_DATA_URI: OnceLock<String> = OnceLock::new();

/// App-specific stylesheet, injected as a `<style>` block.
pub fn main_css() -> &'static str {
    MAIN_CSS.get_or_init(|| load_text("main.css")).as_str()
}

/// Prebuilt utility stylesheet, injected alongside `main_css`.
pub fn tailwind_css() -> &'static str {
    TAILWIND_CSS
        .get_or_init(|| load_text("tailwind.css"))
        .as_str()
}

/// Window icon as a data URI.
pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| load_data_uri("favicon.svg"))
        .as_str()
}

/// Wordmark logo as a data URI.
pub fn logo_data_uri() -> &'static str {
    LOGO_DATA_URI
        .get_or_init(|| load_data_uri("logo.svg"))
        .as_str()
}

fn load_text(name: &str) -> String {
    String::from_utf8(load_asset(name).into_owned())
        .unwrap_or_else(|_| panic!("embedded asset {name} is not UTF-8"))
}

fn load_data_uri(name: &str) -> String {
    let bytes = load_asset(name);
    format!("data:{};base64,{}", guess_mime(name), encode_base64(&bytes))
}

fn load_asset(name: &str) -> Cow<'static, [u8]> {
    EmbeddedAssets::get(name)
        .map(|file| file.data)
        .unwrap_or_else(|| panic!("asset {name} missing from the embedded bundle"))
}

fn guess_mime(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

fn encode_base64(input: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let mut word = 0u32;
        for (offset, byte) in chunk.iter().enumerate() {
            word |= u32::from(*byte) << (16 - 8 * offset);
        }
        for slot in 0..4 {
            if slot <= chunk.len() {
                out.push(TABLE[((word >> (18 - 6 * slot)) & 0x3f) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base64_pads_short_tails() {
        assert_eq!(encode_base64(b"Man"), "TWFu");
        assert_eq!(encode_base64(b"Ma"), "TWE=");
        assert_eq!(encode_base64(b"M"), "TQ==");
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn base64_matches_known_vectors() {
        assert_eq!(encode_base64(b"foobar"), "Zm9vYmFy");
        assert_eq!(encode_base64(&[0xff, 0xff, 0xff]), "////");
    }

    #[test]
    fn mime_guesses_cover_the_embedded_set() {
        assert_eq!(guess_mime("main.css"), "text/css");
        assert_eq!(guess_mime("logo.svg"), "image/svg+xml");
        assert_eq!(guess_mime("readme"), "application/octet-stream");
    }
}
