//! De-duplication and lookup keys.
//!
//! Two independent normalizations live here. [`TrackKey`] is the aggressive
//! one used to merge chart rows across sources: it drops punctuation but
//! keeps Latin-extended letters. [`lookup_key`] only folds case and
//! whitespace and names entries in the metadata cache file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical de-duplication key derived from an artist/title pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey(String);

impl TrackKey {
    /// Derive the key for an artist/title pair.
    ///
    /// Returns `None` when nothing meaningful survives normalization.
    #[must_use]
    pub fn from_parts(artist: &str, title: &str) -> Option<Self> {
        let key = normalize(artist, title);
        is_valid_key(&key).then_some(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrackKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize an artist/title pair into its raw key string.
///
/// Lower-cases, strips HTML tags, removes everything except ASCII letters
/// and digits, Latin-extended letters (U+00C0..=U+017F), whitespace and
/// hyphens, then collapses and trims whitespace.
#[must_use]
pub fn normalize(artist: &str, title: &str) -> String {
    let joined = strip_tags(&format!("{artist} - {title}")).to_lowercase();
    let kept: String = joined.chars().filter(|c| is_key_char(*c)).collect();
    collapse_whitespace(&kept)
}

/// Whether a normalized key identifies a track. Empty keys and the bare
/// separator left over from an empty pair are rejected.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key != "-"
}

/// Cache key for the metadata lookup: `"<artist> — <title>"` with each half
/// case- and whitespace-folded.
#[must_use]
pub fn lookup_key(artist: &str, title: &str) -> String {
    format!("{} — {}", fold(artist), fold(title))
}

fn fold(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || ('\u{00c0}'..='\u{017f}').contains(&c)
        || c.is_whitespace()
        || c == '-'
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace every complete `<...>` tag with a space. A `<` with no closing
/// `>` after it is kept as text.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) => {
                out.push(' ');
                rest = &after[close + 1..];
            }
            None => {
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_case_and_whitespace() {
        assert_eq!(normalize("Bad Bunny", "MONACO"), "bad bunny - monaco");
        assert_eq!(
            normalize("Bad Bunny", "MONACO"),
            normalize("bad bunny", "monaco ")
        );
        assert_eq!(
            normalize("  Bad   Bunny ", "\tMonaco"),
            normalize("Bad Bunny", "Monaco")
        );
    }

    #[test]
    fn test_normalize_drops_punctuation() {
        assert_eq!(normalize("P!nk", "So What?"), "pnk - so what");
        assert_eq!(
            normalize("Tyler, The Creator", "EARFQUAKE"),
            normalize("Tyler The Creator", "Earfquake!")
        );
    }

    #[test]
    fn test_normalize_keeps_latin_extended_letters() {
        assert_eq!(normalize("Rosalía", "DESPECHÁ"), "rosalía - despechá");
        assert_eq!(normalize("Maluma", "Hawái"), "maluma - hawái");
        assert_ne!(normalize("Rosalía", "Despechá"), normalize("Rosalia", "Despecha"));
    }

    #[test]
    fn test_normalize_strips_tags() {
        assert_eq!(
            normalize("<b>Feid</b>", "<i>Luna</i>"),
            normalize("Feid", "Luna")
        );
    }

    #[test]
    fn test_normalize_keeps_text_after_unclosed_bracket() {
        assert_eq!(normalize("Love <3", "Song One"), "love 3 - song one");
        assert_ne!(
            normalize("Love <3", "Song One"),
            normalize("Love <3", "Totally Different")
        );
        assert_eq!(strip_tags("a <b> c < d"), "a   c < d");
    }

    #[test]
    fn test_normalize_drops_non_latin_scripts() {
        assert_eq!(normalize("", "ДДТ"), "-");
    }

    #[test]
    fn test_track_key_rejects_empty_pairs() {
        assert!(TrackKey::from_parts("", "").is_none());
        assert!(TrackKey::from_parts("!!", "??").is_none());
        assert!(TrackKey::from_parts("", "Song").is_some());
    }

    #[test]
    fn test_is_valid_key() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("-"));
        assert!(is_valid_key("a - b"));
    }

    #[test]
    fn test_lookup_key_keeps_punctuation() {
        assert_eq!(lookup_key("P!nk ", " So  What?"), "p!nk — so what?");
        assert_eq!(lookup_key("Bad Bunny", "MONACO"), lookup_key("bad  bunny", "monaco"));
    }
}
