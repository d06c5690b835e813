//! Heuristic row extraction from kworb chart tables.
//!
//! kworb pages are plain HTML tables. Each `<tr>` is one candidate row; the
//! chart position and the "Artist - Title" text are picked out with a
//! handful of forgiving patterns rather than a DOM parser, since the page
//! layouts differ between chart families.

use std::sync::LazyLock;

use regex::Regex;

use hitlist_core::model::RawTrackRecord;

/// Pages shorter than this are treated as empty (error or placeholder pages).
pub const MIN_PAGE_LEN: usize = 800;

/// Minimum length of an anchor text to be taken as the track text.
const MIN_ANCHOR_TRACK_LEN: usize = 6;

/// Separators tried, in order, when splitting "Artist - Title".
const SEPARATORS: [&str; 4] = [" - ", " — ", " – ", " : "];

static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid row pattern"));

static NUM_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="num"[^>]*>\s*([0-9]{1,3})\s*<"#).expect("valid num cell pattern")
});

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*([0-9]{1,3})\s*<").expect("valid number pattern"));

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a[^>]*>(.*?)</a>").expect("valid anchor pattern"));

static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid cell pattern"));

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

static RANK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?\s*[0-9]+\s*[.)-]\s*").expect("valid rank prefix pattern"));

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-–—:]").expect("valid separator pattern"));

static LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Za-z\u{00C0}-\u{017F}]").expect("valid letter pattern"));

static LOOSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*[-–—:]\s*(.+)$").expect("valid split pattern"));

/// Extract chart rows from a page.
///
/// Every returned record is a clone of `template` completed with the row's
/// position and track fields. At most `max_rows` records are returned; an
/// empty vector means nothing usable was found.
pub fn parse_rows(html: &str, template: &RawTrackRecord, max_rows: usize) -> Vec<RawTrackRecord> {
    if utf16_len(html) < MIN_PAGE_LEN {
        return Vec::new();
    }

    let mut records = Vec::new();
    let mut pos: u32 = 0;

    for row in ROW.captures_iter(html) {
        if records.len() >= max_rows {
            break;
        }
        let row = row.get(1).map_or("", |m| m.as_str());

        pos = row_position(row).unwrap_or(pos + 1);

        let Some(track_raw) = row_track_text(row) else {
            continue;
        };
        let (artist, title) = split_artist_title(&track_raw);

        records.push(
            template
                .clone()
                .with_position(Some(pos))
                .with_track(track_raw, artist, title),
        );
    }

    records
}

/// Strip tags, collapse whitespace and drop a leading rank like "12." or "#3)".
pub fn clean_track_text(s: &str) -> String {
    let text = normalize_spaces(s);
    RANK_PREFIX.replace(&text, "").trim().to_string()
}

/// Split cleaned track text into `(artist, title)`.
///
/// Tries the spaced separators first, keeping only the text between the
/// first and second occurrence as the title, then any dash or colon. When
/// no split yields two non-empty halves the artist is empty and the title
/// is the whole text.
pub fn split_artist_title(track: &str) -> (String, String) {
    let track = clean_track_text(track);

    for sep in SEPARATORS {
        let mut parts = track.splitn(3, sep);
        if let (Some(artist), Some(title)) = (parts.next(), parts.next()) {
            let (artist, title) = (artist.trim(), title.trim());
            if !artist.is_empty() && !title.is_empty() {
                return (artist.to_string(), title.to_string());
            }
        }
    }

    if let Some(caps) = LOOSE_SPLIT.captures(&track) {
        let artist = caps.get(1).map_or("", |m| m.as_str().trim());
        let title = caps.get(2).map_or("", |m| m.as_str().trim());
        if !artist.is_empty() && !title.is_empty() {
            return (artist.to_string(), title.to_string());
        }
    }

    (String::new(), track)
}

fn row_position(row: &str) -> Option<u32> {
    NUM_CELL
        .captures(row)
        .or_else(|| BARE_NUMBER.captures(row))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The first anchor that looks like "Artist - Title", else the longest cell
/// containing a letter.
fn row_track_text(row: &str) -> Option<String> {
    let from_anchor = ANCHOR
        .captures_iter(row)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_track_text(m.as_str()))
        .find(|t| SEPARATOR.is_match(t) && utf16_len(t) >= MIN_ANCHOR_TRACK_LEN);
    if from_anchor.is_some() {
        return from_anchor;
    }

    let mut best = String::new();
    for caps in CELL.captures_iter(row) {
        let text = caps.get(1).map_or(String::new(), |m| clean_track_text(m.as_str()));
        if LETTER.is_match(&text) && utf16_len(&text) > utf16_len(&best) {
            best = text;
        }
    }
    (!best.is_empty()).then_some(best)
}

/// Length in UTF-16 code units.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn normalize_spaces(s: &str) -> String {
    TAG.replace_all(s, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
