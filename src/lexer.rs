//! Splits a raw input line into word tokens, re-merging double-quoted
//! phrases that span several whitespace-separated pieces.

use regex::Regex;
use std::sync::LazyLock;

static WORD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static UNESCAPED_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(^|[^\\])""#).unwrap());

/// Split `line` into word tokens.
///
/// The line is first split on runs of spaces. A piece that starts with `"`
/// and does not end with an unescaped `"` opens a quoted phrase: following
/// pieces are merged back into it (joined by a single space) until one ends
/// with an unescaped `"`. A closed phrase has its unescaped quotes stripped
/// and any `\"` turned back into `"`. Pieces that never opened a quote pass
/// through untouched, so a self-contained piece like `"a"` keeps its quotes.
///
/// A phrase that never closes swallows the rest of the line into one token
/// and is left unstripped; that is not an error. Nested or otherwise
/// malformed quoting is handled best-effort by the same merge rules.
pub fn split_into_words(line: &str) -> Vec<String> {
    let mut pieces: Vec<String> = WORD_BREAK.split(line).map(str::to_string).collect();

    let mut i = 1;
    while i < pieces.len() {
        if !is_open_quoted(&pieces[i - 1]) {
            i += 1;
            continue;
        }
        let next = pieces.remove(i);
        let closes = closes_quote(&next);
        let prev = &mut pieces[i - 1];
        prev.push(' ');
        prev.push_str(&next);
        if closes {
            pieces[i - 1] = strip_quotes(&pieces[i - 1]);
            i += 1;
        }
        // Otherwise the merged piece is still open; re-check it against the
        // piece that slid into position `i`.
    }

    pieces
}

/// True when the token sequence carries no command at all: nothing survived
/// the split, or every surviving piece is empty or whitespace-only.
pub fn is_blank(words: &[String]) -> bool {
    words.is_empty() || words.iter().all(|w| w.trim().is_empty())
}

fn is_open_quoted(piece: &str) -> bool {
    piece.starts_with('"') && (!piece.ends_with('"') || piece.ends_with("\\\""))
}

fn closes_quote(piece: &str) -> bool {
    piece.ends_with('"') && !piece.ends_with("\\\"")
}

fn strip_quotes(piece: &str) -> String {
    UNESCAPED_QUOTE
        .replace_all(piece, "$1")
        .replace("\\\"", "\"")
}
