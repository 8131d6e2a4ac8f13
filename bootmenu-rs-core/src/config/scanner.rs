// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Line reading and keyword matching over raw configuration bytes.
//!
//! Configuration files are not required to be UTF-8, so everything here works on byte slices. A "cursor" is
//! simply the remaining tail of a line.

/// The maximum length of a line, including its terminator.
///
/// Longer lines are split into several lines of at most `MAX_LINE - 1` bytes.
pub const MAX_LINE: usize = 4096;

/// Splits configuration bytes into raw lines.
///
/// Every yielded line keeps its `\n` terminator, if it had one.
pub struct LineReader<'a> {
    /// The bytes not yet yielded.
    data: &'a [u8],
}

impl<'a> LineReader<'a> {
    /// Creates a new [`LineReader`] over the contents of a file.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for LineReader<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }

        let limit = self.data.len().min(MAX_LINE - 1);
        let len = self.data[..limit]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(limit, |nl| nl + 1);

        let (line, rest) = self.data.split_at(len);
        self.data = rest;
        Some(line)
    }
}

/// Checks if a byte counts as whitespace. Every control character does.
#[must_use = "Has no effect if the result is unused"]
pub const fn is_space(c: u8) -> bool {
    c <= b' '
}

/// Cuts a raw line at its first NUL, carriage return or line feed.
#[must_use = "Has no effect if the result is unused"]
pub fn strip_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .position(|&c| matches!(c, b'\0' | b'\r' | b'\n'))
        .unwrap_or(line.len());
    &line[..end]
}

/// Advances a cursor past leading whitespace.
#[must_use = "Has no effect if the result is unused"]
pub fn skip_space(p: &[u8]) -> &[u8] {
    let start = p.iter().position(|&c| !is_space(c)).unwrap_or(p.len());
    &p[start..]
}

/// Checks if the cursor is at `kwd`, ignoring ASCII case.
///
/// The keyword must be followed by whitespace or the end of the line, so `menu` does not match `menuxyz`.
/// On a match, the cursor just past the keyword is returned, still pointing at the whitespace.
#[must_use = "Has no effect if the result is unused"]
pub fn looking_at<'a>(p: &'a [u8], kwd: &[u8]) -> Option<&'a [u8]> {
    let head = p.get(..kwd.len())?;
    if head.iter().zip(kwd).any(|(&a, &b)| (a ^ b) & !0x20 != 0) {
        return None;
    }

    let rest = &p[kwd.len()..];
    rest.first().is_none_or(|&c| is_space(c)).then_some(rest)
}

/// Splits the first whitespace-delimited word off a cursor.
///
/// Returns the word and the cursor just past it.
#[must_use = "Has no effect if the result is unused"]
pub fn split_word(p: &[u8]) -> (&[u8], &[u8]) {
    let end = p.iter().position(|&c| is_space(c)).unwrap_or(p.len());
    p.split_at(end)
}

/// Parses the leading decimal integer of a cursor like C's `atol`.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first non-digit, and a cursor without
/// digits yields zero. Values out of range saturate.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_long(p: &[u8]) -> i64 {
    let p = p
        .iter()
        .position(|c| !matches!(c, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r'))
        .map_or(&[][..], |start| &p[start..]);

    let (negative, digits) = match p.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, p),
    };

    let magnitude = digits
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .fold(0i64, |acc, &c| {
            acc.saturating_mul(10).saturating_add(i64::from(c - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}

/// Parses the leading decimal integer of a cursor like C's `atoi`.
///
/// See [`parse_long`]. Values out of range for an [`i32`] saturate.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_int(p: &[u8]) -> i32 {
    let value = parse_long(p);
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_line_reader_keeps_terminators() {
        let lines: Vec<_> = LineReader::new(b"label a\r\nkernel b\nlast").collect();
        assert_eq!(lines, [&b"label a\r\n"[..], b"kernel b\n", b"last"]);
    }

    #[test]
    fn test_line_reader_splits_long_lines() {
        let long = [b'x'; MAX_LINE + 10];
        let lines: Vec<_> = LineReader::new(&long).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE - 1);
        assert_eq!(lines[1].len(), 11);
    }

    #[test]
    fn test_strip_line_end() {
        assert_eq!(strip_line_end(b"kernel vmlinuz\r\n"), b"kernel vmlinuz");
        assert_eq!(strip_line_end(b"a\0b\n"), b"a");
        assert_eq!(strip_line_end(b"plain"), b"plain");
    }

    #[test]
    fn test_looking_at() {
        assert_eq!(looking_at(b"MENU title", b"menu"), Some(&b" title"[..]));
        assert_eq!(looking_at(b"menu", b"menu"), Some(&b""[..]));
        assert_eq!(looking_at(b"menu\ttitle", b"menu"), Some(&b"\ttitle"[..]));
        assert_eq!(looking_at(b"menuxyz", b"menu"), None);
        assert_eq!(looking_at(b"men", b"menu"), None);
        assert_eq!(looking_at(b"* #fff", b"*"), Some(&b" #fff"[..]));
    }

    #[test]
    fn test_split_word() {
        assert_eq!(split_word(b"vmlinuz quiet"), (&b"vmlinuz"[..], &b" quiet"[..]));
        assert_eq!(split_word(b"vmlinuz"), (&b"vmlinuz"[..], &b""[..]));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(b"  50"), 50);
        assert_eq!(parse_int(b"-3 rows"), -3);
        assert_eq!(parse_int(b"+7"), 7);
        assert_eq!(parse_int(b"abc"), 0);
        assert_eq!(parse_int(b""), 0);
        assert_eq!(parse_int(b"99999999999"), i32::MAX);
        assert_eq!(parse_long(b"99999999999"), 99_999_999_999);
    }

    proptest! {
        #[test]
        fn doesnt_panic(s in proptest::collection::vec(any::<u8>(), 0..200), k in "[a-z]{0,8}") {
            let _ = looking_at(&s, k.as_bytes());
            let _ = parse_long(&s);
            let _ = split_word(skip_space(strip_line_end(&s)));
            let _ = LineReader::new(&s).count();
        }

        #[test]
        fn line_reader_is_lossless(s in proptest::collection::vec(any::<u8>(), 0..9000)) {
            let joined: Vec<u8> = LineReader::new(&s).flatten().copied().collect();
            prop_assert_eq!(joined, s);
        }
    }
}
