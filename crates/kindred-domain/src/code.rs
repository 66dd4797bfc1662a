//! Genealogy code notation
//!
//! A code places a member in the family tree. Dot-separated segments give the
//! birth order along the line of descent, a trailing `+<rank>` marks a partner
//! of the member the rest of the code names, and a `*<rank>` on the last
//! segment says the member descends from that numbered partner of the parent
//! rather than from the parent's primary line.
//!
//! ```text
//! 0              common ancestor
//! 0.1            first child of 0
//! 0.1.3          third child of 0.1
//! 0.1.3+         first partner of 0.1.3 (same as 0.1.3+1)
//! 0.1.3+2        second partner of 0.1.3
//! 0.1.3.1*2      first child of 0.1.3, born of its second partner
//! ```
//!
//! Two layers are provided. [`decode_partner_suffix`] and
//! [`decode_partner_origin_marker`] are lenient tail matchers that only look
//! for the marker they are named after. [`ParsedCode::parse`] scans the whole
//! code once and rejects anything that is not well-formed; the relation
//! resolver works from its [`CodeKind`].

use std::fmt;

/// Code of the common ancestor
pub const ROOT_CODE: &str = "0";

const SEGMENT_SEPARATOR: u8 = b'.';
const PARTNER_MARK: u8 = b'+';
const ORIGIN_MARK: u8 = b'*';

/// Default partner rank when a suffix carries no digits (`0.1+`)
const DEFAULT_PARTNER_RANK: u32 = 1;

/// True iff `code` names the common ancestor
///
/// # Examples
///
/// ```
/// use kindred_domain::code::is_root_code;
///
/// assert!(is_root_code("0"));
/// assert!(!is_root_code("0.1"));
/// ```
pub fn is_root_code(code: &str) -> bool {
    code == ROOT_CODE
}

/// Build the code of the `rank`-th partner of `base`
pub fn partner_code(base: &str, rank: u32) -> String {
    format!("{}+{}", base, rank)
}

/// Result of looking for a trailing partner suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSuffix {
    /// A `+<digits>?` suffix ends the code
    pub is_partner: bool,

    /// Code with the suffix removed (the whole code when absent)
    pub base_code: String,

    /// Partner rank, `1` when the suffix has no digits
    pub partner_rank: Option<u32>,
}

/// Decode a trailing `+<rank>?` partner suffix
///
/// Only a `+` followed by nothing but digits up to the end of the code
/// counts. A rank that does not fit in a `u32` is treated as no match.
///
/// # Examples
///
/// ```
/// use kindred_domain::code::decode_partner_suffix;
///
/// let suffix = decode_partner_suffix("0.1.3+2");
/// assert!(suffix.is_partner);
/// assert_eq!(suffix.base_code, "0.1.3");
/// assert_eq!(suffix.partner_rank, Some(2));
/// ```
pub fn decode_partner_suffix(code: &str) -> PartnerSuffix {
    if let Some(pos) = code.rfind(PARTNER_MARK as char) {
        let digits = &code[pos + 1..];
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            let rank = if digits.is_empty() {
                Some(DEFAULT_PARTNER_RANK)
            } else {
                digits.parse::<u32>().ok()
            };

            if let Some(rank) = rank {
                return PartnerSuffix {
                    is_partner: true,
                    base_code: code[..pos].to_string(),
                    partner_rank: Some(rank),
                };
            }
        }
    }

    PartnerSuffix {
        is_partner: false,
        base_code: code.to_string(),
        partner_rank: None,
    }
}

/// Result of looking for a partner-origin marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerOrigin {
    /// A `*<digits>` marker was found
    pub has_partner_origin_info: bool,

    /// Code before the marker (the whole code when absent)
    pub base_code: String,

    /// Rank of the parent's partner the member descends from
    pub partner_rank: Option<u32>,
}

/// Decode a `*<rank>` partner-origin marker
///
/// Expects a code already stripped of its partner suffix. The last `*` that
/// has a non-empty prefix and is followed by at least one digit wins;
/// whatever follows the digits is dropped.
///
/// # Examples
///
/// ```
/// use kindred_domain::code::decode_partner_origin_marker;
///
/// let origin = decode_partner_origin_marker("0.1.3.2*2");
/// assert!(origin.has_partner_origin_info);
/// assert_eq!(origin.base_code, "0.1.3.2");
/// assert_eq!(origin.partner_rank, Some(2));
/// ```
pub fn decode_partner_origin_marker(code: &str) -> PartnerOrigin {
    for (pos, _) in code.rmatch_indices(ORIGIN_MARK as char) {
        if pos == 0 {
            continue;
        }

        let digits = leading_digits(&code[pos + 1..]);
        if digits.is_empty() {
            continue;
        }

        if let Ok(rank) = digits.parse::<u32>() {
            return PartnerOrigin {
                has_partner_origin_info: true,
                base_code: code[..pos].to_string(),
                partner_rank: Some(rank),
            };
        }
    }

    PartnerOrigin {
        has_partner_origin_info: false,
        base_code: code.to_string(),
        partner_rank: None,
    }
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    &s[..end]
}

/// What a well-formed code says about its member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    /// The common ancestor (`0`)
    Root,

    /// A single segment other than `0`: no ancestry to resolve
    Standalone,

    /// Partner of the member named by `base`
    Partner {
        /// Code of the member this one is a partner of
        base: String,
        /// Rank among that member's partners
        rank: u32,
    },

    /// Child of the member named by `parent`
    Descendant {
        /// Code of the direct ancestor, markers removed
        parent: String,
        /// Birth-order rank (last segment)
        rank: u32,
        /// Rank of the parent's partner this child descends from
        origin_partner: Option<u32>,
    },
}

/// Why a code was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeErrorKind {
    /// The code is empty
    Empty,
    /// Two separators in a row, or a separator at either end
    EmptySegment,
    /// A character outside digits, `.`, `+` and `*`
    UnexpectedCharacter(char),
    /// `*` with no digits after it
    MissingOriginRank,
    /// `*` followed by more segments
    MisplacedOriginMarker,
    /// More than one `*`
    DuplicateOriginMarker,
    /// More than one `+`
    DuplicatePartnerSuffix,
    /// Anything after a partner suffix
    TrailingAfterPartnerSuffix,
    /// `*` on a code with a single segment
    OriginWithoutParent,
    /// A rank or segment too large for a `u32`
    RankOverflow,
}

impl fmt::Display for CodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeErrorKind::Empty => write!(f, "code is empty"),
            CodeErrorKind::EmptySegment => write!(f, "empty segment"),
            CodeErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            CodeErrorKind::MissingOriginRank => write!(f, "partner-origin marker has no rank"),
            CodeErrorKind::MisplacedOriginMarker => {
                write!(f, "partner-origin marker must be on the last segment")
            }
            CodeErrorKind::DuplicateOriginMarker => {
                write!(f, "more than one partner-origin marker")
            }
            CodeErrorKind::DuplicatePartnerSuffix => write!(f, "more than one partner suffix"),
            CodeErrorKind::TrailingAfterPartnerSuffix => {
                write!(f, "partner suffix must end the code")
            }
            CodeErrorKind::OriginWithoutParent => {
                write!(f, "partner-origin marker on a code without a parent")
            }
            CodeErrorKind::RankOverflow => write!(f, "rank out of range"),
        }
    }
}

/// A code that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeError {
    /// The offending code
    pub code: String,

    /// What is wrong with it
    pub kind: CodeErrorKind,
}

impl CodeError {
    fn new(code: &str, kind: CodeErrorKind) -> Self {
        Self {
            code: code.to_string(),
            kind,
        }
    }
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed code '{}': {}", self.code, self.kind)
    }
}

impl std::error::Error for CodeError {}

/// A code checked against the notation grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCode {
    raw: String,
    kind: CodeKind,
}

impl ParsedCode {
    /// Parse a code in a single left-to-right scan
    ///
    /// # Examples
    ///
    /// ```
    /// use kindred_domain::code::{CodeKind, ParsedCode};
    ///
    /// let parsed = ParsedCode::parse("0.1.1*1").unwrap();
    /// assert_eq!(
    ///     parsed.kind(),
    ///     &CodeKind::Descendant { parent: "0.1".to_string(), rank: 1, origin_partner: Some(1) }
    /// );
    ///
    /// assert!(ParsedCode::parse("0..1").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, CodeError> {
        let scan = Scanner::new(code).scan()?;
        let kind = scan.classify(code)?;
        Ok(Self {
            raw: code.to_string(),
            kind,
        })
    }

    /// The code as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// What the code says about its member
    pub fn kind(&self) -> &CodeKind {
        &self.kind
    }

    /// Consume into the kind
    pub fn into_kind(self) -> CodeKind {
        self.kind
    }
}

impl fmt::Display for ParsedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Positions found while scanning a code
struct Scan {
    segment_count: usize,
    last_segment: (usize, usize),
    hierarchy_end: usize,
    origin_rank: Option<u32>,
    partner: Option<(usize, u32)>,
}

impl Scan {
    fn classify(self, code: &str) -> Result<CodeKind, CodeError> {
        if self.origin_rank.is_some() && self.segment_count < 2 {
            return Err(CodeError::new(code, CodeErrorKind::OriginWithoutParent));
        }

        if let Some((plus, rank)) = self.partner {
            return Ok(CodeKind::Partner {
                base: code[..plus].to_string(),
                rank,
            });
        }

        if self.segment_count == 1 {
            return Ok(if is_root_code(&code[..self.hierarchy_end]) {
                CodeKind::Root
            } else {
                CodeKind::Standalone
            });
        }

        let (start, end) = self.last_segment;
        let rank = parse_rank(code, &code[start..end])?;
        Ok(CodeKind::Descendant {
            // start - 1 is the separator before the last segment
            parent: code[..start - 1].to_string(),
            rank,
            origin_partner: self.origin_rank,
        })
    }
}

struct Scanner<'a> {
    code: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            code,
            bytes: code.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn digits(&mut self) -> (usize, usize) {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        (start, self.pos)
    }

    fn error(&self, kind: CodeErrorKind) -> CodeError {
        CodeError::new(self.code, kind)
    }

    fn unexpected_here(&self) -> CodeError {
        let ch = self.code[self.pos..].chars().next().unwrap_or('?');
        self.error(CodeErrorKind::UnexpectedCharacter(ch))
    }

    fn scan(mut self) -> Result<Scan, CodeError> {
        if self.bytes.is_empty() {
            return Err(self.error(CodeErrorKind::Empty));
        }

        // segment ('.' segment)*
        let mut segment_count = 0;
        let mut last_segment = (0, 0);
        loop {
            let (start, end) = self.digits();
            if start == end {
                return Err(match self.peek() {
                    None | Some(SEGMENT_SEPARATOR) | Some(PARTNER_MARK) | Some(ORIGIN_MARK) => {
                        self.error(CodeErrorKind::EmptySegment)
                    }
                    Some(_) => self.unexpected_here(),
                });
            }
            segment_count += 1;
            last_segment = (start, end);

            if self.peek() == Some(SEGMENT_SEPARATOR) {
                self.pos += 1;
                continue;
            }
            break;
        }
        let hierarchy_end = self.pos;

        // '*' digits+
        let mut origin_rank = None;
        if self.peek() == Some(ORIGIN_MARK) {
            self.pos += 1;
            let (start, end) = self.digits();
            if start == end {
                return Err(self.error(CodeErrorKind::MissingOriginRank));
            }
            origin_rank = Some(parse_rank(self.code, &self.code[start..end])?);
        }

        // '+' digits*
        let mut partner = None;
        if self.peek() == Some(PARTNER_MARK) {
            let plus = self.pos;
            self.pos += 1;
            let (start, end) = self.digits();
            let rank = if start == end {
                DEFAULT_PARTNER_RANK
            } else {
                parse_rank(self.code, &self.code[start..end])?
            };
            partner = Some((plus, rank));
        }

        if let Some(next) = self.peek() {
            let kind = match next {
                PARTNER_MARK => CodeErrorKind::DuplicatePartnerSuffix,
                _ if partner.is_some() => CodeErrorKind::TrailingAfterPartnerSuffix,
                ORIGIN_MARK => CodeErrorKind::DuplicateOriginMarker,
                SEGMENT_SEPARATOR => CodeErrorKind::MisplacedOriginMarker,
                _ => return Err(self.unexpected_here()),
            };
            return Err(self.error(kind));
        }

        Ok(Scan {
            segment_count,
            last_segment,
            hierarchy_end,
            origin_rank,
            partner,
        })
    }
}

fn parse_rank(code: &str, digits: &str) -> Result<u32, CodeError> {
    digits
        .parse::<u32>()
        .map_err(|_| CodeError::new(code, CodeErrorKind::RankOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(code: &str) -> CodeKind {
        ParsedCode::parse(code).unwrap().into_kind()
    }

    fn error_kind(code: &str) -> CodeErrorKind {
        ParsedCode::parse(code).unwrap_err().kind
    }

    #[test]
    fn test_partner_suffix_absent() {
        let suffix = decode_partner_suffix("0.1.3");
        assert!(!suffix.is_partner);
        assert_eq!(suffix.base_code, "0.1.3");
        assert_eq!(suffix.partner_rank, None);
    }

    #[test]
    fn test_partner_suffix_without_digits_defaults_to_first() {
        let suffix = decode_partner_suffix("0.1.3+");
        assert!(suffix.is_partner);
        assert_eq!(suffix.base_code, "0.1.3");
        assert_eq!(suffix.partner_rank, Some(1));
    }

    #[test]
    fn test_partner_suffix_with_rank() {
        let suffix = decode_partner_suffix("0.1.3+2");
        assert!(suffix.is_partner);
        assert_eq!(suffix.base_code, "0.1.3");
        assert_eq!(suffix.partner_rank, Some(2));
    }

    #[test]
    fn test_partner_suffix_mid_string_is_ignored() {
        let suffix = decode_partner_suffix("0.1+2.3");
        assert!(!suffix.is_partner);
        assert_eq!(suffix.base_code, "0.1+2.3");
    }

    #[test]
    fn test_partner_suffix_takes_last_plus() {
        let suffix = decode_partner_suffix("0.1+1+2");
        assert!(suffix.is_partner);
        assert_eq!(suffix.base_code, "0.1+1");
        assert_eq!(suffix.partner_rank, Some(2));
    }

    #[test]
    fn test_partner_suffix_overflow_is_no_match() {
        let suffix = decode_partner_suffix("0.1+99999999999");
        assert!(!suffix.is_partner);
    }

    #[test]
    fn test_origin_marker() {
        let origin = decode_partner_origin_marker("0.1.3.2*2");
        assert!(origin.has_partner_origin_info);
        assert_eq!(origin.base_code, "0.1.3.2");
        assert_eq!(origin.partner_rank, Some(2));

        let origin = decode_partner_origin_marker("0.1.3.1*1");
        assert_eq!(origin.base_code, "0.1.3.1");
        assert_eq!(origin.partner_rank, Some(1));
    }

    #[test]
    fn test_origin_marker_absent() {
        let origin = decode_partner_origin_marker("0.1.3");
        assert!(!origin.has_partner_origin_info);
        assert_eq!(origin.base_code, "0.1.3");
        assert_eq!(origin.partner_rank, None);
    }

    #[test]
    fn test_origin_marker_needs_digits_and_prefix() {
        assert!(!decode_partner_origin_marker("0.1*").has_partner_origin_info);
        assert!(!decode_partner_origin_marker("*1").has_partner_origin_info);
    }

    #[test]
    fn test_origin_marker_drops_trailing_text() {
        let origin = decode_partner_origin_marker("0.1*3x");
        assert!(origin.has_partner_origin_info);
        assert_eq!(origin.base_code, "0.1");
        assert_eq!(origin.partner_rank, Some(3));
    }

    #[test]
    fn test_is_root_code() {
        assert!(is_root_code("0"));
        assert!(!is_root_code("00"));
        assert!(!is_root_code("0+1"));
        assert!(!is_root_code(""));
    }

    #[test]
    fn test_parse_root_and_standalone() {
        assert_eq!(kind("0"), CodeKind::Root);
        assert_eq!(kind("7"), CodeKind::Standalone);
    }

    #[test]
    fn test_parse_descendant() {
        assert_eq!(
            kind("0.1.3"),
            CodeKind::Descendant {
                parent: "0.1".to_string(),
                rank: 3,
                origin_partner: None,
            }
        );
        assert_eq!(
            kind("0.1"),
            CodeKind::Descendant {
                parent: "0".to_string(),
                rank: 1,
                origin_partner: None,
            }
        );
    }

    #[test]
    fn test_parse_descendant_of_partner() {
        assert_eq!(
            kind("0.1.3.2*2"),
            CodeKind::Descendant {
                parent: "0.1.3".to_string(),
                rank: 2,
                origin_partner: Some(2),
            }
        );
    }

    #[test]
    fn test_parse_partner() {
        assert_eq!(
            kind("0.1.3+"),
            CodeKind::Partner {
                base: "0.1.3".to_string(),
                rank: 1,
            }
        );
        assert_eq!(
            kind("0.1.3+2"),
            CodeKind::Partner {
                base: "0.1.3".to_string(),
                rank: 2,
            }
        );
        assert_eq!(
            kind("0+1"),
            CodeKind::Partner {
                base: "0".to_string(),
                rank: 1,
            }
        );
    }

    #[test]
    fn test_parse_partner_of_partner_descendant() {
        assert_eq!(
            kind("0.1.1*1+1"),
            CodeKind::Partner {
                base: "0.1.1*1".to_string(),
                rank: 1,
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        assert_eq!(error_kind(""), CodeErrorKind::Empty);
        assert_eq!(error_kind("0..1"), CodeErrorKind::EmptySegment);
        assert_eq!(error_kind(".1"), CodeErrorKind::EmptySegment);
        assert_eq!(error_kind("0.1."), CodeErrorKind::EmptySegment);
        assert_eq!(error_kind("+1"), CodeErrorKind::EmptySegment);
        assert_eq!(error_kind("0.a"), CodeErrorKind::UnexpectedCharacter('a'));
        assert_eq!(error_kind("0.1 "), CodeErrorKind::UnexpectedCharacter(' '));
        assert_eq!(error_kind("0.1*"), CodeErrorKind::MissingOriginRank);
        assert_eq!(error_kind("0.1*+1"), CodeErrorKind::MissingOriginRank);
        assert_eq!(error_kind("0.1*1.2"), CodeErrorKind::MisplacedOriginMarker);
        assert_eq!(error_kind("0.1*1*2"), CodeErrorKind::DuplicateOriginMarker);
        assert_eq!(error_kind("0.1+1+2"), CodeErrorKind::DuplicatePartnerSuffix);
        assert_eq!(error_kind("0.1+1*2"), CodeErrorKind::TrailingAfterPartnerSuffix);
        assert_eq!(error_kind("0.1+1.2"), CodeErrorKind::TrailingAfterPartnerSuffix);
        assert_eq!(error_kind("0*1"), CodeErrorKind::OriginWithoutParent);
        assert_eq!(error_kind("0.99999999999"), CodeErrorKind::RankOverflow);
    }

    #[test]
    fn test_error_message_names_code() {
        let err = ParsedCode::parse("0..1").unwrap_err();
        assert_eq!(err.to_string(), "malformed code '0..1': empty segment");
    }

    #[test]
    fn test_partner_code() {
        assert_eq!(partner_code("0.1", 2), "0.1+2");
    }
}
