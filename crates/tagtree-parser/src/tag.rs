//! Tag string parser.
//!
//! A tag is a dot-separated list of segments, each optionally followed by a
//! bracketed index: `Area1.Line2[3].Motor.Fault.1`. The public entry point is
//! [`parse_tag`], which turns one tag into a [`TagRecord`]:
//!
//! 1. The last segment is removed. It becomes the bit when it is a plain
//!    decimal number without an index.
//! 2. If any remaining segment has an index, the first one decides: the
//!    prefix is everything up to that segment's name, the instance name is the
//!    index content.
//! 3. Otherwise the last remaining segment is the instance name and the ones
//!    before it form the prefix.
//!
//! Tags the grammar rejects (unbalanced or nested brackets, trailing text
//! after an index) fall back to plain splitting on the last two dots. Parsing
//! never fails.

use std::fmt;

use log::debug;
use winnow::{
    Parser as _,
    combinator::{delimited, eof, opt, separated, terminated},
    error::ModalResult,
    token::take_till,
};

use tagtree_core::record::TagRecord;

type Input<'a> = &'a str;

/// One dot-separated part of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    name: &'a str,
    index: Option<&'a str>,
}

impl Segment<'_> {
    /// Returns the segment as a bit number, if it is one.
    fn as_bit(&self) -> Option<&str> {
        if self.index.is_none() && is_bit(self.name) {
            Some(self.name)
        } else {
            None
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// Returns `true` if `segment` is a non-empty run of ASCII digits.
pub(crate) fn is_bit(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a bracketed index: `[3]`
fn index<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    delimited('[', take_till(0.., ['[', ']']), ']').parse_next(input)
}

/// Parse a segment name with its optional index: `Line2[3]`
fn segment<'a>(input: &mut Input<'a>) -> ModalResult<Segment<'a>> {
    (take_till(0.., ['.', '[', ']']), opt(index))
        .map(|(name, index)| Segment { name, index })
        .parse_next(input)
}

/// Parse a complete tag into its segments
fn segments<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Segment<'a>>> {
    terminated(separated(1.., segment, '.'), eof).parse_next(input)
}

fn join_names(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| segment.name)
        .collect::<Vec<_>>()
        .join(".")
}

fn record_from_segments(segments: &[Segment<'_>], description: Option<String>) -> TagRecord {
    let Some((last, body)) = segments.split_last() else {
        return TagRecord::new("", "", None, description);
    };
    let bit = last.as_bit().map(str::to_string);

    if let Some(pos) = body.iter().position(|segment| segment.index.is_some()) {
        let owner = body[pos];
        let prefix = join_names(&body[..=pos]);
        let instance_name = owner.index.unwrap_or_default();
        return TagRecord::new(prefix, instance_name, bit, description);
    }

    match body.split_last() {
        Some((instance, parents)) => {
            TagRecord::new(join_names(parents), instance.name, bit, description)
        }
        None => TagRecord::new("", "", bit, description),
    }
}

fn record_from_plain(tag: &str, description: Option<String>) -> TagRecord {
    let (body, last) = tag.rsplit_once('.').unwrap_or(("", tag));
    let bit = is_bit(last).then(|| last.to_string());
    let (prefix, instance_name) = body.rsplit_once('.').unwrap_or(("", body));
    TagRecord::new(prefix, instance_name, bit, description)
}

/// Parse one tag into a [`TagRecord`].
///
/// # Arguments
///
/// * `tag` - The raw tag string, already trimmed.
/// * `description` - Description for the tag, `None` if absent.
///
/// # Examples
///
/// ```
/// use tagtree_parser::parse_tag;
///
/// let record = parse_tag("Area1.Line2[3].Motor.Fault.1", Some("Overload".to_string()));
/// assert_eq!(record.prefix(), "Area1.Line2");
/// assert_eq!(record.instance_name(), "3");
/// assert_eq!(record.bit(), Some("1"));
///
/// let record = parse_tag("Area1.Pumps.P101.4", None);
/// assert_eq!(record.prefix(), "Area1.Pumps");
/// assert_eq!(record.instance_name(), "P101");
/// ```
pub fn parse_tag(tag: &str, description: Option<String>) -> TagRecord {
    let mut input = tag;
    match segments.parse_next(&mut input) {
        Ok(parsed) => record_from_segments(&parsed, description),
        Err(_) => {
            debug!(tag; "Tag does not match the segment grammar, splitting on dots");
            record_from_plain(tag, description)
        }
    }
}
