use std::cmp::Ordering;
use std::fmt;

/// An application or runtime version string with the ordering used to pick
/// the newest of several installed copies.
///
/// Versions are split on `.`, `-` and `_`; numeric segments compare as
/// numbers, anything else compares as text, and text sorts before numbers.
/// When one version runs out of segments, a numeric continuation of the
/// other sorts after it (`1.2` < `1.2.1`) and a text continuation marks a
/// pre-release that sorts before it (`1.0-rc1` < `1.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vsn(String);

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Num(u64),
    Text(&'a str),
}

impl Vsn {
    pub fn new(s: impl Into<String>) -> Self {
        Vsn(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        self.0
            .split(['.', '-', '_'])
            .map(|part| match part.parse::<u64>() {
                Ok(n) => Segment::Num(n),
                Err(_) => Segment::Text(part),
            })
    }
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
            (Segment::Num(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Num(_)) => Ordering::Less,
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vsn {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut ours = self.segments();
        let mut theirs = other.segments();
        loop {
            let ord = match (ours.next(), theirs.next()) {
                (None, None) => break,
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(Segment::Text(_)), None) => Ordering::Less,
                (Some(Segment::Num(_)), None) => Ordering::Greater,
                (None, Some(Segment::Text(_))) => Ordering::Greater,
                (None, Some(Segment::Num(_))) => Ordering::Less,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Vsn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Vsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Vsn {
    fn from(s: &str) -> Self {
        Vsn::new(s)
    }
}
