//! Natural filename ordering.
//!
//! Splits a name into alternating text and digit runs and compares digit runs
//! numerically, so `2.xhtml` sorts before `10.xhtml`. Text runs compare
//! case-insensitively.

use std::cmp::Ordering;

/// One run of a filename: either a digit run or everything between digit runs.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Num(u64),
    /// Digit run too long for u64; compared as (stripped length, digits).
    BigNum(&'a str),
    Text(String),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = s;

    while !rest.is_empty() {
        let in_digits = rest.starts_with(|c: char| c.is_ascii_digit());
        let split = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != in_digits)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(split);

        if in_digits {
            match run.parse::<u64>() {
                Ok(n) => out.push(Segment::Num(n)),
                Err(_) => out.push(Segment::BigNum(run.trim_start_matches('0'))),
            }
        } else {
            out.push(Segment::Text(run.to_lowercase()));
        }
        rest = tail;
    }

    out
}

fn cmp_segment(a: &Segment<'_>, b: &Segment<'_>) -> Ordering {
    use Segment::{BigNum, Num, Text};
    match (a, b) {
        (Num(x), Num(y)) => x.cmp(y),
        (BigNum(x), BigNum(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Num(_), BigNum(_)) => Ordering::Less,
        (BigNum(_), Num(_)) => Ordering::Greater,
        (Text(x), Text(y)) => x.cmp(y),
        // Numbers order before text when run shapes diverge.
        (Num(_) | BigNum(_), Text(_)) => Ordering::Less,
        (Text(_), Num(_) | BigNum(_)) => Ordering::Greater,
    }
}

/// Compare two names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (sa, sb) = (segments(a), segments(b));
    for (x, y) in sa.iter().zip(sb.iter()) {
        match cmp_segment(x, y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    sa.len().cmp(&sb.len()).then_with(|| a.cmp(b))
}
