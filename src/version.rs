use std::cmp::Ordering;

/// Parses one dotted segment the lenient way: optional leading whitespace and
/// sign, then as many digits as are present. Anything else counts as zero.
fn parse_segment(segment: &str) -> i64 {
    let trimmed = segment.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

fn segments(version: &str) -> Vec<i64> {
    version.split('.').map(parse_segment).collect()
}

/// Compares two dotted version strings numerically, segment by segment.
/// Missing segments compare as zero, so `1.0` and `1.0.0` are equal.
pub fn compare_version_strings(a: &str, b: &str) -> Ordering {
    let pa = segments(a);
    let pb = segments(b);
    let len = pa.len().max(pb.len());
    for i in 0..len {
        let na = pa.get(i).copied().unwrap_or(0);
        let nb = pb.get(i).copied().unwrap_or(0);
        match na.cmp(&nb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

pub fn sort_ascending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_version_strings(a, b));
}

/// Stable ascending sort, then reversed, so equal versions end up in reverse
/// listing order.
pub fn sort_newest_first(versions: &mut [String]) {
    sort_ascending(versions);
    versions.reverse();
}

/// Returns the greatest version of the iterator, keeping the first on ties.
pub fn newest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().fold(None, |best, candidate| match best {
        Some(current) if compare_version_strings(candidate, current) != Ordering::Greater => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
