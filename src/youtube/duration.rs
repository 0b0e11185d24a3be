pub const UNKNOWN_DURATION: &str = "Unknown duration";

const DATE_UNITS: [(char, u64); 2] = [('W', 7 * 86_400), ('D', 86_400)];
const TIME_UNITS: [(char, u64); 3] = [('H', 3_600), ('M', 60), ('S', 1)];

/// Render an ISO 8601 duration as `1h 2m 3s`, or `2m 3s` when under an hour.
///
/// Anything that does not parse becomes [`UNKNOWN_DURATION`]; the value is
/// only ever displayed.
pub fn format_duration(iso: &str) -> String {
    match parse_seconds(iso) {
        Some(total) => format_seconds(total),
        None => {
            tracing::error!("Error parsing duration: {:?}", iso);
            UNKNOWN_DURATION.to_string()
        }
    }
}

fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

/// Total whole seconds in `P[nW][nD][T[nH][nM][nS]]`.
///
/// Years and months have no fixed length and are rejected. The last
/// component present may carry a `.` or `,` fraction, and the total is
/// truncated to whole seconds.
pub fn parse_seconds(iso: &str) -> Option<u64> {
    let rest = iso.strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let date = sum_components(date, &DATE_UNITS)?;
    let time_seconds = match time {
        Some(_) if date.fractional => return None,
        Some(time) => {
            let time = sum_components(time, &TIME_UNITS)?;
            if time.count == 0 {
                return None;
            }
            time.seconds
        }
        None if date.count == 0 => return None,
        None => 0,
    };

    date.seconds.checked_add(time_seconds)
}

struct Components {
    seconds: u64,
    count: usize,
    /// The last component had a fraction.
    fractional: bool,
}

/// Sum `<number><unit>` pairs, units in the order given and each at most once.
fn sum_components(part: &str, units: &[(char, u64)]) -> Option<Components> {
    let mut sum = Components {
        seconds: 0,
        count: 0,
        fractional: false,
    };
    let mut next_unit = 0;
    let mut number = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            number.push(c);
            continue;
        }

        // Only the smallest unit given may be fractional.
        if sum.fractional {
            return None;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == c)?;
        let (_, scale) = units[next_unit + offset];
        let (seconds, fractional) = component_seconds(&number, scale)?;

        sum.seconds = sum.seconds.checked_add(seconds)?;
        sum.count += 1;
        sum.fractional = fractional;
        next_unit += offset + 1;
        number.clear();
    }

    if !number.is_empty() {
        return None;
    }

    Some(sum)
}

/// Digits of a fraction past this many cannot move the result by a second.
const FRACTION_DIGITS: usize = 18;

/// Whole seconds in `number` units of `scale`, and whether it had a fraction.
fn component_seconds(number: &str, scale: u64) -> Option<(u64, bool)> {
    let (whole, fraction) = match number.split_once(|c: char| c == '.' || c == ',') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds = whole.parse::<u64>().ok()?.checked_mul(scale)?;

    let Some(fraction) = fraction else {
        return Some((seconds, false));
    };
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = &fraction[..fraction.len().min(FRACTION_DIGITS)];
    let numerator: u128 = digits.parse().ok()?;
    let partial = numerator * u128::from(scale) / 10u128.pow(digits.len() as u32);

    Some((seconds.checked_add(u64::try_from(partial).ok()?)?, true))
}
