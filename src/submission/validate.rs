use std::sync::LazyLock;

use regex::Regex;

use super::*;

/// Longest accepted `name` or `email`, in characters.
pub const MAX_TEXT_LENGTH: usize = 100;
/// Largest minute count whose total time still fits in a `RaceTime`.
pub const MAX_MINUTES: i64 = (RaceTime::MAX - 59_999) / 60_000;
pub const MAX_SECONDS: i64 = 59;
pub const MAX_MILLISECONDS: i64 = 999;
pub const MAX_RINGS: i64 = 999;

/// `local@domain.tld`, with no whitespace or extra `@` in any part.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Turns a raw add-score form into a storable score.
/// Fields are checked in order and the first failure is returned.
pub fn new_score(form: &AddScoreForm) -> Result<NewScore, ValidationError> {
    let name = trimmed_text(form.name.as_deref()).ok_or(ValidationError::Name)?;

    let email = trimmed_text(form.email.as_deref())
        .filter(|email| EMAIL_PATTERN.is_match(email))
        .ok_or(ValidationError::Email)?;

    let minutes = parse_in_range(form.minutes.as_deref(), 0, MAX_MINUTES)
        .ok_or(ValidationError::Minutes)?;
    let seconds =
        parse_in_range(form.seconds.as_deref(), 0, MAX_SECONDS).ok_or(ValidationError::Seconds)?;
    let milliseconds = parse_in_range(form.milliseconds.as_deref(), 0, MAX_MILLISECONDS)
        .ok_or(ValidationError::Milliseconds)?;

    let rings = match form.rings.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_in_range(Some(raw), 0, MAX_RINGS).ok_or(ValidationError::Rings)?),
    };

    Ok(NewScore {
        name: name.to_owned(),
        email: email.to_owned(),
        time: race_time(minutes, seconds, milliseconds),
        rings,
    })
}

/// Parses the id of a score to delete. Ids start at 1.
pub fn score_id(raw: Option<&str>) -> Result<ScoreId, ValidationError> {
    parse_in_range(raw, 1, ScoreId::MAX).ok_or(ValidationError::ScoreId)
}

/// Total time in milliseconds. `minutes` must not exceed `MAX_MINUTES`.
pub fn race_time(minutes: i64, seconds: i64, milliseconds: i64) -> RaceTime {
    minutes * 60_000 + seconds * 1_000 + milliseconds
}

fn trimmed_text(raw: Option<&str>) -> Option<&str> {
    let text = raw?.trim();
    let length = text.chars().count();
    (1..=MAX_TEXT_LENGTH).contains(&length).then_some(text)
}

fn parse_in_range(raw: Option<&str>, min: i64, max: i64) -> Option<i64> {
    let value = leading_integer(raw?)?;
    (min..=max).contains(&value).then_some(value)
}

/// Reads an optional sign and the leading decimal digits, ignoring anything
/// after them: `"2.0"` is 2, `"1e2"` is 1, `"abc"` has no value.
fn leading_integer(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let magnitude = unsigned[..digits_end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
