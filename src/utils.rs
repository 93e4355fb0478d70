use crate::types::TaskError;
use chrono::{Days, NaiveDate};

pub const MAX_TITLE_LENGTH: usize = 120;

pub fn validate_title(title: &str) -> Result<(), TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::InvalidInput(
            "Task title cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskError::InvalidInput(format!(
            "Task title too long (max {MAX_TITLE_LENGTH} characters). \
          Put additional details in the description.",
        )));
    }

    Ok(())
}

pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn parse_id(raw: &str) -> Result<u32, TaskError> {
    if !is_number(raw) {
        return Err(TaskError::InvalidId(raw.to_string()));
    }
    raw.parse::<u32>()
        .map_err(|_| TaskError::InvalidId(raw.to_string()))
}

/// Words that clear an optional field in `update`.
pub fn is_clear_keyword(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "none" | "clear" | "-")
}

/// Accepts `today`, `tomorrow`, `yesterday`, relative offsets (`3d`, `+3d`,
/// `2w`) and absolute `YYYY-MM-DD` or `YYYY/MM/DD` dates.
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate, TaskError> {
    let trimmed = input.trim().to_lowercase();

    match trimmed.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(shift(today, 1)),
        "yesterday" => return Ok(shift(today, -1)),
        _ => {}
    }

    let relative = trimmed.strip_prefix('+').unwrap_or(&trimmed);
    if let Some(days) = relative.strip_suffix('d') {
        if let Ok(n) = days.parse::<i64>() {
            return Ok(shift(today, n));
        }
    }
    if let Some(weeks) = relative.strip_suffix('w') {
        if let Ok(n) = weeks.parse::<i64>() {
            return Ok(shift(today, n.saturating_mul(7)));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&trimmed, fmt) {
            return Ok(date);
        }
    }

    Err(TaskError::InvalidDate(format!(
        "Unable to parse '{}'. Use 'today', 'tomorrow', an offset like '3d' or '2w', \
         or a date 'YYYY-MM-DD'",
        input
    )))
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.unwrap_or(date)
}

/// Splits a comma separated tag list; tags are trimmed, lower-cased and
/// de-duplicated keeping first-seen order.
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(',').map(str::to_string))
}

pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Empty or whitespace-only text becomes `None`.
pub fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
