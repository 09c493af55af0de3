use chrono::{Datelike, NaiveDate};

const NOT_AVAILABLE: &str = "N/A";

/// `125 → "2h 5min"`, `45 → "45min"`, `0 → "0min"`.
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}min", mins)
    }
}

/// Whole US dollars with thousands separators.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// `"2024-01-05" → "January 5, 2024"`.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_rating(vote_average: f64) -> String {
    if !vote_average.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    // Round half away from zero so 7.25 shows as 7.3.
    let rounded = (vote_average * 10.0).round() / 10.0;
    format!("{:.1}", rounded)
}

pub fn year_of(raw: Option<&str>) -> Option<&str> {
    let date = raw?.trim();
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}

/// Whole years between `birthday` and `until`.
pub fn age_on(birthday: &str, until: NaiveDate) -> Option<i32> {
    let born = parse_date(birthday)?;
    if until < born {
        return None;
    }
    let mut age = until.year() - born.year();
    if (until.month(), until.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(idx) => format!("{}…", &cut[..idx]),
        None => format!("{}…", cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_boundaries() {
        assert_eq!(format_runtime(0), "0min");
        assert_eq!(format_runtime(45), "45min");
        assert_eq!(format_runtime(60), "1h 0min");
        assert_eq!(format_runtime(125), "2h 5min");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(999), "$999");
        assert_eq!(format_currency(1_000), "$1,000");
        assert_eq!(format_currency(1_234_567), "$1,234,567");
        assert_eq!(format_currency(-1_000), "-$1,000");
        assert_eq!(format_currency(356_000_000), "$356,000,000");
    }

    #[test]
    fn dates_render_long_form() {
        assert_eq!(format_date(Some("2024-01-05")), "January 5, 2024");
        assert_eq!(format_date(Some("1999-12-31")), "December 31, 1999");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("soon")), "N/A");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn ratings_use_one_decimal() {
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(7.25), "7.3");
        assert_eq!(format_rating(8.456), "8.5");
        assert_eq!(format_rating(10.0), "10.0");
        assert_eq!(format_rating(f64::NAN), "N/A");
    }

    #[test]
    fn year_extraction() {
        assert_eq!(year_of(Some("2008-01-20")), Some("2008"));
        assert_eq!(year_of(Some("")), None);
        assert_eq!(year_of(Some("TBA")), None);
        assert_eq!(year_of(None), None);
    }

    #[test]
    fn age_counts_completed_years() {
        let until = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(age_on("1964-09-02", until), Some(59));
        assert_eq!(age_on("1964-09-01", until), Some(60));
        assert_eq!(age_on("", until), None);
    }

    #[test]
    fn truncate_cuts_on_word_boundary() {
        assert_eq!(truncate_words("short", 10), "short");
        assert_eq!(truncate_words("a long biography here", 10), "a long…");
    }
}
