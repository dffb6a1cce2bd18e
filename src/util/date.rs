use chrono::{DateTime, Datelike, Utc};

/// Locale used for long-form dates.
///
/// The locale is fixed for the whole application (chosen once in config),
/// not derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLocale {
    /// `16 октября 2026 г.`
    #[default]
    Ru,
    /// `16 October 2026`
    En,
}

impl DateLocale {
    /// Parse a locale name from config (case-insensitive, accepts `ru-RU` style tags).
    pub fn from_str_name(s: &str) -> Option<Self> {
        let lang = s.split(['-', '_']).next().unwrap_or_default();
        match lang.to_ascii_lowercase().as_str() {
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// Russian month names in the genitive case, as used after a day number.
const RU_MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Long-form date: day number, full month name, year.
///
/// Dates are rendered in UTC so the same article shows the same date on
/// every machine.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lenta::util::{format_long_date, DateLocale};
///
/// let dt = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
/// assert_eq!(format_long_date(&dt, DateLocale::Ru), "16 октября 2026 г.");
/// assert_eq!(format_long_date(&dt, DateLocale::En), "16 October 2026");
/// ```
pub fn format_long_date(dt: &DateTime<Utc>, locale: DateLocale) -> String {
    let month = dt.month0() as usize;
    match locale {
        DateLocale::Ru => format!("{} {} {} г.", dt.day(), RU_MONTHS[month], dt.year()),
        DateLocale::En => format!("{} {} {}", dt.day(), EN_MONTHS[month], dt.year()),
    }
}

/// Compact age for list entries: `5m`, `3h`, `2d`, then `Mar 05`.
pub fn format_relative_time(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*dt).num_seconds();

    // Future dates (clock skew in the source)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    dt.format("%b %d").to_string()
}
