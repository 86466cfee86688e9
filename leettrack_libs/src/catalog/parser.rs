//! Normalizer turning a company-wise CSV export into [`Problem`] records.
//!
//! The exports are loosely structured: column order differs between files,
//! some columns are missing, and titles may contain quoted commas. Malformed
//! rows are skipped and missing columns fall back to defaults, so parsing never
//! fails.
use crate::catalog::model::{Difficulty, Problem};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Base of the search URL used when a row has no usable link.
pub const SEARCH_URL_BASE: &str = "https://leetcode.com/problemset/all/?search=";

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static PROBLEM_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/problems/([^/]+)").unwrap());
static WHITESPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
// Leading decimal number, the same prefix `parseFloat` would accept.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Positions of the logical columns in the header row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub difficulty: Option<usize>,
    pub title: Option<usize>,
    pub frequency: Option<usize>,
    pub acceptance: Option<usize>,
    pub link: Option<usize>,
    pub topics: Option<usize>,
}

impl ColumnIndex {
    pub fn from_header(header: &[String]) -> Self {
        let find = |needle: &str| {
            header
                .iter()
                .position(|column| column.to_lowercase().contains(needle))
        };

        ColumnIndex {
            difficulty: find("difficulty"),
            title: find("title"),
            frequency: find("frequency"),
            acceptance: find("acceptance"),
            link: find("link").or_else(|| find("url")),
            topics: find("topics"),
        }
    }
}

/// Splits one CSV line into trimmed fields.
///
/// A double quote toggles the quoted state and is not copied into the field;
/// commas inside quotes are literal.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Renders a 0-1 fraction as a percentage with one decimal place.
///
/// Values without a numeric prefix become `"0%"`.
pub fn format_acceptance(value: &str) -> String {
    LEADING_NUMBER
        .find(value.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|fraction| fraction.is_finite())
        .map(|fraction| format!("{}%", to_fixed_1(fraction * 100.0)))
        .unwrap_or_else(|| String::from("0%"))
}

/// One-decimal rendering that rounds exact ties away from zero.
///
/// `{:.1}` rounds ties to even; a value is a tie only when its exact decimal
/// expansion ends in `5` right after the first decimal place.
fn to_fixed_1(value: f64) -> String {
    let exact = format!("{:.60}", value.abs());
    let is_tie = exact
        .split_once('.')
        .map(|(_, decimals)| {
            let rest = &decimals[1..];
            rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0')
        })
        .unwrap_or(false);

    if is_tie {
        format!("{:.1}", value + value.signum() * 0.05)
    } else {
        format!("{:.1}", value)
    }
}

/// Returns the link when it is an absolute http(s) URL, otherwise a search URL for the title.
pub fn resolve_url(link: Option<&str>, title: &str) -> String {
    match link {
        Some(link) if link.starts_with("http://") || link.starts_with("https://") => {
            link.to_string()
        }
        _ => format!(
            "{}{}",
            SEARCH_URL_BASE,
            utf8_percent_encode(title, URI_COMPONENT)
        ),
    }
}

/// Stable identity of a problem: the `/problems/<slug>` segment of its URL,
/// or the slugified title.
pub fn problem_id(url: &str, title: &str) -> String {
    match PROBLEM_SLUG.captures(url).and_then(|captures| captures.get(1)) {
        Some(slug) => slug.as_str().to_string(),
        None => WHITESPACES
            .replace_all(&title.to_lowercase(), "-")
            .to_string(),
    }
}

fn field<'a>(fields: &'a [String], index: Option<usize>) -> Option<&'a str> {
    index.and_then(|i| fields.get(i)).map(String::as_str)
}

fn normalize_row(fields: &[String], columns: &ColumnIndex, company: &str) -> Option<Problem> {
    let title = field(fields, columns.title).filter(|title| !title.is_empty())?;

    let difficulty = field(fields, columns.difficulty)
        .map(Difficulty::normalize)
        .unwrap_or(Difficulty::Unknown);
    let frequency = field(fields, columns.frequency).unwrap_or("0").to_string();
    let acceptance = field(fields, columns.acceptance)
        .map(format_acceptance)
        .unwrap_or_else(|| String::from("0%"));
    let url = resolve_url(field(fields, columns.link), title);
    let topics = field(fields, columns.topics).unwrap_or_default().to_string();
    let id = problem_id(&url, title);

    Some(Problem {
        id,
        title: title.to_string(),
        difficulty,
        acceptance,
        frequency,
        url,
        company: company.to_string(),
        topics,
    })
}

/// Parses raw CSV text into problems stamped with `company`.
///
/// Rows keep their input order and are not de-duplicated.
pub fn parse_csv(text: &str, company: &str) -> Vec<Problem> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let header = split_line(lines[0]);
    let columns = ColumnIndex::from_header(&header);

    let mut problems = Vec::with_capacity(lines.len() - 1);
    for (number, line) in lines.iter().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_line(line);
        if fields.len() < 2 {
            tracing::debug!("skip malformed row {} of {}", number, company);
            continue;
        }

        match normalize_row(&fields, &columns, company) {
            Some(problem) => problems.push(problem),
            None => tracing::debug!("skip row {} of {} without title", number, company),
        }
    }

    problems
}
