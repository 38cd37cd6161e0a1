use chrono::NaiveDate;
use fintrack_config::Config;
use fintrack_core::format::{CurrencyFormatter, DateFormatter};

/// Presentation settings captured from the active [`Config`].
///
/// Rebuilt whenever the configuration changes; core services never see it.
#[derive(Debug, Clone, PartialEq)]
pub struct CliFormatters {
    currency: String,
    precision: usize,
    decimal_separator: char,
    grouping_separator: char,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        let (grouping_separator, decimal_separator) = separators_for(&config.locale);
        Self {
            currency: config.currency.clone(),
            precision: usize::from(config.currency_precision()),
            decimal_separator,
            grouping_separator,
        }
    }

    /// Amount in the configured currency.
    pub fn money(&self, amount: f64) -> String {
        self.format_amount(amount, &self.currency)
    }

    pub fn percent(&self, value: f64) -> String {
        format!("{value:.1}%")
    }

    /// Signed percentage used for trend deltas.
    pub fn delta(&self, value: f64) -> String {
        if value > 0.0 {
            format!("+{value:.1}%")
        } else {
            format!("{value:.1}%")
        }
    }

    fn number(&self, value: f64) -> String {
        let body = format!("{:.*}", self.precision, value.abs());
        let (whole, fraction) = match body.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (body.as_str(), None),
        };
        let mut rendered = group_digits(whole, self.grouping_separator);
        if let Some(fraction) = fraction {
            rendered.push(self.decimal_separator);
            rendered.push_str(fraction);
        }
        rendered
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let code = if currency.is_empty() {
            self.currency.as_str()
        } else {
            currency
        };
        let body = self.number(amount);
        let rounds_to_zero = !body.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
        format!("{sign}{body} {code}")
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

/// `(grouping, decimal)` separators for a BCP 47 locale tag.
fn separators_for(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "id" | "it" | "nl" | "pt" => ('.', ','),
        "fr" => (' ', ','),
        _ => (',', '.'),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatters(locale: &str, currency: &str) -> CliFormatters {
        let config = Config {
            locale: locale.into(),
            currency: currency.into(),
            ..Config::default()
        };
        CliFormatters::from_config(&config)
    }

    #[test]
    fn groups_thousands_with_locale_separators() {
        assert_eq!(formatters("en-US", "USD").money(1234567.5), "1,234,567.50 USD");
        assert_eq!(formatters("id-ID", "IDR").money(2500000.0), "2.500.000 IDR");
        assert_eq!(formatters("de-DE", "EUR").money(-1234.5), "-1.234,50 EUR");
    }

    #[test]
    fn small_negative_values_do_not_render_negative_zero() {
        assert_eq!(formatters("en-US", "USD").money(-0.001), "0.00 USD");
        assert_eq!(formatters("en-US", "USD").money(999.0), "999.00 USD");
    }

    #[test]
    fn explicit_currency_label_wins() {
        let fmt = formatters("en-US", "USD");
        assert_eq!(fmt.format_amount(10.0, "EUR"), "10.00 EUR");
        assert_eq!(fmt.format_amount(10.0, ""), "10.00 USD");
    }
}
