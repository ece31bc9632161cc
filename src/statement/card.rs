//! Credit card layout.
//!
//! Each line item prints as six lines:
//!
//! ```text
//! 15/08/2024            date processed
//! 15/08/2024            date of transaction
//! 5200                  card
//! OFFICEWORKS RICHMOND  description
//! $89.50                amount
//! $1,200.00             balance
//! ```
//!
//! optionally followed by a foreign currency line such as `12.99 USD`.

use super::{make_id, patterns, ForeignAmount, StatementConfig, Transaction};
use crate::fiscal::FiscalYear;

const WINDOW: usize = 6;

/// Outcome of examining the window at the cursor
#[derive(Debug)]
enum Step {
    /// Well-formed group in range: emit it and move past the window
    Accept(Transaction),
    /// Well-formed group that is not emitted: move past the window
    Consume,
    /// Not a group: move forward one line and retry
    Reject,
}

pub struct CardStatementParser<'a> {
    config: &'a StatementConfig,
    fiscal_year: FiscalYear,
}

impl<'a> CardStatementParser<'a> {
    pub fn new(config: &'a StatementConfig, fiscal_year: FiscalYear) -> Self {
        Self {
            config,
            fiscal_year,
        }
    }

    /// Scan every page on its own; a group cut by a page break is not a group.
    pub fn parse_pages<'l, S: AsRef<str> + 'l>(
        &self,
        pages: impl IntoIterator<Item = &'l [S]>,
        source: &str,
    ) -> Vec<Transaction> {
        pages
            .into_iter()
            .flat_map(|page| self.parse(page, source))
            .collect()
    }

    /// Scan trimmed, non-empty lines into the transactions they contain.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S], source: &str) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let mut cursor = 0;

        while cursor + WINDOW <= lines.len() {
            match self.step(lines, cursor, source) {
                Step::Accept(tx) => {
                    transactions.push(tx);
                    cursor += WINDOW;
                }
                Step::Consume => cursor += WINDOW,
                Step::Reject => cursor += 1,
            }
        }

        log::debug!("{source}: {} card transactions", transactions.len());
        transactions
    }

    fn step<S: AsRef<str>>(&self, lines: &[S], cursor: usize, source: &str) -> Step {
        let line = |offset: usize| lines[cursor + offset].as_ref().trim();

        let Some(date_processed) = patterns::slash_date(line(0)) else {
            return Step::Reject;
        };
        let Some(date) = patterns::slash_date(line(1)) else {
            log::trace!("{source}:{cursor}: no transaction date");
            return Step::Reject;
        };
        if !patterns::is_card(line(2)) {
            log::trace!("{source}:{cursor}: no card number");
            return Step::Reject;
        }
        let description = line(3);
        if description.is_empty() || self.is_header(description) {
            return Step::Reject;
        }
        let (Some(amount), Some(balance)) = (patterns::currency(line(4)), patterns::currency(line(5)))
        else {
            log::trace!("{source}:{cursor}: no amount and balance");
            return Step::Reject;
        };

        if self.is_summary_row(description) {
            log::trace!("{source}:{cursor}: skipping summary row {description}");
            return Step::Consume;
        }
        if !self.fiscal_year.contains(date) {
            log::trace!("{source}:{cursor}: {date} outside {}", self.fiscal_year);
            return Step::Consume;
        }

        let foreign = lines
            .get(cursor + WINDOW)
            .and_then(|next| patterns::foreign(next.as_ref(), &self.config.foreign_currencies))
            .map(|(amount, currency)| ForeignAmount { amount, currency });

        Step::Accept(Transaction {
            id: make_id(source, date, description, amount),
            date_processed,
            date,
            card: Some(line(2).to_string()),
            account: None,
            description: description.to_string(),
            amount,
            balance,
            foreign,
            source: source.to_string(),
        })
    }

    fn is_header(&self, line: &str) -> bool {
        self.config.header_rows.iter().any(|header| header == line)
    }

    fn is_summary_row(&self, description: &str) -> bool {
        self.config
            .skip_markers
            .iter()
            .any(|marker| description.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn parse(lines: &[&str]) -> Vec<Transaction> {
        let config = StatementConfig::default();
        CardStatementParser::new(&config, FiscalYear(2025)).parse(lines, "card.pdf")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_window() {
        let txs = parse(&[
            "15/08/2024",
            "15/08/2024",
            "5200",
            "OFFICEWORKS RICHMOND",
            "$89.50",
            "$1200.00",
        ]);
        assert_eq!(txs.len(), 1);
        let tx = &txs[0];
        assert_eq!(tx.date, date(2024, 8, 15));
        assert_eq!(tx.card.as_deref(), Some("5200"));
        assert_eq!(tx.description, "OFFICEWORKS RICHMOND");
        assert_eq!(tx.amount, dec!(89.50));
        assert_eq!(tx.balance, dec!(1200.00));
        assert_eq!(tx.foreign, None);
        assert_eq!(tx.source, "card.pdf");
    }

    #[test]
    fn groups_do_not_span_pages() {
        let config = StatementConfig::default();
        let first = [
            "15/08/2024",
            "15/08/2024",
            "5200",
            "OFFICEWORKS RICHMOND",
        ];
        let second = [
            "$89.50",
            "$1,200.00",
            "02/09/2024",
            "01/09/2024",
            "6789",
            "BUNNINGS HAWTHORN",
            "45.00",
            "1,245.00",
        ];
        let parser = CardStatementParser::new(&config, FiscalYear(2025));

        let txs = parser.parse_pages([&first[..], &second[..]], "card.pdf");
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "BUNNINGS HAWTHORN");

        let flattened: Vec<&str> = first.iter().chain(second.iter()).copied().collect();
        assert_eq!(parser.parse(&flattened, "card.pdf").len(), 2);
    }

    #[test]
    fn noise_between_groups_is_skipped() {
        let txs = parse(&[
            "ANZ FREQUENT FLYER BLACK",
            "Transaction Details",
            "Amount ($A)",
            "Balance",
            "15/08/2024",
            "14/08/2024",
            "5200",
            "OFFICEWORKS RICHMOND",
            "$89.50",
            "$1,200.00",
            "Page 2 of 4",
            "02/09/2024",
            "01/09/2024",
            "6789",
            "BUNNINGS HAWTHORN",
            "45.00",
            "1,245.00",
        ]);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date_processed, date(2024, 8, 15));
        assert_eq!(txs[0].date, date(2024, 8, 14));
        assert_eq!(txs[1].card.as_deref(), Some("6789"));
        assert_eq!(txs[1].balance, dec!(1245.00));
    }

    #[test]
    fn header_is_not_a_description() {
        let txs = parse(&[
            "15/08/2024",
            "15/08/2024",
            "5200",
            "Transaction Details",
            "$89.50",
            "$1200.00",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn foreign_annotation_attached() {
        let txs = parse(&[
            "03/10/2024",
            "02/10/2024",
            "5200",
            "OPENAI SAN FRANCISCO",
            "$31.20",
            "$900.00",
            "20.00 USD",
        ]);
        assert_eq!(
            txs[0].foreign,
            Some(ForeignAmount {
                amount: dec!(20.00),
                currency: "USD".to_string()
            })
        );
    }

    #[test]
    fn overseas_fee_rows_consume_window() {
        let txs = parse(&[
            "03/10/2024",
            "03/10/2024",
            "5200",
            "OVERSEAS TXN FEE INCL OVERSEAS",
            "$0.94",
            "$900.94",
            "04/10/2024",
            "04/10/2024",
            "5200",
            "COLES",
            "$10.00",
            "$910.94",
        ]);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "COLES");
    }

    #[test]
    fn dates_outside_fiscal_year_dropped() {
        let txs = parse(&[
            "30/06/2024",
            "30/06/2024",
            "5200",
            "LAST YEAR",
            "$1.00",
            "$1.00",
            "01/07/2024",
            "01/07/2024",
            "5200",
            "FIRST DAY",
            "$2.00",
            "$3.00",
            "30/06/2025",
            "30/06/2025",
            "5200",
            "LAST DAY",
            "$4.00",
            "$7.00",
            "01/07/2025",
            "01/07/2025",
            "5200",
            "NEXT YEAR",
            "$8.00",
            "$15.00",
        ]);
        let descriptions: Vec<_> = txs.iter().map(|tx| tx.description.as_str()).collect();
        assert_eq!(descriptions, vec!["FIRST DAY", "LAST DAY"]);
    }

    #[test]
    fn invalid_calendar_date_rejected() {
        let txs = parse(&[
            "31/02/2025",
            "31/02/2025",
            "5200",
            "NOT A DAY",
            "$1.00",
            "$1.00",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn short_input_yields_nothing() {
        assert!(parse(&[]).is_empty());
        assert!(parse(&["15/08/2024", "15/08/2024", "5200", "X", "$1.00"]).is_empty());
    }
}
