//! Bank account layout.
//!
//! Account statements print dates as `D Mon` without a year, group line items
//! under `Account: <number> <name>` markers and put the transaction amount and
//! running balance as the last two bare amounts of each item:
//!
//! ```text
//! Account: 12345678 Everyday Access
//! 3 Jul
//! Direct Credit 012345 ACME PTY LTD
//! SALARY
//! 2,500.00
//! 3,100.00
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{make_id, patterns, StatementConfig, Transaction};
use crate::fiscal::FiscalYear;

/// Description lines, `*` detail lines included, an item can hold. Amount
/// lines do not count towards it.
const WINDOW_LIMIT: usize = 6;

/// Year and month a statement was issued, used to place yearless dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementAnchor {
    pub year: i32,
    pub month: u32,
}

impl StatementAnchor {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Anchor from a file name like `eStatement - Jul 2024.pdf`
    pub fn from_source_name(name: &str) -> Option<Self> {
        patterns::statement_month(name).map(|(year, month)| Self::new(year, month))
    }

    /// Full date for a `D Mon` line printed on this statement.
    ///
    /// A December statement can list January items of the next year and a
    /// January statement can list December items of the previous one.
    pub fn resolve(&self, day: u32, month: u32) -> Option<NaiveDate> {
        let year = match (self.month, month) {
            (12, 1) => self.year + 1,
            (1, 12) => self.year - 1,
            _ => self.year,
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

#[derive(Debug)]
enum Step {
    Accept(Transaction, usize),
    Consume(usize),
    Reject,
}

pub struct AccountStatementParser<'a> {
    config: &'a StatementConfig,
    fiscal_year: FiscalYear,
    anchor: StatementAnchor,
}

impl<'a> AccountStatementParser<'a> {
    pub fn new(config: &'a StatementConfig, fiscal_year: FiscalYear, anchor: StatementAnchor) -> Self {
        Self {
            config,
            fiscal_year,
            anchor,
        }
    }

    pub fn parse<S: AsRef<str>>(&self, lines: &[S], source: &str) -> Vec<Transaction> {
        self.parse_pages([lines], source)
    }

    /// Scan every page on its own, carrying the current account across page breaks.
    pub fn parse_pages<'l, S: AsRef<str> + 'l>(
        &self,
        pages: impl IntoIterator<Item = &'l [S]>,
        source: &str,
    ) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let mut account: Option<&str> = None;
        for lines in pages {
            self.scan_page(lines, &mut account, source, &mut transactions);
        }

        log::debug!("{source}: {} account transactions", transactions.len());
        transactions
    }

    fn scan_page<'l, S: AsRef<str>>(
        &self,
        lines: &'l [S],
        account: &mut Option<&'l str>,
        source: &str,
        transactions: &mut Vec<Transaction>,
    ) {
        let mut cursor = 0;
        while cursor < lines.len() {
            let line = lines[cursor].as_ref().trim();
            if let Some(name) = patterns::account_marker(line) {
                *account = Some(name);
                cursor += 1;
                continue;
            }
            let Some(current) = *account else {
                cursor += 1;
                continue;
            };

            match self.step(lines, cursor, current, source) {
                Step::Accept(tx, next) => {
                    transactions.push(tx);
                    cursor = next;
                }
                Step::Consume(next) => cursor = next,
                Step::Reject => cursor += 1,
            }
        }
    }

    fn step<S: AsRef<str>>(&self, lines: &[S], cursor: usize, account: &str, source: &str) -> Step {
        let line = |index: usize| lines.get(index).map(|l| l.as_ref().trim());

        let Some((day, month)) = line(cursor).and_then(patterns::day_month) else {
            return Step::Reject;
        };
        let Some(date) = self.anchor.resolve(day, month) else {
            log::trace!("{source}:{cursor}: {day}/{month} is not a date");
            return Step::Reject;
        };
        if line(cursor + 2).is_some_and(is_balance_line) {
            return Step::Reject;
        }

        let mut next = cursor + 1;
        let mut date_processed = date;
        if let Some(posted) = line(next)
            .and_then(patterns::day_month)
            .and_then(|(day, month)| self.anchor.resolve(day, month))
        {
            date_processed = posted;
            next += 1;
        }

        let mut description = Vec::new();
        let mut amounts: Vec<Decimal> = Vec::new();
        let mut description_lines = 0;
        while let Some(text) = line(next) {
            if patterns::day_month(text).is_some() || patterns::is_account_marker(text) {
                break;
            }
            if let Some(amount) = patterns::bare_amount(text) {
                amounts.push(amount);
                next += 1;
                continue;
            }
            if description_lines == WINDOW_LIMIT {
                break;
            }
            description_lines += 1;
            next += 1;
            if !text.is_empty() && !text.starts_with('*') {
                description.push(text);
            }
        }

        let description = description.join(" ");
        let &[.., amount, balance] = amounts.as_slice() else {
            log::trace!("{source}:{cursor}: fewer than two amounts");
            return Step::Reject;
        };
        if description.is_empty() {
            return Step::Reject;
        }
        if amount.is_zero() || !self.fiscal_year.contains(date) {
            return Step::Consume(next);
        }
        if self
            .config
            .skip_markers
            .iter()
            .any(|marker| description.contains(marker.as_str()))
        {
            log::trace!("{source}:{cursor}: skipping summary row {description}");
            return Step::Consume(next);
        }

        Step::Accept(
            Transaction {
                id: make_id(source, date, &description, amount),
                date_processed,
                date,
                card: None,
                account: Some(account.to_string()),
                description,
                amount,
                balance,
                foreign: None,
                source: source.to_string(),
            },
            next,
        )
    }
}

fn is_balance_line(line: &str) -> bool {
    line.contains("Opening Balance") || line.contains("Closing Balance")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse_with(anchor: StatementAnchor, lines: &[&str]) -> Vec<Transaction> {
        let config = StatementConfig::default();
        AccountStatementParser::new(&config, FiscalYear(2025), anchor).parse(lines, "eStatement")
    }

    fn parse(lines: &[&str]) -> Vec<Transaction> {
        parse_with(StatementAnchor::new(2024, 8), lines)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn items_under_account_marker() {
        let txs = parse(&[
            "Statement period 1 Jul 2024 to 31 Jul 2024",
            "Account: 12345678 Everyday Access",
            "3 Jul",
            "Direct Credit 012345 ACME PTY LTD",
            "SALARY",
            "2,500.00",
            "3,100.00",
            "5 Jul",
            "6 Jul",
            "Visa Purchase",
            "* Card 1234",
            "OFFICEWORKS",
            "45.00",
            "3,055.00",
        ]);
        assert_eq!(txs.len(), 2);

        assert_eq!(txs[0].date, date(2024, 7, 3));
        assert_eq!(txs[0].description, "Direct Credit 012345 ACME PTY LTD SALARY");
        assert_eq!(txs[0].amount, dec!(2500.00));
        assert_eq!(txs[0].balance, dec!(3100.00));
        assert_eq!(txs[0].account.as_deref(), Some("Everyday Access"));
        assert_eq!(txs[0].card, None);

        assert_eq!(txs[1].date, date(2024, 7, 5));
        assert_eq!(txs[1].date_processed, date(2024, 7, 6));
        assert_eq!(txs[1].description, "Visa Purchase OFFICEWORKS");
        assert_eq!(txs[1].amount, dec!(45.00));
    }

    #[test]
    fn account_carries_across_pages() {
        let config = StatementConfig::default();
        let first = [
            "Account: 1111 Everyday Access",
            "3 Jul",
            "COFFEE",
            "4.50",
            "95.50",
        ];
        let second = ["Page 2", "5 Jul", "BOOKS", "20.00", "75.50"];
        let txs = AccountStatementParser::new(&config, FiscalYear(2025), StatementAnchor::new(2024, 7))
            .parse_pages([&first[..], &second[..]], "eStatement");
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].description, "BOOKS");
        assert_eq!(txs[1].account.as_deref(), Some("Everyday Access"));
    }

    #[test]
    fn item_does_not_run_over_page_break() {
        let config = StatementConfig::default();
        let first = ["Account: 1111 Everyday Access", "3 Jul", "COFFEE", "4.50"];
        let second = ["95.50", "Page 2"];
        let txs = AccountStatementParser::new(&config, FiscalYear(2025), StatementAnchor::new(2024, 7))
            .parse_pages([&first[..], &second[..]], "eStatement");
        assert!(txs.is_empty());
    }

    #[test]
    fn lines_before_first_account_ignored() {
        let txs = parse(&["3 Jul", "INTEREST", "1.00", "2.00"]);
        assert!(txs.is_empty());
    }

    #[test]
    fn marker_switches_account() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "3 Jul",
            "COFFEE",
            "4.50",
            "95.50",
            "Account: 2222 Bonus Saver",
            "31 Jul",
            "Bonus Interest",
            "12.00",
            "1,012.00",
        ]);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].account.as_deref(), Some("Everyday Access"));
        assert_eq!(txs[1].account.as_deref(), Some("Bonus Saver"));
    }

    #[test]
    fn opening_balance_rows_rejected() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "1 Jul",
            "2024",
            "Opening Balance",
            "100.00",
            "100.00",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn needs_amount_and_balance() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "3 Jul",
            "COFFEE",
            "4.50",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn window_limit_ends_item() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "3 Jul",
            "ONE",
            "TWO",
            "THREE",
            "FOUR",
            "FIVE",
            "SIX",
            "4.50",
            "95.50",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn long_description_keeps_effective_date() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "5 Jul",
            "6 Jul",
            "Visa Purchase",
            "* Card 1234",
            "OFFICEWORKS",
            "RICHMOND VIC",
            "45.00",
            "3,055.00",
            "7 Jul",
        ]);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, date(2024, 7, 5));
        assert_eq!(txs[0].date_processed, date(2024, 7, 6));
        assert_eq!(txs[0].description, "Visa Purchase OFFICEWORKS RICHMOND VIC");
        assert_eq!(txs[0].balance, dec!(3055.00));
    }

    #[test]
    fn four_line_description_keeps_amounts() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "2 Aug",
            "3 Aug",
            "Osko Payment To",
            "* Card 1234",
            "J SMITH",
            "RENT AUGUST",
            "REF 5531",
            "1,250.00",
            "1,805.00",
            "4 Aug",
            "Visa Purchase",
            "BAKERY",
            "8.50",
            "1,796.50",
        ]);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].description, "Osko Payment To J SMITH RENT AUGUST REF 5531");
        assert_eq!(txs[0].amount, dec!(1250.00));
        assert_eq!(txs[0].balance, dec!(1805.00));
        assert_eq!(txs[1].description, "Visa Purchase BAKERY");
    }

    #[test]
    fn description_stops_at_line_limit() {
        let txs = parse(&[
            "Account: 1111 Everyday Access",
            "2 Aug",
            "ONE",
            "TWO",
            "THREE",
            "FOUR",
            "FIVE",
            "SIX",
            "SEVEN",
            "9.00",
            "100.00",
        ]);
        assert!(txs.is_empty());
    }

    #[test]
    fn posted_date_does_not_pull_item_into_year() {
        let txs = parse_with(
            StatementAnchor::new(2024, 7),
            &[
                "Account: 1111 Everyday Access",
                "30 Jun",
                "1 Jul",
                "Visa Purchase",
                "* Card 1234",
                "OFFICEWORKS",
                "RICHMOND VIC",
                "45.00",
                "3,055.00",
            ],
        );
        assert!(txs.is_empty());
    }

    #[test]
    fn year_rolls_around_new_year() {
        let lines = [
            "Account: 1111 Everyday Access",
            "30 Dec",
            "DEC ITEM",
            "1.00",
            "10.00",
            "2 Jan",
            "JAN ITEM",
            "2.00",
            "8.00",
        ];
        let december = parse_with(StatementAnchor::new(2024, 12), &lines);
        assert_eq!(december[0].date, date(2024, 12, 30));
        assert_eq!(december[1].date, date(2025, 1, 2));

        let january = parse_with(StatementAnchor::new(2025, 1), &lines);
        assert_eq!(january[0].date, date(2024, 12, 30));
        assert_eq!(january[1].date, date(2025, 1, 2));
    }

    #[test]
    fn out_of_year_items_dropped() {
        let txs = parse_with(
            StatementAnchor::new(2024, 6),
            &[
                "Account: 1111 Everyday Access",
                "28 Jun",
                "JUNE ITEM",
                "1.00",
                "10.00",
            ],
        );
        assert!(txs.is_empty());
    }

    #[test]
    fn anchor_from_file_name() {
        assert_eq!(
            StatementAnchor::from_source_name("eStatement - Dec 2024.pdf"),
            Some(StatementAnchor::new(2024, 12))
        );
        assert_eq!(StatementAnchor::from_source_name("anz.pdf"), None);
    }
}
