//! Keyword classification of statement transactions.
//!
//! Categories are matched in table order against the lower-cased description;
//! the first category with a matching keyword wins.

use crate::statement::Transaction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const UNCLASSIFIED: &str = "unclassified";
/// Owner placeholder resolved from [`ClassifyConfig::card_holders`]
pub const CARD_HOLDER: &str = "card-holder";
pub const UNKNOWN_OWNER: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Deductible,
    Income,
    Excluded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(default = "unknown_owner")]
    pub owner: String,
    /// Share of a deductible expense that is claimable, 0 to 100
    #[serde(default)]
    #[schemars(with = "f64")]
    pub work_use_percent: Decimal,
    pub kind: CategoryKind,
    #[serde(default)]
    pub notes: String,
}

fn unknown_owner() -> String {
    UNKNOWN_OWNER.to_string()
}

impl Category {
    fn new(
        name: &str,
        description: &str,
        kind: CategoryKind,
        owner: &str,
        work_use_percent: Decimal,
        keywords: &[&str],
    ) -> Self {
        Category {
            name: name.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            owner: owner.to_string(),
            work_use_percent,
            kind,
            notes: String::new(),
        }
    }

    fn matching_keyword(&self, description: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| description.contains(&keyword.to_lowercase()))
    }
}

/// Money direction, which statements only imply through the description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

/// `Credit` when the description contains any credit keyword, else `Debit`.
pub fn direction(description: &str, credit_keywords: &[String]) -> Direction {
    let description = description.to_lowercase();
    if credit_keywords
        .iter()
        .any(|keyword| description.contains(&keyword.to_lowercase()))
    {
        Direction::Credit
    } else {
        Direction::Debit
    }
}

/// Amount with money in positive and money out negative
pub fn signed_amount(tx: &Transaction, credit_keywords: &[String]) -> Decimal {
    match direction(&tx.description, credit_keywords) {
        Direction::Credit => tx.amount,
        Direction::Debit => -tx.amount,
    }
}

/// Category whose keyword matched, and the keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub category: &'a Category,
    pub keyword: &'a str,
}

/// First category in table order with a keyword in the description.
pub fn categorise<'a>(description: &str, categories: &'a [Category]) -> Option<Match<'a>> {
    let description = description.to_lowercase();
    categories.iter().find_map(|category| {
        category
            .matching_keyword(&description)
            .map(|keyword| Match { category, keyword })
    })
}

pub fn is_high_value(amount: Decimal, threshold: Decimal) -> bool {
    amount.abs() >= threshold
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClassifyConfig {
    pub categories: Vec<Category>,
    /// Description fragments marking money coming in
    pub credit_keywords: Vec<String>,
    /// Description fragments suggesting an overseas charge
    pub foreign_keywords: Vec<String>,
    #[schemars(with = "f64")]
    pub high_value_threshold: Decimal,
    /// Uncategorised spending from this amount is listed for review
    #[schemars(with = "f64")]
    pub review_threshold: Decimal,
    /// Owner for each card number or account name
    pub card_holders: BTreeMap<String, String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        ClassifyConfig {
            categories: default_categories(),
            credit_keywords: [
                "Direct Credit",
                "Osko Payment From",
                "Interest Credit",
                "Bonus Interest",
                "Transfer From",
                "Cashrewards",
                "Mcare Benefits",
            ]
            .map(String::from)
            .to_vec(),
            foreign_keywords: [
                "usd",
                "eur",
                "gbp",
                "nzd",
                "foreign",
                "international",
                "apple.com/bill",
                "google.com",
                "microsoft.com",
            ]
            .map(String::from)
            .to_vec(),
            high_value_threshold: dec!(300),
            review_threshold: dec!(50),
            card_holders: BTreeMap::new(),
        }
    }
}

impl ClassifyConfig {
    pub fn is_foreign(&self, tx: &Transaction) -> bool {
        if tx.foreign.is_some() {
            return true;
        }
        let description = tx.description.to_lowercase();
        self.foreign_keywords
            .iter()
            .any(|keyword| description.contains(&keyword.to_lowercase()))
    }

    /// Owner of the card or account a transaction was made on
    pub fn holder(&self, tx: &Transaction) -> Option<&str> {
        tx.card
            .as_ref()
            .or(tx.account.as_ref())
            .and_then(|key| self.card_holders.get(key))
            .map(String::as_str)
    }

    pub fn classify(&self, tx: Transaction) -> Classified {
        let direction = direction(&tx.description, &self.credit_keywords);
        let matched = categorise(&tx.description, &self.categories);

        let (category, kind, owner, work_use_percent, keyword) = match matched {
            Some(Match { category, keyword }) => {
                let owner = if category.owner == CARD_HOLDER {
                    self.holder(&tx).unwrap_or(UNKNOWN_OWNER).to_string()
                } else {
                    category.owner.clone()
                };
                (
                    category.name.clone(),
                    Some(category.kind),
                    owner,
                    category.work_use_percent,
                    Some(keyword.to_string()),
                )
            }
            None => (
                UNCLASSIFIED.to_string(),
                None,
                self.holder(&tx).unwrap_or(UNKNOWN_OWNER).to_string(),
                Decimal::ZERO,
                None,
            ),
        };

        let deductible_amount =
            if kind == Some(CategoryKind::Deductible) && direction == Direction::Debit {
                tx.amount * work_use_percent / Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };

        Classified {
            signed_amount: signed_amount(&tx, &self.credit_keywords),
            foreign: self.is_foreign(&tx),
            high_value: is_high_value(tx.amount, self.high_value_threshold),
            transaction: tx,
            direction,
            category,
            kind,
            owner,
            work_use_percent,
            matched_keyword: keyword,
            deductible_amount,
        }
    }
}

/// A transaction with everything classification could infer about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub transaction: Transaction,
    pub direction: Direction,
    pub signed_amount: Decimal,
    pub category: String,
    pub kind: Option<CategoryKind>,
    pub owner: String,
    pub work_use_percent: Decimal,
    pub matched_keyword: Option<String>,
    pub deductible_amount: Decimal,
    pub foreign: bool,
    pub high_value: bool,
}

impl Classified {
    /// A work-related expense, i.e. money out in a deductible category
    pub fn is_deduction(&self) -> bool {
        self.kind == Some(CategoryKind::Deductible) && self.direction == Direction::Debit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub count: usize,
    pub gross: Decimal,
    pub deductible: Decimal,
}

impl Totals {
    fn add(&mut self, item: &Classified) {
        self.count += 1;
        self.gross += item.transaction.amount;
        self.deductible += item.deductible_amount;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeductionSummary {
    /// Keyed by (owner, category)
    pub by_owner_category: BTreeMap<(String, String), Totals>,
    pub by_owner: BTreeMap<String, Totals>,
    pub total: Totals,
}

/// Gross and work-use adjusted totals of the deductible expenses.
pub fn deduction_summary<'a>(items: impl IntoIterator<Item = &'a Classified>) -> DeductionSummary {
    let mut summary = DeductionSummary::default();
    for item in items.into_iter().filter(|item| item.is_deduction()) {
        summary
            .by_owner_category
            .entry((item.owner.clone(), item.category.clone()))
            .or_default()
            .add(item);
        summary
            .by_owner
            .entry(item.owner.clone())
            .or_default()
            .add(item);
        summary.total.add(item);
    }
    summary
}

/// Money out that no category claimed, from `min_amount` up, largest first.
/// These are the candidates for a missing keyword.
pub fn unclassified_expenses<'a>(
    items: impl IntoIterator<Item = &'a Classified>,
    min_amount: Decimal,
) -> Vec<&'a Classified> {
    let mut expenses: Vec<&Classified> = items
        .into_iter()
        .filter(|item| {
            item.kind.is_none()
                && item.direction == Direction::Debit
                && item.transaction.amount >= min_amount
        })
        .collect();
    expenses.sort_by(|a, b| b.transaction.amount.cmp(&a.transaction.amount));
    expenses
}

fn default_categories() -> Vec<Category> {
    use CategoryKind::*;
    vec![
        Category::new(
            "software_subscriptions",
            "Work-related software and cloud services",
            Deductible,
            "primary",
            dec!(100),
            &[
                "replit", "1password", "github", "copilot", "chatgpt", "openai", "warp",
                "adobe", "figma", "slack", "notion", "dropbox", "google workspace",
                "microsoft 365", "aws", "azure", "heroku", "vercel", "netlify",
                "digitalocean", "msbill",
            ],
        ),
        Category::new(
            "linkedin_premium",
            "LinkedIn Premium subscription",
            Deductible,
            "primary",
            dec!(50),
            &["linkedin"],
        ),
        Category::new(
            "streaming_creative",
            "Streaming services used for creative research",
            Deductible,
            "partner",
            dec!(30),
            &[
                "paramount+", "hayu", "audible", "youtube premium", "netflix.com", "stan.com",
                "disney plus", "apple tv+", "prime video", "spotify", "binge",
            ],
        ),
        Category::new(
            "home_office_equipment",
            "Home office equipment and furniture",
            Deductible,
            "primary",
            dec!(100),
            &[
                "officeworks", "jb hi-fi", "harvey norman", "dell", "logitech",
                "microsoft surface", "samsung monitor",
            ],
        ),
        Category::new(
            "office_supplies",
            "Stationery and office consumables",
            Deductible,
            "shared",
            dec!(100),
            &["staples australia", "paper depot"],
        ),
        Category::new(
            "internet_phone",
            "Internet and mobile phone expenses",
            Deductible,
            "shared",
            dec!(65),
            &[
                "optus", "telstra", "vodafone", "tpg", "aussie broadband", "iinet", "belong",
                "felix", "aldi mobile", "nbn",
            ],
        ),
        Category::new(
            "donations",
            "Gifts to deductible gift recipients",
            Deductible,
            CARD_HOLDER,
            dec!(100),
            &[
                "unicef", "cancer council", "red cross", "salvation army", "smith family",
                "world vision", "oxfam", "doctors without borders", "wwf", "rspca", "lifeline",
                "beyond blue",
            ],
        ),
        Category::new(
            "professional_development",
            "Courses, books and professional materials",
            Deductible,
            "primary",
            dec!(100),
            &[
                "udemy", "coursera", "pluralsight", "linkedin learning", "o'reilly",
                "booktopia", "dymocks", "conference", "seminar", "workshop",
            ],
        ),
        Category::new(
            "professional_reading",
            "News and professional reading subscriptions",
            Deductible,
            "primary",
            dec!(50),
            &[
                "new yorker", "economist", "financial review", "wall street journal",
                "nytimes",
            ],
        ),
        Category::new(
            "tax_affairs",
            "Cost of managing tax affairs",
            Deductible,
            "shared",
            dec!(100),
            &["h&r block", "tax agent", "accountant", "etax", "tax return"],
        ),
        Category::new(
            "interest_income",
            "Bank interest received",
            Income,
            "shared",
            dec!(0),
            &["interest", "bonus saver"],
        ),
        Category::new(
            "dividends",
            "Dividend payments",
            Income,
            "primary",
            dec!(0),
            &["dividend", "selfwealth", "commsec"],
        ),
        Category::new(
            "government_payments",
            "Centrelink and government payments",
            Income,
            "shared",
            dec!(0),
            &[
                "centrelink", "services australia", "family tax benefit", "child care subsidy",
                "parenting payment",
            ],
        ),
        Category::new(
            "personal",
            "Personal expenses, not deductible",
            Excluded,
            UNKNOWN_OWNER,
            dec!(0),
            &[
                "woolworths", "coles", "aldi", "costco", "uber eats", "deliveroo", "menulog",
                "doordash", "cafe", "restaurant", "mcdonald", "kfc", "hungry jack", "subway",
                "gym", "fitness", "cinema", "ticketek", "ticketmaster", "hotel", "airbnb",
                "qantas", "virgin", "jetstar", "uber", "didi", "parking", "petrol", "fuel",
                "7-eleven", "amazon", "ikea", "kmart", "big w", "target",
            ],
        ),
        Category::new(
            "childcare_family",
            "Childcare and family expenses",
            Excluded,
            "shared",
            dec!(0),
            &[
                "childcare", "daycare", "kindergarten", "goodstart", "guardian",
                "only about children",
            ],
        ),
        Category::new(
            "health_insurance",
            "Private health insurance",
            Excluded,
            "shared",
            dec!(0),
            &["nib", "bupa", "medibank", "hcf", "ahm"],
        ),
    ]
}
