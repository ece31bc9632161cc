//! E2E tests driving the autax binary over fixture statements

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const AUGUST: &str = "tests/data/card-2024-08.txt";
const SEPTEMBER: &str = "tests/data/card-2024-09.txt";
const ACCOUNT: &str = "tests/data/eStatement - Jul 2024.txt";

fn autax(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autax"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn config_file(dir: &Path, json: &str) -> String {
    let path = dir.join("autax.json");
    fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

/// Card statements print as a table, hiding personal spending by default
#[test]
fn extract_card_statements() {
    let output = autax(&["extract", AUGUST, SEPTEMBER]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("OFFICEWORKS RICHMOND"));
    assert!(stdout.contains("home_office_equipment"));
    assert!(stdout.contains("20.00 USD"));
    assert!(stdout.contains("REVIEW"));
    assert!(!stdout.contains("WOOLWORTHS"));
    assert!(!stdout.contains("INCL OVERSEAS"));
    assert!(stdout.contains("6 transactions"));
}

/// Overlapping statements produce each transaction once
#[test]
fn extract_csv_deduplicates() {
    let output = autax(&["extract", SEPTEMBER, AUGUST, "--all-categories", "--csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    let mut lines = stdout.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("date,card_or_account,description,amount"));

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows.iter().filter(|r| r.contains("JB HI-FI")).count(), 1);
    assert!(rows.iter().any(|r| r.contains("WOOLWORTHS HAWTHORN")));
    // name order: the August statement comes first whatever the argument order
    assert!(rows[0].contains("OFFICEWORKS RICHMOND"));
    assert!(rows[0].contains("-89.50"));
}

#[test]
fn extract_account_statement() {
    let output = autax(&["extract", "--layout", "account", ACCOUNT, "--csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("Everyday Access"));
    assert!(stdout.contains("Bonus Saver"));
    assert!(stdout.contains("Direct Credit 012345 ACME PTY LTD SALARY"));
    assert!(stdout.contains("2500.00"));
    assert!(stdout.contains("-45.00"));
    assert!(stdout.contains("interest_income"));
    assert!(!stdout.contains("Opening Balance"));
}

#[test]
fn extract_account_statement_needs_month() {
    let dir = tempfile::tempdir().unwrap();
    let renamed = dir.path().join("export.txt");
    fs::copy(ACCOUNT, &renamed).unwrap();
    let renamed = renamed.to_string_lossy().into_owned();

    let output = autax(&["extract", "--layout", "account", &renamed]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no statement month"), "stderr: {stderr}");

    let output = autax(&[
        "extract",
        "--layout",
        "account",
        "--statement-month",
        "2024-07",
        &renamed,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(items.as_array().unwrap().len(), 3);
}

/// A missing file is reported but the rest are still processed
#[test]
fn extract_skips_unreadable_files() {
    let output = autax(&["extract", AUGUST, "tests/data/missing.txt"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: failed to read tests/data/missing.txt"));
    assert!(stdout(&output).contains("OFFICEWORKS RICHMOND"));
}

#[test]
fn extract_fails_when_nothing_readable() {
    let output = autax(&["extract", "tests/data/missing.txt"]);
    assert!(!output.status.success());
}

#[test]
fn deductions_report() {
    let output = autax(&["deductions", AUGUST, SEPTEMBER]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("DEDUCTIONS (FY2024-25)"));
    assert!(stdout.contains("internet_phone"));
    assert!(stdout.contains("65%"));
    assert!(stdout.contains("TOTAL: $1,540.40 from 6 transactions"));
    assert!(stdout.contains("JB HI-FI MELBOURNE"));
}

/// Card and account statements can be mixed, each file read in its own layout
#[test]
fn deductions_over_mixed_statements() {
    let output = autax(&["deductions", AUGUST, SEPTEMBER, ACCOUNT]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("TOTAL: $1,585.40 from 7 transactions"));
}

#[test]
fn deductions_list_unclassified_spending() {
    let dir = tempfile::tempdir().unwrap();
    let statement = dir.path().join("card-2024-10.txt");
    fs::write(
        &statement,
        "Transaction Details\n\
         05/10/2024\n04/10/2024\n5200\nBUNNINGS WAREHOUSE\n$64.20\n$64.20\n\
         06/10/2024\n05/10/2024\n5200\nBAKERY ON GLENFERRIE\n$12.50\n$76.70\n\
         07/10/2024\n06/10/2024\n5200\nOFFICEWORKS RICHMOND\n$30.00\n$106.70\n",
    )
    .unwrap();
    let statement = statement.to_string_lossy().into_owned();

    let output = autax(&["deductions", &statement]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = stdout(&output);
    assert!(stdout.contains("UNCLASSIFIED EXPENSES (at least $50.00) - 1 to review"));
    assert!(stdout.contains("BUNNINGS WAREHOUSE"));
    assert!(!stdout.contains("BAKERY"));

    let output = autax(&["deductions", &statement, "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["unclassified"].as_array().unwrap().len(), 1);
}

/// Card holders from the config file own gifts made on their card
#[test]
fn deductions_json_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(
        dir.path(),
        r#"{ "classify": { "card_holders": { "5200": "alex", "6789": "sam" } } }"#,
    );

    let output = autax(&["--config", &config, "deductions", AUGUST, SEPTEMBER, "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let categories = report["categories"].as_array().unwrap();
    let donations = categories
        .iter()
        .find(|c| c["category"] == "donations")
        .unwrap();
    assert_eq!(donations["owner"], "alex");
    assert_eq!(report["fiscal_year"], "FY2024-25");
    assert_eq!(report["high_value"].as_array().unwrap().len(), 1);
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(dir.path(), r#"{ "fiscal_year": "soon" }"#);

    let output = autax(&["--config", &config, "tax", "income", "50000"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid config"), "stderr: {stderr}");
}

#[test]
fn receipts_cross_reference() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("alex")).unwrap();
    fs::write(dir.path().join("alex/240801 officeworks.pdf"), b"").unwrap();
    fs::write(dir.path().join("240915 unicef receipt.pdf"), b"").unwrap();
    fs::write(dir.path().join("readme.txt"), b"").unwrap();
    let receipts = dir.path().to_string_lossy().into_owned();

    let output = autax(&["receipts", AUGUST, SEPTEMBER, "--receipts", &receipts]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("240801 officeworks.pdf"));
    assert!(stdout.contains("240915 unicef receipt.pdf"));
    assert!(stdout.contains("No receipt"));
    assert!(stdout.contains("Matched: 2/6 deductions"));

    let output = autax(&[
        "receipts", AUGUST, SEPTEMBER, "--receipts", &receipts, "--missing", "--csv",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = self::stdout(&output);
    assert_eq!(stdout.lines().count(), 5);
    assert!(!stdout.contains("OFFICEWORKS"));
}

#[test]
fn verify_document_dates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("240815 officeworks.txt"),
        "Tax invoice\nDate: 15/08/2024\nTotal $89.50",
    )
    .unwrap();
    fs::write(
        dir.path().join("240901 netflix.txt"),
        "Netflix receipt\nCharged 1 June 2024",
    )
    .unwrap();
    fs::write(dir.path().join("scan.txt"), "").unwrap();
    let docs = dir.path().to_string_lossy().into_owned();

    let output = autax(&["verify", &docs]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = stdout(&output);
    assert!(stdout.contains("DOCUMENT DATES (3 files)"));
    assert!(stdout.contains("Exact:      1"));
    assert!(stdout.contains("Mismatch:   1"));
    assert!(stdout.contains("240901 netflix.txt"));
    assert!(stdout.contains("2024-06-01"));
    assert!(!stdout.contains("240815 officeworks.txt"));

    let output = autax(&["verify", &docs, "--json"]);
    let checks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(checks[0]["verdict"], "mismatch");
    assert_eq!(checks[0]["days_off"], 92);
}

#[test]
fn subscription_totals() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("240715 paramount.txt"), "Paramount+\nTOTAL: AUD10.99").unwrap();
    fs::write(dir.path().join("240815 paramount.txt"), "Paramount+\nTOTAL: AUD10.99").unwrap();
    fs::write(dir.path().join("240720 hayu.txt"), "hayu $7.99 incl. GST $0.73").unwrap();
    fs::write(dir.path().join("240901 officeworks.txt"), "TOTAL $89.50").unwrap();
    let invoices = dir.path().to_string_lossy().into_owned();

    let output = autax(&["subscriptions", &invoices]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = stdout(&output);
    assert!(stdout.contains("Paramount Plus"));
    assert!(stdout.contains("$21.98"));
    assert!(stdout.contains("Total annual cost: $29.97"));
    assert!(stdout.contains("30% work use deduction: $8.99"));

    let output = autax(&["subscriptions", &invoices, "--work-use", "50", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let deduction: f64 = report["deduction"].as_str().unwrap().parse().unwrap();
    assert_eq!(deduction, 14.99);
}

#[test]
fn tax_income_report() {
    let output = autax(&["tax", "income", "45000"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("INCOME TAX CALCULATION - FY2024-25"));
    assert!(stdout.contains("$4,288.00"));
    assert!(stdout.contains("$18,201 - $45,000: 16c per $1 over $18,200"));
}

#[test]
fn tax_summary_json() {
    let output = autax(&["tax", "summary", "100000", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let total: f64 = summary["total_tax"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, 22788.0);
}

#[test]
fn tax_mls_without_cover() {
    let output = autax(&["tax", "mls", "100000"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("Tier 1"));
    assert!(stdout.contains("$1,000.00"));
}

#[test]
fn tax_rejects_negative_income() {
    let output = autax(&["tax", "income", "-5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be negative"), "stderr: {stderr}");
}

#[test]
fn schema_describes_config() {
    let output = autax(&["schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["fiscal_year"].is_object());
    assert!(schema["properties"]["classify"].is_object());

    let output = autax(&["schema", "defaults"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("INCL OVERSEAS"));
}
