// src/sample.rs

use anyhow::{ensure, Context, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, Date32Array, Float64Array, StringArray},
    datatypes::Date32Type,
    record_batch::RecordBatch,
};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::schema::canonical_arrow_schema;

/// Number of hand-authored rows available to the sample builder.
pub const MAX_SAMPLE_ROWS: usize = 8;

/// How far before "today" the first transaction is dated.
const BASE_LAG_DAYS: u64 = 10;

/// One demo transaction. Dates are stored as day offsets from the base date
/// so the set stays relative to the day the tool runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub txn_id: &'static str,
    /// `txn_date = base + txn_offset`
    pub txn_offset: u64,
    /// `posted_date = base + posted_offset`
    pub posted_offset: u64,
    pub account_id: &'static str,
    pub merchant: &'static str,
    pub memo: &'static str,
    pub category: &'static str,
    pub currency: &'static str,
    pub amount: f64,
    pub is_recurring: Option<bool>,
    pub is_refund: Option<bool>,
}

static TRANSACTIONS: [Transaction; MAX_SAMPLE_ROWS] = [
    Transaction {
        txn_id: "T0001",
        txn_offset: 0,
        posted_offset: 1,
        account_id: "10001",
        merchant: "Acme Supplies",
        memo: "Office restock",
        category: "Office",
        currency: "USD",
        amount: 123.45,
        is_recurring: Some(false),
        is_refund: Some(false),
    },
    // leading zeros in the account id
    Transaction {
        txn_id: "T0002",
        txn_offset: 1,
        posted_offset: 2,
        account_id: "000123",
        merchant: "Transit Pass",
        memo: "CTA reload",
        category: "Transport",
        currency: "USD",
        amount: 25.00,
        is_recurring: Some(true),
        is_refund: Some(false),
    },
    // refund
    Transaction {
        txn_id: "T0003",
        txn_offset: 2,
        posted_offset: 3,
        account_id: "10002",
        merchant: "Acme Supplies",
        memo: "Returned items",
        category: "Office",
        currency: "USD",
        amount: -12.50,
        is_recurring: Some(false),
        is_refund: Some(true),
    },
    // accents and a non-ASCII dash
    Transaction {
        txn_id: "T0004",
        txn_offset: 3,
        posted_offset: 4,
        account_id: "10003",
        merchant: "Café Río",
        memo: "Team lunch – Q3 kickoff",
        category: "Meals",
        currency: "USD",
        amount: 87.99,
        is_recurring: Some(false),
        is_refund: Some(false),
    },
    // unknown recurring flag
    Transaction {
        txn_id: "T0005",
        txn_offset: 4,
        posted_offset: 5,
        account_id: "10004",
        merchant: "Data Warehouse",
        memo: "Monthly subscription",
        category: "SaaS",
        currency: "USD",
        amount: 499.00,
        is_recurring: None,
        is_refund: Some(false),
    },
    Transaction {
        txn_id: "T0006",
        txn_offset: 5,
        posted_offset: 6,
        account_id: "10005",
        merchant: "Git Hosting",
        memo: "Plan upgrade (includes \"Actions\" minutes)",
        category: "SaaS",
        currency: "USD",
        amount: 19.00,
        is_recurring: Some(true),
        is_refund: Some(false),
    },
    Transaction {
        txn_id: "T0007",
        txn_offset: 6,
        posted_offset: 7,
        account_id: "10006",
        merchant: "Cloud Storage",
        memo: "Annual plan",
        category: "SaaS",
        currency: "EUR",
        amount: 220.00,
        is_recurring: Some(true),
        is_refund: Some(false),
    },
    // NaN amount, empty category
    Transaction {
        txn_id: "T0008",
        txn_offset: 7,
        posted_offset: 8,
        account_id: "10007",
        merchant: "Unknown Vendor",
        memo: "Pending classification",
        category: "",
        currency: "USD",
        amount: f64::NAN,
        is_recurring: Some(false),
        is_refund: Some(false),
    },
];

/// The fixed, ordered list of demo transactions.
pub fn sample_transactions() -> &'static [Transaction] {
    &TRANSACTIONS
}

/// Build the first `n` demo transactions as a typed batch in canonical column order.
///
/// Dates are laid out from `today - 10 days`. Asking for more rows than exist is an
/// error rather than a silent clamp.
#[instrument(level = "debug")]
pub fn create_sample_batch(n: usize, today: NaiveDate) -> Result<RecordBatch> {
    ensure!(
        n <= MAX_SAMPLE_ROWS,
        "requested {} sample rows, only {} are available",
        n,
        MAX_SAMPLE_ROWS
    );

    let base = today
        .checked_sub_days(Days::new(BASE_LAG_DAYS))
        .with_context(|| format!("cannot compute base date from {}", today))?;
    let rows = &TRANSACTIONS[..n];

    let day = |offset: u64| -> Result<i32> {
        base.checked_add_days(Days::new(offset))
            .map(Date32Type::from_naive_date)
            .with_context(|| format!("date overflow at {} + {} days", base, offset))
    };
    let text = |f: fn(&Transaction) -> &'static str| -> ArrayRef {
        Arc::new(rows.iter().map(|r| Some(f(r))).collect::<StringArray>())
    };

    let txn_dates = rows
        .iter()
        .map(|r| day(r.txn_offset))
        .collect::<Result<Vec<_>>>()?;
    let posted_dates = rows
        .iter()
        .map(|r| day(r.posted_offset))
        .collect::<Result<Vec<_>>>()?;

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.txn_id),
        Arc::new(Date32Array::from(txn_dates)),
        Arc::new(Date32Array::from(posted_dates)),
        text(|r| r.account_id),
        text(|r| r.merchant),
        text(|r| r.memo),
        text(|r| r.category),
        text(|r| r.currency),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.amount).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            rows.iter().map(|r| r.is_recurring).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            rows.iter().map(|r| r.is_refund).collect::<Vec<_>>(),
        )),
    ];

    let batch = RecordBatch::try_new(canonical_arrow_schema(), columns)
        .context("building sample RecordBatch")?;
    debug!(rows = batch.num_rows(), base = %base, "built sample batch");
    Ok(batch)
}
