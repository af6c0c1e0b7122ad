//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use trial::reflect_struct;

/// Installs a `tracing` subscriber once; `RUST_LOG=trial=trace` shows
/// comparator activity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[derive(Clone, Debug)]
pub struct Account {
    pub owner: String,
    balance: i64,
    history: Vec<Entry>,
    limits: Option<Box<Limits>>,
}

reflect_struct!(Account {
    pub owner: String,
    balance: i64,
    history: Vec<Entry>,
    limits: Option<Box<Limits>>,
});

impl Account {
    pub fn new(owner: &str, balance: i64) -> Self {
        Self {
            owner: owner.to_string(),
            balance,
            history: Vec::new(),
            limits: None,
        }
    }

    pub fn record(mut self, memo: &str, amount: i64) -> Self {
        self.history.push(Entry {
            memo: memo.to_string(),
            amount,
        });
        self.balance += amount;
        self
    }

    pub fn with_daily_limit(mut self, daily: i64) -> Self {
        self.limits = Some(Box::new(Limits {
            daily,
            audit: Audit { reviewer: None },
        }));
        self
    }

    pub fn set_balance(&mut self, balance: i64) {
        self.balance = balance;
    }
}

#[derive(Clone, Debug)]
pub struct Entry {
    memo: String,
    amount: i64,
}

reflect_struct!(Entry {
    memo: String,
    amount: i64,
});

#[derive(Clone, Debug)]
pub struct Limits {
    daily: i64,
    audit: Audit,
}

reflect_struct!(Limits {
    daily: i64,
    audit: Audit,
});

#[derive(Clone, Debug)]
pub struct Audit {
    reviewer: Option<String>,
}

reflect_struct!(Audit {
    reviewer: Option<String>,
});

impl Audit {
    pub fn reviewed_by(name: &str) -> Self {
        Self {
            reviewer: Some(name.to_string()),
        }
    }
}

/// A ledger keyed by owner, to exercise map values with private fields.
pub fn ledger(accounts: &[Account]) -> HashMap<String, Account> {
    accounts
        .iter()
        .map(|a| (a.owner.clone(), a.clone()))
        .collect()
}

/// A struct with a textual representation.
#[derive(Clone, Debug)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

reflect_struct!(Version: Display {
    pub major: u32,
    pub minor: u32,
});
