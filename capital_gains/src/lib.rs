//! # Capital Gains
//!
//! Pure arithmetic for capital-gains tax on realized stock transactions.
//! A transaction is categorized as short-term or long-term by its holding
//! period, gains are taxed at the category rate, and short-term gains at or
//! below the exemption threshold pay nothing.
//!
//! The default [`TaxRules`] reproduce the Indian equity regime: 20% on
//! short-term gains, 12.5% on long-term gains, a 365-day long-term
//! threshold, and a 125,000 short-term exemption.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in tax calculations
#[derive(Error, Debug)]
pub enum TaxError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Result type for tax operations
pub type Result<T> = std::result::Result<T, TaxError>;

/// Rates and thresholds for a tax regime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRules {
    /// Tax rate applied to short-term gains
    pub short_term_rate: f64,
    /// Tax rate applied to long-term gains
    pub long_term_rate: f64,
    /// Holding periods longer than this many days qualify as long-term
    pub long_term_threshold_days: i64,
    /// Short-term gains at or below this amount are exempt
    pub short_term_exemption: f64,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            short_term_rate: 0.20,
            long_term_rate: 0.125,
            long_term_threshold_days: 365,
            short_term_exemption: 125_000.0,
        }
    }
}

/// A realized buy/sell round trip in a single symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub quantity: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
}

/// Holding-period category of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingPeriod {
    ShortTerm,
    LongTerm,
}

impl std::fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingPeriod::ShortTerm => write!(f, "short_term"),
            HoldingPeriod::LongTerm => write!(f, "long_term"),
        }
    }
}

/// Per-transaction tax outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionTax {
    pub symbol: String,
    pub gain: f64,
    pub category: HoldingPeriod,
    pub tax_amount: f64,
}

/// Total liability with a per-transaction breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub total_tax: f64,
    pub breakdown: Vec<TransactionTax>,
}

/// Categorize a transaction by its holding period.
///
/// Holding periods of `long_term_threshold_days` or fewer are short-term.
pub fn categorize(transaction: &Transaction, rules: &TaxRules) -> Result<HoldingPeriod> {
    validate(transaction)?;

    let held_days = (transaction.sell_date - transaction.buy_date).num_days();
    if held_days <= rules.long_term_threshold_days {
        Ok(HoldingPeriod::ShortTerm)
    } else {
        Ok(HoldingPeriod::LongTerm)
    }
}

/// Calculate total tax liability and a per-transaction breakdown.
///
/// Losses are never taxed. Short-term gains at or below the exemption pay
/// zero; everything else pays the category rate on the whole gain.
pub fn calculate_tax(portfolio: &[Transaction], rules: &TaxRules) -> Result<TaxAssessment> {
    let mut total_tax = 0.0;
    let mut breakdown = Vec::with_capacity(portfolio.len());

    for transaction in portfolio {
        let category = categorize(transaction, rules)?;
        let gain = (transaction.sell_price - transaction.buy_price) * transaction.quantity;

        let tax_amount = if gain <= 0.0 {
            0.0
        } else if category == HoldingPeriod::ShortTerm && gain <= rules.short_term_exemption {
            0.0
        } else {
            let rate = match category {
                HoldingPeriod::ShortTerm => rules.short_term_rate,
                HoldingPeriod::LongTerm => rules.long_term_rate,
            };
            gain * rate
        };

        total_tax += tax_amount;
        breakdown.push(TransactionTax {
            symbol: transaction.symbol.clone(),
            gain,
            category,
            tax_amount,
        });
    }

    Ok(TaxAssessment {
        total_tax,
        breakdown,
    })
}

fn validate(transaction: &Transaction) -> Result<()> {
    if transaction.sell_date < transaction.buy_date {
        return Err(TaxError::InvalidTransaction(format!(
            "Sell date {} precedes buy date {} for {}",
            transaction.sell_date, transaction.buy_date, transaction.symbol
        )));
    }
    if !transaction.buy_price.is_finite() || !transaction.sell_price.is_finite() {
        return Err(TaxError::InvalidTransaction(format!(
            "Non-numeric price for {}",
            transaction.symbol
        )));
    }
    if !transaction.quantity.is_finite() || transaction.quantity <= 0.0 {
        return Err(TaxError::InvalidTransaction(format!(
            "Quantity {} for {} must be positive",
            transaction.quantity, transaction.symbol
        )));
    }
    Ok(())
}
