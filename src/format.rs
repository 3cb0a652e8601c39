//! Currency formatting for amounts shown in transaction history.
//!
//! Formatting is a presentation concern; the only place the core applies it is
//! the `formatted_amount` annotation on
//! [transaction history](crate::stores::ReportStore::transaction_history)
//! rows, which are rendered in the owner's configured currency.

use numfmt::{Formatter, Precision};

use crate::Error;

/// A currency supported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// The ISO 4217 code, e.g. "USD".
    pub code: &'static str,
    /// The symbol prefixed to formatted amounts.
    pub symbol: &'static str,
    /// How many decimal places the currency is displayed with.
    pub decimals: u8,
}

/// The currencies owners may pick for display.
pub const CURRENCIES: [Currency; 5] = [
    Currency {
        code: "USD",
        symbol: "$",
        decimals: 2,
    },
    Currency {
        code: "INR",
        symbol: "₹",
        decimals: 2,
    },
    Currency {
        code: "GBP",
        symbol: "£",
        decimals: 2,
    },
    Currency {
        code: "JPY",
        symbol: "¥",
        decimals: 0,
    },
    Currency {
        code: "EUR",
        symbol: "€",
        decimals: 2,
    },
];

/// Look up a supported currency by its code.
///
/// # Errors
/// Returns [Error::UnknownCurrency] if `code` is not in [CURRENCIES].
pub fn currency_by_code(code: &str) -> Result<Currency, Error> {
    CURRENCIES
        .iter()
        .find(|currency| currency.code == code)
        .copied()
        .ok_or_else(|| Error::UnknownCurrency(code.to_string()))
}

/// Format a non-negative amount in the given currency, e.g. `$1,234.50`.
pub fn format_amount(currency: Currency, amount: f64) -> String {
    if amount == 0.0 {
        return if currency.decimals == 0 {
            format!("{}0", currency.symbol)
        } else {
            format!("{}0.00", currency.symbol)
        };
    }

    let formatter = Formatter::currency(currency.symbol)
        .unwrap()
        .precision(Precision::Decimals(currency.decimals));
    let mut formatted = formatter.fmt_string(amount);

    // numfmt omits the last trailing zero, so we must add it ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if currency.decimals == 2 {
        let bytes = formatted.as_bytes();
        if bytes[bytes.len() - 2] == b'.' {
            formatted.push('0');
        } else if bytes[bytes.len() - 3] != b'.' {
            formatted.push_str(".00");
        }
    }

    formatted
}
