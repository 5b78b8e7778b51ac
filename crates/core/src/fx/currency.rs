//! Currency catalog and code helpers.

use crate::constants::DEFAULT_CURRENCY;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
}

const fn currency(code: &'static str, label: &'static str, symbol: &'static str) -> CurrencyInfo {
    CurrencyInfo {
        code,
        label,
        symbol,
    }
}

/// Currencies offered in the currency pickers, grouped by region.
pub static WORLD_CURRENCIES: &[CurrencyInfo] = &[
    // Africa
    currency("GHS", "Ghanaian Cedi", "₵"),
    currency("KES", "Kenyan Shilling", "KSh"),
    currency("NGN", "Nigerian Naira", "₦"),
    currency("ZAR", "South African Rand", "R"),
    currency("MAD", "Moroccan Dirham", "د.م."),
    currency("XOF", "West African CFA Franc", "CFA"),
    currency("XAF", "Central African CFA Franc", "FCFA"),
    // North America
    currency("USD", "US Dollar", "$"),
    currency("CAD", "Canadian Dollar", "$"),
    currency("MXN", "Mexican Peso", "$"),
    // South America
    currency("BRL", "Brazilian Real", "R$"),
    currency("ARS", "Argentine Peso", "$"),
    // Europe
    currency("EUR", "Euro", "€"),
    currency("GBP", "British Pound", "£"),
    currency("CHF", "Swiss Franc", "Fr"),
    currency("SEK", "Swedish Krona", "kr"),
    currency("NOK", "Norwegian Krone", "kr"),
    currency("DKK", "Danish Krone", "kr"),
    currency("PLN", "Polish Złoty", "zł"),
    currency("CZK", "Czech Koruna", "Kč"),
    currency("HUF", "Hungarian Forint", "Ft"),
    // Middle East & Asia
    currency("AED", "UAE Dirham", "د.إ"),
    currency("SAR", "Saudi Riyal", "﷼"),
    currency("QAR", "Qatari Riyal", "﷼"),
    currency("INR", "Indian Rupee", "₹"),
    currency("PKR", "Pakistani Rupee", "₨"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("KRW", "South Korean Won", "₩"),
    // Oceania
    currency("AUD", "Australian Dollar", "$"),
    currency("NZD", "New Zealand Dollar", "$"),
];

/// Trims and uppercases a currency code.
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// A currency code is three ASCII letters, in any case.
pub fn is_valid_currency_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn find_currency(code: &str) -> Option<&'static CurrencyInfo> {
    let code = normalize_currency_code(code);
    WORLD_CURRENCIES.iter().find(|c| c.code == code)
}

/// Looks up `code`, falling back to the default display currency when the code
/// is absent or unknown.
pub fn currency_or_default(code: Option<&str>) -> &'static CurrencyInfo {
    code.and_then(find_currency)
        .or_else(|| find_currency(DEFAULT_CURRENCY))
        .unwrap_or(&WORLD_CURRENCIES[0])
}
