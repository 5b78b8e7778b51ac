/// Base currency FX snapshots are captured against
pub const DEFAULT_FX_BASE_CURRENCY: &str = "USD";

/// Currency shown when a user has no preference
pub const DEFAULT_CURRENCY: &str = "USD";

/// Currency every points top-up is settled in
pub const DEFAULT_SETTLEMENT_CURRENCY: &str = "GHS";

/// Price of one point in the settlement currency (40 pesewas)
pub const DEFAULT_POINT_UNIT_PRICE_MAJOR: f64 = 0.40;

/// Lifetime of a points quote
pub const DEFAULT_QUOTE_TTL_MINUTES: i64 = 15;

/// Minor units per major unit for the settlement currency
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Ledger reasons
pub const LEDGER_REASON_MANUAL_TOPUP: &str = "manual_topup";
pub const LEDGER_REASON_QUOTE_PAYMENT: &str = "quote_payment";

/// Ledger reference types
pub const LEDGER_REF_TYPE_PAYMENT: &str = "payment";
pub const LEDGER_REF_TYPE_ADMIN: &str = "admin";
