/// Storage units per display unit (amounts are persisted as milli-units)
pub const MILLI_UNITS_PER_UNIT: i64 = 1000;

/// Decimal places carried by a storage unit
pub const STORAGE_DECIMAL_SCALE: u32 = 3;

/// Days looked back when a caller gives no date range
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Longest date range a caller may request, in days (about ten years)
pub const MAX_PERIOD_DAYS: i64 = 3660;

/// Number of categories shown before the rest collapse into "Other"
pub const TOP_CATEGORY_COUNT: usize = 3;

/// Label for the aggregated remainder of the category breakdown
pub const OTHER_CATEGORY_NAME: &str = "Other";

/// Label for transactions whose category no longer resolves
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Fixed color for the "Other" category bucket
pub const OTHER_CATEGORY_COLOR: &str = "hsl(0, 0%, 85%)";

/// Lifetime of email verification and password reset tokens, in minutes
pub const EMAIL_TOKEN_TTL_MINUTES: i64 = 60;

/// Lifetime of two-factor email codes, in minutes
pub const TWO_FACTOR_TOKEN_TTL_MINUTES: i64 = 5;

/// Password length bounds
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Message returned by every premium-gated operation for free users
pub const PREMIUM_REQUIRED_MESSAGE: &str = "Please upgrade to premium to use this feature";

/// Payee recorded on transactions pulled from a linked bank
pub const BANK_SYNC_PAYEE: &str = "Plaid";

/// Date pattern expected in imported spreadsheet cells
pub const IMPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date pattern used by API inputs and receipt scans
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Currency of premium checkout orders
pub const PREMIUM_CURRENCY: &str = "INR";

/// Premium price in whole currency units when none is configured
pub const DEFAULT_PREMIUM_PRICE: i64 = 9;
