//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token lifetime in days
pub const DEFAULT_JWT_EXPIRATION_DAYS: i64 = 30;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per day (for token expiration calculation)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (for development)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://expenses.db?mode=rwc";

/// Default size of the database connection pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum length for usernames, category and expense names (column width)
pub const MAX_NAME_LENGTH: u64 = 80;

/// Smallest amount accepted for an expense
pub const MIN_EXPENSE_AMOUNT: f64 = 0.01;

// =============================================================================
// Summary periods
// =============================================================================

/// Trailing window for the `week` summary, in days
pub const PERIOD_WEEK_DAYS: i64 = 7;

/// Trailing window for the `month` summary, in days
pub const PERIOD_MONTH_DAYS: i64 = 30;

/// Trailing window for the `three_months` summary, in days
pub const PERIOD_THREE_MONTHS_DAYS: i64 = 90;

// =============================================================================
// Response messages
// =============================================================================

pub const MSG_CATEGORY_DELETED: &str = "Category deleted.";

pub const MSG_EXPENSE_DELETED: &str = "Expense deleted.";

pub const MSG_LOGGED_OUT: &str = "Successfully logged out.";
