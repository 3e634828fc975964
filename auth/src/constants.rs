//! Authentication constants.

use chrono::Duration;

/// Lifetime of a sign-in token, counted from issuance.
pub const SIGN_IN_TOKEN_TTL: Duration = Duration::hours(1);

/// Path of the endpoint that verifies a sign-in token.
///
/// Sign-in links are formatted as `{base_url}{VERIFY_SIGN_IN_PATH}?token={token}`.
pub const VERIFY_SIGN_IN_PATH: &str = "/verify-sign-in";

/// Metric names emitted by the flows.
pub mod metric_names {
    /// Sign-in requests, labelled by `outcome`.
    pub const SIGN_IN_TOTAL: &str = "auth.sign_in.total";

    /// Sign-up requests, labelled by `outcome`.
    pub const SIGN_UP_TOTAL: &str = "auth.sign_up.total";

    /// Token verifications, labelled by `outcome`.
    pub const VERIFY_TOTAL: &str = "auth.verify.total";
}
