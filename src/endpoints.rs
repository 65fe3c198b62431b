//! The widget's endpoint URIs.

/// The root route which displays the widget.
pub const ROOT: &str = "/";
/// The route for recording a deposit.
pub const ADD_FUNDS_API: &str = "/api/funds/add";
/// The route for recording a withdrawal.
pub const SUBTRACT_FUNDS_API: &str = "/api/funds/subtract";
/// The route for static files.
pub const STATIC: &str = "/static";
