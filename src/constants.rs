//! Limits and sentinel values

/// Maximum byte length of a permission or collection name
pub const MAX_NAME_LEN: usize = 128;

/// Maximum byte length of a principal id (grant keys carry one length byte)
pub const MAX_PRINCIPAL_LEN: usize = 255;

/// Principal id whose grants apply to every principal
pub const WILDCARD_PRINCIPAL: &str = "*";

/// Prefix marking a configured module label as literal (no module resolution)
pub const MODULE_SENTINEL: char = '@';
