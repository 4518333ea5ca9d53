//! Length-prefixed key encoding for grant records.
//!
//! Grant keys are `[len][principal][len][permission]`. Scanning the prefix
//! `[len][principal]` lists one principal's grants without any delimiter
//! escaping, and principals that happen to be prefixes of each other cannot
//! collide because the length byte differs.

/// Build a grant key from a principal id and a permission name
#[inline]
pub fn grant_key(principal: &str, permission: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + principal.len() + permission.len());
    key.push(principal.len() as u8);
    key.extend_from_slice(principal.as_bytes());
    key.push(permission.len() as u8);
    key.extend_from_slice(permission.as_bytes());
    key
}

/// Build the scan prefix covering every grant of one principal
#[inline]
pub fn principal_prefix(principal: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + principal.len());
    key.push(principal.len() as u8);
    key.extend_from_slice(principal.as_bytes());
    key
}

/// Split a grant key back into (principal, permission)
pub fn split_grant_key(bytes: &[u8]) -> Option<(&str, &str)> {
    let (plen, rest) = bytes.split_first()?;
    let plen = *plen as usize;
    if rest.len() < plen + 1 {
        return None;
    }
    let principal = std::str::from_utf8(&rest[..plen]).ok()?;
    let (nlen, tail) = rest[plen..].split_first()?;
    if tail.len() != *nlen as usize {
        return None;
    }
    let permission = std::str::from_utf8(tail).ok()?;
    Some((principal, permission))
}
