use alloc::ffi::CString;
use alloc::vec::Vec;

#[cfg(feature = "std")]
use std::path::Path;

use crate::error::{Code, Error, Result};

/// Convert a string into a c-string, rejecting internal nul bytes.
pub(crate) fn str_to_cstring(s: &str) -> Result<CString> {
    let Ok(string) = CString::new(s) else {
        return Err(Error::new(Code::MISUSE, "string contains internal null"));
    };

    Ok(string)
}

/// Convert a filesystem path to a c-string.
///
/// The engine expects UTF-8 filenames on every platform, so paths which are
/// not valid UTF-8 are rejected.
#[cfg(feature = "std")]
pub(crate) fn path_to_cstring(p: &Path) -> Result<CString> {
    let Some(s) = p.to_str() else {
        return Err(Error::new(Code::MISUSE, "path is not valid utf-8"));
    };

    str_to_cstring(s)
}

/// Copy UTF-16 code units into a nul-terminated buffer.
///
/// A terminator already present at the end is kept as is, one in any other
/// position is rejected.
pub(crate) fn wide_to_terminated(wide: &[u16]) -> Result<Vec<u16>> {
    let wide = wide.strip_suffix(&[0]).unwrap_or(wide);

    if wide.contains(&0) {
        return Err(Error::new(
            Code::MISUSE,
            "wide string contains internal null",
        ));
    }

    let mut buf = Vec::with_capacity(wide.len() + 1);
    buf.extend_from_slice(wide);
    buf.push(0);
    Ok(buf)
}
