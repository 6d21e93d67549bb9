//! Engine-managed copies of bound text.
//!
//! Text bound by value is copied into a buffer whose ownership is handed to
//! the engine together with [`dealloc`], which the engine calls once it no
//! longer needs the data.

use core::alloc::Layout;
use core::ffi::{c_int, c_void};
use core::mem::{align_of, size_of};
use core::ptr::dangling_mut;
use core::slice;

use crate::error::{Code, Error, Result};
use crate::ffi::Destructor;

#[cfg(test)]
mod tests;

pub(crate) extern "C" fn dealloc(p: *mut c_void) {
    // SAFETY: The data was allocated by `alloc` and abides by the same layout.
    unsafe {
        let p = p.cast::<u8>().wrapping_sub(size_of::<usize>());
        let len = p.cast::<usize>().read();

        let layout =
            Layout::from_size_align_unchecked(size_of::<usize>() + len, align_of::<usize>());

        alloc::alloc::dealloc(p.cast(), layout);
    }
}

/// Convert a byte length into the length argument of a binding call.
pub(crate) fn byte_len(len: usize) -> Result<c_int> {
    match c_int::try_from(len) {
        Ok(len) => Ok(len),
        Err(..) => Err(Error::from_code(Code::TOOBIG)),
    }
}

/// Copy `bytes` into a buffer which is released through the returned
/// destructor.
///
/// The buffer is aligned for `usize`, so it can hold UTF-16 data as well.
pub(crate) fn alloc(bytes: &[u8]) -> Result<(*mut c_void, c_int, Destructor)> {
    if bytes.is_empty() {
        // Empty values are never dereferenced, a dangling pointer which is
        // correctly aligned avoids the allocation.
        return Ok((dangling_mut(), 0, None));
    }

    let len = byte_len(bytes.len())?;

    let Ok(layout) = Layout::from_size_align(size_of::<usize>() + bytes.len(), align_of::<usize>())
    else {
        return Err(Error::from_code(Code::TOOBIG));
    };

    // SAFETY: The layout has a non-zero size and we write within it.
    unsafe {
        let ptr = alloc::alloc::alloc(layout);

        if ptr.is_null() {
            return Err(Error::from_code(Code::NOMEM));
        }

        ptr.cast::<usize>().write(bytes.len());
        let data = ptr.add(size_of::<usize>());
        data.copy_from_nonoverlapping(bytes.as_ptr(), bytes.len());
        Ok((data.cast(), len, Some(dealloc)))
    }
}

/// View UTF-16 code units as their native-endian bytes.
pub(crate) fn wide_as_bytes(wide: &[u16]) -> &[u8] {
    // SAFETY: Any initialized u16 is two initialized bytes.
    unsafe { slice::from_raw_parts(wide.as_ptr().cast(), size_of::<u16>() * wide.len()) }
}
