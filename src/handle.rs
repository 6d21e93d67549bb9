//! Move-only ownership of raw engine resources.

use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

use crate::ffi;


mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ConnectionKind {}
    impl Sealed for super::StatementKind {}
}

/// Describes a kind of raw resource which can be held by a [`UniqueHandle`].
///
/// This trait is sealed, the crate provides [`ConnectionKind`] and
/// [`StatementKind`].
pub trait Kind
where
    Self: self::sealed::Sealed,
{
    /// The raw value identifying a resource.
    type Raw: Copy + PartialEq;

    /// The sentinel value which does not identify a live resource.
    const INVALID: Self::Raw;

    /// Release the given resource.
    ///
    /// This must not fail loudly. Whatever the engine reports is at most
    /// logged.
    ///
    /// # Safety
    ///
    /// The caller must own `raw`, and must not use it after this call.
    #[doc(hidden)]
    unsafe fn close(raw: Self::Raw);
}

/// The resource kind of a database connection.
#[non_exhaustive]
pub struct ConnectionKind;

impl Kind for ConnectionKind {
    type Raw = *mut ffi::sqlite3;

    const INVALID: Self::Raw = ptr::null_mut();

    #[inline]
    unsafe fn close(raw: Self::Raw) {
        // Connections are closed with the v2 interface, which keeps the
        // database alive as a zombie until every statement is finalized.
        let code = unsafe { ffi::sqlite3_close_v2(raw) };

        if code != ffi::SQLITE_OK {
            tracing::warn!(code, "closing connection failed");
        } else {
            tracing::trace!("connection closed");
        }
    }
}

/// The resource kind of a prepared statement.
#[non_exhaustive]
pub struct StatementKind;

impl Kind for StatementKind {
    type Raw = *mut ffi::sqlite3_stmt;

    const INVALID: Self::Raw = ptr::null_mut();

    #[inline]
    unsafe fn close(raw: Self::Raw) {
        // The code returned here repeats the error of the most recent step,
        // the statement is finalized regardless.
        let code = unsafe { ffi::sqlite3_finalize(raw) };
        tracing::trace!(code, "statement finalized");
    }
}

/// A handle which uniquely owns one raw resource of kind `K`.
///
/// The handle is either *empty*, holding [`Kind::INVALID`], or *owning* a live
/// resource which is released exactly once: when the handle is dropped, or
/// when it is [`reset`] to something else. Ownership can only be moved, never
/// copied.
///
/// [`reset`]: Self::reset
pub struct UniqueHandle<K>
where
    K: Kind,
{
    raw: K::Raw,
    _kind: PhantomData<K>,
}

impl<K> UniqueHandle<K>
where
    K: Kind,
{
    /// Construct an empty handle.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            raw: K::INVALID,
            _kind: PhantomData,
        }
    }

    /// Take ownership of a raw resource.
    ///
    /// # Safety
    ///
    /// `raw` must either be the invalid sentinel, or a live resource of kind
    /// `K` which nothing else will release.
    #[inline]
    pub const unsafe fn from_raw(raw: K::Raw) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// Move ownership out of this handle into a new one, leaving this handle
    /// empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            raw: self.release(),
            _kind: PhantomData,
        }
    }

    /// Test if the handle currently owns a resource.
    #[inline]
    pub fn is_owning(&self) -> bool {
        self.raw != K::INVALID
    }

    /// Access the raw value without affecting ownership.
    #[inline]
    pub fn get(&self) -> K::Raw {
        self.raw
    }

    /// Get a location the engine can write a newly created resource into.
    ///
    /// Any resource currently owned is released first so that overwriting the
    /// location never leaks. Whatever is written through the pointer is owned
    /// by this handle afterwards.
    #[inline]
    pub fn out_ptr(&mut self) -> *mut K::Raw {
        self.clear();
        &mut self.raw
    }

    /// Give up ownership of the raw value, leaving the handle empty.
    ///
    /// The caller becomes responsible for releasing the returned resource.
    #[inline]
    #[must_use = "the released resource leaks unless it is closed or wrapped again"]
    pub fn release(&mut self) -> K::Raw {
        mem::replace(&mut self.raw, K::INVALID)
    }

    /// Replace the owned resource with `raw`, releasing the current one.
    ///
    /// Resetting to the value already held does nothing. Returns whether the
    /// handle owns a resource afterwards.
    ///
    /// # Safety
    ///
    /// Same as [`UniqueHandle::from_raw`].
    #[inline]
    pub unsafe fn reset(&mut self, raw: K::Raw) -> bool {
        if raw != self.raw {
            self.close();
            self.raw = raw;
        }

        self.is_owning()
    }

    /// Release the owned resource if any, leaving the handle empty.
    #[inline]
    pub fn clear(&mut self) {
        // SAFETY: The invalid sentinel is never released.
        unsafe {
            self.reset(K::INVALID);
        }
    }

    /// Exchange the resources held by two handles without releasing either.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.raw, &mut other.raw);
    }

    #[inline]
    fn close(&mut self) {
        if self.is_owning() {
            // SAFETY: The handle owns the resource and forgets it right after.
            unsafe { K::close(self.raw) };
        }
    }
}

impl<K> Default for UniqueHandle<K>
where
    K: Kind,
{
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> Drop for UniqueHandle<K>
where
    K: Kind,
{
    #[inline]
    fn drop(&mut self) {
        self.close();
    }
}

impl<K> fmt::Debug for UniqueHandle<K>
where
    K: Kind,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueHandle")
            .field("owning", &self.is_owning())
            .finish()
    }
}
