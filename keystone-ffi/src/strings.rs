/// C-string marshalling and the transfer buffer registry
///
/// Buffers are allocated with `CString::into_raw` and handed to the caller;
/// the caller returns ownership through `keystone_string_free`. Every issued
/// pointer is recorded in a process-wide registry so release is exactly-once
/// by construction: freeing NULL, an unknown pointer, or an already-released
/// pointer is a logged no-op rather than undefined behavior.
use crate::envelope::FALLBACK_ENVELOPE;
use libc::c_char;
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::warn;

use keystone_core::error::CoreError;

static ISSUED: OnceLock<Mutex<HashSet<usize>>> = OnceLock::new();

fn registry() -> MutexGuard<'static, HashSet<usize>> {
    let lock = ISSUED.get_or_init(|| Mutex::new(HashSet::new()));
    match lock.lock() {
        Ok(guard) => guard,
        // A panic while holding the lock cannot corrupt a HashSet of
        // integers; keep serving.
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Converts a payload into an owned C string and records the pointer
///
/// JSON escapes control characters, so a payload with an interior NUL means
/// a bug upstream; it degrades to the fallback envelope instead of
/// panicking.
pub(crate) fn issue(payload: String) -> *mut c_char {
    let cstring = CString::new(payload).unwrap_or_else(|_| {
        warn!("Envelope contained an interior NUL; returning fallback envelope");
        CString::new(FALLBACK_ENVELOPE).expect("fallback envelope contains no NUL")
    });

    let ptr = cstring.into_raw();
    registry().insert(ptr as usize);
    ptr
}

/// Reads a required, caller-supplied C string argument
///
/// # Safety
///
/// `ptr` must be NULL or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn required_str<'a>(ptr: *const c_char, field: &str) -> Result<&'a str, CoreError> {
    if ptr.is_null() {
        return Err(CoreError::InvalidInput(format!("{} must not be null", field)));
    }

    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| CoreError::InvalidInput(format!("{} is not valid UTF-8", field)))
}

/// Number of buffers currently issued and not yet released
///
/// Exposed for tests that assert the registry drains.
#[doc(hidden)]
pub fn issued_buffer_count() -> usize {
    registry().len()
}

/// Releases a buffer previously returned by this library
///
/// Exactly-once semantics: NULL, unknown, and already-released pointers are
/// logged no-ops.
///
/// # Safety
///
/// `ptr` must be NULL or a pointer previously returned by one of the
/// envelope-producing operations. The caller must not use the buffer after
/// this call.
#[no_mangle]
pub unsafe extern "C" fn keystone_string_free(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }

    {
        let mut issued = registry();
        if !issued.remove(&(ptr as usize)) {
            warn!("keystone_string_free: pointer was not issued or already released; ignoring");
            return;
        }
    }

    // Ownership returns to Rust; dropping the CString frees the buffer.
    let _ = CString::from_raw(ptr);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The registry is process-wide, so count assertions live in a single
    // test; splitting them would let parallel tests interleave.
    #[test]
    fn test_issue_free_lifecycle() {
        let before = issued_buffer_count();

        let ptr = issue(r#"{"status":"ok","data":null}"#.to_string());
        assert!(!ptr.is_null());
        assert_eq!(issued_buffer_count(), before + 1);

        let text = unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .expect("Issued buffer should be UTF-8");
        assert_eq!(text, r#"{"status":"ok","data":null}"#);

        unsafe { keystone_string_free(ptr) };
        assert_eq!(issued_buffer_count(), before);

        // Second release must not crash or free foreign memory.
        unsafe { keystone_string_free(ptr) };
        assert_eq!(issued_buffer_count(), before);

        // NULL and never-issued pointers are no-ops too.
        unsafe { keystone_string_free(std::ptr::null_mut()) };
        let mut local = 0u8;
        unsafe { keystone_string_free(&mut local as *mut u8 as *mut c_char) };
        assert_eq!(issued_buffer_count(), before);
    }

    #[test]
    fn test_required_str_rejects_null() {
        let err = unsafe { required_str(std::ptr::null(), "email") }.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_required_str_reads_utf8() {
        let c = CString::new("user@example.com").expect("no interior NUL");
        let s = unsafe { required_str(c.as_ptr(), "email") }.expect("Should read");
        assert_eq!(s, "user@example.com");
    }

    #[test]
    fn test_required_str_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0xff, 0xfe, 0x00];
        let err =
            unsafe { required_str(bytes.as_ptr() as *const c_char, "email") }.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }
}
