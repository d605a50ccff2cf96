/// Exported C operations
///
/// Each operation validates its raw arguments, runs the corresponding core
/// service on the shared runtime, and returns an owned JSON envelope. A
/// panic anywhere below is caught here and converted into an `internal`
/// error envelope; nothing ever unwinds across the ABI and no call returns
/// NULL.
use crate::{envelope, runtime, strings};
use keystone_core::error::{CoreError, CoreResult};
use keystone_core::service::accounts::{self, CreateUserRequest};
use keystone_core::service::sessions::{self, LoginRequest};
use libc::c_char;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error};

/// Runs an operation body under `catch_unwind` and envelopes the outcome
fn ffi_call<T, F>(name: &str, body: F) -> *mut c_char
where
    T: Serialize,
    F: FnOnce() -> CoreResult<T>,
{
    let payload = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(data)) => envelope::success(data),
        Ok(Err(err)) => {
            debug!(call = name, kind = err.kind(), "Returning error envelope");
            envelope::failure(&err)
        }
        Err(_) => {
            error!(call = name, "Panic caught at the FFI boundary");
            envelope::failure(&CoreError::Internal(
                "Unexpected fault in native call".to_string(),
            ))
        }
    };

    strings::issue(payload)
}

/// Initializes the process-wide connection pool
///
/// Must be called once before any other operation. The call surface gives
/// this function no return value; a failed initialization is logged at
/// error level and observed by the caller through `storage_unavailable`
/// envelopes from every subsequent operation.
///
/// # Safety
///
/// `db_path` must be NULL or a NUL-terminated string valid for the duration
/// of the call.
#[no_mangle]
pub unsafe extern "C" fn keystone_init_pool(db_path: *const c_char) {
    runtime::init_tracing();

    let result = catch_unwind(AssertUnwindSafe(|| -> CoreResult<()> {
        let path = strings::required_str(db_path, "db_path")?;
        if path.is_empty() {
            return Err(CoreError::InvalidInput(
                "db_path must not be empty".to_string(),
            ));
        }

        runtime::initialize(path)
    }));

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!(
            error = %err,
            "keystone_init_pool failed; subsequent operations will report storage_unavailable"
        ),
        Err(_) => error!("keystone_init_pool panicked"),
    }
}

/// Creates a user and returns its profile envelope
///
/// An empty `user_id` requests a generated identifier; an empty `role`
/// defaults to "member". The password crosses the boundary in plaintext and
/// is hashed before it reaches storage; it is never part of any envelope.
///
/// # Safety
///
/// Every argument must be NULL or a NUL-terminated string valid for the
/// duration of the call. The returned buffer must be released exactly once
/// with `keystone_string_free`.
#[no_mangle]
pub unsafe extern "C" fn keystone_create_user(
    user_id: *const c_char,
    email: *const c_char,
    password: *const c_char,
    role: *const c_char,
) -> *mut c_char {
    let request = (|| -> CoreResult<CreateUserRequest> {
        Ok(CreateUserRequest {
            identifier: strings::required_str(user_id, "user_id")?.to_string(),
            email: strings::required_str(email, "email")?.to_string(),
            password: strings::required_str(password, "password")?.to_string(),
            role: strings::required_str(role, "role")?.to_string(),
        })
    })();

    ffi_call("keystone_create_user", || {
        let request = request?;
        let pool = runtime::pool()?;
        let profile = runtime::block_on(accounts::create_user(&pool, request))??;
        Ok(profile)
    })
}

/// Looks up a user by identifier and returns its profile envelope
///
/// # Safety
///
/// `user_id` must be NULL or a NUL-terminated string valid for the duration
/// of the call. The returned buffer must be released exactly once with
/// `keystone_string_free`.
#[no_mangle]
pub unsafe extern "C" fn keystone_get_user_by_id(user_id: *const c_char) -> *mut c_char {
    let identifier = (|| -> CoreResult<String> {
        Ok(strings::required_str(user_id, "user_id")?.to_string())
    })();

    ffi_call("keystone_get_user_by_id", || {
        let identifier = identifier?;
        let pool = runtime::pool()?;
        let profile = runtime::block_on(accounts::get_user(&pool, &identifier))??;
        Ok(profile)
    })
}

/// Verifies credentials and returns the authenticated identity envelope
///
/// Unknown email and wrong password produce byte-identical error envelopes.
///
/// # Safety
///
/// Both arguments must be NULL or NUL-terminated strings valid for the
/// duration of the call. The returned buffer must be released exactly once
/// with `keystone_string_free`.
#[no_mangle]
pub unsafe extern "C" fn keystone_login(
    email: *const c_char,
    password: *const c_char,
) -> *mut c_char {
    let request = (|| -> CoreResult<LoginRequest> {
        Ok(LoginRequest {
            email: strings::required_str(email, "email")?.to_string(),
            password: strings::required_str(password, "password")?.to_string(),
        })
    })();

    ffi_call("keystone_login", || {
        let request = request?;
        let pool = runtime::pool()?;
        let identity = runtime::block_on(sessions::login(&pool, request))??;
        Ok(identity)
    })
}
