//! C ABI for non-Rust front ends.
//!
//! This module exposes the store through C-compatible functions. Records and
//! results cross the boundary as JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `contacts_*` functions are allocated by Rust
//! - Caller must free them with `contacts_string_free`
//! - Store pointers must be freed with `contacts_store_free`
//!
//! # Error Handling
//!
//! Functions returning strings produce JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure
//!
//! # Wire Codes
//!
//! Backends: 1 = array, 2 = linked list. Fields: 1 = name, 2 = phone,
//! 3 = email.

use crate::{
    validate, BackendKind, Field, MatchMode, Store, StoreConfig, FIELD_CAPACITY,
};
use serde::Serialize;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

const NUL_ERROR: &str = r#"{"error":"string contained null bytes"}"#;

/// Result wrapper for FFI responses.
#[derive(Serialize)]
#[serde(untagged)]
enum FfiResult<T: Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

impl FfiResult<()> {
    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }
}

/// Encode an engine result as an envelope string.
fn respond<T: Serialize>(result: crate::Result<T>) -> *mut c_char {
    match result {
        Ok(value) => to_c_string(FfiResult::ok(value).to_json()),
        Err(e) => error_string(e.to_string()),
    }
}

fn error_string(message: impl Into<String>) -> *mut c_char {
    to_c_string(FfiResult::err(message).to_json())
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `contacts_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => CString::new(NUL_ERROR).map_or(ptr::null_mut(), CString::into_raw),
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

// ============================================================================
// Store Lifecycle
// ============================================================================

/// Create an empty store.
///
/// # Returns
/// Pointer to Store, or null for an unknown backend code.
///
/// # Safety
/// - Caller must free the returned pointer with `contacts_store_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_new(backend: i32) -> *mut Store {
    match BackendKind::from_code(backend) {
        Ok(kind) => Box::into_raw(Box::new(Store::new(kind))),
        Err(_) => ptr::null_mut(),
    }
}

/// Create an empty store with a JSON `StoreConfig`.
///
/// Missing config keys take their defaults.
///
/// # Returns
/// Pointer to Store, or null on a bad backend code or config.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string or null
/// - Caller must free the returned pointer with `contacts_store_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_new_with_config(
    backend: i32,
    config_json: *const c_char,
) -> *mut Store {
    let kind = match BackendKind::from_code(backend) {
        Ok(k) => k,
        Err(_) => return ptr::null_mut(),
    };

    let config_str = match from_c_string(config_json) {
        Some(s) => s,
        None => return ptr::null_mut(),
    };

    let config: StoreConfig = match serde_json::from_str(&config_str) {
        Ok(c) => c,
        Err(_) => return ptr::null_mut(),
    };

    Box::into_raw(Box::new(Store::with_config(kind, config)))
}

/// Free a store.
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn contacts_store_free(store: *mut Store) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `contacts_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn contacts_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Load contacts from a CSV file, replacing the current contents.
///
/// # Returns
/// JSON string: `{"ok": {"loaded": n, "skipped": n}}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - `path` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_initialize(
    store: *mut Store,
    path: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let path_str = match from_c_string(path) {
        Some(s) => s,
        None => return error_string("invalid path"),
    };

    respond(store.initialize(path_str))
}

/// Drop every record and release backing storage. Safe to repeat.
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
#[no_mangle]
pub unsafe extern "C" fn contacts_store_cleanup(store: *mut Store) {
    if let Some(s) = store.as_mut() {
        s.cleanup();
    }
}

/// Write every contact to a CSV file.
///
/// # Returns
/// JSON string: `{"ok": rows_written}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - `path` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_save(
    store: *const Store,
    path: *const c_char,
) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let path_str = match from_c_string(path) {
        Some(s) => s,
        None => return error_string("invalid path"),
    };

    respond(store.save(path_str))
}

// ============================================================================
// Store Operations
// ============================================================================

/// Validate and append a contact.
///
/// # Returns
/// JSON string: `{"ok": Change}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - `name`, `phone` and `email` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_add(
    store: *mut Store,
    name: *const c_char,
    phone: *const c_char,
    email: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let (name, phone, email) = match (
        from_c_string(name),
        from_c_string(phone),
        from_c_string(email),
    ) {
        (Some(n), Some(p), Some(e)) => (n, p, e),
        _ => return error_string("invalid contact fields"),
    };

    respond(store.add(&name, &phone, &email))
}

/// Overwrite the first contact whose email is `old_email`.
///
/// # Returns
/// JSON string: `{"ok": Change}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - all string arguments must be valid null-terminated C strings or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_edit(
    store: *mut Store,
    old_email: *const c_char,
    name: *const c_char,
    phone: *const c_char,
    email: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let old_email = match from_c_string(old_email) {
        Some(s) => s,
        None => return error_string("invalid email"),
    };

    let (name, phone, email) = match (
        from_c_string(name),
        from_c_string(phone),
        from_c_string(email),
    ) {
        (Some(n), Some(p), Some(e)) => (n, p, e),
        _ => return error_string("invalid contact fields"),
    };

    respond(store.edit(&old_email, &name, &phone, &email))
}

/// Get every contact in storage order.
///
/// # Returns
/// JSON string: `{"ok": [ContactRecord, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_get_all(store: *const Store) -> *mut c_char {
    match store.as_ref() {
        Some(s) => respond(Ok(s.get_all())),
        None => error_string("null store pointer"),
    }
}

/// Search one field.
///
/// # Arguments
/// - `field`: field wire code
/// - `exact`: 0 for case-insensitive substring, non-zero for exact match
///
/// # Returns
/// JSON string: `{"ok": [ContactRecord, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - `query` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_search(
    store: *const Store,
    query: *const c_char,
    field: i32,
    exact: i32,
) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let query_str = match from_c_string(query) {
        Some(s) => s,
        None => return error_string("invalid query"),
    };

    let mode = if exact != 0 {
        MatchMode::Exact
    } else {
        MatchMode::Substring
    };

    respond(Field::from_code(field).map(|f| store.search_with(&query_str, f, mode)))
}

/// Remove the first contact with this email.
///
/// # Returns
/// JSON string: `{"ok": true}` when removed, `{"ok": false}` when absent
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - `email` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_delete_by_email(
    store: *mut Store,
    email: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    let email_str = match from_c_string(email) {
        Some(s) => s,
        None => return error_string("invalid email"),
    };

    respond(Ok(store.delete_by_email(&email_str)))
}

/// Remove every contact.
///
/// # Returns
/// JSON string: `{"ok": null}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_delete_all(store: *mut Store) -> *mut c_char {
    match store.as_mut() {
        Some(s) => respond(s.delete_all()),
        None => error_string("null store pointer"),
    }
}

/// Sort ascending by a field.
///
/// # Returns
/// JSON string: `{"ok": null}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
/// - Caller must free the returned string with `contacts_string_free`
#[no_mangle]
pub unsafe extern "C" fn contacts_store_sort(store: *mut Store, field: i32) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_string("null store pointer"),
    };

    respond(Field::from_code(field).and_then(|f| store.sort(f)))
}

/// Get the number of contacts, or -1 for a null store.
///
/// # Safety
/// - `store` must be a valid pointer from `contacts_store_new*` or null
#[no_mangle]
pub unsafe extern "C" fn contacts_store_count(store: *const Store) -> i64 {
    match store.as_ref() {
        Some(s) => s.len() as i64,
        None => -1,
    }
}

// ============================================================================
// Validation
// ============================================================================

unsafe fn check(value: *const c_char, predicate: fn(&str) -> bool) -> i32 {
    match from_c_string(value) {
        Some(s) => predicate(&s) as i32,
        None => 0,
    }
}

/// 1 if `name` is a valid contact name, else 0.
///
/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn contacts_is_valid_name(name: *const c_char) -> i32 {
    check(name, validate::is_valid_name)
}

/// 1 if `number` is a valid phone number, else 0.
///
/// # Safety
/// - `number` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn contacts_is_valid_number(number: *const c_char) -> i32 {
    check(number, validate::is_valid_number)
}

/// 1 if `email` is a valid email address, else 0.
///
/// # Safety
/// - `email` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn contacts_is_valid_email(email: *const c_char) -> i32 {
    check(email, validate::is_valid_email)
}

// ============================================================================
// Version Info
// ============================================================================

/// Get the engine version.
///
/// Returns a static string, do not free.
#[no_mangle]
pub extern "C" fn contacts_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the default field capacity in bytes, terminator included.
#[no_mangle]
pub extern "C" fn contacts_field_capacity() -> u32 {
    FIELD_CAPACITY as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_json(s: *mut c_char) -> serde_json::Value {
        let json = CStr::from_ptr(s).to_str().unwrap().to_string();
        contacts_string_free(s);
        serde_json::from_str(&json).unwrap()
    }

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn add(store: *mut Store, name: &str, phone: &str, email: &str) -> serde_json::Value {
        let (n, p, e) = (cstr(name), cstr(phone), cstr(email));
        take_json(contacts_store_add(store, n.as_ptr(), p.as_ptr(), e.as_ptr()))
    }

    #[test]
    fn ffi_store_lifecycle() {
        unsafe {
            for code in [1, 2] {
                let store = contacts_store_new(code);
                assert!(!store.is_null());
                assert_eq!(contacts_store_count(store), 0);
                contacts_store_cleanup(store);
                contacts_store_free(store);
            }
            assert!(contacts_store_new(3).is_null());
        }
    }

    #[test]
    fn ffi_store_new_with_config() {
        unsafe {
            let config = cstr(r#"{"uniqueEmails": true}"#);
            let store = contacts_store_new_with_config(2, config.as_ptr());
            assert!(!store.is_null());

            add(store, "Ann", "1234567890", "ann@x.com");
            let dup = add(store, "Bob", "1234567890", "ann@x.com");
            assert!(dup["error"].as_str().unwrap().contains("already exists"));
            contacts_store_free(store);

            let bad = cstr("not json");
            assert!(contacts_store_new_with_config(1, bad.as_ptr()).is_null());
        }
    }

    #[test]
    fn ffi_add_edit_get_all() {
        unsafe {
            let store = contacts_store_new(1);

            let added = add(store, "Ann Lee", "1234567890", "ann@x.com");
            assert_eq!(added["ok"]["kind"], "added");
            assert_eq!(added["ok"]["record"]["name"], "Ann Lee");

            let invalid = add(store, "Ann", "123", "ann@x.com");
            assert!(invalid["error"].as_str().unwrap().contains("phone"));

            let (old, n, p, e) = (
                cstr("ann@x.com"),
                cstr("Ann Park"),
                cstr("1112223333"),
                cstr("ann@p.com"),
            );
            let edited = take_json(contacts_store_edit(
                store,
                old.as_ptr(),
                n.as_ptr(),
                p.as_ptr(),
                e.as_ptr(),
            ));
            assert_eq!(edited["ok"]["kind"], "updated");

            let all = take_json(contacts_store_get_all(store));
            assert_eq!(all["ok"].as_array().unwrap().len(), 1);
            assert_eq!(all["ok"][0]["email"], "ann@p.com");

            contacts_store_free(store);
        }
    }

    #[test]
    fn ffi_search_and_sort() {
        unsafe {
            let store = contacts_store_new(2);
            add(store, "Bo Kim", "9876543210", "bo@y.org");
            add(store, "Ann Lee", "1234567890", "ann@x.com");

            let query = cstr("ANN");
            let found = take_json(contacts_store_search(store, query.as_ptr(), 1, 0));
            assert_eq!(found["ok"].as_array().unwrap().len(), 1);

            let found = take_json(contacts_store_search(store, query.as_ptr(), 1, 1));
            assert!(found["ok"].as_array().unwrap().is_empty());

            let bad_field = take_json(contacts_store_search(store, query.as_ptr(), 9, 0));
            assert!(bad_field["error"].as_str().unwrap().contains("field"));

            let sorted = take_json(contacts_store_sort(store, 1));
            assert!(sorted["ok"].is_null());
            let all = take_json(contacts_store_get_all(store));
            assert_eq!(all["ok"][0]["name"], "Ann Lee");

            contacts_store_free(store);
        }
    }

    #[test]
    fn ffi_delete() {
        unsafe {
            let store = contacts_store_new(1);
            add(store, "Ann", "1234567890", "ann@x.com");
            add(store, "Bob", "1234567890", "bob@x.com");

            let email = cstr("ann@x.com");
            let removed = take_json(contacts_store_delete_by_email(store, email.as_ptr()));
            assert_eq!(removed["ok"], true);
            let removed = take_json(contacts_store_delete_by_email(store, email.as_ptr()));
            assert_eq!(removed["ok"], false);
            assert_eq!(contacts_store_count(store), 1);

            take_json(contacts_store_delete_all(store));
            assert_eq!(contacts_store_count(store), 0);

            contacts_store_free(store);
        }
    }

    #[test]
    fn ffi_save_and_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = cstr(dir.path().join("c.csv").to_str().unwrap());

        unsafe {
            let store = contacts_store_new(1);
            add(store, "Ann", "1234567890", "ann@x.com");
            let saved = take_json(contacts_store_save(store, path.as_ptr()));
            assert_eq!(saved["ok"], 1);
            contacts_store_free(store);

            let store = contacts_store_new(2);
            let loaded = take_json(contacts_store_initialize(store, path.as_ptr()));
            assert_eq!(loaded["ok"]["loaded"], 1);
            assert_eq!(loaded["ok"]["skipped"], 0);
            assert_eq!(contacts_store_count(store), 1);
            contacts_store_free(store);
        }
    }

    #[test]
    fn ffi_validators() {
        unsafe {
            let name = cstr("Ann Lee");
            let number = cstr("1234567890");
            let email = cstr("ann@x.com");
            let bad = cstr("not valid 1");

            assert_eq!(contacts_is_valid_name(name.as_ptr()), 1);
            assert_eq!(contacts_is_valid_number(number.as_ptr()), 1);
            assert_eq!(contacts_is_valid_email(email.as_ptr()), 1);
            assert_eq!(contacts_is_valid_name(bad.as_ptr()), 0);
            assert_eq!(contacts_is_valid_number(bad.as_ptr()), 0);
            assert_eq!(contacts_is_valid_email(bad.as_ptr()), 0);
            assert_eq!(contacts_is_valid_email(ptr::null()), 0);
        }
    }

    #[test]
    fn ffi_version() {
        unsafe {
            let version = contacts_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
        assert_eq!(contacts_field_capacity(), 50);
    }

    #[test]
    fn ffi_error_handling() {
        unsafe {
            // Null store pointer
            let result = take_json(contacts_store_get_all(ptr::null()));
            assert!(result["error"].is_string());
            assert_eq!(contacts_store_count(ptr::null()), -1);
            contacts_store_cleanup(ptr::null_mut());

            // Null string argument
            let store = contacts_store_new(1);
            let result = take_json(contacts_store_save(store, ptr::null()));
            assert_eq!(result["error"], "invalid path");

            let edit = take_json(contacts_store_edit(
                store,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
            ));
            assert!(edit["error"].is_string());

            contacts_store_free(store);
        }
    }
}
