//! Logged-in user sessions from the utmpx database.

use std::ffi::c_char;

use parking_lot::Mutex;

use crate::core::host_metrics::UserSession;

// getutxent walks a process-global cursor
static UTMPX_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Convert a fixed-size, possibly unterminated C char field.
fn field_to_string(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn read_user_sessions() -> Vec<UserSession> {
    let _guard = UTMPX_LOCK.lock();
    let mut sessions = Vec::new();

    // SAFETY: setutxent/getutxent/endutxent are serialized by UTMPX_LOCK and the
    // returned record is copied out before the next getutxent call.
    unsafe {
        libc::setutxent();
        loop {
            let entry = libc::getutxent();
            if entry.is_null() {
                break;
            }
            let entry = &*entry;
            if entry.ut_type != libc::USER_PROCESS {
                continue;
            }

            sessions.push(UserSession {
                username: field_to_string(&entry.ut_user),
                terminal: non_empty(field_to_string(&entry.ut_line)),
                host: non_empty(field_to_string(&entry.ut_host)),
                started: entry.ut_tv.tv_sec.max(0) as u64,
            });
        }
        libc::endutxent();
    }

    sessions
}
