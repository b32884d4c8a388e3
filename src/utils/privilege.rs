//! Root check and privilege dropping.
//!
//! Only the GPIO access of the LED driver needs root. The daemon starts as
//! root, initializes storage and the driver, then switches to an
//! unprivileged user before serving the web interface.

use log::info;
use std::io::{self, Error, ErrorKind};
use std::ptr;
use uzers::switch::{set_both_gid, set_both_uid};
use uzers::{get_current_uid, get_user_by_name};

/// Fails unless the process is running as root.
pub fn check_root_privileges() -> Result<(), String> {
    if get_current_uid() != 0 {
        return Err("This program must be run as root (sudo) to access the GPIO pins".to_string());
    }
    info!("Running with root privileges");
    Ok(())
}

fn clear_supplementary_groups() -> io::Result<()> {
    if unsafe { libc::setgroups(0, ptr::null()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Switch to the daemon user (or nobody when no daemon user exists).
/// A no-op when privileges were already dropped elsewhere.
pub fn drop_privileges() -> Result<(), Error> {
    let current_uid = get_current_uid();
    if current_uid != 0 {
        info!(
            "Privileges already dropped by the led driver (current uid={})",
            current_uid
        );
        return Ok(());
    }

    let user = get_user_by_name("daemon")
        .or_else(|| get_user_by_name("nobody"))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                "Could not find daemon or nobody user for privilege dropping",
            )
        })?;

    let username = user.name().to_string_lossy().into_owned();
    let uid = user.uid();
    let gid = user.primary_group_id();

    info!(
        "Dropping privileges to user {} (uid={}, gid={}) after hardware initialization...",
        username, uid, gid
    );

    clear_supplementary_groups().map_err(|e| {
        Error::new(
            ErrorKind::PermissionDenied,
            format!("Failed to clear supplementary groups: {}", e),
        )
    })?;

    // GID first; setgid is no longer permitted once the UID is unprivileged
    set_both_gid(gid, gid).map_err(|e| {
        Error::new(
            ErrorKind::PermissionDenied,
            format!("Failed to set GID: {}", e),
        )
    })?;

    set_both_uid(uid, uid).map_err(|e| {
        Error::new(
            ErrorKind::PermissionDenied,
            format!("Failed to set UID: {}", e),
        )
    })?;

    if get_current_uid() == 0 {
        return Err(Error::new(
            ErrorKind::PermissionDenied,
            "Failed to drop privileges - still running as root!",
        ));
    }

    info!("Successfully dropped privileges to user {}", username);
    Ok(())
}
