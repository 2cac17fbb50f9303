//! Best-effort resident set size sampling.

/// Resident set size in MB from `/proc/self/statm`; 0.0 whenever the value
/// cannot be read.
#[cfg(target_os = "linux")]
pub fn rss_mb() -> f64 {
    let Ok(statm) = std::fs::read_to_string("/proc/self/statm") else {
        return 0.0;
    };
    // Format: size resident shared text lib data dt
    let Some(resident) = statm
        .split_whitespace()
        .nth(1)
        .and_then(|field| field.parse::<u64>().ok())
    else {
        return 0.0;
    };
    // SAFETY: sysconf is a plain libc query with no preconditions.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return 0.0;
    }
    resident as f64 * page_size as f64 / (1024.0 * 1024.0)
}

/// Unsupported platform: report 0.0 per the reliability taxonomy.
#[cfg(not(target_os = "linux"))]
pub fn rss_mb() -> f64 {
    0.0
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn rss_is_positive_on_linux() {
        assert!(rss_mb() > 0.0);
    }
}
