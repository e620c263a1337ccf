/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Green for a healthy rate, yellow below 75%, red below 50%.
pub fn color_for_rate(present: usize, total: usize) -> &'static str {
    if total == 0 {
        return GREY;
    }
    let pct = present * 100 / total;
    if pct >= 75 {
        GREEN
    } else if pct >= 50 {
        YELLOW
    } else {
        RED
    }
}
