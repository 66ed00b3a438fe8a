//! Display formatting for timer and Fibonacci output

use crate::state::TimerState;

/// Progress at or below which a run is shown as running low
pub const LOW_PROGRESS: f32 = 0.1;

const BAR_WIDTH: usize = 20;

/// Format milliseconds as zero-padded `HH:MM:SS`; hours are not wrapped
pub fn format_hms(remaining_ms: u64) -> String {
    let hours = remaining_ms / 3_600_000;
    let minutes = (remaining_ms / 60_000) % 60;
    let seconds = (remaining_ms / 1000) % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Fraction of `total_ms` still remaining, 0.0 when `total_ms` is zero
pub fn progress(remaining_ms: u64, total_ms: u64) -> f32 {
    if total_ms == 0 {
        0.0
    } else {
        (remaining_ms as f64 / total_ms as f64) as f32
    }
}

/// Whether a run at `progress` should be shown as running low
pub fn is_low(progress: f32) -> bool {
    progress <= LOW_PROGRESS
}

/// Group digits in threes with commas: `1234567` -> `"1,234,567"`
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// One-line rendering of a timer state for the terminal
pub fn render_line(state: &TimerState) -> String {
    let progress = state.progress();
    let filled = ((progress * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    let marker = if state.is_running && is_low(progress) { " !" } else { "" };

    format!(
        "{} [{}{}] {:>3}%{}",
        format_hms(state.remaining_ms),
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        (progress * 100.0).round() as u32,
        marker,
    )
}
