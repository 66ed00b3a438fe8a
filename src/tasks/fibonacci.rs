//! Naive Fibonacci computed off the async runtime

use anyhow::{bail, Context, Result};
use tokio::task::spawn_blocking;
use tracing::debug;

/// Largest input whose result still fits in a `u64`
pub const MAX_FIBONACCI_INPUT: u64 = 92;

/// Input used when none is given
pub const DEFAULT_FIBONACCI_INPUT: &str = "40";

/// Exponential-time recursive Fibonacci, slow on purpose
pub fn fibonacci(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}

/// Parse user input, falling back to 0 for anything that is not a number
pub fn parse_input(text: &str) -> u64 {
    text.trim()
        .parse::<i64>()
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// Run `fibonacci(n)` on the blocking pool so async workers stay responsive
pub async fn fibonacci_off_thread(n: u64) -> Result<u64> {
    if n > MAX_FIBONACCI_INPUT {
        bail!("fibonacci({}) does not fit in 64 bits, maximum input is {}", n, MAX_FIBONACCI_INPUT);
    }

    debug!("Computing fibonacci({}) on the blocking pool", n);
    spawn_blocking(move || fibonacci(n))
        .await
        .context("Fibonacci computation did not complete")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, value) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as u64), *value);
        }
    }

    #[test]
    fn parse_input_falls_back_to_zero() {
        assert_eq!(parse_input("40"), 40);
        assert_eq!(parse_input("  12 "), 12);
        assert_eq!(parse_input("forty"), 0);
        assert_eq!(parse_input(""), 0);
        assert_eq!(parse_input("-7"), 0);
    }

    #[tokio::test]
    async fn computes_off_thread() {
        assert_eq!(fibonacci_off_thread(30).await.unwrap(), 832_040);
    }

    #[tokio::test]
    async fn rejects_inputs_that_overflow() {
        let err = fibonacci_off_thread(93).await.unwrap_err();
        assert!(err.to_string().contains("maximum input is 92"));
    }
}
