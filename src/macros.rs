#[macro_export]
macro_rules! wrapper {
    // Single expression (like a function name or closure)
    ($f:expr) => {{
        $f()
    }};
    ($f:expr, $( $args:expr $(,)? )* ) => {{
        $f( $($args,)* )
    }};
}

/// Runs a fallible step, retrying on error according to a RetryPolicy.
///
/// The step is attempted at most `retries + 1` times with a fixed delay between attempts,
/// and the last result is returned.
#[macro_export]
macro_rules! retry {
    ($policy:expr, $step:expr, $( $args:expr$(,)? )+) => {{
        let policy: &$crate::config::RetryPolicy = &$policy;
        let mut attempt: u32 = 0;
        log::info!("step {} start", $step);
        loop {
            let err = match wrapper!($( $args, )*) {
                Ok(v) => break Ok(v),
                Err(e) => e,
            };
            if attempt >= policy.retries {
                log::error!("step {} failed after {} attempt(s): {}", $step, attempt + 1, err);
                break Err(err);
            }
            attempt += 1;
            log::warn!("step {} failed: {}, retry {} of {} in {}s", $step, err, attempt, policy.retries, policy.delay_secs);
            std::thread::sleep(policy.delay());
        }
    }};
}
