pub mod range;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took at the given level (default
/// [log::Level::Debug]), and evaluates to the value of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Integer modulo that always returns a value in `[0, modulus)`, even for
/// negative inputs. Tile positions are signed, so the seeding functions need
/// this to stay in range when handed out-of-grid coordinates.
pub fn modulo(value: i64, modulus: i64) -> i64 {
    value.rem_euclid(modulus)
}
