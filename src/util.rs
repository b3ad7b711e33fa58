/// Returns early with [`Error::InvalidParameter`](crate::error::Error::InvalidParameter)
/// if a numerical value is not in the interval `[a,b]`
///
/// ### Example
/// ```ignore
/// let value = 2.0;
/// ensure_interval!(value, 0.0, 1.0);
/// ```
/// This returns an error with the message "Invalid parameter \`value\`: must be in the interval \[0, 1\]".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::invalid_parameter(
                stringify!($var),
                format!("must be in the interval [{}, {}]", $a, $b),
            ));
        }
    };
}
