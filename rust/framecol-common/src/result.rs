pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns `InvalidArgument` from the enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! verify_arg {
    ($name:ident, $cond:expr) => {
        if !$cond {
            return Err($crate::result::check_failed(
                $crate::result::Check::Argument,
                stringify!($name),
                stringify!($cond),
            ));
        }
    };
}

/// Returns `InvalidFormat` from the enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! verify_data {
    ($element:ident, $cond:expr) => {
        if !$cond {
            return Err($crate::result::check_failed(
                $crate::result::Check::Data,
                stringify!($element),
                stringify!($cond),
            ));
        }
    };
}

/// What a failed check was verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A caller-supplied argument.
    Argument,
    /// Frame contents.
    Data,
}

#[cold]
pub fn check_failed(check: Check, name: &str, condition: &str) -> crate::error::Error {
    let message = format!("expected {condition}");
    match check {
        Check::Argument => crate::error::Error::invalid_arg(name, message),
        Check::Data => crate::error::Error::malformed(name, message),
    }
}
