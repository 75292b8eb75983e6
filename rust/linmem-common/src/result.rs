pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

/// Checks a requested logical size against the fixed maximum of a linear memory.
#[inline]
pub fn verify_request(requested: usize, max: usize) -> Result<()> {
    if requested <= max {
        Ok(())
    } else {
        invalid_request(requested, max)
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidArgument {
        name: name.to_string(),
        message: condition.to_string(),
    }
    .into())
}

#[cold]
pub fn invalid_request(requested: usize, max: usize) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidRequest { requested, max }.into())
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    fn check_positive(value: i64) -> super::Result<i64> {
        verify_arg!(value, value > 0);
        Ok(value)
    }

    #[test]
    fn test_verify_arg_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);
        let err = check_positive(-1).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, message } => {
                assert_eq!(name, "value");
                assert_eq!(message, "value > 0");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_verify_request() {
        assert!(super::verify_request(0, 0).is_ok());
        assert!(super::verify_request(20, 20).is_ok());
        let err = super::verify_request(21, 20).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidRequest {
                requested: 21,
                max: 20
            }
        ));
        assert!(err.is_invalid_request());
    }
}
