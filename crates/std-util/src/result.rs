#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Err`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            actual => panic!("expected `Ok`; actual={:?}", actual),
        }
    };
}

/// Asserts that `$e` fails with an error reporting `is_configuration()`, and
/// returns the error.
#[macro_export]
macro_rules! assert_configuration_err {
    ($e:expr) => {{
        let err = $crate::assert_err!($e);
        assert!(
            err.is_configuration(),
            "expected a configuration error; actual={err}"
        );
        err
    }};
}

/// Asserts that `$e` fails with an error reporting `is_persistence()`, and
/// returns the error.
#[macro_export]
macro_rules! assert_persistence_err {
    ($e:expr) => {{
        let err = $crate::assert_err!($e);
        assert!(
            err.is_persistence(),
            "expected a persistence error; actual={err}"
        );
        err
    }};
}
