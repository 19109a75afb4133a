// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    MalformedNumber,
    UnexpectedToken,
    DivideByZero,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            MalformedNumber => "malformed_number",
            UnexpectedToken => "unexpected_token",
            DivideByZero => "divide_by_zero",
        };

        write!(f, "{name}")
    }
}

/// An error from one stage of the pipeline.  `start` and `end` are byte
/// offsets into the input expression; stages with no position information
/// (evaluation) use the 0..0 span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub start: u16,
    pub end: u16,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => {
                write!(f, "{}:{}:{} -- {}", self.start, self.end, self.code, details)
            }
            None => write!(f, "{}:{}:{}", self.start, self.end, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! lex_err(
    ($code:tt, $start:expr, $end:expr) => {{
        use $crate::common::{Error, ErrorCode};
        Err(Error {
            start: $start as u16,
            end: $end as u16,
            code: ErrorCode::$code,
            details: None,
        })
    }}
);

#[macro_export]
macro_rules! parse_err(
    ($code:tt, $start:expr, $end:expr, $str:expr) => {{
        use $crate::common::{Error, ErrorCode};
        Err(Error {
            start: $start as u16,
            end: $end as u16,
            code: ErrorCode::$code,
            details: Some($str),
        })
    }}
);

#[macro_export]
macro_rules! eval_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode};
        Err(Error {
            start: 0,
            end: 0,
            code: ErrorCode::$code,
            details: Some($str),
        })
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode};
        Err(Error {
            start: 0,
            end: 0,
            code: ErrorCode::$code,
            details: None,
        })
    }};
}

#[test]
fn test_error_display() {
    let err = Error {
        start: 2,
        end: 4,
        code: ErrorCode::MalformedNumber,
        details: None,
    };
    assert_eq!("2:4:malformed_number", format!("{err}"));

    let err = Error {
        start: 0,
        end: 1,
        code: ErrorCode::UnexpectedToken,
        details: Some("expected \")\", found \"+\"".to_string()),
    };
    assert_eq!(
        "0:1:unexpected_token -- expected \")\", found \"+\"",
        format!("{err}")
    );
}
