// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! # PERFORMANCE CRITICAL MODULE
//!
//! Error constructors sit on every buffer read and every reference lookup.
//! They are `#[cold]` so the success path stays tight; keep the attributes
//! when adding new constructors.

use std::borrow::Cow;

use thiserror::Error;

/// Set `KNOT_PANIC_ON_ERROR=1` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("KNOT_PANIC_ON_ERROR").is_some();

/// Check if KNOT_PANIC_ON_ERROR environment variable is set.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for knot serialization and deserialization.
///
/// Always build errors through the constructor functions ([`Error::invalid_ref`],
/// [`Error::cyclic_reference`], ...) rather than the variants, so that
/// `KNOT_PANIC_ON_ERROR` can report the exact creation site:
///
/// ```bash
/// RUST_BACKTRACE=1 KNOT_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// Errors fall in three families:
///
/// - protocol errors ([`Error::InvalidRef`], [`Error::PendingRef`]): a
///   back-reference that cannot be honored;
/// - cycle rejection ([`Error::CyclicReference`]): the dedup-only codec met an
///   object graph with a true cycle while encoding;
/// - inner format errors (everything else): the byte stream itself is corrupt.
///
/// Use [`Error::is_cycle`] to tell a graph that needs the cycle-safe codec apart
/// from a corrupt stream.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Wire header differs from the one the static type expects.
    #[error("Type mismatch: expected = {0}, actual = {1}")]
    TypeMismatch(u8, u8),

    #[error("Buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Back-reference id out of range, or pointing at a value of another type.
    #[error("{0}")]
    InvalidRef(Cow<'static, str>),

    /// Back-reference to an object whose decode has not finished yet.
    #[error("{0}")]
    PendingRef(Cow<'static, str>),

    /// True cycle met by the dedup-only encoder.
    #[error("{0}")]
    CyclicReference(Cow<'static, str>),

    /// A declared length disagrees with the data or with its stride.
    #[error("{0}")]
    MalformedLength(Cow<'static, str>),

    #[error("{0}")]
    EncodingError(Cow<'static, str>),

    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    #[error("{0}")]
    Unknown(Cow<'static, str>),
}

macro_rules! cow_constructor {
    ($(#[$doc:meta])* $fn_name:ident => $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $fn_name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("KNOT_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch(expected: u8, actual: u8) -> Self {
        let err = Error::TypeMismatch(expected, actual);
        if PANIC_ON_ERROR {
            panic!("KNOT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("KNOT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    cow_constructor!(
        /// Creates a new [`Error::InvalidData`].
        invalid_data => InvalidData
    );
    cow_constructor!(
        /// Creates a new [`Error::InvalidRef`].
        ///
        /// ```
        /// use knot_core::error::Error;
        ///
        /// let err = Error::invalid_ref(format!("Invalid ref id {}", 123));
        /// assert!(!err.is_cycle());
        /// ```
        invalid_ref => InvalidRef
    );
    cow_constructor!(
        /// Creates a new [`Error::PendingRef`].
        pending_ref => PendingRef
    );
    cow_constructor!(
        /// Creates a new [`Error::MalformedLength`].
        malformed_length => MalformedLength
    );
    cow_constructor!(
        /// Creates a new [`Error::EncodingError`].
        encoding_error => EncodingError
    );
    cow_constructor!(
        /// Creates a new [`Error::DepthExceed`].
        depth_exceed => DepthExceed
    );
    cow_constructor!(
        /// Creates a new [`Error::Unknown`].
        unknown => Unknown
    );

    /// Creates a new [`Error::CyclicReference`] naming the type whose
    /// instance was met again while still being encoded.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn cyclic_reference<T: ?Sized + 'static>() -> Self {
        let err = Error::CyclicReference(Cow::Owned(format!(
            "cyclical reference detected for type `{}`; \
             encode this graph with the cycle-safe codec",
            std::any::type_name::<T>()
        )));
        if PANIC_ON_ERROR {
            panic!("KNOT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// True when the failure comes from a cycle in the object graph rather
    /// than from a corrupt stream.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::CyclicReference(_) | Error::PendingRef(_))
    }

    /// True for back-reference protocol violations.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::InvalidRef(_) | Error::PendingRef(_))
    }

    /// Appends the type name to [`Error::InvalidData`] and
    /// [`Error::TypeMismatch`] errors, other errors pass through unchanged.
    #[inline(never)]
    pub fn enhance_type_error<T: ?Sized + 'static>(err: Error) -> Error {
        match err {
            Error::InvalidData(s) => {
                Error::invalid_data(format!("{s} (type: {})", std::any::type_name::<T>()))
            }
            Error::TypeMismatch(expected, actual) => Error::invalid_data(format!(
                "Type mismatch: expected = {expected}, actual = {actual} (type: {})",
                std::any::type_name::<T>()
            )),
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use knot_core::ensure;
/// use knot_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n < 10, Error::malformed_length(format!("length {} too large", n)));
///     Ok(())
/// }
/// assert!(check_len(3).is_ok());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::unknown($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)))
    };
}
