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

//! Malformed back-references and how they are reported.

use knot_core::error::Error;
use knot_core::{Knot, Shared};
use knot_derive::KnotObject;
use std::rc::Rc;

#[derive(KnotObject)]
struct Mixed {
    a: Shared<i32>,
    b: Rc<str>,
}

fn both_modes() -> [Knot; 2] {
    [Knot::dedup(), Knot::cycle_safe()]
}

fn decode_error<T: knot_core::Serializer>(knot: &Knot, bytes: &[u8]) -> Error {
    match knot.deserialize::<T>(bytes) {
        Ok(_) => panic!("decoding was expected to fail"),
        Err(err) => err,
    }
}

#[test]
fn test_reference_out_of_range() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    for knot in both_modes() {
        let err = decode_error::<Rc<str>>(&knot, &[19, 0x7F, 1, 0]);
        assert!(matches!(err, Error::InvalidRef(_)));
        assert!(err.is_protocol());
        assert!(!err.is_cycle());

        // one object decoded, reference to id 5
        let err = decode_error::<Vec<Shared<i32>>>(&knot, &[21, 2, 5, 2, 19, 0x7F, 1, 5]);
        assert!(matches!(err, Error::InvalidRef(_)));
    }
}

#[test]
fn test_reference_to_wrong_type() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    // field b points at the Shared<i32> decoded for field a
    let bytes = [15u8, 2, 5, 14, 19, 0x7F, 1, 0];
    for knot in both_modes() {
        let err = decode_error::<Mixed>(&knot, &bytes);
        assert!(matches!(err, Error::InvalidRef(_)), "{err}");
    }
}

#[test]
fn test_reference_where_value_expected() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let bytes = [21u8, 2, 5, 14, 19, 0x7F, 1, 0];
    for knot in both_modes() {
        let err = decode_error::<Vec<i32>>(&knot, &bytes);
        assert!(matches!(err, Error::InvalidRef(_)), "{err}");
    }
}

#[test]
fn test_payload_length_mismatch() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let bytes = [21u8, 2, 12, 1, b'x', 19, 0x7F, 2, 0];
    for knot in both_modes() {
        let err = decode_error::<Vec<Rc<str>>>(&knot, &bytes);
        assert!(matches!(err, Error::InvalidRef(_)), "{err}");
    }
}

#[test]
fn test_truncated_reference() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    for knot in both_modes() {
        let err = decode_error::<Rc<str>>(&knot, &[19, 0x7F, 1]);
        assert!(matches!(err, Error::BufferOutOfBound(..)), "{err}");
    }
}

#[test]
fn test_foreign_extension_goes_to_inner_serializer() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    // an extension record of another type is not a back-reference
    let err = decode_error::<Rc<str>>(&Knot::default(), &[19, 3, 1, 0]);
    assert!(matches!(err, Error::InvalidData(_)), "{err}");
    assert!(!err.is_protocol());
}

#[test]
fn test_valid_reference_resolves() {
    let bytes = [21u8, 2, 12, 1, b'x', 19, 0x7F, 1, 0];
    for knot in both_modes() {
        let decoded: Vec<Rc<str>> = knot.deserialize(&bytes).unwrap();
        assert!(Rc::ptr_eq(&decoded[0], &decoded[1]));
        assert_eq!(&*decoded[1], "x");
    }
}
