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

//! Tests for shared (but acyclic) reference handling

use knot_core::{shared, Knot, Shared};
use knot_derive::KnotObject;
use std::rc::Rc;

#[derive(KnotObject, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(KnotObject)]
struct Segment {
    from: Shared<Point>,
    to: Shared<Point>,
    label: String,
}

#[derive(KnotObject)]
struct Holder {
    left: Shared<Vec<i32>>,
    right: Shared<Vec<i32>>,
}

fn both_modes() -> [Knot; 2] {
    [Knot::dedup(), Knot::cycle_safe()]
}

#[test]
fn test_acyclic_round_trip() {
    for knot in both_modes() {
        let segment = Segment {
            from: shared(Point { x: 1, y: 2 }),
            to: shared(Point { x: -3, y: 4 }),
            label: "diagonal".to_string(),
        };
        let bytes = knot.serialize(&segment).unwrap();
        let decoded: Segment = knot.deserialize(&bytes).unwrap();
        assert_eq!(*decoded.from.borrow(), Point { x: 1, y: 2 });
        assert_eq!(*decoded.to.borrow(), Point { x: -3, y: 4 });
        assert_eq!(decoded.label, "diagonal");
        assert!(!Rc::ptr_eq(&decoded.from, &decoded.to));
    }
}

#[test]
fn test_shared_field_keeps_identity() {
    for knot in both_modes() {
        let point = shared(Point { x: 5, y: 6 });
        let segment = Segment {
            from: point.clone(),
            to: point,
            label: String::new(),
        };
        let bytes = knot.serialize(&segment).unwrap();
        let decoded: Segment = knot.deserialize(&bytes).unwrap();
        assert!(Rc::ptr_eq(&decoded.from, &decoded.to));

        // a write through one handle is visible through the other
        decoded.from.borrow_mut().x = 50;
        assert_eq!(decoded.to.borrow().x, 50);
    }
}

#[test]
fn test_shared_in_nested_vec() {
    for knot in both_modes() {
        let shared1 = shared(String::from("shared_1"));
        let shared2 = shared(String::from("shared_2"));
        let nested = vec![
            vec![shared1.clone(), shared2.clone()],
            vec![shared1.clone(), shared2.clone()],
            vec![shared1.clone()],
        ];

        let bytes = knot.serialize(&nested).unwrap();
        let decoded: Vec<Vec<Shared<String>>> = knot.deserialize(&bytes).unwrap();

        assert_eq!(decoded.len(), 3);
        assert!(Rc::ptr_eq(&decoded[0][0], &decoded[1][0]));
        assert!(Rc::ptr_eq(&decoded[0][0], &decoded[2][0]));
        assert!(Rc::ptr_eq(&decoded[0][1], &decoded[1][1]));
        assert!(!Rc::ptr_eq(&decoded[0][0], &decoded[0][1]));
        assert_eq!(*decoded[0][0].borrow(), "shared_1");
        assert_eq!(*decoded[0][1].borrow(), "shared_2");
    }
}

#[test]
fn test_equal_values_are_not_merged() {
    for knot in both_modes() {
        let holder = Holder {
            left: shared(vec![1, 2, 3]),
            right: shared(vec![1, 2, 3]),
        };
        let bytes = knot.serialize(&holder).unwrap();
        let decoded: Holder = knot.deserialize(&bytes).unwrap();
        assert!(!Rc::ptr_eq(&decoded.left, &decoded.right));
        assert_eq!(*decoded.left.borrow(), *decoded.right.borrow());
    }
}

#[test]
fn test_contents_encoded_once() {
    let knot = Knot::dedup();
    let payload: Vec<i32> = (0..64).collect();

    let one = shared(payload.clone());
    let repeated: Vec<Shared<Vec<i32>>> = (0..10).map(|_| one.clone()).collect();
    let distinct: Vec<Shared<Vec<i32>>> = (0..10).map(|_| shared(payload.clone())).collect();

    let repeated_bytes = knot.serialize(&repeated).unwrap();
    let distinct_bytes = knot.serialize(&distinct).unwrap();
    let single_bytes = knot.serialize(&one).unwrap();

    // one full copy, then 9 four-byte back-references
    assert_eq!(repeated_bytes.len(), 2 + single_bytes.len() + 9 * 4);
    assert_eq!(distinct_bytes.len(), 2 + 10 * single_bytes.len());
}

#[test]
fn test_back_reference_layout() {
    let knot = Knot::dedup();
    let a = shared(7i32);
    let bytes = knot.serialize(&vec![a.clone(), a]).unwrap();
    // LIST, 2 elements, VAR_INT32 7 (zigzag 14), EXT ref-ext len=1 id=0
    assert_eq!(bytes, vec![21, 2, 5, 14, 19, 0x7F, 1, 0]);
}

#[test]
fn test_both_modes_agree_on_acyclic_graphs() {
    let a = shared(Point { x: 1, y: 1 });
    let b = shared(Point { x: 2, y: 2 });
    let list = vec![a.clone(), b.clone(), a, b];
    let dedup = Knot::dedup().serialize(&list).unwrap();
    let cycle_safe = Knot::cycle_safe().serialize(&list).unwrap();
    assert_eq!(dedup, cycle_safe);

    let decoded: Vec<Shared<Point>> = Knot::dedup().deserialize(&cycle_safe).unwrap();
    assert!(Rc::ptr_eq(&decoded[0], &decoded[2]));
    assert!(Rc::ptr_eq(&decoded[1], &decoded[3]));
}

#[test]
fn test_ids_do_not_leak_between_calls() {
    for knot in both_modes() {
        let a = shared(Point { x: 9, y: 9 });
        let first = knot.serialize(&a).unwrap();
        let second = knot.serialize(&a).unwrap();
        // the second call encodes the object in full again
        assert_eq!(first, second);
        let decoded: Shared<Point> = knot.deserialize(&second).unwrap();
        assert_eq!(*decoded.borrow(), Point { x: 9, y: 9 });
    }
}

#[test]
fn test_boxed_shared_keeps_identity() {
    for knot in both_modes() {
        let a = shared(3u64);
        let boxes = vec![Box::new(a.clone()), Box::new(a)];
        let bytes = knot.serialize(&boxes).unwrap();
        let decoded: Vec<Box<Shared<u64>>> = knot.deserialize(&bytes).unwrap();
        assert!(Rc::ptr_eq(&*decoded[0], &*decoded[1]));
        assert_eq!(*decoded[1].borrow(), 3);
    }
}
