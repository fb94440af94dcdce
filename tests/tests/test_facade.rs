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

use knot::{shared, Knot, KnotObject, RefMode, Shared};
use std::rc::Rc;

#[derive(KnotObject)]
struct Node {
    value: i32,
    next: Option<Shared<Node>>,
}

#[test]
fn test_cycle_through_facade() {
    let a = shared(Node {
        value: 1,
        next: None,
    });
    let b = shared(Node {
        value: 2,
        next: Some(a.clone()),
    });
    a.borrow_mut().next = Some(b.clone());

    let knot = Knot::default().ref_mode(RefMode::CycleSafe);
    let bytes = knot.serialize(&a).unwrap();
    let decoded: Shared<Node> = knot.deserialize(&bytes).unwrap();
    let second = decoded.borrow().next.clone().unwrap();
    let back = second.borrow().next.clone().unwrap();
    assert!(Rc::ptr_eq(&decoded, &back));
    assert_eq!(second.borrow().value, 2);

    a.borrow_mut().next = None;
    decoded.borrow_mut().next = None;
}

#[test]
fn test_facade_error_type() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let result: Result<i32, knot::Error> = Knot::default().deserialize(&[]);
    assert!(result.is_err());
}
