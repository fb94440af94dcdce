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

//! Tests for true cycles: round trip with the cycle-safe codec, rejection
//! with the dedup-only codec.

use knot_core::error::Error;
use knot_core::{shared, shared_array, Grid, Knot, Shared, SharedArray};
use knot_derive::KnotObject;
use std::rc::Rc;

#[derive(KnotObject)]
struct Node {
    value: i32,
    next: Option<Shared<Node>>,
}

fn node(value: i32) -> Shared<Node> {
    shared(Node { value, next: None })
}

fn next_of(node: &Shared<Node>) -> Shared<Node> {
    node.borrow().next.clone().unwrap()
}

fn two_node_cycle() -> (Shared<Node>, Shared<Node>) {
    let a = node(1);
    let b = node(2);
    a.borrow_mut().next = Some(b.clone());
    b.borrow_mut().next = Some(a.clone());
    (a, b)
}

fn unlink(start: &Shared<Node>) {
    let mut current = start.borrow_mut().next.take();
    while let Some(node) = current {
        current = node.borrow_mut().next.take();
    }
}

fn decode_error<T: knot_core::Serializer>(knot: &Knot, bytes: &[u8]) -> Error {
    match knot.deserialize::<T>(bytes) {
        Ok(_) => panic!("decoding was expected to fail"),
        Err(err) => err,
    }
}

#[test]
fn test_two_node_cycle_round_trip() {
    let (a, _b) = two_node_cycle();
    let knot = Knot::cycle_safe();
    let bytes = knot.serialize(&a).unwrap();
    let decoded: Shared<Node> = knot.deserialize(&bytes).unwrap();

    let decoded_b = next_of(&decoded);
    assert_eq!(decoded.borrow().value, 1);
    assert_eq!(decoded_b.borrow().value, 2);
    assert!(Rc::ptr_eq(&next_of(&decoded_b), &decoded));
    assert!(!Rc::ptr_eq(&decoded_b, &decoded));

    unlink(&a);
    unlink(&decoded);
}

#[test]
fn test_self_cycle_round_trip() {
    let a = node(42);
    a.borrow_mut().next = Some(a.clone());
    let knot = Knot::cycle_safe();
    let bytes = knot.serialize(&a).unwrap();
    let decoded: Shared<Node> = knot.deserialize(&bytes).unwrap();
    assert_eq!(decoded.borrow().value, 42);
    assert!(Rc::ptr_eq(&next_of(&decoded), &decoded));

    unlink(&a);
    unlink(&decoded);
}

#[test]
fn test_cycle_entered_from_outside() {
    // root -> a -> b -> a, with a list holding root and b as well
    let (a, b) = two_node_cycle();
    let root = node(0);
    root.borrow_mut().next = Some(a.clone());
    let list = vec![root.clone(), b.clone()];

    let knot = Knot::cycle_safe();
    let bytes = knot.serialize(&list).unwrap();
    let decoded: Vec<Shared<Node>> = knot.deserialize(&bytes).unwrap();

    let decoded_a = next_of(&decoded[0]);
    let decoded_b = next_of(&decoded_a);
    assert!(Rc::ptr_eq(&decoded_b, &decoded[1]));
    assert!(Rc::ptr_eq(&next_of(&decoded_b), &decoded_a));
    assert_eq!(
        [
            decoded[0].borrow().value,
            decoded_a.borrow().value,
            decoded_b.borrow().value
        ],
        [0, 1, 2]
    );

    unlink(&a);
    unlink(&decoded_a);
}

#[test]
fn test_dedup_rejects_cycle_on_encode() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let (a, _b) = two_node_cycle();
    let err = Knot::dedup().serialize(&a).unwrap_err();
    assert!(matches!(err, Error::CyclicReference(_)));
    assert!(err.is_cycle());
    assert!(err.to_string().contains("Node"));

    let self_loop = node(7);
    self_loop.borrow_mut().next = Some(self_loop.clone());
    let err = Knot::dedup().serialize(&self_loop).unwrap_err();
    assert!(matches!(err, Error::CyclicReference(_)));

    unlink(&a);
    unlink(&self_loop);
}

#[test]
fn test_dedup_rejects_cyclic_stream_on_decode() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let (a, _b) = two_node_cycle();
    let bytes = Knot::cycle_safe().serialize(&a).unwrap();
    let err = decode_error::<Shared<Node>>(&Knot::dedup(), &bytes);
    assert!(matches!(err, Error::PendingRef(_)));
    assert!(err.is_protocol());
    assert!(err.is_cycle());

    unlink(&a);
}

#[test]
fn test_dedup_encoder_recovers_after_rejection() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let knot = Knot::dedup();
    let (a, _b) = two_node_cycle();
    assert!(knot.serialize(&a).is_err());
    unlink(&a);

    // same `Knot`, acyclic input
    let bytes = knot.serialize(&a).unwrap();
    let decoded: Shared<Node> = knot.deserialize(&bytes).unwrap();
    assert_eq!(decoded.borrow().value, 1);
    assert!(decoded.borrow().next.is_none());
}

#[derive(KnotObject)]
struct Slot {
    value: i32,
    owner: Option<SharedArray<Slot>>,
}

#[test]
fn test_cycle_through_shared_array() {
    let array = shared_array([
        Slot {
            value: 10,
            owner: None,
        },
        Slot {
            value: 20,
            owner: None,
        },
    ]);
    array[1].borrow_mut().owner = Some(array.clone());

    let knot = Knot::cycle_safe();
    let bytes = knot.serialize(&array).unwrap();
    let decoded: SharedArray<Slot> = knot.deserialize(&bytes).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].borrow().value, 10);
    assert!(decoded[0].borrow().owner.is_none());
    let owner = decoded[1].borrow().owner.clone().unwrap();
    assert!(Rc::ptr_eq(&owner, &decoded));

    if !knot_core::error::should_panic_on_error() {
        let err = Knot::dedup().serialize(&array).unwrap_err();
        assert!(err.is_cycle());
    }

    array[1].borrow_mut().owner = None;
    decoded[1].borrow_mut().owner = None;
}

#[derive(KnotObject)]
struct Cell {
    owner: Option<Rc<Grid<Shared<Cell>>>>,
}

#[test]
fn test_cycle_through_grid_is_rejected_by_both_modes() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let cell = shared(Cell { owner: None });
    let grid = Rc::new(Grid::new(1, vec![cell.clone()]).unwrap());
    cell.borrow_mut().owner = Some(grid.clone());

    for knot in [Knot::dedup(), Knot::cycle_safe()] {
        let err = knot.serialize(&grid).unwrap_err();
        assert!(matches!(err, Error::CyclicReference(_)));
    }

    cell.borrow_mut().owner = None;
}

#[test]
fn test_grid_holding_shared_cells() {
    let cell = shared(Cell { owner: None });
    let inner = Rc::new(Grid::new(1, vec![cell.clone()]).unwrap());
    let outer = shared(Cell {
        owner: Some(inner.clone()),
    });
    let grid = Rc::new(Grid::new(2, vec![outer.clone(), outer.clone()]).unwrap());

    let knot = Knot::cycle_safe();
    let bytes = knot.serialize(&grid).unwrap();
    let decoded: Rc<Grid<Shared<Cell>>> = knot.deserialize(&bytes).unwrap();
    assert_eq!((decoded.rows(), decoded.cols()), (1, 2));
    let first = decoded.get(0, 0).unwrap();
    let second = decoded.get(0, 1).unwrap();
    assert!(Rc::ptr_eq(first, second));
    let decoded_inner = first.borrow().owner.clone().unwrap();
    assert_eq!(decoded_inner.len(), 1);
}
