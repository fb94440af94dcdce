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

use knot_core::error::Error;
use knot_core::{Grid, Knot};
use std::rc::Rc;

fn both_modes() -> [Knot; 2] {
    [Knot::dedup(), Knot::cycle_safe()]
}

#[test]
fn test_grid_round_trip() {
    let knot = Knot::default();
    let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let bytes = knot.serialize(&grid).unwrap();
    let decoded: Grid<i32> = knot.deserialize(&bytes).unwrap();
    assert_eq!(decoded, grid);
    assert_eq!(decoded.rows(), 2);
    assert_eq!(decoded.row(1), Some(&[4, 5, 6][..]));
}

#[test]
fn test_grid_layout() {
    let knot = Knot::default();
    let grid = Grid::new(2, vec![1u8, 2, 3, 4]).unwrap();
    let bytes = knot.serialize(&grid).unwrap();
    // GRID, stride 2, 4 elements, each U8 with its header
    assert_eq!(bytes, vec![30, 2, 4, 64, 1, 64, 2, 64, 3, 64, 4]);
}

#[test]
fn test_shared_grid_identity() {
    for knot in both_modes() {
        let grid = Rc::new(Grid::filled(3, 2, "x".to_string()));
        let list = vec![grid.clone(), grid];
        let bytes = knot.serialize(&list).unwrap();
        let decoded: Vec<Rc<Grid<String>>> = knot.deserialize(&bytes).unwrap();
        assert!(Rc::ptr_eq(&decoded[0], &decoded[1]));
        assert_eq!((decoded[0].rows(), decoded[0].cols()), (3, 2));
        assert_eq!(decoded[0].get(2, 1).map(String::as_str), Some("x"));
    }
}

#[test]
fn test_empty_grid() {
    for knot in both_modes() {
        let grid: Rc<Grid<i64>> = Rc::new(Grid::default());
        let bytes = knot.serialize(&grid).unwrap();
        let decoded: Rc<Grid<i64>> = knot.deserialize(&bytes).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.rows(), 0);
    }
}

#[test]
fn test_grid_of_grids() {
    let knot = Knot::cycle_safe();
    let inner = Rc::new(Grid::new(1, vec![7i32]).unwrap());
    let outer = Grid::new(2, vec![inner.clone(), inner]).unwrap();
    let bytes = knot.serialize(&outer).unwrap();
    let decoded: Grid<Rc<Grid<i32>>> = knot.deserialize(&bytes).unwrap();
    let first = decoded.get(0, 0).unwrap();
    let second = decoded.get(0, 1).unwrap();
    assert!(Rc::ptr_eq(first, second));
    assert_eq!(first.get(0, 0), Some(&7));
}

#[test]
fn test_stride_mismatch_is_malformed() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    // stride 4 but 6 elements
    let mut bytes = vec![30u8, 4, 6];
    for _ in 0..6 {
        bytes.extend_from_slice(&[5, 0]);
    }
    for knot in both_modes() {
        assert!(matches!(
            knot.deserialize::<Grid<i32>>(&bytes),
            Err(Error::MalformedLength(_))
        ));
        assert!(matches!(
            knot.deserialize::<Rc<Grid<i32>>>(&bytes),
            Err(Error::MalformedLength(_))
        ));
    }
}

#[test]
fn test_zero_stride_with_elements_is_malformed() {
    if knot_core::error::should_panic_on_error() {
        return;
    }
    let bytes = [30u8, 0, 1, 5, 0];
    let result = Knot::default().deserialize::<Grid<i32>>(&bytes);
    assert!(matches!(result, Err(Error::MalformedLength(_))));
}
