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

//! Rank-2 arrays.
//!
//! A [`Grid`] stores its elements row-major in one flat vector. On the wire it
//! is `GRID`, the column count (stride), the flat element count, then the
//! elements. A flat count that is not a multiple of the stride is rejected.

use crate::buffer::wire_len;
use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::list::{read_list, write_list};
use crate::serializer::{KnotDefault, Serializer};
use crate::types::TypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from row-major `data` with `cols` elements per row.
    pub fn new(cols: usize, data: Vec<T>) -> Result<Self, Error> {
        check_shape(cols, data.len())?;
        Ok(Grid { cols, data })
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(cols * rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::malformed_length(format!(
                    "Row {i} has {} elements, expected {cols}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Grid::new(cols, data)
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self
    where
        T: Clone,
    {
        Grid {
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Number of rows. A grid without columns has no rows.
    pub fn rows(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        let index = self.index_of(row, col)?;
        self.data.get(index)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        let index = self.index_of(row, col)?;
        self.data.get_mut(index)
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows() || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows() {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, an empty grid simply has no rows
        self.data.chunks(self.cols.max(1)).take(self.rows())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Grid {
            cols: 0,
            data: Vec::new(),
        }
    }
}

fn check_shape(cols: usize, len: usize) -> Result<(), Error> {
    let fits = if cols == 0 { len == 0 } else { len % cols == 0 };
    ensure!(
        fits,
        Error::malformed_length(format!(
            "Grid of {len} elements does not divide into rows of {cols}"
        ))
    );
    Ok(())
}

impl<T: Serializer> Serializer for Grid<T> {
    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_varuint32(wire_len(self.cols)?);
        write_list(self.data.len(), self.data.iter(), context)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let cols = context.reader.read_varuint32()? as usize;
        let flat = context.reader.peek_varuint32_at(0)?.0 as usize;
        // fail on the shape before decoding any element
        check_shape(cols, flat)?;
        let data = read_list(context)?;
        Ok(Grid { cols, data })
    }

    fn knot_reserved_space() -> usize {
        2 * std::mem::size_of::<u32>() + 1
    }

    fn knot_static_type_id() -> TypeId {
        TypeId::GRID
    }
}

impl<T> KnotDefault for Grid<T> {
    fn knot_default() -> Self {
        Grid::default()
    }
}
