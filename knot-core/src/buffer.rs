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

//! Byte cursor primitives shared by every serializer.
//!
//! [`Writer`] appends little-endian fixed-width values and LEB128 style
//! varints to a growable buffer. [`Reader`] walks a borrowed slice and
//! bounds-checks every access, so a truncated or hostile stream surfaces as
//! [`Error::BufferOutOfBound`] instead of a panic.

use crate::error::Error;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

#[derive(Default)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Writer {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    // Writes into a Vec<u8> cannot fail, the `unwrap`s below never fire.

    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bf.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bf.write_u16::<LittleEndian>(value).unwrap();
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bf.write_i16::<LittleEndian>(value).unwrap();
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bf.write_u32::<LittleEndian>(value).unwrap();
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bf.write_u64::<LittleEndian>(value).unwrap();
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bf.write_f32::<LittleEndian>(value).unwrap();
    }

    pub fn write_f64(&mut self, value: f64) {
        self.bf.write_f64::<LittleEndian>(value).unwrap();
    }

    pub fn write_varint32(&mut self, value: i32) {
        let zigzag = ((value << 1) ^ (value >> 31)) as u32;
        self.write_varuint32(zigzag)
    }

    pub fn write_varuint32(&mut self, value: u32) {
        self.write_varuint64(value as u64)
    }

    pub fn write_varint64(&mut self, value: i64) {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varuint64(zigzag)
    }

    pub fn write_varuint64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.bf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.bf.push(value as u8);
    }

    pub fn write_utf8_string(&mut self, s: &str) -> Result<(), Error> {
        self.write_varuint32(wire_len(s.len())?);
        self.bf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Narrows a length or count to the `u32` the wire carries.
pub fn wire_len(len: usize) -> Result<u32, Error> {
    u32::try_from(len)
        .map_err(|_| Error::malformed_length(format!("Length {len} does not fit in 32 bits")))
}

/// Number of bytes `value` occupies once varint encoded.
pub fn varuint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

pub struct Reader<'bf> {
    bf: &'bf [u8],
    pub(crate) cursor: usize,
}

impl<'bf> Reader<'bf> {
    pub fn new(bf: &'bf [u8]) -> Reader<'bf> {
        Reader { bf, cursor: 0 }
    }

    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn slice_after_cursor(&self) -> &'bf [u8] {
        &self.bf[self.cursor..]
    }

    #[inline(always)]
    fn check_bound(&self, n: usize) -> Result<(), Error> {
        if self.cursor + n > self.bf.len() {
            return Err(Error::buffer_out_of_bound(self.cursor, n, self.bf.len()));
        }
        Ok(())
    }

    #[inline(always)]
    fn take(&mut self, n: usize) -> Result<&'bf [u8], Error> {
        self.check_bound(n)?;
        let s = &self.bf[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(s)
    }

    pub fn peek_u8(&self) -> Result<u8, Error> {
        self.check_bound(1)?;
        Ok(self.bf[self.cursor])
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Decodes a varint starting `offset` bytes past the cursor without
    /// moving it. Returns the value and its encoded width.
    pub fn peek_varuint64_at(&self, offset: usize) -> Result<(u64, usize), Error> {
        let mut result = 0u64;
        let mut shift = 0;
        let mut pos = self.cursor + offset;
        loop {
            let Some(&b) = self.bf.get(pos) else {
                return Err(Error::buffer_out_of_bound(pos, 1, self.bf.len()));
            };
            if shift == 63 && b > 1 {
                return Err(Error::encoding_error("varint overflows 64 bits"));
            }
            result |= ((b & 0x7F) as u64) << shift;
            pos += 1;
            if b & 0x80 == 0 {
                return Ok((result, pos - self.cursor - offset));
            }
            shift += 7;
        }
    }

    pub fn peek_varuint32_at(&self, offset: usize) -> Result<(u32, usize), Error> {
        let (value, width) = self.peek_varuint64_at(offset)?;
        let value = u32::try_from(value)
            .map_err(|_| Error::encoding_error(format!("varint {value} overflows 32 bits")))?;
        Ok((value, width))
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let (value, width) = self.peek_varuint64_at(0)?;
        self.cursor += width;
        Ok(value)
    }

    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        let (value, width) = self.peek_varuint32_at(0)?;
        self.cursor += width;
        Ok(value)
    }

    pub fn read_varint32(&mut self) -> Result<i32, Error> {
        let encoded = self.read_varuint32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    pub fn read_varint64(&mut self) -> Result<i64, Error> {
        let encoded = self.read_varuint64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'bf [u8], Error> {
        self.take(len)
    }

    pub fn read_utf8_string(&mut self) -> Result<String, Error> {
        let len = self.read_varuint32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::encoding_error(format!("invalid utf-8 string: {e}")))
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.take(len).map(|_| ())
    }
}
