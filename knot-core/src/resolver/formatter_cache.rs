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

use crate::serializer::Formatter;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Memoizes one wrapping formatter per reference type.
///
/// Entries are created on first request and live as long as the owning
/// [`crate::Knot`]. The map is behind a `RefCell`, which keeps `Knot` off
/// other threads.
#[derive(Default)]
pub struct FormatterCache {
    formatters: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

impl FormatterCache {
    pub fn get_or_insert_with<T: 'static>(
        &self,
        make: impl FnOnce() -> Rc<dyn Formatter<T>>,
    ) -> Rc<dyn Formatter<T>> {
        let key = TypeId::of::<T>();
        let cached = self
            .formatters
            .borrow()
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<Rc<dyn Formatter<T>>>())
            .cloned();
        if let Some(formatter) = cached {
            return formatter;
        }
        tracing::trace!(
            type_name = std::any::type_name::<T>(),
            "formatter cache miss"
        );
        let formatter = make();
        self.formatters
            .borrow_mut()
            .insert(key, Box::new(formatter.clone()));
        formatter
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.formatters.borrow().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.formatters.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.borrow().is_empty()
    }
}
