// Copyright 2020 Jeremy Wall
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small wrapper around the windows Performance Data Helper (PDH) query
//! protocol.
//!
//! A [`PdhQuery`] is opened from a [`Pdh`], counters are attached to it with
//! [`PdhQuery::add_counter`], a sample is taken with [`PdhQuery::collect`] and
//! then each [`PdhCounter`] can be read in the representation you need.
//! Counters borrow their query so a query can never be closed while a counter
//! is still attached. Both close themselves when dropped.
use std::cell::Cell;
use std::convert::TryFrom;

use log::{debug, warn};

pub mod api;
pub mod constants;
pub mod error;
#[cfg(windows)]
pub mod native;
pub mod status;

pub use api::{CounterNames, Format, FormattedValue, PerfApi, RawCounter, RawQuery};
use constants::*;
pub use error::{Error, Result};
#[cfg(windows)]
pub use native::NativePdh;
pub use status::{check_status, pdh_status_friendly_name, PdhStatus, StatusKind};

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn str_to_utf16(s: &str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(Error::Transport(format!(
            "{:?} can not be passed as a wide string",
            s
        )));
    }
    let mut v = s.encode_utf16().collect::<Vec<u16>>();
    v.push(0);
    Ok(v)
}

pub struct Pdh<A: PerfApi> {
    api: A,
    counter_names: CounterNames,
}

#[cfg(windows)]
impl Pdh<NativePdh> {
    pub fn new() -> Self {
        Self::with_api(NativePdh)
    }
}

#[cfg(windows)]
impl Default for Pdh<NativePdh> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PerfApi> Pdh<A> {
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            counter_names: CounterNames::default(),
        }
    }

    /// Choose the namespace counter paths are resolved in. Defaults to
    /// English.
    pub fn with_counter_names(mut self, counter_names: CounterNames) -> Self {
        self.counter_names = counter_names;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn open_query(&self) -> Result<PdhQuery<'_, A>> {
        self.open_query_with(0)
    }

    /// Open a query tagged with `user_data`.
    pub fn open_query_with(&self, user_data: usize) -> Result<PdhQuery<'_, A>> {
        let handle = self.api.open_query(user_data)?;
        debug!("Opened pdh query {:?}", handle);
        Ok(PdhQuery {
            api: &self.api,
            handle,
            counter_names: self.counter_names,
            collected: Cell::new(false),
            released: false,
        })
    }

    /// Runs `f` against a freshly collected counter for `path`.
    ///
    /// The counter and its query are released before this returns no matter
    /// which step failed. Failures to release after `f` ran are logged and
    /// do not replace its result.
    pub fn with_counter<T, F>(&self, path: &str, f: F) -> Result<T>
    where
        F: FnOnce(&PdhCounter<'_, '_, A>) -> Result<T>,
    {
        let query = self.open_query()?;
        let counter = query.add_counter(path)?;
        let result = query.collect().and_then(|_| f(&counter));
        if let Err(e) = counter.remove() {
            warn!("Failed to remove counter for {}: {}", path, e);
        }
        if let Err(e) = query.close() {
            warn!("Failed to close query for {}: {}", path, e);
        }
        result
    }

    pub fn counter_value(&self, path: &str, format: Format) -> Result<FormattedValue> {
        self.with_counter(path, |c| c.read(format))
    }

    pub fn counter_value_string(&self, path: &str) -> Result<String> {
        self.with_counter(path, |c| c.read_string())
    }

    pub fn counter_value_i32(&self, path: &str) -> Result<i32> {
        self.with_counter(path, |c| c.read_i32())
    }

    pub fn counter_value_i64(&self, path: &str) -> Result<i64> {
        self.with_counter(path, |c| c.read_i64())
    }

    pub fn counter_value_f64(&self, path: &str) -> Result<f64> {
        self.with_counter(path, |c| c.read_f64())
    }
}

pub struct PdhQuery<'pdh, A: PerfApi> {
    api: &'pdh A,
    handle: RawQuery,
    counter_names: CounterNames,
    collected: Cell<bool>,
    released: bool,
}

impl<'pdh, A: PerfApi> PdhQuery<'pdh, A> {
    pub fn handle(&self) -> RawQuery {
        self.handle
    }

    pub fn add_counter(&self, path: &str) -> Result<PdhCounter<'_, 'pdh, A>> {
        self.add_counter_with(path, self.counter_names)
    }

    /// Add a counter whose path is in the host's display language.
    pub fn add_localized_counter(&self, path: &str) -> Result<PdhCounter<'_, 'pdh, A>> {
        self.add_counter_with(path, CounterNames::Localized)
    }

    pub fn add_counter_with(
        &self,
        path: &str,
        names: CounterNames,
    ) -> Result<PdhCounter<'_, 'pdh, A>> {
        let handle = self.api.add_counter(self.handle, path, names)?;
        debug!("Added counter {} to query {:?}", path, self.handle);
        Ok(PdhCounter {
            query: self,
            handle,
            released: false,
        })
    }

    /// Consumes the counter, detaching it from this query.
    pub fn remove_counter(&self, counter: PdhCounter<'_, 'pdh, A>) -> Result<()> {
        counter.remove()
    }

    /// Take a new sample for every counter attached to this query.
    pub fn collect(&self) -> Result<()> {
        self.api.collect_query_data(self.handle)?;
        self.collected.set(true);
        Ok(())
    }

    pub fn is_collected(&self) -> bool {
        self.collected.get()
    }

    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        // Never hand the handle back twice even if closing it fails.
        self.released = true;
        debug!("Closing pdh query {:?}", self.handle);
        self.api.close_query(self.handle)
    }
}

impl<'pdh, A: PerfApi> Drop for PdhQuery<'pdh, A> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close pdh query {:?}: {}", self.handle, e);
        }
    }
}

pub struct PdhCounter<'query, 'pdh, A: PerfApi> {
    query: &'query PdhQuery<'pdh, A>,
    handle: RawCounter,
    released: bool,
}

/// Tag for errors raised when a value does not fit in an i32.
pub const CALL_READ_I32: &'static str = "read_i32";

fn unexpected_value() -> Error {
    Error::native(CALL_GET_FORMATTED_COUNTER_VALUE, StatusKind::InvalidData)
}

impl<'query, 'pdh, A: PerfApi> PdhCounter<'query, 'pdh, A> {
    pub fn handle(&self) -> RawCounter {
        self.handle
    }

    /// Read the current sample formatted by the platform as `format`.
    ///
    /// Fails with `PDH_NO_DATA` if the owning query has not collected yet.
    pub fn read(&self, format: Format) -> Result<FormattedValue> {
        if !self.query.is_collected() {
            debug!("Counter {:?} read before its query collected", self.handle);
            return Err(Error::native(
                CALL_GET_FORMATTED_COUNTER_VALUE,
                StatusKind::NoData,
            ));
        }
        self.query.api.formatted_value(self.handle, format)
    }

    pub fn read_string(&self) -> Result<String> {
        self.read(Format::Unicode)?
            .into_string()
            .ok_or_else(unexpected_value)
    }

    /// Reads the value as an i32. The platform is asked for the 64 bit
    /// representation and values outside the i32 range are an error tagged
    /// [`CALL_READ_I32`] rather than being truncated.
    pub fn read_i32(&self) -> Result<i32> {
        let v = self.read_i64()?;
        i32::try_from(v).map_err(|_| Error::native(CALL_READ_I32, StatusKind::InvalidData))
    }

    pub fn read_i64(&self) -> Result<i64> {
        self.read(Format::Large)?.as_i64().ok_or_else(unexpected_value)
    }

    pub fn read_f64(&self) -> Result<f64> {
        self.read(Format::Double)?.as_f64().ok_or_else(unexpected_value)
    }

    pub fn remove(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("Removing counter {:?}", self.handle);
        self.query.api.remove_counter(self.handle)
    }
}

impl<'query, 'pdh, A: PerfApi> Drop for PdhCounter<'query, 'pdh, A> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to remove counter {:?}: {}", self.handle, e);
        }
    }
}
