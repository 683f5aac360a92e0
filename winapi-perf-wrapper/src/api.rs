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

//! The raw PDH call surface that the query types are built on.
use crate::constants::*;
use crate::error::Result;

/// An opaque query handle as returned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawQuery(pub usize);

/// An opaque counter handle as returned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawCounter(pub usize);

/// Which counter namespace a path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterNames {
    /// Locale independent names. `PdhAddEnglishCounterW`
    English,
    /// Names in the display language of the host. `PdhAddCounterW`
    Localized,
}

impl Default for CounterNames {
    fn default() -> Self {
        CounterNames::English
    }
}

/// The representation the platform should format a counter value as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Unicode,
    Long,
    Large,
    Double,
}

impl Format {
    pub fn code(&self) -> u32 {
        match self {
            Format::Unicode => PDH_FMT_UNICODE,
            Format::Long => PDH_FMT_LONG,
            Format::Large => PDH_FMT_LARGE,
            Format::Double => PDH_FMT_DOUBLE,
        }
    }
}

/// A decoded counter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedValue {
    String(String),
    Int32(i32),
    Int64(i64),
    Float64(f64),
}

impl FormattedValue {
    pub fn into_string(self) -> Option<String> {
        match self {
            FormattedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FormattedValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FormattedValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormattedValue::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

/// The native performance counter calls.
///
/// Implementations translate the platform status of every call with
/// [`check_status`](crate::status::check_status) and report failures to reach
/// the platform at all as [`Error::Transport`](crate::Error::Transport).
/// Handles are plain values here. Ownership and release ordering are the job
/// of [`PdhQuery`](crate::PdhQuery) and [`PdhCounter`](crate::PdhCounter).
pub trait PerfApi {
    fn open_query(&self, user_data: usize) -> Result<RawQuery>;

    fn close_query(&self, query: RawQuery) -> Result<()>;

    fn add_counter(&self, query: RawQuery, path: &str, names: CounterNames)
        -> Result<RawCounter>;

    fn remove_counter(&self, counter: RawCounter) -> Result<()>;

    fn collect_query_data(&self, query: RawQuery) -> Result<()>;

    fn formatted_value(&self, counter: RawCounter, format: Format) -> Result<FormattedValue>;
}

impl<'a, A: PerfApi + ?Sized> PerfApi for &'a A {
    fn open_query(&self, user_data: usize) -> Result<RawQuery> {
        (**self).open_query(user_data)
    }

    fn close_query(&self, query: RawQuery) -> Result<()> {
        (**self).close_query(query)
    }

    fn add_counter(
        &self,
        query: RawQuery,
        path: &str,
        names: CounterNames,
    ) -> Result<RawCounter> {
        (**self).add_counter(query, path, names)
    }

    fn remove_counter(&self, counter: RawCounter) -> Result<()> {
        (**self).remove_counter(counter)
    }

    fn collect_query_data(&self, query: RawQuery) -> Result<()> {
        (**self).collect_query_data(query)
    }

    fn formatted_value(&self, counter: RawCounter, format: Format) -> Result<FormattedValue> {
        (**self).formatted_value(counter, format)
    }
}
