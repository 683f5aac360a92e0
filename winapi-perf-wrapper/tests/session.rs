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
use std::cell::{Cell, RefCell};

use winapi_perf_wrapper::constants::*;
use winapi_perf_wrapper::{
    CounterNames, Error, Format, FormattedValue, Pdh, PdhStatus, PerfApi, RawCounter, RawQuery,
    Result, StatusKind, CALL_READ_I32,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Open(usize),
    Close(RawQuery),
    Add(RawQuery, String, CounterNames),
    Remove(RawCounter),
    Collect(RawQuery),
    Read(RawCounter, Format),
}

/// Records every native call and fails the ones it is told to.
#[derive(Default)]
struct RecordingPdh {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<usize>,
    fail_open: Option<StatusKind>,
    fail_add: Option<StatusKind>,
    fail_collect: Option<StatusKind>,
    fail_remove: Option<StatusKind>,
    fail_close: Option<StatusKind>,
    large: i64,
    double: f64,
}

impl RecordingPdh {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn handle(&self) -> usize {
        let h = self.next_handle.get() + 1;
        self.next_handle.set(h);
        h
    }

    fn outcome(&self, call: &'static str, fail: Option<StatusKind>) -> Result<()> {
        match fail {
            Some(kind) => Err(Error::NativeCall {
                call,
                status: kind.into(),
                errno: 0,
            }),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn count<F: Fn(&Call) -> bool>(&self, pred: F) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

impl PerfApi for RecordingPdh {
    fn open_query(&self, user_data: usize) -> Result<RawQuery> {
        self.record(Call::Open(user_data));
        self.outcome(CALL_OPEN_QUERY, self.fail_open)?;
        Ok(RawQuery(self.handle()))
    }

    fn close_query(&self, query: RawQuery) -> Result<()> {
        self.record(Call::Close(query));
        self.outcome(CALL_CLOSE_QUERY, self.fail_close)
    }

    fn add_counter(
        &self,
        query: RawQuery,
        path: &str,
        names: CounterNames,
    ) -> Result<RawCounter> {
        self.record(Call::Add(query, path.to_owned(), names));
        self.outcome(CALL_ADD_ENGLISH_COUNTER, self.fail_add)?;
        Ok(RawCounter(self.handle()))
    }

    fn remove_counter(&self, counter: RawCounter) -> Result<()> {
        self.record(Call::Remove(counter));
        self.outcome(CALL_REMOVE_COUNTER, self.fail_remove)
    }

    fn collect_query_data(&self, query: RawQuery) -> Result<()> {
        self.record(Call::Collect(query));
        self.outcome(CALL_COLLECT_QUERY_DATA, self.fail_collect)
    }

    fn formatted_value(&self, counter: RawCounter, format: Format) -> Result<FormattedValue> {
        self.record(Call::Read(counter, format));
        Ok(match format {
            Format::Unicode => FormattedValue::String(format!("{}", self.large)),
            Format::Long => FormattedValue::Int32(self.large as i32),
            Format::Large => FormattedValue::Int64(self.large),
            Format::Double => FormattedValue::Float64(self.double),
        })
    }
}

#[test]
fn scoped_read_runs_the_whole_protocol_in_order() {
    let fake = RecordingPdh {
        double: 4242.5,
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let uptime = pdh.counter_value_f64(COUNTER_SYSTEM_UP_TIME).unwrap();
    assert_eq!(uptime, 4242.5);
    let query = RawQuery(1);
    let counter = RawCounter(2);
    assert_eq!(
        fake.calls(),
        vec![
            Call::Open(0),
            Call::Add(
                query,
                COUNTER_SYSTEM_UP_TIME.to_owned(),
                CounterNames::English
            ),
            Call::Collect(query),
            Call::Read(counter, Format::Double),
            Call::Remove(counter),
            Call::Close(query),
        ]
    );
}

#[test]
fn failed_collect_still_releases_each_handle_once() {
    let fake = RecordingPdh {
        fail_collect: Some(StatusKind::NoData),
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let err = pdh.counter_value_f64(COUNTER_SYSTEM_UP_TIME).unwrap_err();
    assert_eq!(err.status_kind(), Some(StatusKind::NoData));
    assert_eq!(fake.count(|c| matches!(c, Call::Read(..))), 0);
    assert_eq!(fake.count(|c| matches!(c, Call::Remove(..))), 1);
    assert_eq!(fake.count(|c| matches!(c, Call::Close(..))), 1);
    let calls = fake.calls();
    assert_eq!(calls[calls.len() - 2], Call::Remove(RawCounter(2)));
    assert_eq!(calls[calls.len() - 1], Call::Close(RawQuery(1)));
}

#[test]
fn failed_add_closes_the_query() {
    let fake = RecordingPdh {
        fail_add: Some(StatusKind::BadCounterName),
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let err = pdh.counter_value_i64(r"\No Such\Counter").unwrap_err();
    assert_eq!(err.status_kind(), Some(StatusKind::BadCounterName));
    assert_eq!(fake.count(|c| matches!(c, Call::Remove(..))), 0);
    assert_eq!(fake.count(|c| matches!(c, Call::Close(..))), 1);
}

#[test]
fn failed_open_makes_no_other_calls() {
    let fake = RecordingPdh {
        fail_open: Some(StatusKind::MemoryAllocationFailure),
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let err = pdh.counter_value_f64(COUNTER_SYSTEM_UP_TIME).unwrap_err();
    assert_eq!(
        err.status(),
        Some(PdhStatus(PDH_MEMORY_ALLOCATION_FAILURE))
    );
    assert_eq!(fake.calls(), vec![Call::Open(0)]);
}

#[test]
fn reading_before_collect_is_no_data() {
    let fake = RecordingPdh::default();
    let pdh = Pdh::with_api(&fake);
    {
        let query = pdh.open_query().unwrap();
        let counter = query.add_counter(COUNTER_SYSTEM_UP_TIME).unwrap();
        let err = counter.read_f64().unwrap_err();
        assert_eq!(err.status_kind(), Some(StatusKind::NoData));
        assert!(!query.is_collected());
    }
    assert_eq!(fake.count(|c| matches!(c, Call::Read(..))), 0);
    // Dropping releases counter then query.
    let calls = fake.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[Call::Remove(RawCounter(2)), Call::Close(RawQuery(1))]
    );
}

#[test]
fn i32_reads_refuse_to_truncate() {
    let fake = RecordingPdh {
        large: i64::from(i32::MAX) + 1,
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let err = pdh
        .counter_value_i32(COUNTER_SYSTEM_CACHE_RESIDENT_BYTES)
        .unwrap_err();
    match err {
        Error::NativeCall { call, status, .. } => {
            assert_eq!(call, CALL_READ_I32);
            assert_eq!(status.kind(), Some(StatusKind::InvalidData));
        }
        other => panic!("unexpected error {:?}", other),
    }
    // The platform was asked for the 64 bit representation.
    assert_eq!(fake.count(|c| matches!(c, Call::Read(_, Format::Large))), 1);
}

#[test]
fn i32_reads_in_range_succeed() {
    let fake = RecordingPdh {
        large: -12,
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    assert_eq!(pdh.counter_value_i32(r"\System\Processes").unwrap(), -12);
    assert_eq!(pdh.counter_value_string(r"\System\Processes").unwrap(), "-12");
    let value = pdh.counter_value(r"\System\Processes", Format::Long).unwrap();
    assert_eq!(value, FormattedValue::Int32(-12));
    assert_eq!(value.as_i32(), Some(-12));
    assert_eq!(value.as_i64(), None);
}

#[test]
fn localized_counters_use_the_display_language_namespace() {
    let fake = RecordingPdh::default();
    let pdh = Pdh::with_api(&fake);
    let query = pdh.open_query().unwrap();
    let counter = query
        .add_localized_counter(r"\Système\Temps d'activité système")
        .unwrap();
    assert_eq!(query.handle(), RawQuery(1));
    assert_eq!(counter.handle(), RawCounter(2));
    drop(counter);
    drop(query);
    assert_eq!(
        pdh.api().calls()[1],
        Call::Add(
            RawQuery(1),
            r"\Système\Temps d'activité système".to_owned(),
            CounterNames::Localized
        )
    );
    assert_eq!(pdh.api().count(|c| matches!(c, Call::Remove(..))), 1);
}

#[test]
fn explicit_release_is_not_repeated_on_drop() {
    let fake = RecordingPdh::default();
    let pdh = Pdh::with_api(&fake);
    let query = pdh.open_query_with(7).unwrap();
    let counter = query.add_counter(COUNTER_SYSTEM_UP_TIME).unwrap();
    query.collect().unwrap();
    query.remove_counter(counter).unwrap();
    query.close().unwrap();
    assert_eq!(fake.calls()[0], Call::Open(7));
    assert_eq!(fake.count(|c| matches!(c, Call::Remove(..))), 1);
    assert_eq!(fake.count(|c| matches!(c, Call::Close(..))), 1);
}

#[test]
fn failed_release_is_reported_once_and_not_retried() {
    let fake = RecordingPdh {
        fail_close: Some(StatusKind::InvalidHandle),
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    let query = pdh.open_query().unwrap();
    let err = query.close().unwrap_err();
    assert_eq!(err.status_kind(), Some(StatusKind::InvalidHandle));
    assert_eq!(fake.count(|c| matches!(c, Call::Close(..))), 1);
}

#[test]
fn release_failures_do_not_replace_the_value() {
    let fake = RecordingPdh {
        fail_remove: Some(StatusKind::InvalidHandle),
        fail_close: Some(StatusKind::InvalidHandle),
        double: 1.5,
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake);
    assert_eq!(pdh.counter_value_f64(COUNTER_SYSTEM_UP_TIME).unwrap(), 1.5);
    assert_eq!(fake.count(|c| matches!(c, Call::Remove(..))), 1);
    assert_eq!(fake.count(|c| matches!(c, Call::Close(..))), 1);
}

#[test]
fn one_collect_serves_every_attached_counter() {
    let fake = RecordingPdh {
        large: 10,
        double: 2.0,
        ..Default::default()
    };
    let pdh = Pdh::with_api(&fake).with_counter_names(CounterNames::Localized);
    let query = pdh.open_query().unwrap();
    let uptime = query.add_counter(COUNTER_SYSTEM_UP_TIME).unwrap();
    let cache = query
        .add_counter_with(COUNTER_SYSTEM_CACHE_RESIDENT_BYTES, CounterNames::English)
        .unwrap();
    query.collect().unwrap();
    assert_eq!(uptime.read_f64().unwrap(), 2.0);
    assert_eq!(cache.read_i64().unwrap(), 10);
    drop(cache);
    drop(uptime);
    drop(query);
    let calls = fake.calls();
    assert_eq!(
        calls[1],
        Call::Add(
            RawQuery(1),
            COUNTER_SYSTEM_UP_TIME.to_owned(),
            CounterNames::Localized
        )
    );
    assert_eq!(
        calls[2],
        Call::Add(
            RawQuery(1),
            COUNTER_SYSTEM_CACHE_RESIDENT_BYTES.to_owned(),
            CounterNames::English
        )
    );
    assert_eq!(fake.count(|c| matches!(c, Call::Collect(..))), 1);
    assert_eq!(calls.last(), Some(&Call::Close(RawQuery(1))));
}

#[cfg(windows)]
#[test]
fn live_uptime_is_non_negative_or_no_data() {
    let pdh = Pdh::new();
    match pdh.counter_value_f64(COUNTER_SYSTEM_UP_TIME) {
        Ok(secs) => assert!(secs >= 0.0),
        Err(e) => assert_eq!(e.status_kind(), Some(StatusKind::NoData)),
    }
}
