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
use winapi_perf_wrapper::constants::{
    COUNTER_SYSTEM_CACHE_RESIDENT_BYTES, COUNTER_SYSTEM_UP_TIME,
};
use winapi_perf_wrapper::CounterNames;

/// Which performance counters the metrics are read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    uptime_counter: String,
    cache_counter: String,
    counter_names: CounterNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uptime_counter: COUNTER_SYSTEM_UP_TIME.to_owned(),
            cache_counter: COUNTER_SYSTEM_CACHE_RESIDENT_BYTES.to_owned(),
            counter_names: CounterNames::English,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uptime_counter<S: Into<String>>(mut self, path: S) -> Self {
        self.uptime_counter = path.into();
        self
    }

    /// The counter whose value is treated as reclaimable memory.
    pub fn with_cache_counter<S: Into<String>>(mut self, path: S) -> Self {
        self.cache_counter = path.into();
        self
    }

    /// Use localized counter names if your paths are in the host's display
    /// language.
    pub fn with_counter_names(mut self, counter_names: CounterNames) -> Self {
        self.counter_names = counter_names;
        self
    }

    pub fn uptime_counter(&self) -> &str {
        &self.uptime_counter
    }

    pub fn cache_counter(&self) -> &str {
        &self.cache_counter
    }

    pub fn counter_names(&self) -> CounterNames {
        self.counter_names
    }
}
