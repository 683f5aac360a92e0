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

//! Windows system metrics for sigar style consumers.
//!
//! Uptime comes from the `\System\System Up Time` performance counter.
//! Memory comes from `GlobalMemoryStatusEx` with the system cache counted as
//! free in the `actual_*` figures when that counter can be read. Every other
//! metric returns [`Error::NotImplemented`].
pub mod config;
pub mod memory;
pub mod metrics;
pub mod types;

pub use config::Config;
#[cfg(windows)]
pub use memory::NativeMemory;
pub use memory::{MemoryApi, MemoryStatus};
pub use metrics::{SystemMetrics, WindowsMetrics};
pub use types::*;
pub use winapi_perf_wrapper::{CounterNames, Error, Result};
