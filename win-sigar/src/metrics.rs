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
use std::convert::TryFrom;

use log::debug;
use winapi_perf_wrapper::{Error, Pdh, PerfApi, Result};
#[cfg(windows)]
use winapi_perf_wrapper::NativePdh;

use crate::config::Config;
#[cfg(windows)]
use crate::memory::NativeMemory;
use crate::memory::MemoryApi;
use crate::types::*;

/// The full set of metrics a provider can be asked for.
pub trait SystemMetrics {
    fn uptime(&self) -> Result<Uptime>;
    fn mem(&self) -> Result<Mem>;
    fn load_average(&self) -> Result<LoadAverage>;
    fn swap(&self) -> Result<Swap>;
    fn cpu(&self) -> Result<Cpu>;
    fn cpu_list(&self) -> Result<CpuList>;
    fn file_system_list(&self) -> Result<FileSystemList>;
    fn file_system_usage(&self, path: &str) -> Result<FileSystemUsage>;
    fn proc_list(&self) -> Result<ProcList>;
    fn proc_state(&self, pid: i32) -> Result<ProcState>;
    fn proc_mem(&self, pid: i32) -> Result<ProcMem>;
    fn proc_time(&self, pid: i32) -> Result<ProcTime>;
    fn proc_args(&self, pid: i32) -> Result<ProcArgs>;
    fn proc_exe(&self, pid: i32) -> Result<ProcExe>;
}

/// Metrics read from windows performance counters.
///
/// Every call opens its own query and releases it before returning, so a
/// `WindowsMetrics` holds no native resources between calls.
pub struct WindowsMetrics<P: PerfApi, M: MemoryApi> {
    pdh: Pdh<P>,
    memory: M,
    config: Config,
}

#[cfg(windows)]
impl WindowsMetrics<NativePdh, NativeMemory> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_apis(NativePdh, NativeMemory, config)
    }
}

#[cfg(windows)]
impl Default for WindowsMetrics<NativePdh, NativeMemory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PerfApi, M: MemoryApi> WindowsMetrics<P, M> {
    pub fn with_apis(pdh_api: P, memory: M, config: Config) -> Self {
        Self {
            pdh: Pdh::with_api(pdh_api).with_counter_names(config.counter_names()),
            memory,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The reclaimable cache in bytes, or None if it could not be read.
    fn cache_bytes(&self) -> Option<u64> {
        let path = self.config.cache_counter();
        match self.pdh.counter_value_i64(path) {
            Ok(v) => match u64::try_from(v) {
                Ok(v) => Some(v),
                Err(_) => {
                    debug!("Ignoring negative value {} from {}", v, path);
                    None
                }
            },
            Err(e) => {
                debug!("Skipping cache adjustment, unable to read {}: {}", path, e);
                None
            }
        }
    }
}

impl<P: PerfApi, M: MemoryApi> SystemMetrics for WindowsMetrics<P, M> {
    fn uptime(&self) -> Result<Uptime> {
        let length = self.pdh.counter_value_f64(self.config.uptime_counter())?;
        Ok(Uptime { length })
    }

    fn mem(&self) -> Result<Mem> {
        let status = self.memory.memory_status()?;
        let total = status.total_phys;
        let free = status.avail_phys;
        let used = total.saturating_sub(free);
        let mut mem = Mem {
            total,
            used,
            free,
            actual_used: used,
            actual_free: free,
        };
        if let Some(cache) = self.cache_bytes() {
            // Cache can't be larger than what is in use.
            let cache = cache.min(used);
            mem.actual_used = used - cache;
            mem.actual_free = free + cache;
        }
        Ok(mem)
    }

    fn load_average(&self) -> Result<LoadAverage> {
        Err(Error::NotImplemented)
    }

    fn swap(&self) -> Result<Swap> {
        Err(Error::NotImplemented)
    }

    fn cpu(&self) -> Result<Cpu> {
        Err(Error::NotImplemented)
    }

    fn cpu_list(&self) -> Result<CpuList> {
        Err(Error::NotImplemented)
    }

    fn file_system_list(&self) -> Result<FileSystemList> {
        Err(Error::NotImplemented)
    }

    fn file_system_usage(&self, _path: &str) -> Result<FileSystemUsage> {
        Err(Error::NotImplemented)
    }

    fn proc_list(&self) -> Result<ProcList> {
        Err(Error::NotImplemented)
    }

    fn proc_state(&self, _pid: i32) -> Result<ProcState> {
        Err(Error::NotImplemented)
    }

    fn proc_mem(&self, _pid: i32) -> Result<ProcMem> {
        Err(Error::NotImplemented)
    }

    fn proc_time(&self, _pid: i32) -> Result<ProcTime> {
        Err(Error::NotImplemented)
    }

    fn proc_args(&self, _pid: i32) -> Result<ProcArgs> {
        Err(Error::NotImplemented)
    }

    fn proc_exe(&self, _pid: i32) -> Result<ProcExe> {
        Err(Error::NotImplemented)
    }
}
