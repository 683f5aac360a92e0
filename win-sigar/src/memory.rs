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

//! Direct system memory status, outside of the performance counter protocol.
use winapi_perf_wrapper::Result;

/// Byte counts as reported by `GlobalMemoryStatusEx`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    pub total_phys: u64,
    pub avail_phys: u64,
    pub total_page_file: u64,
    pub avail_page_file: u64,
    pub total_virtual: u64,
    pub avail_virtual: u64,
}

pub trait MemoryApi {
    fn memory_status(&self) -> Result<MemoryStatus>;
}

impl<'a, M: MemoryApi + ?Sized> MemoryApi for &'a M {
    fn memory_status(&self) -> Result<MemoryStatus> {
        (**self).memory_status()
    }
}

#[cfg(windows)]
pub use self::native::NativeMemory;

#[cfg(windows)]
mod native {
    use std::mem;

    use winapi::shared::minwindef::{DWORD, FALSE};
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::sysinfoapi::{GlobalMemoryStatusEx, MEMORYSTATUSEX};
    use winapi_perf_wrapper::{Error, PdhStatus, Result, StatusKind};

    use super::{MemoryApi, MemoryStatus};

    const CALL_GLOBAL_MEMORY_STATUS_EX: &'static str = "GlobalMemoryStatusEx";

    #[derive(Debug, Default, Clone, Copy)]
    pub struct NativeMemory;

    impl MemoryApi for NativeMemory {
        fn memory_status(&self) -> Result<MemoryStatus> {
            let mut status: MEMORYSTATUSEX = unsafe { mem::zeroed() };
            status.dwLength = mem::size_of::<MEMORYSTATUSEX>() as DWORD;
            if unsafe { GlobalMemoryStatusEx(&mut status) } == FALSE {
                let errno = unsafe { GetLastError() };
                let code = if errno != 0 {
                    PdhStatus(errno)
                } else {
                    StatusKind::InvalidArgument.into()
                };
                return Err(Error::NativeCall {
                    call: CALL_GLOBAL_MEMORY_STATUS_EX,
                    status: code,
                    errno,
                });
            }
            Ok(MemoryStatus {
                total_phys: status.ullTotalPhys,
                avail_phys: status.ullAvailPhys,
                total_page_file: status.ullTotalPageFile,
                avail_page_file: status.ullAvailPageFile,
                total_virtual: status.ullTotalVirtual,
                avail_virtual: status.ullAvailVirtual,
            })
        }
    }
}
