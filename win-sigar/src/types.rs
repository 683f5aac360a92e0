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

//! Metric records. Memory figures are in bytes.

/// Time since boot in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uptime {
    pub length: f64,
}

/// Physical memory. The `actual_*` figures count reclaimable system cache as
/// free rather than used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mem {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub actual_used: u64,
    pub actual_free: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Swap {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Cumulative cpu ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpu {
    pub user: u64,
    pub nice: u64,
    pub sys: u64,
    pub idle: u64,
    pub wait: u64,
    pub irq: u64,
    pub soft_irq: u64,
    pub stolen: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuList {
    pub list: Vec<Cpu>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSystem {
    pub dir_name: String,
    pub dev_name: String,
    pub type_name: String,
    pub sys_type_name: String,
    pub options: String,
    pub flags: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSystemList {
    pub list: Vec<FileSystem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSystemUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub avail: u64,
    pub files: u64,
    pub free_files: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcList {
    pub list: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Sleep,
    Run,
    Stop,
    Zombie,
    Idle,
    Unknown,
}

impl Default for RunState {
    fn default() -> Self {
        RunState::Unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcState {
    pub name: String,
    pub state: RunState,
    pub ppid: i32,
    pub tty: i32,
    pub priority: i32,
    pub nice: i32,
    pub processor: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcMem {
    pub size: u64,
    pub resident: u64,
    pub share: u64,
    pub minor_faults: u64,
    pub major_faults: u64,
    pub page_faults: u64,
}

/// Process times in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcTime {
    pub start_time: u64,
    pub user: u64,
    pub sys: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcArgs {
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcExe {
    pub name: String,
    pub cwd: String,
    pub root: String,
}
