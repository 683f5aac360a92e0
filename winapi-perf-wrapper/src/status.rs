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

//! Translation of PDH status codes into errors.
use std::fmt;

use crate::constants::*;
use crate::error::{Error, Result};

/// A raw status code returned by a PDH call. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PdhStatus(pub u32);

/// The failure reasons this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    NoMachine,
    MoreData,
    NoData,
    NoObject,
    NoCounter,
    MemoryAllocationFailure,
    InvalidHandle,
    InvalidArgument,
    BadCounterName,
    InsufficientBuffer,
    InvalidData,
    NotImplemented,
    StringNotFound,
}

impl StatusKind {
    pub const ALL: [StatusKind; 13] = [
        StatusKind::NoMachine,
        StatusKind::MoreData,
        StatusKind::NoData,
        StatusKind::NoObject,
        StatusKind::NoCounter,
        StatusKind::MemoryAllocationFailure,
        StatusKind::InvalidHandle,
        StatusKind::InvalidArgument,
        StatusKind::BadCounterName,
        StatusKind::InsufficientBuffer,
        StatusKind::InvalidData,
        StatusKind::NotImplemented,
        StatusKind::StringNotFound,
    ];

    /// The stable identifier for this kind, spelled as in pdhmsg.h.
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::NoMachine => "PDH_CSTATUS_NO_MACHINE",
            StatusKind::MoreData => "PDH_MORE_DATA",
            StatusKind::NoData => "PDH_NO_DATA",
            StatusKind::NoObject => "PDH_CSTATUS_NO_OBJECT",
            StatusKind::NoCounter => "PDH_CSTATUS_NO_COUNTER",
            StatusKind::MemoryAllocationFailure => "PDH_MEMORY_ALLOCATION_FAILURE",
            StatusKind::InvalidHandle => "PDH_INVALID_HANDLE",
            StatusKind::InvalidArgument => "PDH_INVALID_ARGUMENT",
            StatusKind::BadCounterName => "PDH_CSTATUS_BAD_COUNTERNAME",
            StatusKind::InsufficientBuffer => "PDH_INSUFFICIENT_BUFFER",
            StatusKind::InvalidData => "PDH_INVALID_DATA",
            StatusKind::NotImplemented => "PDH_NOT_IMPLEMENTED",
            StatusKind::StringNotFound => "PDH_STRING_NOT_FOUND",
        }
    }

    /// The native code for this kind.
    pub fn code(&self) -> u32 {
        match self {
            StatusKind::NoMachine => PDH_CSTATUS_NO_MACHINE,
            StatusKind::MoreData => PDH_MORE_DATA,
            StatusKind::NoData => PDH_NO_DATA,
            StatusKind::NoObject => PDH_CSTATUS_NO_OBJECT,
            StatusKind::NoCounter => PDH_CSTATUS_NO_COUNTER,
            StatusKind::MemoryAllocationFailure => PDH_MEMORY_ALLOCATION_FAILURE,
            StatusKind::InvalidHandle => PDH_INVALID_HANDLE,
            StatusKind::InvalidArgument => PDH_INVALID_ARGUMENT,
            StatusKind::BadCounterName => PDH_CSTATUS_BAD_COUNTERNAME,
            StatusKind::InsufficientBuffer => PDH_INSUFFICIENT_BUFFER,
            StatusKind::InvalidData => PDH_INVALID_DATA,
            StatusKind::NotImplemented => PDH_NOT_IMPLEMENTED,
            StatusKind::StringNotFound => PDH_STRING_NOT_FOUND,
        }
    }
}

impl PdhStatus {
    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Returns the named kind for this status. None for success and for
    /// codes outside the known table.
    pub fn kind(&self) -> Option<StatusKind> {
        match self.0 {
            PDH_CSTATUS_NO_MACHINE => Some(StatusKind::NoMachine),
            PDH_MORE_DATA => Some(StatusKind::MoreData),
            PDH_NO_DATA => Some(StatusKind::NoData),
            PDH_CSTATUS_NO_OBJECT => Some(StatusKind::NoObject),
            PDH_CSTATUS_NO_COUNTER => Some(StatusKind::NoCounter),
            PDH_MEMORY_ALLOCATION_FAILURE => Some(StatusKind::MemoryAllocationFailure),
            PDH_INVALID_HANDLE => Some(StatusKind::InvalidHandle),
            PDH_INVALID_ARGUMENT => Some(StatusKind::InvalidArgument),
            PDH_CSTATUS_BAD_COUNTERNAME => Some(StatusKind::BadCounterName),
            PDH_INSUFFICIENT_BUFFER => Some(StatusKind::InsufficientBuffer),
            PDH_INVALID_DATA => Some(StatusKind::InvalidData),
            PDH_NOT_IMPLEMENTED => Some(StatusKind::NotImplemented),
            PDH_STRING_NOT_FOUND => Some(StatusKind::StringNotFound),
            _ => None,
        }
    }
}

impl From<StatusKind> for PdhStatus {
    fn from(kind: StatusKind) -> Self {
        PdhStatus(kind.code())
    }
}

impl fmt::Display for PdhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind.name()),
            None => write!(f, "{:#010X}", self.0),
        }
    }
}

pub fn pdh_status_friendly_name(s: PdhStatus) -> String {
    format!("{}", s)
}

/// Turns the status returned by `call` into a Result. `errno` is the OS
/// error the call left behind, or 0 for calls that don't set one.
pub fn check_status(call: &'static str, status: PdhStatus, errno: u32) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(Error::NativeCall {
        call,
        status,
        errno,
    })
}

/// Checks the `CStatus` field that leads every formatted counter reply.
/// Both valid and new data count as success.
pub fn check_data_status(cstatus: u32) -> Result<()> {
    match cstatus {
        PDH_CSTATUS_VALID_DATA | PDH_CSTATUS_NEW_DATA => Ok(()),
        s => check_status(CALL_GET_FORMATTED_COUNTER_VALUE, PdhStatus(s), 0),
    }
}
