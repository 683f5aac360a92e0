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

// TODO(jwall): Drop these once winapi-rs exports the pdhmsg.h constants.

// pdhmsg.h
pub const PDH_CSTATUS_VALID_DATA: u32 = 0x00000000;
pub const PDH_CSTATUS_NEW_DATA: u32 = 0x00000001;
pub const PDH_CSTATUS_NO_MACHINE: u32 = 0x800007D0;
pub const PDH_MORE_DATA: u32 = 0x800007D2;
pub const PDH_NO_DATA: u32 = 0x800007D5;
pub const PDH_CSTATUS_NO_OBJECT: u32 = 0xC0000BB8;
pub const PDH_CSTATUS_NO_COUNTER: u32 = 0xC0000BB9;
pub const PDH_MEMORY_ALLOCATION_FAILURE: u32 = 0xC0000BBB;
pub const PDH_INVALID_HANDLE: u32 = 0xC0000BBC;
pub const PDH_INVALID_ARGUMENT: u32 = 0xC0000BBD;
pub const PDH_CSTATUS_BAD_COUNTERNAME: u32 = 0xC0000BC0;
pub const PDH_INSUFFICIENT_BUFFER: u32 = 0xC0000BC2;
pub const PDH_INVALID_DATA: u32 = 0xC0000BC6;
pub const PDH_NOT_IMPLEMENTED: u32 = 0xC0000BD3;
pub const PDH_STRING_NOT_FOUND: u32 = 0xC0000BD4;

// PDH formatting constants
/// Format the pdh counter as a f64
pub const PDH_FMT_DOUBLE: u32 = 0x00000200;
/// Format the pdh counter as an i32
pub const PDH_FMT_LONG: u32 = 0x00000100;
/// Format the pdh counter as an i64
pub const PDH_FMT_LARGE: u32 = 0x00000400;
/// Format the pdh counter as a wide string
pub const PDH_FMT_UNICODE: u32 = 0x00000040;

// Well known counter paths.
pub const COUNTER_SYSTEM_UP_TIME: &'static str = r"\System\System Up Time";
pub const COUNTER_SYSTEM_CACHE_RESIDENT_BYTES: &'static str =
    r"\Memory\System Cache Resident Bytes";

// Names used when reporting which native call failed.
pub const CALL_OPEN_QUERY: &'static str = "PdhOpenQueryW";
pub const CALL_CLOSE_QUERY: &'static str = "PdhCloseQuery";
pub const CALL_ADD_COUNTER: &'static str = "PdhAddCounterW";
pub const CALL_ADD_ENGLISH_COUNTER: &'static str = "PdhAddEnglishCounterW";
pub const CALL_REMOVE_COUNTER: &'static str = "PdhRemoveCounter";
pub const CALL_COLLECT_QUERY_DATA: &'static str = "PdhCollectQueryData";
pub const CALL_GET_FORMATTED_COUNTER_VALUE: &'static str = "PdhGetFormattedCounterValue";
