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

//! PerfApi backed by the real Pdh.dll.
//!
//! The library is loaded the first time any call is made and stays loaded for
//! the rest of the process. If loading fails that failure is remembered and
//! returned from every call.
use std::ffi::CString;
use std::mem;
use std::ptr::{null, null_mut};

use lazy_static;
use log::debug;
use winapi::shared::basetsd::DWORD_PTR;
use winapi::shared::minwindef::{DWORD, FARPROC, HMODULE, LPDWORD};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::{GetProcAddress, LoadLibraryW};
use winapi::um::pdh::{
    PDH_FMT_COUNTERVALUE_u, PDH_FMT_COUNTERVALUE, PDH_HCOUNTER as HCounter,
    PDH_HQUERY as HQuery, PDH_STATUS,
};
use winapi::um::winnt::LPCWSTR;

use crate::api::{CounterNames, Format, FormattedValue, PerfApi, RawCounter, RawQuery};
use crate::constants::*;
use crate::error::{Error, Result};
use crate::status::{check_data_status, check_status, PdhStatus};
use crate::str_to_utf16;

const PDH_DLL: &'static str = "Pdh.dll";

type OpenQueryFn = unsafe extern "system" fn(LPCWSTR, DWORD_PTR, *mut HQuery) -> PDH_STATUS;
type CloseQueryFn = unsafe extern "system" fn(HQuery) -> PDH_STATUS;
type AddCounterFn =
    unsafe extern "system" fn(HQuery, LPCWSTR, DWORD_PTR, *mut HCounter) -> PDH_STATUS;
type RemoveCounterFn = unsafe extern "system" fn(HCounter) -> PDH_STATUS;
type CollectQueryDataFn = unsafe extern "system" fn(HQuery) -> PDH_STATUS;
type GetFormattedCounterValueFn =
    unsafe extern "system" fn(HCounter, DWORD, LPDWORD, *mut PDH_FMT_COUNTERVALUE) -> PDH_STATUS;

struct PdhLibrary {
    open_query: OpenQueryFn,
    close_query: CloseQueryFn,
    add_counter: AddCounterFn,
    add_english_counter: AddCounterFn,
    remove_counter: RemoveCounterFn,
    collect_query_data: CollectQueryDataFn,
    get_formatted_counter_value: GetFormattedCounterValueFn,
}

lazy_static::lazy_static! {
    static ref PDH_LIBRARY: Result<PdhLibrary> = PdhLibrary::load();
}

fn last_errno() -> u32 {
    unsafe { GetLastError() }
}

fn symbol(module: HMODULE, name: &'static str) -> Result<FARPROC> {
    let c_name = CString::new(name).map_err(|e| Error::Transport(e.to_string()))?;
    let proc_addr = unsafe { GetProcAddress(module, c_name.as_ptr()) };
    if proc_addr.is_null() {
        return Err(Error::Transport(format!(
            "{} not found in {} (os error {})",
            name,
            PDH_DLL,
            last_errno()
        )));
    }
    Ok(proc_addr)
}

impl PdhLibrary {
    fn load() -> Result<Self> {
        debug!("Loading {}", PDH_DLL);
        let wide_name = str_to_utf16(PDH_DLL)?;
        // The module is never freed. It lives as long as the process does.
        let module = unsafe { LoadLibraryW(wide_name.as_ptr()) };
        if module.is_null() {
            return Err(Error::Transport(format!(
                "unable to load {} (os error {})",
                PDH_DLL,
                last_errno()
            )));
        }
        unsafe {
            Ok(Self {
                open_query: mem::transmute::<FARPROC, OpenQueryFn>(symbol(
                    module,
                    CALL_OPEN_QUERY,
                )?),
                close_query: mem::transmute::<FARPROC, CloseQueryFn>(symbol(
                    module,
                    CALL_CLOSE_QUERY,
                )?),
                add_counter: mem::transmute::<FARPROC, AddCounterFn>(symbol(
                    module,
                    CALL_ADD_COUNTER,
                )?),
                add_english_counter: mem::transmute::<FARPROC, AddCounterFn>(symbol(
                    module,
                    CALL_ADD_ENGLISH_COUNTER,
                )?),
                remove_counter: mem::transmute::<FARPROC, RemoveCounterFn>(symbol(
                    module,
                    CALL_REMOVE_COUNTER,
                )?),
                collect_query_data: mem::transmute::<FARPROC, CollectQueryDataFn>(symbol(
                    module,
                    CALL_COLLECT_QUERY_DATA,
                )?),
                get_formatted_counter_value: mem::transmute::<FARPROC, GetFormattedCounterValueFn>(
                    symbol(module, CALL_GET_FORMATTED_COUNTER_VALUE)?,
                ),
            })
        }
    }
}

// PDH reports failure through its return value and leaves the thread's last
// error alone, so there is no errno to record.
fn check(call: &'static str, status: PDH_STATUS) -> Result<()> {
    check_status(call, PdhStatus(status as u32), 0)
}

fn wide_ptr_to_string(ptr: LPCWSTR) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0;
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}

/// The Pdh.dll backed implementation of [`PerfApi`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePdh;

impl NativePdh {
    fn library(&self) -> Result<&'static PdhLibrary> {
        match &*PDH_LIBRARY {
            Ok(lib) => Ok(lib),
            Err(e) => Err(e.clone()),
        }
    }
}

impl PerfApi for NativePdh {
    fn open_query(&self, user_data: usize) -> Result<RawQuery> {
        let lib = self.library()?;
        let mut query: HQuery = null_mut();
        let status = unsafe { (lib.open_query)(null(), user_data as DWORD_PTR, &mut query) };
        check(CALL_OPEN_QUERY, status)?;
        Ok(RawQuery(query as usize))
    }

    fn close_query(&self, query: RawQuery) -> Result<()> {
        let lib = self.library()?;
        let status = unsafe { (lib.close_query)(query.0 as HQuery) };
        check(CALL_CLOSE_QUERY, status)
    }

    fn add_counter(
        &self,
        query: RawQuery,
        path: &str,
        names: CounterNames,
    ) -> Result<RawCounter> {
        let lib = self.library()?;
        let wide_path = str_to_utf16(path)?;
        let (call, add) = match names {
            CounterNames::English => (CALL_ADD_ENGLISH_COUNTER, lib.add_english_counter),
            CounterNames::Localized => (CALL_ADD_COUNTER, lib.add_counter),
        };
        let mut counter_handle: HCounter = null_mut();
        let status =
            unsafe { add(query.0 as HQuery, wide_path.as_ptr(), 0, &mut counter_handle) };
        check(call, status)?;
        Ok(RawCounter(counter_handle as usize))
    }

    fn remove_counter(&self, counter: RawCounter) -> Result<()> {
        let lib = self.library()?;
        let status = unsafe { (lib.remove_counter)(counter.0 as HCounter) };
        check(CALL_REMOVE_COUNTER, status)
    }

    fn collect_query_data(&self, query: RawQuery) -> Result<()> {
        let lib = self.library()?;
        let status = unsafe { (lib.collect_query_data)(query.0 as HQuery) };
        check(CALL_COLLECT_QUERY_DATA, status)
    }

    fn formatted_value(&self, counter: RawCounter, format: Format) -> Result<FormattedValue> {
        let lib = self.library()?;
        let mut fmt_counter_value = unsafe {
            PDH_FMT_COUNTERVALUE {
                CStatus: 0,
                u: mem::zeroed::<PDH_FMT_COUNTERVALUE_u>(),
            }
        };
        let mut counter_type: DWORD = 0;
        let status = unsafe {
            (lib.get_formatted_counter_value)(
                counter.0 as HCounter,
                format.code(),
                &mut counter_type,
                &mut fmt_counter_value,
            )
        };
        check(CALL_GET_FORMATTED_COUNTER_VALUE, status)?;
        // The first field of the reply carries the status of the data itself.
        check_data_status(fmt_counter_value.CStatus)?;
        let value = unsafe {
            match format {
                Format::Long => FormattedValue::Int32(*fmt_counter_value.u.longValue()),
                Format::Large => FormattedValue::Int64(*fmt_counter_value.u.largeValue()),
                Format::Double => FormattedValue::Float64(*fmt_counter_value.u.doubleValue()),
                Format::Unicode => FormattedValue::String(wide_ptr_to_string(
                    *fmt_counter_value.u.WideStringValue(),
                )),
            }
        };
        Ok(value)
    }
}
