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
use thiserror::Error;

use crate::status::{PdhStatus, StatusKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A native call ran and reported failure.
    #[error("{call} failed with {status} (os error {errno})")]
    NativeCall {
        call: &'static str,
        status: PdhStatus,
        errno: u32,
    },

    /// The metric is not supported by this provider.
    #[error("not implemented")]
    NotImplemented,

    /// The native call could not be made at all.
    #[error("unable to call into the platform: {0}")]
    Transport(String),
}

impl Error {
    pub fn native(call: &'static str, kind: StatusKind) -> Self {
        Error::NativeCall {
            call,
            status: kind.into(),
            errno: 0,
        }
    }

    pub fn status(&self) -> Option<PdhStatus> {
        match self {
            Error::NativeCall { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn status_kind(&self) -> Option<StatusKind> {
        self.status().and_then(|s| s.kind())
    }

    pub fn is_not_implemented(&self) -> bool {
        *self == Error::NotImplemented
    }
}
