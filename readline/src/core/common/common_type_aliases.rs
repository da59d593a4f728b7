// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ReadlineError;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type ReadlineResult<T> = Result<T, ReadlineError>;
