// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::pin::Pin;

use tokio::io::AsyncRead;

/// Type alias for a `Send`-able output sink (stdout, a file, [`crate::StdoutMock`], etc).
pub type SendRawTerminal = dyn std::io::Write + Send;

/// Type alias for a pinned byte stream that is async safe.
pub type PinnedInputStream = Pin<Box<dyn AsyncRead + Send>>;
