// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Tokio-based file reading implementation for yqsign.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `yqsign_core` using Tokio's file system operations.
//! It is what lets a `ConfigCredentialProvider` read a JSON secret file.
//!
//! ## Example
//!
//! ```no_run
//! use yqsign_core::{Context, OsEnv};
//! use yqsign_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/path/to/secrets.json").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use yqsign_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::config_invalid(format!("failed to read file {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use yqsign_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_file_read() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"{\"access_key\": \"ak\"}").unwrap();

        let ctx = Context::new().with_file_read(TokioFileRead);
        let content = ctx
            .file_read(f.path().to_str().unwrap())
            .await
            .expect("file read must succeed");
        assert_eq!(content, b"{\"access_key\": \"ak\"}");
    }

    #[tokio::test]
    async fn test_file_read_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");

        let ctx = Context::new().with_file_read(TokioFileRead);
        let err = ctx.file_read(path.to_str().unwrap()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
