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

use crate::credential::SecretBundle;
use async_trait::async_trait;
use yqsign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed secret bundle.
///
/// This provider is used when the four secrets are already at hand and need
/// no loading.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    bundle: SecretBundle,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider from the four secrets.
    pub fn new(access_key: &str, secret_key: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            bundle: SecretBundle::new(access_key, secret_key, api_key, api_secret),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = SecretBundle;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.bundle.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() -> anyhow::Result<()> {
        let provider = StaticCredentialProvider::new("AK1", "SK1", "APIK", "APIS");
        let cred = provider.provide_credential(&Context::new()).await?;
        assert_eq!(cred, Some(SecretBundle::new("AK1", "SK1", "APIK", "APIS")));

        Ok(())
    }
}
