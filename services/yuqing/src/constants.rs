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

// Env values used by yuqing signers.
pub const YQSIGN_API_ROOT: &str = "YQSIGN_API_ROOT";
pub const YQSIGN_SECRETS_FILE: &str = "YQSIGN_SECRETS_FILE";
pub const YQSIGN_SECRETS: &str = "YQSIGN_SECRETS";
pub const YQSIGN_AUTH_VERSION: &str = "YQSIGN_AUTH_VERSION";

/// Api root used when none is configured.
pub const DEFAULT_API_ROOT: &str = "http://yuqing.baidu.com";

// Authorization protocol values.
pub const AUTH_VERSION: &str = "v1";
/// Validity window of an authorization value in seconds, embedded but not enforced client side.
pub const EXPIRE_TIME: &str = "1800";
pub const EXPIRE_SECONDS: i64 = 1800;
/// Headers are re-signed once less than this many seconds of the window remain.
pub const EXPIRE_BUFFER_SECONDS: i64 = 120;

// Header values sent with every request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const ACCEPT_ANY: &str = "*/*";

// Secret names, a secret source must carry exactly these keys.
pub const ACCESS_KEY: &str = "access_key";
pub const SECRET_KEY: &str = "secret_key";
pub const API_KEY: &str = "api_key";
pub const API_SECRET: &str = "api_secret";
pub const SECRET_NAMES: [&str; 4] = [ACCESS_KEY, SECRET_KEY, API_KEY, API_SECRET];

// Fields every request body carries.
pub const USER_KEY: &str = "user_key";
pub const TOKEN: &str = "token";
pub const TIMESTAMP: &str = "timestamp";
