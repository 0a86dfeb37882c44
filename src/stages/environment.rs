//! Environment defaults: host, path prefix and headers.
//!
//! # Design Decisions
//! - A per-request `ServerEnvironment` option wins over the stage default
//! - Only gaps are filled: a set host, an absolute path and existing header
//!   names are left alone

use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::http::{HttpResult, Request, Response};
use crate::options::ServerEnvironment;

/// Fills in host, path prefix and headers from a [`ServerEnvironment`].
#[derive(Debug, Clone)]
pub struct EnvironmentStage {
    default: ServerEnvironment,
}

impl EnvironmentStage {
    pub fn new(default: ServerEnvironment) -> Self {
        Self { default }
    }

    pub fn environment(&self) -> &ServerEnvironment {
        &self.default
    }

    /// Apply the effective environment to `request`.
    pub fn apply(&self, mut request: Request) -> Request {
        let environment = request
            .server_environment()
            .unwrap_or_else(|| self.default.clone());

        if request.host().map_or(true, str::is_empty) {
            request.set_host(Some(environment.host().to_string()));
        }

        if !request.path().starts_with('/') {
            let path = environment.prefixed(request.path());
            request.set_path(path);
        }

        let headers = request.headers_mut();
        for name in environment.headers().keys() {
            if headers.contains_key(name) {
                continue;
            }
            for value in environment.headers().get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        request
    }
}

#[async_trait]
impl Handler for EnvironmentStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        next.run(self.apply(request)).await
    }
}
