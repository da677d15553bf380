//! Caller identity as handed over by the upstream authentication layer.
//!
//! Credentials are checked before requests reach this service; the gateway
//! forwards the caller's granted authorities in a trusted header. A request
//! without that header is anonymous and resolves to [`Role::None`].

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, request::Parts},
};
use platform_authz::Role;

use crate::http::AppState;

const USER_HEADER: &str = "x-authenticated-user";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Principal {
    pub user: Option<String>,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn from_headers(headers: &HeaderMap, authorities_header: &HeaderName) -> Self {
        let authorities = headers
            .get_all(authorities_header)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|authority| !authority.is_empty())
            .map(str::to_string)
            .collect();
        let user = headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_string);
        Self { user, authorities }
    }

    pub fn role(&self) -> Role {
        Role::from_authorities(&self.authorities)
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(
            &parts.headers,
            &state.config.authorities_header,
        ))
    }
}
