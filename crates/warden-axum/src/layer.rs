//! Tower middleware layer for the bearer-token guard.
//!
//! [`GuardLayer`] authenticates every request before the inner service runs.
//! Success publishes the verified identity as an [`IdentityExt`] extension;
//! any failure short-circuits with a 401 JSON response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use warden_auth_core::{AuthError, AuthGuard};
use warden_types::Identity;

use crate::error::GuardError;
use crate::extractors::IdentityExt;

/// Tower layer that guards every request with [`AuthGuard`].
#[derive(Clone)]
pub struct GuardLayer {
    guard: Arc<AuthGuard>,
}

impl GuardLayer {
    #[must_use]
    pub fn new(guard: AuthGuard) -> Self {
        Self {
            guard: Arc::new(guard),
        }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardService {
            inner,
            guard: Arc::clone(&self.guard),
        }
    }
}

/// The guard service.
#[derive(Clone)]
pub struct GuardService<S> {
    inner: S,
    guard: Arc<AuthGuard>,
}

impl<S> GuardService<S> {
    fn authenticate(&self, req: &Request<Body>) -> Result<Identity, AuthError> {
        let header = match req.headers().get(header::AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedCredential)?),
        };
        self.guard.authenticate(header, Utc::now())
    }
}

impl<S> Service<Request<Body>> for GuardService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = GuardServiceFuture<S>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        match self.authenticate(&req) {
            Ok(identity) => {
                tracing::debug!(
                    account_id = %identity.account_id,
                    method = %req.method(),
                    path = %req.uri().path(),
                    "Request authenticated"
                );
                req.extensions_mut().insert(IdentityExt(identity));

                // Call the instance that was driven to readiness
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                GuardServiceFuture {
                    state: FutureState::Calling {
                        future: inner.call(req),
                    },
                }
            }
            Err(err) => {
                tracing::debug!(
                    code = err.error_code(),
                    method = %req.method(),
                    path = %req.uri().path(),
                    "Request rejected by guard"
                );
                GuardServiceFuture {
                    state: FutureState::Rejected {
                        response: Some(GuardError::Rejected(err).into_response()),
                    },
                }
            }
        }
    }
}

pin_project! {
    /// Future for the guard service.
    pub struct GuardServiceFuture<S>
    where
        S: Service<Request<Body>>,
    {
        #[pin]
        state: FutureState<S>,
    }
}

pin_project! {
    #[project = FutureStateProj]
    enum FutureState<S>
    where
        S: Service<Request<Body>>,
    {
        Rejected {
            response: Option<Response>,
        },
        Calling {
            #[pin]
            future: S::Future,
        },
    }
}

impl<S> Future for GuardServiceFuture<S>
where
    S: Service<Request<Body>, Response = Response>,
{
    type Output = Result<Response, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            FutureStateProj::Rejected { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("GuardServiceFuture polled after completion"),
            },
            FutureStateProj::Calling { future } => future.poll(cx),
        }
    }
}
