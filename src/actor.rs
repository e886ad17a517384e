use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{app_state::AppState, errors::AppError};

pub const ACTOR_HEADER: &str = "x-actor";

const MAX_ACTOR_LEN: usize = 100;

/// Reads the actor named by the request, or `fallback` when it names none.
pub fn resolve_actor(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|actor| !actor.is_empty() && actor.len() <= MAX_ACTOR_LEN)
        .unwrap_or(fallback)
        .to_string()
}

/// Resolves the current actor once per request and stores it in the request
/// extensions for [`CurrentActor`].
pub struct ActorMiddleware {
    fallback: Rc<str>,
}

impl ActorMiddleware {
    pub fn new(fallback: &str) -> Self {
        Self {
            fallback: Rc::from(fallback),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ActorMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ActorMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ActorMiddlewareService {
            service: Rc::new(service),
            fallback: Rc::clone(&self.fallback),
        }))
    }
}

pub struct ActorMiddlewareService<S> {
    service: Rc<S>,
    fallback: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for ActorMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let actor = resolve_actor(req.headers(), &self.fallback);
        req.extensions_mut().insert(CurrentActor(actor));

        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}

/// The user name stamped on audit fields for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentActor(pub String);

impl CurrentActor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for CurrentActor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(actor) = req.extensions().get::<CurrentActor>() {
            return ready(Ok(actor.clone()));
        }

        // Without the middleware, fall back to the configured system actor.
        let actor = req
            .app_data::<web::Data<Arc<AppState>>>()
            .map(|state| CurrentActor(resolve_actor(req.headers(), &state.config.system_actor)))
            .ok_or_else(|| AppError::OperationFailed("Current actor not resolved".to_string()));

        ready(actor)
    }
}
