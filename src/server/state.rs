use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::location::AirQualityApi;
use crate::session::Session;

/// One session shared by every browser tab; the catalog cache lives in it.
pub struct AppState<A> {
    pub session: Mutex<Session<A>>,
}

impl<A: AirQualityApi> AppState<A> {
    pub fn new(session: Session<A>) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// A panic in one request must not lock every later request out.
    pub fn session(&self) -> MutexGuard<'_, Session<A>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
