use crate::context::Context;
use std::sync::Mutex;

/// How many idle contexts the pool keeps around; releases beyond this are
/// dropped instead of cached.
const MAX_IDLE: usize = 64;

/// A shared pool of per-request [`Context`] values.
///
/// Exactly one in-flight request owns a context between `acquire` and
/// `release`. `release` clears every request-scoped field before the
/// instance becomes eligible for reuse, so a later request can never
/// observe a previous request's handler chain, parameters or body.
pub(crate) struct ContextPool {
    idle: Mutex<Vec<Box<Context>>>,
}

impl ContextPool {
    pub(crate) fn new() -> Self {
        ContextPool {
            idle: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn acquire(&self) -> Box<Context> {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        idle.pop().unwrap_or_default()
    }

    pub(crate) fn release(&self, mut cx: Box<Context>) {
        cx.clear();
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < MAX_IDLE {
            idle.push(cx);
        }
    }
}
