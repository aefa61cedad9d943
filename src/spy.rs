//! Observation hooks capturing pipeline-internal objects.
//!
//! Three spies register at priority 999 so they run last on their extension
//! points and observe final pipeline state. Each spy only records into the
//! shared capture slot; none suppresses or alters the pipeline's own handling
//! of the same extension point.

use std::sync::{Arc, Mutex};

use crate::pipeline::{AuthComponent, Controller, DispatchHooks, View};

/// Priority the spies register at.
pub(crate) const SPY_PRIORITY: i32 = 999;

/// What the spies saw during one dispatch run.
#[derive(Default)]
pub(crate) struct SpyCaptures {
    pub controller: Option<Arc<dyn Controller>>,
    pub auth: Option<Arc<dyn AuthComponent>>,
    pub view: Option<Arc<dyn View>>,
}

/// Registers the controller, auth, and view spies on the typed slots.
pub(crate) fn register(hooks: &mut DispatchHooks, captures: &Arc<Mutex<SpyCaptures>>) {
    // Controller spy: nothing to record when routing matched no controller.
    let seen = Arc::clone(captures);
    hooks.on_before_dispatch(SPY_PRIORITY, move |event| {
        let controller = match event.controller() {
            Some(controller) => controller,
            None => return,
        };
        seen.lock().unwrap().controller = Some(Arc::clone(controller));
    });

    // Auth spy: records only when the controller exposes an auth component.
    let seen = Arc::clone(captures);
    hooks.on_controller_startup(SPY_PRIORITY, move |event| {
        let auth = match event.controller().auth() {
            Some(auth) => auth,
            None => return,
        };
        seen.lock().unwrap().auth = Some(auth);
    });

    // View spy: records the rendering view unconditionally.
    let seen = Arc::clone(captures);
    hooks.on_before_render(SPY_PRIORITY, move |event| {
        seen.lock().unwrap().view = Some(Arc::clone(event.view()));
    });
}
