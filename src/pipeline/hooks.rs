//! Typed extension points on the dispatch pipeline.
//!
//! Observers register on one of three slots with an integer priority; the
//! pipeline fires each slot at the matching moment. Hooks run in ascending
//! priority order, insertion order within equal priorities, so a
//! high-priority observer sees pipeline state after every lower-priority
//! handler has run.

use std::sync::Arc;

use super::{Controller, View};

/// Payload of the `before_dispatch` extension point.
///
/// Carries no controller when routing matched nothing.
#[derive(Clone)]
pub struct DispatchEvent {
    controller: Option<Arc<dyn Controller>>,
}

impl DispatchEvent {
    /// Creates the event fired once routing resolved.
    pub fn new(controller: Option<Arc<dyn Controller>>) -> Self {
        DispatchEvent { controller }
    }

    /// Controller selected by routing, if any.
    pub fn controller(&self) -> Option<&Arc<dyn Controller>> {
        self.controller.as_ref()
    }
}

/// Payload of the `controller_startup` extension point.
#[derive(Clone)]
pub struct StartupEvent {
    controller: Arc<dyn Controller>,
}

impl StartupEvent {
    /// Creates the event fired before the controller action runs.
    pub fn new(controller: Arc<dyn Controller>) -> Self {
        StartupEvent { controller }
    }

    /// Controller starting up.
    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.controller
    }
}

/// Payload of the `before_render` extension point.
#[derive(Clone)]
pub struct RenderEvent {
    view: Arc<dyn View>,
}

impl RenderEvent {
    /// Creates the event fired before the view renders.
    pub fn new(view: Arc<dyn View>) -> Self {
        RenderEvent { view }
    }

    /// View about to render.
    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }
}

type Hook<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Registration slots handed to the application for one dispatch run.
///
/// Registration needs `&mut` and happens before the run; the application
/// only receives `&DispatchHooks` and can only fire.
#[derive(Default)]
pub struct DispatchHooks {
    before_dispatch: Vec<(i32, Hook<DispatchEvent>)>,
    controller_startup: Vec<(i32, Hook<StartupEvent>)>,
    before_render: Vec<(i32, Hook<RenderEvent>)>,
}

impl DispatchHooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        DispatchHooks::default()
    }

    /// Registers an observer on `before_dispatch`.
    pub fn on_before_dispatch<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(&DispatchEvent) + Send + Sync + 'static,
    {
        self.before_dispatch.push((priority, Box::new(hook)));
        self.before_dispatch.sort_by_key(|(priority, _)| *priority);
    }

    /// Registers an observer on `controller_startup`.
    pub fn on_controller_startup<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(&StartupEvent) + Send + Sync + 'static,
    {
        self.controller_startup.push((priority, Box::new(hook)));
        self.controller_startup
            .sort_by_key(|(priority, _)| *priority);
    }

    /// Registers an observer on `before_render`.
    pub fn on_before_render<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(&RenderEvent) + Send + Sync + 'static,
    {
        self.before_render.push((priority, Box::new(hook)));
        self.before_render.sort_by_key(|(priority, _)| *priority);
    }

    /// Fires `before_dispatch` observers in priority order.
    pub fn fire_before_dispatch(&self, event: &DispatchEvent) {
        for (_, hook) in &self.before_dispatch {
            hook(event);
        }
    }

    /// Fires `controller_startup` observers in priority order.
    pub fn fire_controller_startup(&self, event: &StartupEvent) {
        for (_, hook) in &self.controller_startup {
            hook(event);
        }
    }

    /// Fires `before_render` observers in priority order.
    pub fn fire_before_render(&self, event: &RenderEvent) {
        for (_, hook) in &self.before_render {
            hook(event);
        }
    }
}
