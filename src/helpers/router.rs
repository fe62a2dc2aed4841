//! Path router.
//!
//! The location is a [`Signal`] holding the full path (base path
//! included). The router component subscribes to it, so [`Router::navigate`]
//! re-renders only the router and swaps the routed component.
//!
//! # Example
//!
//! ```ignore
//! let router = Router::new("/app")
//!     .route("/", home)
//!     .route("/about", about);
//!
//! let tree = h("div", Props::new(), [
//!     router.link("/about", [text("About")]),
//!     router.element(),
//! ]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::primitives::{h, Component, Node, Props};
use crate::state::{create_signal, Signal};

/// Route rendered when no route matches, if registered.
pub const NOT_FOUND_ROUTE: &str = "/404";

struct RouterInner {
    routes: RefCell<Vec<(String, Component)>>,
    base_path: String,
    location: Signal<String>,
    history: RefCell<Vec<String>>,
}

/// Maps paths to components. Clones share routes and location.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    /// Router mounted under `base_path`, starting at the root path.
    pub fn new(base_path: &str) -> Self {
        Self::with_location(base_path, create_signal(base_path.to_string()))
    }

    /// Router reading the current location from `location`.
    pub fn with_location(base_path: &str, location: Signal<String>) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                routes: RefCell::new(Vec::new()),
                base_path: base_path.to_string(),
                location,
                history: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `component` for `path`. Later registrations of a path win.
    pub fn route(self, path: &str, component: Component) -> Self {
        {
            let mut routes = self.inner.routes.borrow_mut();
            routes.retain(|(existing, _)| existing != path);
            routes.push((path.to_string(), component));
        }
        self
    }

    pub fn location(&self) -> &Signal<String> {
        &self.inner.location
    }

    /// Current path relative to the base path; `/` when empty.
    pub fn current_path(&self) -> String {
        self.inner.location.with(|location| self.relative(location))
    }

    fn relative(&self, location: &str) -> String {
        let path = location.strip_prefix(self.inner.base_path.as_str()).unwrap_or(location);
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    }

    fn lookup(&self, path: &str) -> Option<Component> {
        self.inner
            .routes
            .borrow()
            .iter()
            .find(|(route, _)| route == path)
            .map(|(_, component)| component.clone())
    }

    /// Component for `path`, falling back to the not-found route.
    pub fn resolve(&self, path: &str) -> Option<Component> {
        self.lookup(path).or_else(|| self.lookup(NOT_FOUND_ROUTE))
    }

    /// Go to `path` (relative to the base path).
    pub fn navigate(&self, path: &str) {
        let target = format!("{}{path}", self.inner.base_path);
        debug!(%target, "navigate");
        let previous = self.inner.location.get();
        self.inner.history.borrow_mut().push(previous);
        self.inner.location.set(target);
    }

    /// Return to the location before the last `navigate`. False if there is none.
    pub fn back(&self) -> bool {
        let previous = self.inner.history.borrow_mut().pop();
        match previous {
            Some(previous) => {
                self.inner.location.set(previous);
                true
            }
            None => false,
        }
    }

    /// Descriptor of the routing component.
    pub fn element(&self) -> Node {
        let router = self.clone();
        Component::new("Router", move |hooks, _props| {
            let location = hooks.use_signal(router.location());
            let path = router.relative(&location);
            match router.resolve(&path) {
                Some(component) => component.element(Props::new()),
                None => h("div", Props::new(), ["404 Not Found"]),
            }
        })
        .element(Props::new())
    }

    /// Anchor that navigates to `to` on click instead of following the href.
    pub fn link<I>(&self, to: &str, children: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let router = self.clone();
        let target = to.to_string();
        let props = Props::new()
            .with("href", format!("{}{to}", self.inner.base_path))
            .handler("onClick", move |event| {
                event.prevent_default();
                router.navigate(&target);
            });
        h("a", props, children)
    }
}
