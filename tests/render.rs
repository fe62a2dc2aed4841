use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sea_ui::*;

type Captured<T> = Rc<RefCell<Option<T>>>;

fn captured<T>() -> Captured<T> {
    Rc::new(RefCell::new(None))
}

fn take<T: Clone>(slot: &Captured<T>) -> T {
    slot.borrow().clone().expect("value captured during render")
}

fn setup() -> (Rc<MemoryHost>, NodeId, Runtime<MemoryHost>) {
    let host = Rc::new(MemoryHost::new());
    let container = host.container();
    let runtime = Runtime::new(host.clone());
    (host, container, runtime)
}

#[test]
fn test_render_div_with_text() {
    let (host, container, runtime) = setup();

    let node = runtime.render(&h("div", Props::new(), ["hello"]), container).unwrap();

    assert_eq!(host.children(container), vec![node]);
    assert_eq!(host.tag(node).as_deref(), Some("div"));
    let children = host.children(node);
    assert_eq!(children.len(), 1);
    assert_eq!(host.text(children[0]).as_deref(), Some("hello"));
}

#[test]
fn test_props_become_properties_and_listeners() {
    let (host, container, runtime) = setup();
    let clicks = Rc::new(Cell::new(0));

    let clicks_clone = clicks.clone();
    let props = Props::new()
        .with("id", "go")
        .with("disabled", false)
        .handler("onClick", move |_| clicks_clone.set(clicks_clone.get() + 1));
    let button = runtime.render(&h("button", props, ["Go"]), container).unwrap();

    assert_eq!(host.property(button, "id"), Some(serde_json::json!("go")));
    assert_eq!(host.property(button, "disabled"), Some(serde_json::json!(false)));
    assert_eq!(host.property(button, "onClick"), None);
    assert_eq!(host.listener_count(button, "click"), 1);

    host.fire(button, "click");
    host.fire(button, "click");
    assert_eq!(clicks.get(), 2);
    assert_eq!(host.to_markup(container), r#"<root><button id="go" disabled="false">Go</button></root>"#);
}

#[test]
fn test_update_leaves_siblings_untouched() {
    let (host, container, runtime) = setup();
    let set_n: Captured<Setter<i32>> = captured();

    let set_n_clone = set_n.clone();
    let counter = Component::new("Counter", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_n_clone.borrow_mut() = Some(sn);
        h("span", Props::new(), [text(n.to_string())])
    });

    let tree = h("div", Props::new(), [
        h("p", Props::new(), ["left"]),
        counter.element(Props::new()),
        h("p", Props::new(), ["right"]),
    ]);
    let div = runtime.render(&tree, container).unwrap();

    let before = host.children(div);
    let left_text = host.children(before[0]);

    take(&set_n).set(1);

    let after = host.children(div);
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_ne!(after[1], before[1]);
    assert_eq!(host.children(after[0]), left_text);
    assert_eq!(host.parent(before[1]), None);
    assert_eq!(host.text_content(div), "left1right");

    let id = runtime.find_instances("Counter")[0];
    assert_eq!(runtime.instance_node(id), Some(after[1]));
}

#[test]
fn test_component_props_and_children() {
    let (host, container, runtime) = setup();

    let card = Component::new("Card", |_hooks, props| {
        h("section", Props::new().with("title", props.str("title").unwrap_or("")), props.children().to_vec())
    });

    let tree = card.with_children(Props::new().with("title", "News"), [text("a"), text("b")]);
    runtime.render(&tree, container).unwrap();

    assert_eq!(host.to_markup(container), r#"<root><section title="News">ab</section></root>"#);
}

#[test]
fn test_nested_components_sharing_a_root_stay_connected() {
    let (host, container, runtime) = setup();
    let set_outer: Captured<Setter<i32>> = captured();
    let set_inner: Captured<Setter<i32>> = captured();

    let set_inner_clone = set_inner.clone();
    let inner = Component::new("Inner", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_inner_clone.borrow_mut() = Some(sn);
        text(format!("inner {n}"))
    });

    let set_outer_clone = set_outer.clone();
    let outer = Component::new("Outer", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_outer_clone.borrow_mut() = Some(sn);
        inner.element(Props::new().with("outer", n))
    });

    let handle = runtime.mount(&outer.element(Props::new()), container).unwrap();

    take(&set_inner).set(1);
    assert_eq!(host.text_content(container), "inner 1");
    assert_eq!(handle.node(), host.children(container)[0]);

    take(&set_outer).set(1);
    assert_eq!(host.text_content(container), "inner 0");
    assert_eq!(handle.node(), host.children(container)[0]);
    assert!(runtime.take_errors().is_empty());
    assert_eq!(runtime.instance_count(), 2);
}

#[test]
fn test_parent_rerender_tears_down_children() {
    let (_host, container, runtime) = setup();
    let signal = create_signal(0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let set_show: Captured<Setter<bool>> = captured();
    let set_tick: Captured<Setter<i32>> = captured();

    let (signal_clone, log_clone) = (signal.clone(), log.clone());
    let child = Component::new("Child", move |hooks, _props| {
        let value = hooks.use_signal(&signal_clone);
        let log = log_clone.clone();
        hooks.use_effect((), move || {
            log.borrow_mut().push("mount");
            Box::new(move || log.borrow_mut().push("cleanup")) as Cleanup
        });
        text(value.to_string())
    });

    let (set_show_clone, set_tick_clone) = (set_show.clone(), set_tick.clone());
    let parent = Component::new("Parent", move |hooks, _props| {
        let (show, ss) = hooks.use_state(true);
        let (tick, st) = hooks.use_state(0);
        *set_show_clone.borrow_mut() = Some(ss);
        *set_tick_clone.borrow_mut() = Some(st);
        if show {
            h("div", Props::new().with("tick", tick), [child.element(Props::new())])
        } else {
            text("hidden")
        }
    });

    runtime.render(&parent.element(Props::new()), container).unwrap();
    assert_eq!(signal.subscriber_count(), 1);

    take(&set_tick).set(1);
    assert_eq!(*log.borrow(), ["mount", "cleanup", "mount"]);
    assert_eq!(signal.subscriber_count(), 1);
    assert_eq!(runtime.instance_count(), 2);

    take(&set_show).set(false);
    assert_eq!(*log.borrow(), ["mount", "cleanup", "mount", "cleanup"]);
    assert_eq!(signal.subscriber_count(), 0);
    assert_eq!(runtime.instance_count(), 1);
}

#[test]
fn test_signal_drives_subscribed_component() {
    let (host, container, runtime) = setup();
    let count = create_signal(1);

    let count_clone = count.clone();
    let view = Component::new("View", move |hooks, _props| {
        let n = hooks.use_signal(&count_clone);
        text(format!("n={n}"))
    });

    runtime.render(&view.element(Props::new()), container).unwrap();
    count.set(2);
    count.update(|n| n * 10);

    assert_eq!(host.text_content(container), "n=20");
}

#[test]
fn test_store_drives_subscribed_component() {
    let (host, container, runtime) = setup();
    let store = create_store(serde_json::json!({ "a": 1, "b": 2 }));

    let store_clone = store.clone();
    let view = Component::new("View", move |hooks, _props| {
        let state = hooks.use_store(&store_clone);
        text(state.to_string())
    });

    runtime.render(&view.element(Props::new()), container).unwrap();
    store.set_state(serde_json::json!({ "b": 3 }));

    assert_eq!(host.text_content(container), r#"{"a":1,"b":3}"#);
}

#[test]
fn test_unmount_runs_cleanups_and_ignores_stale_setters() {
    let (host, container, runtime) = setup();
    let log = Rc::new(RefCell::new(Vec::new()));
    let set_n: Captured<Setter<i32>> = captured();

    let (log_clone, set_n_clone) = (log.clone(), set_n.clone());
    let app = Component::new("App", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_n_clone.borrow_mut() = Some(sn);
        let log = log_clone.clone();
        hooks.on_destroy(move || log.borrow_mut().push("destroyed"));
        text(n.to_string())
    });

    let handle = runtime.mount(&app.element(Props::new()), container).unwrap();
    handle.unmount();

    assert_eq!(*log.borrow(), ["destroyed"]);
    assert!(host.children(container).is_empty());
    assert_eq!(runtime.instance_count(), 0);

    take(&set_n).set(5);
    assert!(runtime.take_errors().is_empty());
    assert_eq!(runtime.instance_count(), 0);
}

#[test]
fn test_dropping_runtime_tears_down_instances() {
    let host = Rc::new(MemoryHost::new());
    let container = host.container();
    let destroyed = Rc::new(Cell::new(0));

    let destroyed_clone = destroyed.clone();
    let app = Component::new("App", move |hooks, _props| {
        let destroyed = destroyed_clone.clone();
        hooks.use_effect((), move || Box::new(move || destroyed.set(destroyed.get() + 1)) as Cleanup);
        text("x")
    });

    {
        let runtime = Runtime::new(host.clone());
        runtime.render(&h("div", Props::new(), [app.element(Props::new()), app.element(Props::new())]), container)
            .unwrap();
    }

    assert_eq!(destroyed.get(), 2);
}

/// Keeps the host subtree when both renders produced the same text.
struct KeepSameText;

impl Reconciler for KeepSameText {
    fn diff(&self, old: &Node, new: &Node) -> Patch {
        match (old.as_text(), new.as_text()) {
            (Some(a), Some(b)) if a == b => Patch::Keep,
            _ => Patch::Replace(new.clone()),
        }
    }

    fn apply(&self, target: NodeId, patch: Patch, cx: &dyn Materializer) -> Result<NodeId, RenderError> {
        ReplaceSubtree.apply(target, patch, cx)
    }
}

#[test]
fn test_custom_reconciler_can_keep_subtrees() {
    let host = Rc::new(MemoryHost::new());
    let container = host.container();
    let runtime = Runtime::with_reconciler(host.clone(), RuntimeConfig::default(), KeepSameText);
    let set_n: Captured<Setter<i32>> = captured();

    let set_n_clone = set_n.clone();
    let half = Component::new("Half", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_n_clone.borrow_mut() = Some(sn);
        text((n / 2).to_string())
    });

    let first = runtime.render(&half.element(Props::new()), container).unwrap();

    take(&set_n).set(1);
    assert_eq!(host.children(container), vec![first]);

    take(&set_n).set(2);
    let current = host.children(container);
    assert_ne!(current, vec![first]);
    assert_eq!(host.text_content(container), "1");
}

#[test]
fn test_tree_printer_outlines_rendered_tree() {
    let (host, container, runtime) = setup();
    runtime
        .render(&h("ul", Props::new(), [h("li", Props::new(), ["one"])]), container)
        .unwrap();

    let mut out = Vec::new();
    write_tree(&mut out, &host, container, TreeStyle::plain()).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "<root>\n  <ul>\n    <li>\n      \"one\"\n");
}

#[test]
fn test_unmount_after_root_rerender_releases_tree() {
    let (host, container, runtime) = setup();
    let count = create_signal(0);

    let count_clone = count.clone();
    let view = Component::new("View", move |hooks, _props| {
        let n = hooks.use_signal(&count_clone);
        h("p", Props::new(), [text(n.to_string())])
    });

    let node = runtime.render(&view.element(Props::new()), container).unwrap();
    count.set(1);

    let current = runtime.mounted_node(node).unwrap();
    assert_ne!(current, node);
    assert_eq!(host.children(container), vec![current]);
    assert_eq!(runtime.mounted_node(current), Some(current));

    runtime.unmount(node);

    assert_eq!(runtime.instance_count(), 0);
    assert!(host.children(container).is_empty());
    assert_eq!(count.subscriber_count(), 0);
    assert_eq!(runtime.mounted_node(node), None);
}

// =============================================================================
// Panics
// =============================================================================

fn quiet<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f))
}

#[test]
fn test_panicking_component_leaves_runtime_usable() {
    let (host, container, runtime) = setup();
    let theme = create_context("default".to_string());

    let boom = Component::new("Boom", |hooks, _props| {
        let _ = hooks.use_state(0);
        panic!("component failed");
    });
    let tree = theme.provider("provided".to_string(), boom.element(Props::new()));

    assert!(quiet(|| runtime.render(&tree, container)).is_err());
    assert_eq!(runtime.instance_count(), 0);
    assert!(!runtime.is_rendering());
    assert!(host.children(container).is_empty());

    let theme_clone = theme.clone();
    let reader = Component::new("Reader", move |hooks, _props| text(hooks.use_context(&theme_clone)));
    let node = runtime.render(&reader.element(Props::new()), container).unwrap();

    assert_eq!(host.text(node).as_deref(), Some("default"));
    let id = runtime.find_instances("Reader")[0];
    assert_eq!(runtime.render_count(id), Some(1));
}

#[test]
fn test_panicking_effect_propagates_out_of_render() {
    let (_host, container, runtime) = setup();
    let cleaned = Rc::new(Cell::new(false));

    let cleaned_clone = cleaned.clone();
    let app = Component::new("App", move |hooks, _props| {
        let cleaned = cleaned_clone.clone();
        hooks.use_effect((), move || Box::new(move || cleaned.set(true)) as Cleanup);
        hooks.use_effect((), || -> Option<Cleanup> { panic!("effect failed") });
        text("never")
    });

    let result = quiet(|| runtime.render(&app.element(Props::new()), container));

    assert!(result.is_err());
    assert_eq!(runtime.instance_count(), 0);
    // The half-mounted instance is torn down with the cleanups it registered.
    assert!(cleaned.get());
}

#[test]
fn test_panicking_update_keeps_siblings_and_ancestors() {
    let (host, container, runtime) = setup();
    let set_n: Captured<Setter<i32>> = captured();

    let child = Component::new("Child", |_hooks, props| {
        if props.bool("fail") == Some(true) {
            panic!("child failed");
        }
        text("ok")
    });
    let set_n_clone = set_n.clone();
    let counter = Component::new("Counter", move |hooks, _props| {
        let (n, sn) = hooks.use_state(0);
        *set_n_clone.borrow_mut() = Some(sn);
        h("span", Props::new(), [
            text(n.to_string()),
            child.element(Props::new().with("fail", n == 1)),
        ])
    });

    let tree = h("div", Props::new(), [
        h("p", Props::new(), [text("left")]),
        counter.element(Props::new()),
        h("p", Props::new(), [text("right")]),
    ]);
    let div = runtime.render(&tree, container).unwrap();
    let before = host.children(div);
    let nodes_before = host.len();

    let set_n = take(&set_n);
    assert!(quiet(|| set_n.set(1)).is_err());

    // The old subtree stays in place; nodes built before the failure remain.
    assert_eq!(host.children(container), vec![div]);
    assert_eq!(host.children(div), before);
    assert_eq!(host.text_content(div), "left0okright");
    assert!(host.len() > nodes_before);
    assert!(!runtime.is_rendering());
    assert!(runtime.find_instances("Child").is_empty());

    set_n.set(2);
    let after = host.children(div);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(host.text_content(div), "left2okright");
    assert_eq!(runtime.find_instances("Child").len(), 1);
}
