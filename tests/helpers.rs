use std::cell::RefCell;
use std::rc::Rc;

use sea_ui::helpers::{FormErrors, FormValues, Persisted, NOT_FOUND_ROUTE};
use sea_ui::*;
use serde_json::{json, Value};

fn setup() -> (Rc<MemoryHost>, NodeId, Runtime<MemoryHost>) {
    let host = Rc::new(MemoryHost::new());
    let container = host.container();
    let runtime = Runtime::new(host.clone());
    (host, container, runtime)
}

fn page(name: &'static str) -> Component {
    Component::new(name, move |_hooks, _props| h("main", Props::new(), [name]))
}

#[test]
fn test_router_swaps_routed_component() {
    let (host, container, runtime) = setup();
    let router = Router::new("/app")
        .route("/", page("Home"))
        .route("/about", page("About"));

    let tree = h("div", Props::new(), [router.link("/about", ["go"]), router.element()]);
    runtime.render(&tree, container).unwrap();
    assert_eq!(host.text_content(container), "goHome");
    assert_eq!(runtime.find_instances("Home").len(), 1);

    let anchor = host.find(container, "a").unwrap();
    assert_eq!(host.property(anchor, "href"), Some(serde_json::json!("/app/about")));

    let event = host.fire(anchor, "click");
    assert!(event.default_prevented());
    assert_eq!(router.location().get(), "/app/about");
    assert_eq!(host.text_content(container), "goAbout");
    assert!(runtime.find_instances("Home").is_empty());
    assert_eq!(runtime.find_instances("About").len(), 1);
}

#[test]
fn test_router_not_found() {
    let (host, container, runtime) = setup();
    let router = Router::new("").route("/", page("Home"));

    runtime.render(&router.element(), container).unwrap();
    router.navigate("/nowhere");
    assert_eq!(host.text_content(container), "404 Not Found");

    let router = Router::new("")
        .route("/", page("Home"))
        .route(NOT_FOUND_ROUTE, page("Missing"));
    let other = host.container();
    runtime.render(&router.element(), other).unwrap();
    router.navigate("/nowhere");
    assert_eq!(host.text_content(other), "Missing");

    assert!(router.back());
    assert_eq!(host.text_content(other), "Home");
}

#[test]
fn test_router_subscription_released_on_unmount() {
    let (_host, container, runtime) = setup();
    let router = Router::new("").route("/", page("Home"));

    let node = runtime.render(&router.element(), container).unwrap();
    assert_eq!(router.location().subscriber_count(), 1);

    runtime.unmount(node);
    assert_eq!(router.location().subscriber_count(), 0);
}

#[test]
fn test_persisted_state_round_trips_through_storage() {
    let (host, container, runtime) = setup();
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    let captured: Rc<RefCell<Option<Persisted<Vec<String>>>>> = Rc::new(RefCell::new(None));

    let todos = Component::new("Todos", {
        let (storage, captured) = (storage.clone(), captured.clone());
        move |hooks, _props| {
            let (items, set_items) = use_persisted(hooks, &storage, "todos", vec!["seed".to_string()]);
            *captured.borrow_mut() = Some(set_items);
            text(items.join(","))
        }
    });

    runtime.render(&todos.element(Props::new()), container).unwrap();
    assert_eq!(host.text_content(container), "seed");
    assert_eq!(storage.get_item("todos"), None);

    let set_items = captured.borrow().clone().unwrap();
    set_items.update(|items| {
        let mut next = items.clone();
        next.push("milk".to_string());
        next
    });
    assert_eq!(host.text_content(container), "seed,milk");
    assert_eq!(storage.get_item("todos").as_deref(), Some(r#"["seed","milk"]"#));

    // A fresh mount starts from the stored value.
    let again = host.container();
    runtime.render(&todos.element(Props::new()), again).unwrap();
    assert_eq!(host.text_content(again), "seed,milk");
}

#[test]
fn test_persisted_state_survives_storage_failure() {
    let (host, container, runtime) = setup();
    let memory = Rc::new(MemoryStorage::new());
    memory.set_read_only(true);
    let storage: Rc<dyn Storage> = memory.clone();
    let captured: Rc<RefCell<Option<Persisted<i32>>>> = Rc::new(RefCell::new(None));

    let view = Component::new("View", {
        let (storage, captured) = (storage.clone(), captured.clone());
        move |hooks, _props| {
            let (n, set_n) = use_persisted(hooks, &storage, "n", 1);
            *captured.borrow_mut() = Some(set_n);
            text(n.to_string())
        }
    });

    runtime.render(&view.element(Props::new()), container).unwrap();
    let set_n = captured.borrow().clone().unwrap();
    set_n.set(2);

    assert_eq!(host.text_content(container), "2");
    assert!(memory.is_empty());
}

#[test]
fn test_use_previous() {
    let (host, container, runtime) = setup();
    let setter: Rc<RefCell<Option<Setter<i32>>>> = Rc::new(RefCell::new(None));

    let view = Component::new("View", {
        let setter = setter.clone();
        move |hooks, _props| {
            let (n, set_n) = hooks.use_state(0);
            let previous = use_previous(hooks, n);
            *setter.borrow_mut() = Some(set_n);
            text(format!("{n}/{previous:?}"))
        }
    });

    runtime.render(&view.element(Props::new()), container).unwrap();
    assert_eq!(host.text_content(container), "0/None");

    let set_n = setter.borrow().clone().unwrap();
    set_n.set(4);
    assert_eq!(host.text_content(container), "4/Some(0)");
    set_n.set(9);
    assert_eq!(host.text_content(container), "9/Some(4)");
}

#[derive(Clone, Debug)]
enum CartAction {
    Add(u32),
    Clear,
}

#[test]
fn test_use_store_state_follows_dispatches() {
    let (host, container, runtime) = setup();
    let cart = create_reducer_store(
        |total: &u32, action: CartAction| match action {
            CartAction::Add(n) => total + n,
            CartAction::Clear => 0,
        },
        0,
    );

    let view = Component::new("Cart", {
        let cart = cart.clone();
        move |hooks, _props| {
            let (total, _store) = use_store_state(hooks, &cart);
            text(format!("total {total}"))
        }
    });

    let node = runtime.render(&view.element(Props::new()), container).unwrap();
    assert_eq!(cart.subscriber_count(), 1);

    cart.dispatch(CartAction::Add(3));
    cart.dispatch_thunk(|store, get_state| {
        if get_state() < 10 {
            store.dispatch(CartAction::Add(4));
        }
    });
    assert_eq!(host.text_content(container), "total 7");

    cart.dispatch(CartAction::Clear);
    assert_eq!(host.text_content(container), "total 0");

    runtime.unmount(node);
    assert_eq!(cart.subscriber_count(), 0);
}

fn field_event(host: &MemoryHost, container: NodeId, name: &str, value: &str) {
    let input = host.find(container, "input").unwrap();
    let event = Event::new(name, input).with_detail(json!({ "name": "email", "value": value }));
    assert_eq!(host.dispatch(input, &event), 1);
}

fn email_errors(values: &FormValues) -> FormErrors {
    let mut errors = FormErrors::new();
    let email = values.get("email").and_then(Value::as_str).unwrap_or("");
    if !email.contains('@') {
        errors.insert("email".to_string(), "invalid email".to_string());
    }
    errors
}

#[test]
fn test_form_validates_submits_and_resets() {
    let (host, container, runtime) = setup();
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let submitting_seen = Rc::new(RefCell::new(Vec::new()));

    let signup = Component::new("Signup", {
        let (submitted, submitting_seen) = (submitted.clone(), submitting_seen.clone());
        move |hooks, _props| {
            let submitted = submitted.clone();
            let initial = FormValues::from_iter([("email".to_string(), json!(""))]);
            let form = use_form(
                hooks,
                FormOptions::new(initial).validate(email_errors).on_submit(move |values| {
                    submitted.borrow_mut().push(values.clone());
                    Ok(())
                }),
            );
            submitting_seen.borrow_mut().push(form.is_submitting);

            let (submit, reset) = (form.handle_submit.clone(), form.reset.clone());
            h("form", Props::new().handler("onSubmit", move |event| submit(event)), [
                tag("input", form.field("email")),
                h("button", Props::new().handler("onClick", move |_| reset()), [text("reset")]),
                text(format!("{}|{}", form.error("email").unwrap_or("ok"), form.is_valid)),
            ])
        }
    });

    runtime.render(&signup.element(Props::new()), container).unwrap();
    assert_eq!(host.text_content(container), "resetok|true");

    field_event(&host, container, "input", "nope");
    let input = host.find(container, "input").unwrap();
    assert_eq!(host.property(input, "value"), Some(json!("nope")));
    assert_eq!(host.text_content(container), "resetinvalid email|false");

    // Invalid submit: default prevented, nothing sent.
    let event = host.fire(host.find(container, "form").unwrap(), "submit");
    assert!(event.default_prevented());
    assert!(submitted.borrow().is_empty());

    field_event(&host, container, "input", "a@b.c");
    assert_eq!(host.text_content(container), "resetok|true");

    // Blur validates the pending value without storing it.
    field_event(&host, container, "blur", "bad");
    let input = host.find(container, "input").unwrap();
    assert_eq!(host.property(input, "value"), Some(json!("a@b.c")));
    assert_eq!(host.text_content(container), "resetinvalid email|false");

    host.fire(host.find(container, "form").unwrap(), "submit");
    assert_eq!(*submitted.borrow(), vec![FormValues::from_iter([("email".to_string(), json!("a@b.c"))])]);
    assert!(submitting_seen.borrow().contains(&true));
    assert_eq!(submitting_seen.borrow().last(), Some(&false));
    assert_eq!(host.text_content(container), "resetok|true");

    host.fire(host.find(container, "button").unwrap(), "click");
    let input = host.find(container, "input").unwrap();
    assert_eq!(host.property(input, "value"), Some(json!("")));
    assert_eq!(runtime.find_instances("Signup").len(), 1);
}
