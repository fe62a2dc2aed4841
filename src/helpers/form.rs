//! Form state: field values, validation errors and submission.
//!
//! Handlers read the field from the event detail, which hosts fill the way
//! a DOM fills `event.target`: `{"name": "email", "value": "a@b.c"}`.
//!
//! ```ignore
//! let form = use_form(hooks, FormOptions::new(initial)
//!     .validate(|values| required(values, "email"))
//!     .on_submit(|values| save(values)));
//!
//! h("form", Props::new().handler("onSubmit", {
//!     let submit = form.handle_submit.clone();
//!     move |event| submit(event)
//! }), [
//!     tag("input", form.field("email")),
//!     text(form.error("email").unwrap_or("")),
//! ])
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::engine::{Hooks, Ref, Setter};
use crate::primitives::{PropValue, Props};
use crate::types::{Event, EventHandler};

pub type FormValues = Map<String, Value>;

/// Error message per field name.
pub type FormErrors = BTreeMap<String, String>;

type Validate = Rc<dyn Fn(&FormValues) -> FormErrors>;
type Submit = Rc<dyn Fn(&FormValues) -> Result<(), String>>;

// =============================================================================
// Options
// =============================================================================

/// Configuration for [`use_form`]. The latest options passed are the ones
/// the handlers use.
#[derive(Clone, Default)]
pub struct FormOptions {
    initial_values: FormValues,
    validate: Option<Validate>,
    on_submit: Option<Submit>,
}

impl FormOptions {
    pub fn new(initial_values: FormValues) -> Self {
        Self {
            initial_values,
            ..Self::default()
        }
    }

    /// Validation run on change, blur and submit. An empty map means valid.
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&FormValues) -> FormErrors + 'static,
    {
        self.validate = Some(Rc::new(validate));
        self
    }

    /// Called with the values when a submit passes validation.
    pub fn on_submit<F>(mut self, on_submit: F) -> Self
    where
        F: Fn(&FormValues) -> Result<(), String> + 'static,
    {
        self.on_submit = Some(Rc::new(on_submit));
        self
    }
}

// =============================================================================
// Form
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
struct FormState {
    values: FormValues,
    errors: FormErrors,
    submitting: bool,
}

/// Snapshot of the form for one render, plus its handlers.
///
/// The handlers keep their identity across renders.
#[derive(Clone)]
pub struct Form {
    pub values: FormValues,
    pub errors: FormErrors,
    pub is_submitting: bool,
    pub is_valid: bool,
    pub handle_change: EventHandler,
    pub handle_blur: EventHandler,
    pub handle_submit: EventHandler,
    pub reset: Rc<dyn Fn()>,
}

impl Form {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Props for an input bound to field `name`: `name`, `value`, `onInput`
    /// and `onBlur`.
    pub fn field(&self, name: &str) -> Props {
        let mut props = Props::new()
            .with("name", name)
            .with("value", self.value(name).cloned().unwrap_or(Value::Null));
        props.set("onInput", PropValue::Handler(self.handle_change.clone()));
        props.set("onBlur", PropValue::Handler(self.handle_blur.clone()));
        props
    }
}

/// `(name, value)` carried by a form event.
fn field(event: &Event) -> Option<(String, Value)> {
    let name = event.detail.get("name")?.as_str()?.to_string();
    let value = event.detail.get("value").cloned().unwrap_or(Value::Null);
    Some((name, value))
}

fn with_errors(state: &FormState, errors: FormErrors) -> FormState {
    FormState {
        errors,
        ..state.clone()
    }
}

fn with_submitting(state: &FormState, submitting: bool) -> FormState {
    FormState {
        submitting,
        ..state.clone()
    }
}

/// Form values, validation errors and submit/change/blur handlers.
pub fn use_form(hooks: &mut Hooks<'_>, options: FormOptions) -> Form {
    let (state, set_state) = hooks.use_state_with(|| FormState {
        values: options.initial_values.clone(),
        ..FormState::default()
    });
    let latest = hooks.use_ref(options.clone());
    latest.set(options);

    let handle_change: EventHandler = hooks.use_callback((), {
        let (set_state, latest) = (set_state.clone(), latest.clone());
        move |event: &Event| change(&set_state, &latest, event)
    });
    let handle_blur: EventHandler = hooks.use_callback((), {
        let (set_state, latest) = (set_state.clone(), latest.clone());
        move |event: &Event| blur(&set_state, &latest, event)
    });
    let handle_submit: EventHandler = hooks.use_callback((), {
        let (set_state, latest) = (set_state.clone(), latest.clone());
        move |event: &Event| submit(&set_state, &latest, event)
    });
    let reset: Rc<dyn Fn()> = hooks.use_callback((), move || {
        let values = latest.with(|options| options.initial_values.clone());
        set_state.set(FormState {
            values,
            ..FormState::default()
        });
    });

    Form {
        is_valid: state.errors.is_empty(),
        is_submitting: state.submitting,
        values: state.values,
        errors: state.errors,
        handle_change,
        handle_blur,
        handle_submit,
        reset,
    }
}

fn change(state: &Setter<FormState>, options: &Ref<FormOptions>, event: &Event) {
    let Some((name, value)) = field(event) else {
        warn!(event = %event.name, "form event without a field name ignored");
        return;
    };
    let validate = options.with(|options| options.validate.clone());
    state.update(|prev| {
        let mut next = prev.clone();
        next.values.insert(name, value);
        if let Some(validate) = validate {
            next.errors = validate(&next.values);
        }
        next
    });
}

fn blur(state: &Setter<FormState>, options: &Ref<FormOptions>, event: &Event) {
    let Some(validate) = options.with(|options| options.validate.clone()) else {
        return;
    };
    state.update(|prev| {
        // Validate as if the field already held the value, without storing it.
        let mut values = prev.values.clone();
        if let Some((name, value)) = field(event) {
            values.insert(name, value);
        }
        with_errors(prev, validate(&values))
    });
}

fn submit(state: &Setter<FormState>, options: &Ref<FormOptions>, event: &Event) {
    event.prevent_default();
    let (validate, on_submit) = options.with(|options| (options.validate.clone(), options.on_submit.clone()));

    let current = state.get();
    if let Some(validate) = validate {
        let errors = validate(&current.values);
        let valid = errors.is_empty();
        state.set(with_errors(&current, errors));
        if !valid {
            return;
        }
    }

    let Some(on_submit) = on_submit else { return };
    state.update(|prev| with_submitting(prev, true));
    if let Err(err) = on_submit(&current.values) {
        warn!(%err, "form submission failed");
    }
    state.update(|prev| with_submitting(prev, false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;
    use serde_json::json;

    #[test]
    fn test_field_reads_event_detail() {
        let target = NodeId::from_raw(1);

        let event = Event::new("input", target).with_detail(json!({ "name": "email", "value": "a@b.c" }));
        assert_eq!(field(&event), Some(("email".to_string(), json!("a@b.c"))));

        let event = Event::new("input", target).with_detail(json!({ "name": "agree" }));
        assert_eq!(field(&event), Some(("agree".to_string(), Value::Null)));

        assert_eq!(field(&Event::new("input", target)), None);
    }

    #[test]
    fn test_state_copies() {
        let state = FormState::default();
        assert!(with_submitting(&state, true).submitting);

        let errors = FormErrors::from([("a".to_string(), "required".to_string())]);
        let next = with_errors(&state, errors.clone());
        assert_eq!(next.errors, errors);
        assert!(!next.submitting);
    }
}
