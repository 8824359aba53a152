use std::cell::RefCell;
use std::rc::Rc;

use boundform::form::{ChannelSink, FormState};
use boundform::prelude::*;
use futures::StreamExt;
use futures::executor::block_on;

#[derive(Clone, Debug, PartialEq, FormModel)]
struct Contact {
    #[form(required)]
    name: String,
    #[form(required, email)]
    email: String,
}

fn contact_controller() -> (FormController, RecordCollector) {
    let collector = RecordCollector::new();
    let controller = FormController::new(
        Contact::schema(),
        FormOptions::default(),
        collector.clone(),
    );
    (controller, collector)
}

fn state_of(name: &'static str, email: &'static str) -> FormState {
    [("name", name), ("email", email)].into_iter().collect()
}

#[test]
fn complete_form_is_submitted_and_cleared() {
    let (mut controller, collector) = contact_controller();
    controller.on_field_change("name", "Ada").expect("set name");
    controller
        .on_field_change("email", "ada@example.com")
        .expect("set email");

    assert_eq!(controller.on_submit(), SubmitOutcome::Submitted);
    assert_eq!(collector.len(), 1);
    assert_eq!(
        collector.last().expect("one record"),
        state_of("Ada", "ada@example.com")
    );
    assert_eq!(controller.state(), &state_of("", ""));
}

#[test]
fn missing_name_keeps_form_as_is() {
    let (mut controller, collector) = contact_controller();
    controller.on_field_change("name", "").expect("set name");
    controller
        .on_field_change("email", "ada@example.com")
        .expect("set email");

    assert_eq!(controller.on_submit(), SubmitOutcome::Suppressed);
    assert!(collector.is_empty());
    assert_eq!(controller.state(), &state_of("", "ada@example.com"));
}

#[test]
fn typed_records_reach_model_callback() {
    let contacts = Rc::new(RefCell::new(Vec::new()));
    let mut controller = {
        let contacts = contacts.clone();
        FormController::for_model::<Contact>(FormOptions::default(), move |contact| {
            contacts.borrow_mut().push(contact)
        })
    };
    let fields = Contact::fields();
    for event in [
        FormEvent::changed(fields.name(), "Grace"),
        FormEvent::changed(fields.email(), "grace@navy.mil"),
    ] {
        controller.handle(event).expect("handle change");
    }
    assert_eq!(
        controller
            .handle(FormEvent::SubmitRequested)
            .expect("handle submit"),
        Some(SubmitOutcome::Submitted)
    );

    assert_eq!(
        *contacts.borrow(),
        vec![Contact {
            name: "Grace".to_owned(),
            email: "grace@navy.mil".to_owned(),
        }]
    );
}

#[test]
fn channel_sink_feeds_async_consumer() {
    let (sink, mut receiver) = ChannelSink::channel();
    let mut controller = FormController::new(Contact::schema(), FormOptions::default(), sink);

    for name in ["Ada", "Grace"] {
        controller.on_field_change("name", name).expect("set name");
        controller
            .on_field_change("email", "someone@example.com")
            .expect("set email");
        assert_eq!(controller.on_submit(), SubmitOutcome::Submitted);
    }
    drop(controller);

    let names = block_on(async {
        let mut names = Vec::new();
        while let Some(record) = receiver.next().await {
            names.push(record.value("name").to_owned());
        }
        names
    });
    assert_eq!(names, vec!["Ada", "Grace"]);
}
