use boundform::form::{FormModel, SubmittedRecord};

#[derive(boundform::form::FormModel)]
struct NewsletterForm {
    #[form(required, email, description = "Where should we send it?")]
    email: String,
    name: String,
    r#type: String,
}

fn main() {
    let fields = NewsletterForm::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(fields.name().as_str(), "name");
    assert_eq!(fields.r#type().as_str(), "type");
    assert!(NewsletterForm::schema().spec("type").is_some());

    let schema = NewsletterForm::schema();
    let spec = schema.spec("email").expect("email is declared");
    assert!(spec.is_required());
    assert_eq!(spec.description_text(), Some("Where should we send it?"));

    let _: fn(&SubmittedRecord) -> NewsletterForm = NewsletterForm::from_record;
}
