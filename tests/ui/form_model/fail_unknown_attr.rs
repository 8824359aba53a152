#[derive(boundform::form::FormModel)]
struct Profile {
    #[form(hidden)]
    name: String,
}

fn main() {}
