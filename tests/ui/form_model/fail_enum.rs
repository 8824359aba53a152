#[derive(boundform::form::FormModel)]
enum Choice {
    Yes,
    No,
}

fn main() {}
