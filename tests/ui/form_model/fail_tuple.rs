#[derive(boundform::form::FormModel)]
struct Pair(String, String);

fn main() {}
