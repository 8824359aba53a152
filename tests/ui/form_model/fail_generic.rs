#[derive(boundform::form::FormModel)]
struct Wrapper<T> {
    value: T,
}

fn main() {}
