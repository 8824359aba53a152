#[derive(boundform::form::FormModel)]
struct Order {
    name: String,
    quantity: u32,
}

fn main() {}
