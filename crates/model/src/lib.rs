pub mod route;
pub mod shape;

pub trait ExampleData {
    fn example_data() -> Self;
}
