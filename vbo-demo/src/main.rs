use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    vbo_demo::run()
}
