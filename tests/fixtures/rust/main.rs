use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};

fn main() {
    let mut map = HashMap::new();
    map.insert("key", "value");
    writeln!(io::stdout(), "Map size: {}", map.len()).unwrap();
}
