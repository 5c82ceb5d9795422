fn main() {
    if let Err(err) = capability_rings::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
