fn main() {
    if let Err(err) = waymark::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
