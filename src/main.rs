fn main() {
    if let Err(err) = chart_insights::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
