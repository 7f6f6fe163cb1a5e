fn main() {
    fixture_harness::cli::run();
}
