fn main() {
    p8pretty::cli::run();
}
