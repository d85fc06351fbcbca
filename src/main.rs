fn main() {
    cardterm::cli::main();
}
