fn main() {
    std::process::exit(packvis_cli_lib::run());
}
