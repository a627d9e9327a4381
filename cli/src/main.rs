fn main() -> anyhow::Result<()> {
    ldfserver_cli::run()
}
