fn main() -> anyhow::Result<()> {
    selcarve::init();

    selcarve::ui::cli::run()
}
