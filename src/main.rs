use anyhow::Result;

fn main() -> Result<()> {
    // Logging is set up inside `run` once the config and flags are known
    rofi_ts::cli::run()
}
