//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Show the effective configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Turing Sandbox Configuration");
    println!("{:-<40}", "");
    println!("Save Directory:      {}", config.save_dir.display());
    println!("Accept Step Cap:     {}", config.accept_step_cap);
    println!("Transform Step Cap:  {}", config.transform_step_cap);
    println!("Step Delay:          {} ms", config.step_delay_ms);
    println!("Relay Port:          {}", config.relay_port);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }
    Ok(())
}

/// Print the config file path.
pub fn path() -> Result<()> {
    match Config::config_file_path() {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("No configuration directory available on this platform"),
    }
    Ok(())
}
