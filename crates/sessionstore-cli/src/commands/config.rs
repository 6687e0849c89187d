use anyhow::{Result, bail};
use sessionstore_core::config::{ConfigRepository, RegistryConfig};
use sessionstore_infrastructure::ConfigService;

pub fn show(service: &ConfigService) -> Result<()> {
    let config = service.get_config()?;
    println!("# {}", service.path().display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn init(service: &ConfigService, force: bool) -> Result<()> {
    if service.path().exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            service.path().display()
        );
    }

    service.save(&RegistryConfig::default())?;
    println!("Wrote default config to {}", service.path().display());
    Ok(())
}
