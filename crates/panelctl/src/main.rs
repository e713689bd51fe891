//! panelctl
//!
//! Host-side control tool for the USB display/camera panel. Drives the
//! device through both of its personas: the vision-processor bootloader
//! that accepts application firmware over a bulk endpoint, and the
//! application device that exposes the LCD and camera.

mod config;
mod image_prep;
mod usb;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::setup_logging;
use config::PanelConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use usb::transport::RusbHost;
use usb::{camera, discovery, firmware, lcd, session};

#[derive(Parser, Debug)]
#[command(name = "panelctl")]
#[command(
    author,
    version,
    about = "Control a USB display/camera panel: flash firmware, query the LCD, push images"
)]
#[command(long_about = "
Drives the panel through both of its USB personas: the bootloader that
accepts a firmware image over a bulk endpoint, and the application device
that exposes the LCD and camera once that firmware runs.

EXAMPLES:
    # Upload application firmware to a device in bootloader mode
    panelctl flash main-fw.img

    # Print the LCD capability block
    panelctl info

    # Show an image, flashing firmware first if still in bootloader mode
    panelctl show photo.jpg --firmware main-fw.img

    # Enable the camera subsystem
    panelctl camera-on

CONFIGURATION:
    panelctl looks for configuration in the following order:
    1. Path specified with --config
    2. ~/.config/panelkit/panelctl.toml
    3. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save default configuration to the default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a firmware image and wait for the device to re-enumerate
    Flash {
        /// Path to the firmware image
        firmware: String,
    },
    /// Query and print the LCD capability block
    Info,
    /// Display an image on the LCD
    Show {
        /// Path to the image to display
        image: String,
        /// Firmware to flash first if the device is still in bootloader mode
        #[arg(short, long, value_name = "PATH")]
        firmware: Option<String>,
    },
    /// Enable the camera subsystem
    CameraOn,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.save_config {
        let config = PanelConfig::default();
        let path = PanelConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        PanelConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        PanelConfig::load_or_default()
    };

    let log_level = args.log_level.as_deref().unwrap_or(&config.panel.log_level);
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("panelctl v{}", env!("CARGO_PKG_VERSION"));

    let host = RusbHost::new().context("Failed to initialize libusb")?;

    match args.command {
        Command::Flash { firmware } => run_flash(&host, &config, &firmware),
        Command::Info => run_info(&host, &config),
        Command::Show { image, firmware } => {
            run_show(&host, &config, &image, firmware.as_deref())
        }
        Command::CameraOn => run_camera_on(&host, &config),
    }
}

/// Flash firmware into the bootloader and wait for the application device.
fn run_flash(host: &RusbHost, config: &PanelConfig, firmware_path: &str) -> Result<()> {
    let image = read_firmware(firmware_path)?;

    let mut boot = session::require(host, config.bootloader_identity())
        .context("no device in bootloader mode")?;
    firmware::load(&mut boot, &image)?;
    drop(boot);

    let up = discovery::wait_for(
        host,
        config.operational_identity(),
        config.discovery_timeout(),
        config.poll_interval(),
    )
    .context("device did not re-enumerate after firmware load")?;

    info!("device up as {}", up.identity());
    Ok(())
}

/// Print the decoded LCD capability block.
fn run_info(host: &RusbHost, config: &PanelConfig) -> Result<()> {
    let mut session = session::require(host, config.operational_identity())?;
    let info = lcd::get_info(&mut session)?;
    println!("{}", info);
    Ok(())
}

/// Bring the device up (flashing if needed), then push one image.
fn run_show(
    host: &RusbHost,
    config: &PanelConfig,
    image_path: &str,
    firmware_path: Option<&str>,
) -> Result<()> {
    let firmware_image = firmware_path.map(read_firmware).transpose()?;

    let mut session = usb::bring_up(
        host,
        config.bootloader_identity(),
        config.operational_identity(),
        firmware_image.as_deref(),
        config.discovery_timeout(),
        config.poll_interval(),
    )
    .context("could not bring up the device")?;

    let info = lcd::get_info(&mut session)?;
    let pixels = image_prep::load_for_panel(Path::new(image_path), &info)?;
    lcd::push_image(&mut session, info.width as i32, info.height as i32, &pixels)?;

    Ok(())
}

/// Run the detach/enable/reattach camera sequence.
fn run_camera_on(host: &RusbHost, config: &PanelConfig) -> Result<()> {
    let mut session = session::require(host, config.operational_identity())?;
    camera::enable(&mut session)?;
    Ok(())
}

/// Read a firmware image into memory, expanding `~` in the path.
fn read_firmware(path: &str) -> Result<Vec<u8>> {
    let path = PathBuf::from(shellexpand::tilde(path).as_ref());
    let image = fs::read(&path)
        .with_context(|| format!("failed to read firmware image: {}", path.display()))?;
    info!(
        "firmware loaded from path: {} ({} bytes)",
        path.display(),
        image.len()
    );
    Ok(image)
}
