use anyhow::{Context, Result};
use chrono::Timelike;
use clap::{Parser, Subcommand};
use rand::rngs::mock::StepRng;

use wspr_beacon::config::{FileSettingsStore, Settings, SettingsStore};
use wspr_beacon::encoder::{encode, WsprMessage};
use wspr_beacon::fsm::BeaconFsm;
use wspr_beacon::scheduler::Scheduler;
use wspr_beacon::status::StatusSnapshot;
use wspr_beacon::synth::{MockHal, Si5351Driver};
use wspr_beacon::{init_logger, log_info};

#[derive(Parser)]
#[command(name = "wspr-beaconctl")]
#[command(about = "Inspect and drive a WSPR beacon's settings and encoding pipeline")]
struct Cli {
    /// Path to the JSON settings file.
    #[arg(long, default_value = "wspr-beacon-settings.json", global = true)]
    settings: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a status snapshot computed from the persisted settings.
    Status,
    /// Enable or disable a band, optionally setting its frequency.
    SetBand {
        band: String,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        frequency_hz: Option<u32>,
    },
    /// Encode a message and drive the mock synth through one transmission,
    /// printing the symbol table and the resulting I2C register trace.
    Simulate {
        #[arg(long)]
        call: Option<String>,
        #[arg(long)]
        locator: Option<String>,
        #[arg(long)]
        power_dbm: Option<i8>,
    },
}

fn load_settings(path: &str) -> Settings {
    let store = FileSettingsStore::new(path);
    store
        .load()
        .map(Settings::merged_with_defaults)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let settings = load_settings(&cli.settings);
            let now = chrono::Utc::now();
            let (hour, minute, second) = (now.hour(), now.minute(), now.second());

            let eligible = |h: u32| {
                settings
                    .bands
                    .values()
                    .any(|b| b.enabled && b.schedule.is_set(h))
            };
            let next_tx = Scheduler::seconds_until_next_actual_transmission(
                hour,
                minute,
                second,
                settings.tx_percent,
                eligible,
            );

            let snapshot = StatusSnapshot::build(
                wspr_beacon::fsm::TransmissionState::Idle,
                wspr_beacon::fsm::NetworkState::Ready,
                None,
                None,
                next_tx,
                None,
                &settings,
            );
            println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
        }

        Commands::SetBand {
            band,
            enabled,
            frequency_hz,
        } => {
            let mut settings = load_settings(&cli.settings);
            if let Some(enabled) = enabled {
                settings.set_str(&format!("bands.{band}.en"), &enabled.to_string());
            }
            if let Some(freq) = frequency_hz {
                settings.set_str(&format!("bands.{band}.freq"), &freq.to_string());
            }
            FileSettingsStore::new(&cli.settings)
                .save(&settings)
                .with_context(|| format!("saving settings to {}", cli.settings))?;
            log_info(&format!("updated band {band}"));
        }

        Commands::Simulate {
            call,
            locator,
            power_dbm,
        } => {
            let settings = load_settings(&cli.settings);
            let msg = WsprMessage::new(
                call.as_deref().unwrap_or(&settings.callsign),
                locator.as_deref().unwrap_or(&settings.locator),
                power_dbm.unwrap_or(settings.power_dbm),
            );
            let symbols = encode(&msg);
            println!("symbols: {symbols:?}");

            let mut fsm = BeaconFsm::new(settings, Si5351Driver::<MockHal>::new(MockHal::new()));
            fsm.boot();
            fsm.ap_services_up();
            fsm.sta_connected();

            let mut rng = StepRng::new(0, 0);
            if let Some(symbols) = fsm.begin_transmission(12, &mut rng).await? {
                for &symbol in symbols.iter().take(4) {
                    fsm.retune_for_symbol(symbol).await?;
                }
                fsm.end_transmission(0).await?;
                log_info("simulated one transmission against the mock synth");
            } else {
                log_info("no band eligible this hour; nothing to simulate");
            }
        }
    }

    Ok(())
}
