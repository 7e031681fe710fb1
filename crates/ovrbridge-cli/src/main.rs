//! ovrbridge CLI tools: profile inspection and configuration checks.

#![forbid(unsafe_code)]

use std::cell::Cell;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ovrbridge_common::Config;
use ovrbridge_input::{InputContext, LegacyControl, LegacyControllerActions};
use ovrbridge_vr::{ActionHandle, Capability, Hand, PathHandle, PathResolver, VrResult};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ovrbridge")]
#[command(about = "ovrbridge CLI tools")]
struct Args {
    /// Configuration file (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true, env = "OVRBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Behave as if the runtime offers HP Reverb G2 controller support
    #[arg(long, global = true)]
    reverb_g2: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List interaction profiles in registry order
    Profiles,

    /// Print the legacy control table of a profile for one hand
    Bindings {
        /// Interaction profile path
        #[arg(short, long)]
        profile: String,

        #[arg(long, value_enum)]
        hand: HandArg,
    },

    /// Check every profile's legacy table against its valid input paths
    Validate,

    /// Print the grip-to-legacy transform for a profile and hand
    Transform {
        /// Interaction profile path
        #[arg(short, long)]
        profile: String,

        #[arg(long, value_enum)]
        hand: HandArg,

        /// Print as a JSON array of rows
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HandArg {
    Left,
    Right,
}

impl From<HandArg> for Hand {
    fn from(hand: HandArg) -> Self {
        match hand {
            HandArg::Left => Hand::Left,
            HandArg::Right => Hand::Right,
        }
    }
}

/// Hands out fresh handles without talking to a runtime.
#[derive(Default)]
struct OfflinePaths {
    next: Cell<u64>,
}

impl PathResolver for OfflinePaths {
    fn string_to_path(&self, _path: &str) -> VrResult<PathHandle> {
        self.next.set(self.next.get() + 1);
        Ok(PathHandle(self.next.get()))
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = Config::from_json_str(&text)?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn offline_actions(hand: Hand) -> LegacyControllerActions {
    let mut actions = LegacyControllerActions::new(hand);
    for (i, control) in LegacyControl::ALL.into_iter().enumerate() {
        actions.set(control, ActionHandle(i as u64 + 1));
    }
    actions
}

fn main() -> Result<()> {
    ovrbridge_common::init_tracing_with_default("warn");

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let reverb_g2 = args.reverb_g2;
    let ctx = InputContext::new(config, &move |cap: Capability| match cap {
        Capability::HpMixedRealityController => reverb_g2,
    });

    match args.command {
        Command::Profiles => {
            for profile in ctx.registry().profiles() {
                println!(
                    "{:<52} {:<24} {:>3} paths  {}",
                    profile.path(),
                    profile.openvr_name(),
                    profile.valid_input_paths().len(),
                    profile.render_model_name(Hand::Right).unwrap_or("-")
                );
            }
        }
        Command::Bindings { profile, hand } => {
            let hand = Hand::from(hand);
            let profile = ctx.profile(&profile)?;
            let bindings = profile.legacy_bindings(hand);
            for control in LegacyControl::ALL {
                match bindings.resolve(control) {
                    Some(path) => println!("{:<16} {}/{}", control.name(), hand.path(), path),
                    None => println!("{:<16} -", control.name()),
                }
            }
        }
        Command::Validate => {
            let resolver = OfflinePaths::default();
            let mut failures = 0;
            for profile in ctx.registry().profiles() {
                for hand in Hand::BOTH {
                    let actions = offline_actions(hand);
                    match ctx.legacy_bindings_for(profile.path(), &actions, &resolver) {
                        Ok(bindings) => println!(
                            "ok   {} {}: {} bindings",
                            profile.path(),
                            hand.path(),
                            bindings.len()
                        ),
                        Err(err) => {
                            failures += 1;
                            println!("FAIL {} {}: {err}", profile.path(), hand.path());
                        }
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} legacy table(s) failed validation");
            }
        }
        Command::Transform {
            profile,
            hand,
            json,
        } => {
            let m = ctx.grip_to_steamvr_transform(&profile, Some(hand.into()))?;
            let rows: Vec<[f32; 4]> = (0..4).map(|r| m.row(r).to_array()).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                        row[0], row[1], row[2], row[3]
                    );
                }
            }
        }
        Command::Version => {
            println!("ovrbridge {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
