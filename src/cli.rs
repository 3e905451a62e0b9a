use std::path::PathBuf;

use clap::Parser;

use crate::dispatcher::{DeliveryAction, Mode};

#[derive(Parser)]
#[command(
    name = "grab-link",
    about = "Grab the current link from a desktop application and format it"
)]
pub struct Cli {
    /// Skip the application prompt and use the preferred app
    #[arg(long)]
    pub default_app: bool,

    /// Skip the link-type prompt and use the preferred or context-inferred type
    #[arg(long)]
    pub default_type: bool,

    /// What to do with the formatted link
    #[arg(long, value_enum, default_value_t = DeliveryAction::Insert)]
    pub deliver: DeliveryAction,

    /// Config file (default: <config dir>/grab-link/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Current editing context for link-type inference (default: focused X11 window class)
    #[arg(long)]
    pub context: Option<String>,

    /// List registered applications and link types, then exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        Mode {
            default_app: self.default_app,
            default_type: self.default_type,
            deliver: self.deliver,
        }
    }
}
